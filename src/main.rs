mod aircraft;
mod config;
mod lookup;
mod render;
mod session;
mod transport;
mod view;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::lookup::HttpLookupClient;
use crate::render::{HeadlessMap, HeadlessPanel, RenderBridge};
use crate::session::{ControllerEvent, Runner, SessionController, UserCommand};
use crate::transport::WebSocketTransport;

#[derive(Parser)]
#[command(name = "planewatch")]
#[command(about = "Live aircraft tracking controller")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate { config: String },
    /// Connect to the backend and serve the control API
    Run {
        config: String,
        /// Registration to start tracking immediately
        #[arg(long)]
        track: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { config, track } => run(&config, track),
    }
}

fn load(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading {}: {}", path, e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    println!("Configuration is valid");
    println!("  backend:   {}", config.backend.base_url);
    println!("  transport: {}", config.transport_url());
    println!("  login:     {}", config.login_url());
    println!(
        "  map:       center {} zoom {} radius {} mi",
        config.map.initial_center, config.map.initial_zoom, config.map.radius_miles
    );
    println!("  api:       {} ({} keys)", config.web.bind, config.api_keys.len());
    ExitCode::SUCCESS
}

fn run(path: &str, track: Option<String>) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(serve(config, track))
}

async fn serve(config: Config, track: Option<String>) -> ExitCode {
    let center = match config.map.center() {
        Ok(center) => center,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let lookup = match HttpLookupClient::new(
        &config.backend.base_url,
        config.backend.session_cookie.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let sink = events_tx.clone();
    let transport = WebSocketTransport::spawn(
        config.transport_url(),
        config.backend.reconnect_delay,
        move |event| {
            let _ = sink.send(ControllerEvent::Transport(event));
        },
    );

    let controller = SessionController::new(
        transport,
        RenderBridge::new(
            HeadlessMap::new(center, config.map.initial_zoom),
            HeadlessPanel::new(),
        ),
        config.map.view_settings(),
        config.login_url(),
    );

    let runner = Runner::new(controller, lookup, (events_tx, events_rx));
    let handle = runner.handle();

    if let Some(registration) = track {
        if handle.send(UserCommand::Search(registration)).is_err() {
            return ExitCode::FAILURE;
        }
    }

    let config = Arc::new(config);
    log::info!("Tracking controller started against {}", config.backend.base_url);

    tokio::select! {
        _ = runner.run() => {
            log::warn!("Event loop ended");
            ExitCode::FAILURE
        }
        result = web::run_server(config.clone(), handle) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Control API failed: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutting down");
            ExitCode::SUCCESS
        }
    }
}
