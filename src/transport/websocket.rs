use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use super::error::TransportError;
use super::{Transport, TransportCommand, TransportEvent};
use crate::aircraft::AircraftUpdate;

const UPDATE_EVENT: &str = "aircraft_update";
const MAX_BUFFERED: usize = 64;

/// Inbound frame: `{"event": "...", "data": {...}}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

enum LinkCommand {
    Connect,
    Emit(TransportCommand),
}

/// WebSocket link driven by a background task.
///
/// The task owns the socket, reconnects after `reconnect_delay` and hands
/// every event to `sink` in arrival order.
pub struct WebSocketTransport {
    connected: Arc<AtomicBool>,
    commands: mpsc::UnboundedSender<LinkCommand>,
    worker: JoinHandle<()>,
}

impl WebSocketTransport {
    pub fn spawn<F>(url: String, reconnect_delay: Duration, sink: F) -> Self
    where
        F: Fn(TransportEvent) + Send + Sync + 'static,
    {
        let connected = Arc::new(AtomicBool::new(false));
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_link(
            url,
            reconnect_delay,
            connected.clone(),
            commands_rx,
            sink,
        ));

        Self {
            connected,
            commands,
            worker,
        }
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

impl Transport for WebSocketTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&mut self) {
        let _ = self.commands.send(LinkCommand::Connect);
    }

    fn emit(&mut self, command: TransportCommand) {
        if self.commands.send(LinkCommand::Emit(command)).is_err() {
            log::warn!("Transport worker has stopped, dropping command");
        }
    }
}

async fn run_link<F>(
    url: String,
    reconnect_delay: Duration,
    connected: Arc<AtomicBool>,
    mut commands: mpsc::UnboundedReceiver<LinkCommand>,
    sink: F,
) where
    F: Fn(TransportEvent) + Send + Sync + 'static,
{
    let mut pending = VecDeque::new();

    loop {
        log::info!("Connecting to {}", url);
        match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                log::info!("Connected to tracking backend");
                connected.store(true, Ordering::SeqCst);
                sink(TransportEvent::Connected);

                let result = serve_link(stream, &mut pending, &mut commands, &sink).await;
                connected.store(false, Ordering::SeqCst);
                match result {
                    Ok(()) => log::info!("Disconnected from tracking backend"),
                    Err(e) => log::warn!("Link to tracking backend dropped: {}", e),
                }
                sink(TransportEvent::Disconnected);
            }
            Err(e) => {
                log::error!("WebSocket connection error: {}", e);
                sink(TransportEvent::ConnectError(e.to_string()));
            }
        }

        let sleep = tokio::time::sleep(reconnect_delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                command = commands.recv() => match command {
                    None => return,
                    Some(LinkCommand::Connect) => break,
                    Some(LinkCommand::Emit(command)) => buffer(&mut pending, command),
                },
            }
        }
    }
}

async fn serve_link<S, F>(
    stream: WebSocketStream<S>,
    pending: &mut VecDeque<TransportCommand>,
    commands: &mut mpsc::UnboundedReceiver<LinkCommand>,
    sink: &F,
) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Fn(TransportEvent),
{
    let (mut write, mut read) = stream.split();

    while let Some(command) = pending.pop_front() {
        let frame = encode(&command)?;
        if let Err(e) = write.send(frame).await {
            pending.push_front(command);
            return Err(e.into());
        }
    }

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode(&text) {
                    Ok(Some(update)) => sink(TransportEvent::Update(Box::new(update))),
                    Ok(None) => {}
                    Err(e) => log::warn!("Dropping undecodable frame: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            command = commands.recv() => match command {
                None => {
                    let _ = write.close().await;
                    return Err(TransportError::Closed);
                }
                Some(LinkCommand::Connect) => {}
                Some(LinkCommand::Emit(command)) => {
                    let frame = encode(&command)?;
                    if let Err(e) = write.send(frame).await {
                        buffer(pending, command);
                        return Err(e.into());
                    }
                }
            },
        }
    }
}

fn buffer(pending: &mut VecDeque<TransportCommand>, command: TransportCommand) {
    if pending.len() >= MAX_BUFFERED {
        if let Some(dropped) = pending.pop_front() {
            log::warn!("Command buffer full, dropping {}", dropped);
        }
    }
    pending.push_back(command);
}

fn encode(command: &TransportCommand) -> Result<Message, TransportError> {
    Ok(Message::Text(serde_json::to_string(command)?))
}

fn decode(text: &str) -> Result<Option<AircraftUpdate>, TransportError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.event != UPDATE_EVENT {
        log::debug!("Ignoring {} event", envelope.event);
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(envelope.data)?))
}
