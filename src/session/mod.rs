mod controller;
mod error;
pub mod runner;
mod types;

pub use controller::SessionController;
pub use error::TrackError;
pub use runner::{Runner, RunnerClosed, RunnerHandle, StatusSnapshot};
pub use types::{ControllerEvent, ControllerStatus, Session, UserCommand};
