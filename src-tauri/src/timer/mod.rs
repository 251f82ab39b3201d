#[cfg(feature = "gui")]
pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{SessionContext, StartOutcome, TimerController, TimerSnapshot};
pub use state::{TimerState, TimerStatus};
