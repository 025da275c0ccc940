//! The refresh/click cycle controller.
//!
//! A single task owns the whole cycle: settings, the tracked target, the
//! cycle counter and both timers. Everything else talks to it through a
//! [`ControllerHandle`].

pub mod countdown;
pub mod errors;
pub mod handle;
pub mod machine;
pub mod timers;
pub mod types;

pub use errors::ControllerError;
pub use handle::{ControllerHandle, spawn_controller, spawn_controller_with_sink};
pub use machine::{CycleController, CycleState};
pub use types::{ControllerOptions, CycleStatus, Phase, StopReport};
