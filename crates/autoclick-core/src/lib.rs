//! autoclick-core: timed page refresh and button click cycles
//!
//! This library holds the cycle controller and everything it needs: the
//! settings model, target tracking, the retrying messaging gateway and the
//! diagnostic logger. Transport to the actual page is abstracted behind
//! [`host::TargetHost`]; the daemon crate provides the socket-backed one.
//!
//! # Main Entry Points
//!
//! - [`controller`] - Start, stop and observe the refresh/click cycle
//! - [`gateway`] - Bounded-retry delivery to the target page
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and the diagnostic cycle log

pub mod config;
pub mod controller;
pub mod display;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod host;
pub mod logging;
pub mod protocol;
pub mod settings;
pub mod target;

// Re-export commonly used types at crate root for convenience
pub use config::AutoclickConfig;
pub use controller::{
    ControllerError, ControllerHandle, ControllerOptions, CycleStatus, Phase, StopReport,
    spawn_controller,
};
pub use errors::{AutoclickError, AutoclickResult};
pub use gateway::{GatewayError, MessagingGateway, RetryPolicy};
pub use host::{HostError, TargetHost};
pub use protocol::{TargetRequest, TargetResponse};
pub use settings::{Settings, SettingsError};
pub use target::{ContextId, Target};

// Re-export logging initialization
pub use logging::init_logging;
