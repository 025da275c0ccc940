//! autoclick-daemon: the socket bridge between pages and the cycle controller
//!
//! The daemon owns one cycle controller. Page bridges connect over a Unix
//! socket and `attach` their page; operators connect to the same socket to
//! start, stop and inspect the cycle. Messages are JSON lines.

pub mod bridge;
pub mod client;
pub mod errors;
pub mod protocol;
pub mod server;
pub mod types;

pub use bridge::BridgeHost;
pub use client::DaemonClient;
pub use errors::DaemonError;
pub use server::run_server;
pub use types::DaemonConfig;
