pub mod connection;

pub use connection::DaemonClient;
