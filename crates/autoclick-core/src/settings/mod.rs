pub mod errors;
pub mod types;

pub use errors::SettingsError;
pub use types::Settings;
