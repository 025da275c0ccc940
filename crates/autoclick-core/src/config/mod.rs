//! # Configuration System
//!
//! Hierarchical TOML configuration for autoclick.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.autoclick/config.toml`
//! 3. **Project config** - `./.autoclick/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.autoclick/config.toml
//! [cycle]
//! refresh_interval_secs = 120
//! wait_secs = 8
//! button_selector = "#claim-button"
//!
//! [delivery]
//! max_attempts = 5
//! backoff_ms = 500
//!
//! [readiness]
//! timeout_secs = 30
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use autoclick_core::config::AutoclickConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AutoclickConfig::load_hierarchy()?;
//!     let policy = config.retry_policy();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{AutoclickConfig, CycleConfig, DaemonSection, DeliveryConfig, ReadinessConfig};
pub use validation::validate_config;

impl AutoclickConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, Box<dyn std::error::Error>> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
