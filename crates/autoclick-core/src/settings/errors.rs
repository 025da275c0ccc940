use crate::errors::AutoclickError;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid refresh interval: must be greater than 0 seconds")]
    InvalidRefreshInterval,

    #[error("Invalid button selector: cannot be empty")]
    EmptySelector,

    #[error("Missing button selector: pass --selector or set cycle.button_selector in config")]
    MissingSelector,
}

impl AutoclickError for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::InvalidRefreshInterval => "INVALID_REFRESH_INTERVAL",
            SettingsError::EmptySelector => "EMPTY_SELECTOR",
            SettingsError::MissingSelector => "MISSING_SELECTOR",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
