pub mod logger;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerLensError {
    /// The request never reached the server or timed out.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status or an unusable body.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A required field was missing before submission.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CareerLensError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<config::ConfigError> for CareerLensError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for CareerLensError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type CareerLensResult<T> = Result<T, CareerLensError>;

/// Rejects blank values of a required form field.
pub fn require_field(name: &str, value: &str) -> CareerLensResult<()> {
    if value.trim().is_empty() {
        return Err(CareerLensError::validation(format!("{name} is required")));
    }
    Ok(())
}
