use std::io;

use thiserror::Error;

/// Errors raised while assembling the service configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not found. Set it in the environment or in a .env file")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),
}

/// Fatal startup and serving errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No free port found starting at {start} after {attempts} attempts")]
    NoAvailablePort { start: u16, attempts: u16 },

    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
