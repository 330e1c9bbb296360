use thiserror::Error;

/// Errors produced by this crate. Each subsystem carries its own error enum
/// and the gateway maps those to HTTP codes; the core only fails while
/// loading configuration.
#[derive(Debug, Error)]
pub enum HackplanError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HackplanError>;
