//! Shared error type and run configuration

pub mod config;

pub type Result<T> = core::result::Result<T, LoadgenError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadgenError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Connect, DNS, TLS, timeout or body-read fault reported by the transport.
    #[error("{0}")]
    Transport(String),
    #[error("malformed response body: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("config file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),
}
