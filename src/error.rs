use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    UpstreamFatal(String),

    #[error("service unavailable after multiple attempts")]
    Exhausted { attempts: u32 },

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn upstream_fatal(msg: impl Into<String>) -> Self {
        Self::UpstreamFatal(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status this error is reported with at the inbound endpoint.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamFatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Exhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to callers. Internal faults are not echoed back.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) | Self::UpstreamFatal(_) | Self::Exhausted { .. } => {
                self.to_string()
            }
            _ => "internal server error".to_string(),
        }
    }
}
