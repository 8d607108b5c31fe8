//! Error Types for Crypto Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{service} returned {status}: {body}")]
    ExternalService {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Completion provider error: {0}")]
    Provider(#[from] agent_core::AgentError),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Coarse classification used for logging and recovery decisions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid setting; fatal at startup
    Configuration,
    /// Non-success status or transport failure from a remote API
    ExternalService,
    /// Remote API answered with an unexpected shape
    Parsing,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::ExternalService => write!(f, "external_service"),
            Self::Parsing => write!(f, "parsing"),
        }
    }
}

impl AdvisorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::ExternalService { .. } | Self::Network(_) => ErrorKind::ExternalService,
            Self::Provider(e) if e.is_parse() => ErrorKind::Parsing,
            Self::Provider(_) => ErrorKind::ExternalService,
            Self::Parse(_) => ErrorKind::Parsing,
        }
    }

    /// Transient remote failure: rate limits, unreachable hosts, 5xx
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retryable(),
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            Self::ExternalService { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Parse(_) => false,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
