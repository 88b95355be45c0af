use thiserror::Error;

use crate::types::ValidationError;

/// Boxed cause carried through the error chain
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The single error returned from a send
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Rejected locally; no request was attempted
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] ValidationError),

    /// The HTTP call failed: network error, timeout or error status
    #[error("Transport failure: {0}")]
    TransportFailure(#[source] BoxError),

    /// Anything else that went wrong while preparing the request
    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(#[source] BoxError),
}

/// Discriminant of a [`DeliveryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    InvalidMessage,
    TransportFailure,
    UnexpectedFailure,
}

impl DeliveryError {
    pub fn kind(&self) -> DeliveryErrorKind {
        match self {
            Self::InvalidMessage(_) => DeliveryErrorKind::InvalidMessage,
            Self::TransportFailure(_) => DeliveryErrorKind::TransportFailure,
            Self::UnexpectedFailure(_) => DeliveryErrorKind::UnexpectedFailure,
        }
    }

    pub(crate) fn unexpected<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::UnexpectedFailure(err.into())
    }
}

/// Configuration-time errors; never raised on the per-message path
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid DSN: {0}")]
    InvalidDsn(String),

    #[error("Unsupported scheme \"{scheme}\" (supported: {})", .supported.join(", "))]
    UnsupportedScheme {
        scheme: String,
        supported: &'static [&'static str],
    },

    #[error("DSN is missing a host")]
    MissingHost,

    #[error("DSN is missing the {0}")]
    MissingCredential(&'static str),

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}
