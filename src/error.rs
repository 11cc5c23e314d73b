//! Process-level error type for bootstrap, configuration, and pool setup.
//!
//! Request-path errors use [`crate::handlers::ApiError`]; this enum covers
//! everything that can go wrong before the listener is accepting traffic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or extraction failed. Boxed because
    /// `figment::Error` is large.
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
