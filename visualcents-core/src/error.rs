//! Error type shared by the VisualCents crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument outside its documented domain (month 13, negative amount, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// OCR credentials are not configured
    #[error("OCR credentials are missing (set access_key_id and access_key_secret)")]
    MissingCredentials,

    #[error("request signing failed: {0}")]
    Signing(String),

    #[error("could not decode OCR response: {0}")]
    Decode(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
