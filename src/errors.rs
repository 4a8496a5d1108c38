//! All the errors defined by this crate.

use std::{
    io::{self, ErrorKind},
    time::Duration,
};
use thiserror::Error;

/// Shorthand for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error returned by a [`Q3Client`](crate::Q3Client) operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The socket could not be opened, the host could not be resolved, or
    /// sending/receiving the datagram failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// No reply arrived before the configured deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A reply arrived but it does not look like what we asked for.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Caller supplied input that cannot be sent safely.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The client is not configured for the requested operation.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Transport(err) => err,
            Error::Timeout(dur) => io::Error::new(ErrorKind::TimedOut, Error::Timeout(dur)),
            Error::Protocol(err) => err.into(),
            Error::Validation(err) => err.into(),
            Error::Configuration(err) => err.into(),
        }
    }
}

/// An error from the connectionless protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The reply does not start with the expected connectionless header.
    #[error("bad response: expected {expected}")]
    BadResponse {
        /// The response type we were waiting for, e.g. `infoResponse`.
        expected: &'static str,
    },

    /// The `infoResponse` has no key/value line.
    #[error("bad response: missing info line")]
    MissingInfoLine,

    /// The key/value line holds nothing after the leading backslash.
    #[error("bad response: empty info line")]
    EmptyInfo,

    /// The `statusResponse` has fewer than two lines.
    #[error("bad response: missing status lines")]
    MissingStatusLines,
}

impl From<ProtocolError> for io::Error {
    fn from(err: ProtocolError) -> Self {
        io::Error::new(ErrorKind::InvalidData, err)
    }
}

/// Caller input rejected before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Variable names may not contain whitespace, since the name is sent
    /// verbatim as an rcon argument.
    #[error("not a variable: {0:?}")]
    NotAVariable(String),
}

impl From<ValidationError> for io::Error {
    fn from(err: ValidationError) -> Self {
        io::Error::new(ErrorKind::InvalidInput, err)
    }
}

/// The client configuration does not allow the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An rcon operation was attempted on a client without a password.
    #[error("missing rcon password")]
    MissingRconPassword,

    /// A zero timeout would fail every exchange immediately.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

impl From<ConfigurationError> for io::Error {
    fn from(err: ConfigurationError) -> Self {
        io::Error::new(ErrorKind::InvalidInput, err)
    }
}
