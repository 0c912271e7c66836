//! Error handling for the iqflow library
//!
//! This module provides a unified error type for all operations in the
//! iqflow library: invalid filter-design parameters, malformed buffers and
//! I/O failures from the byte-source readers.

use std::fmt;
use std::io;

/// A specialized Result type for iqflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for iqflow operations
#[derive(Debug)]
pub enum Error {
    /// I/O error (file operations, network, etc.)
    Io(io::Error),

    /// Invalid configuration or filter-design parameters
    Config(String),

    /// Invalid I/Q format or conversion error
    Format(String),

    /// Generic error with custom message
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

// From conversions for common error types

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

// Helper constructors for common error scenarios

impl Error {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a format error with a custom message
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    /// Create a generic error with a custom message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
