//! Core error types for pointstracker-core.
//!
//! This module defines the error hierarchy using thiserror. Validation and
//! authentication errors carry the message shown to the user verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pointstracker-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// State store errors
    #[error("State store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Authentication errors
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Challenge state errors
    #[error("{0}")]
    Gate(#[from] GateError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local database errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Errors raised while reading or writing the shared state document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure (DNS, TLS, connection refused, ...)
    #[error("{backend} request failed: {source}")]
    Request {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with a non-success status
    #[error("{backend} returned HTTP {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// The document could not be decoded
    #[error("Malformed state document: {0}")]
    Malformed(String),

    /// Backend is selected but not configured
    #[error("{backend} backend is not configured: {message}")]
    NotConfigured {
        backend: &'static str,
        message: String,
    },

    /// Local SQLite store failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Errors raised by a notification delivery collaborator.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notification endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Local database errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors. The display text is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("PIN must be exactly 4 digits.")]
    InvalidPin,

    #[error("New password must be at least 4 characters long.")]
    PasswordTooShort,

    #[error("Threshold must be a number greater than 0.")]
    InvalidThreshold,

    #[error("Threshold must be at most {max}.")]
    ThresholdTooLarge { max: u32 },

    #[error("Point amount must be non-zero.")]
    ZeroAmount,

    #[error("Unknown counter '{0}'.")]
    UnknownCounter(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Authentication errors for the admin panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password cannot be empty.")]
    EmptyPassword,

    #[error("Incorrect Admin Password.")]
    IncorrectPassword,

    #[error("Admin login required.")]
    NotLoggedIn,
}

/// Errors for the single pending-challenge slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("A change of {amount} points to {counter} is awaiting PIN approval.")]
    ChallengePending { counter: String, amount: i64 },

    #[error("No change is awaiting PIN approval.")]
    NoPendingChallenge,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

