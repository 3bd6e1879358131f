//! Core error types for routinely-core.
//!
//! Validation failures are reported synchronously and never mutate the
//! planner. State errors describe lookups that missed (unknown ids, empty
//! lists); the planner treats them as no-ops and logs them.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::{ListId, RoutineId};

/// Error returned by planner operations.
///
/// Configuration has its own [`ConfigError`]; it never flows through the
/// planner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup or precondition failures against the current planner state
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration string is neither a bare minute count nor a colon form
    #[error("Invalid duration '{0}': expected minutes or H:MM:SS / MM:SS")]
    InvalidDuration(String),

    /// Wall-clock string is not HH:MM or HH:MM:SS
    #[error("Invalid time '{0}': expected HH:MM or HH:MM:SS")]
    InvalidWallTime(String),

    /// Routine or list name is blank
    #[error("Name must not be empty")]
    EmptyName,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised when an operation refers to something the planner does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("List not found: {0}")]
    ListNotFound(ListId),

    #[error("Routine {routine} not found in list {list}")]
    RoutineNotFound { list: ListId, routine: RoutineId },

    #[error("List {0} has no routines")]
    EmptyList(ListId),

    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    IndexOutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
