//! # Application Errors
//!
//! Everything the CLI can report, unified so commands can use `?` across
//! the core, the backend and local files.

use crate::api::ApiError;
use roster_core::{RosterError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The form was rejected before reaching the backend.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The backend call failed. Displays the backend's message unchanged.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A core contract violation (bad record, bad query, unknown id).
    #[error("{0}")]
    Core(#[from] RosterError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or unreadable session.
    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Bad command-line input.
    #[error("{0}")]
    Usage(String),
}
