//! Error types for the revet CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages. The diff engine itself never produces an error: malformed diff
//! input degrades block by block. Every variant here belongs to the
//! collaborator layers around the engine.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for revet operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum RevetError {
    /// User provided invalid arguments, configuration, or environment.
    #[error("{0}")]
    UserError(String),

    /// The model API call failed.
    #[error("Model API call failed: {0}")]
    ApiError(String),

    /// A `gh` CLI invocation failed.
    #[error("gh operation failed: {0}")]
    GhError(String),
}

impl RevetError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RevetError::UserError(_) => exit_codes::USER_ERROR,
            RevetError::ApiError(_) => exit_codes::API_FAILURE,
            RevetError::GhError(_) => exit_codes::GH_FAILURE,
        }
    }
}

/// Result type alias for revet operations.
pub type Result<T> = std::result::Result<T, RevetError>;
