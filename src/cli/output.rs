//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
/// Only the user-facing message is printed; the cause goes to the log.
pub fn map_error(e: &ApiError) -> String {
    format!("Error: {}", e.user_message())
}
