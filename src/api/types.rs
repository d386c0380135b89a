//! API-only response types.
//!
//! The gap request and response bodies live in [`crate::wire`] because the
//! backend client decodes them too.

use serde::{Deserialize, Serialize};

use crate::gap::validate::InputError;

/// Error response body for 4xx errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// One entry per rejected field, empty when not applicable.
    #[serde(default)]
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn from_input_errors(errors: &[InputError]) -> Self {
        Self {
            error: "invalid EYA/OA inputs".to_string(),
            details: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Liveness check body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
