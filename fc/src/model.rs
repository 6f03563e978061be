//! Model abstraction
//!
//! The engine never talks to a provider directly. Callers hand it model
//! handles implementing [`ModelClient`]; anything that can turn a prompt
//! into text qualifies (HTTP-backed clients, local models, test mocks).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Capability interface for a language model backend
///
/// Each invocation is independent - no conversation state is maintained
/// between calls. Chain steps carry forward context explicitly through
/// their rendered prompts instead.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one prompt and return the raw text response
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError>;

    /// Display name for this model, used in fusion results
    fn name(&self) -> String;
}

/// Errors a model backend can report
///
/// The engine treats all of these as fatal for the enclosing chain run.
/// Retry policy belongs to the caller's [`ModelClient`] implementation;
/// `is_retryable` is provided so wrappers can make that call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Check if this error is worth retrying from a wrapping client
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Api { status, .. } => *status >= 500,
            ModelError::Timeout(_) => true,
            ModelError::InvalidResponse(_) => false,
            ModelError::Json(_) => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        // 5xx errors should be retryable
        assert!(
            ModelError::Api {
                status: 503,
                message: "overloaded".to_string()
            }
            .is_retryable()
        );

        // 4xx errors should not be retryable
        assert!(
            !ModelError::Api {
                status: 400,
                message: "bad request".to_string()
            }
            .is_retryable()
        );

        // Timeout should be retryable
        assert!(ModelError::Timeout(Duration::from_secs(30)).is_retryable());

        // Invalid response should not be retryable
        assert!(!ModelError::InvalidResponse("empty body".to_string()).is_retryable());
    }
}
