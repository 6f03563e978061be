//! Engine error types

use thiserror::Error;

use crate::model::ModelError;

/// Errors that can occur while resolving templates or running chains
#[derive(Debug, Error)]
pub enum ChainError {
    /// A `{{name}}` or `{{name.path}}` placeholder named a context key or
    /// path segment that does not exist, or a dotted path descended into a
    /// plain-text output entry.
    #[error("template references unknown key or path '{reference}'")]
    TemplateReference { reference: String },

    /// An `output[-k]` placeholder pointed outside the accumulated history.
    #[error("output reference 'output[-{index}]' is out of range ({len} entries in history)")]
    OutOfRangeReference { index: usize, len: usize },

    /// The caller violated the fusion contract (wrong-length score vector,
    /// empty prompt list).
    #[error("fusion contract violation: {0}")]
    FusionContract(String),

    /// A model invocation failed; fatal for the enclosing chain run.
    #[error("model invocation failed: {0}")]
    Model(#[from] ModelError),

    /// A parallel chain task panicked or was cancelled.
    #[error("chain task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Debug dump I/O failure.
    #[error("dump write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    /// Check if this error came from template resolution
    ///
    /// Reference errors are recoverable by the caller (fix the template or
    /// the context); model and task errors are not.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ChainError::TemplateReference { .. } | ChainError::OutOfRangeReference { .. }
        )
    }
}
