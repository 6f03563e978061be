//! FusionChain - prompt-chaining and multi-model fusion engine
//!
//! A small interpreter for templated LLM workflows: it resolves prompt
//! templates against an accumulating context and a history of prior model
//! outputs, sequences multiple templated calls into one *chain*, runs the
//! same chain against several independently-configured models, and fuses
//! the per-model results via a caller-supplied evaluator into a single
//! ranked outcome.
//!
//! # Core Concepts
//!
//! - **Chain**: an ordered list of prompt templates executed sequentially
//!   against one model, each able to reference prior outputs via
//!   `{{output[-k]}}`
//! - **Fusion**: running the same chain against multiple models and
//!   combining their results via an evaluator
//! - **Structured Output**: responses recognized as JSON are carried as
//!   parsed values so later templates can address into them
//!
//! # Modules
//!
//! - [`template`] - placeholder resolution against context and history
//! - [`output`] - text-vs-structured coercion of raw responses
//! - [`chain`] - sequential chain execution over one model
//! - [`fusion`] - multi-model fan-out/fan-in plus evaluation
//! - [`model`] - the model capability trait callers implement
//! - [`dump`] - optional delimiter-separated debug dumps
//! - [`config`] - configuration types and loading

pub mod chain;
pub mod config;
pub mod context;
pub mod dump;
pub mod error;
pub mod fusion;
pub mod model;
pub mod output;
pub mod template;

// Re-export commonly used types
pub use chain::{ChainRun, PromptChain};
pub use config::{Config, DumpConfig};
pub use context::{ChainContext, is_truthy};
pub use dump::{DUMP_DELIMITER, DumpRecord, DumpWriter};
pub use error::ChainError;
pub use fusion::{FusionChain, FusionChainResult};
pub use model::{ModelClient, ModelError};
pub use output::{OutputEntry, coerce, strip_code_fence};
pub use template::resolve;
