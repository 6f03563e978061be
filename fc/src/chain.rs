//! Sequential prompt chaining
//!
//! Executes an ordered list of prompt templates against one model, threading
//! the growing output history through each step's template resolution.

use tracing::debug;

use crate::context::ChainContext;
use crate::error::ChainError;
use crate::model::ModelClient;
use crate::output::{OutputEntry, coerce};
use crate::template;

/// The two parallel histories produced by one chain run
///
/// Invariant: `outputs.len() == context_filled_prompts.len() == prompts.len()`
/// for the prompt list the run was given.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun {
    /// Coerced model responses, one per step, in step order
    pub outputs: Vec<OutputEntry>,
    /// The literal, fully-substituted prompt sent at each step
    pub context_filled_prompts: Vec<String>,
}

/// Sequential prompt chain over a single model
pub struct PromptChain;

impl PromptChain {
    /// Run `prompts` in order against `model`
    ///
    /// Each step renders its template against `context` plus the outputs
    /// accumulated so far, invokes the model, and coerces the response.
    /// Steps are strictly sequential: step i+1 may reference step i's
    /// output, so they cannot be reordered or parallelized.
    ///
    /// A model failure is fatal; no partial histories are returned. Retry
    /// policy, if any, belongs inside the caller's [`ModelClient`].
    pub async fn run(context: &ChainContext, model: &dyn ModelClient, prompts: &[String]) -> Result<ChainRun, ChainError> {
        let mut outputs: Vec<OutputEntry> = Vec::with_capacity(prompts.len());
        let mut context_filled_prompts = Vec::with_capacity(prompts.len());

        for (step, prompt) in prompts.iter().enumerate() {
            let rendered = template::resolve(prompt, context, &outputs)?;
            debug!(model = %model.name(), step, prompt_len = rendered.len(), "PromptChain::run: invoking model");

            let raw = model.invoke(&rendered).await?;
            let entry = coerce(&raw);
            debug!(step, structured = entry.as_structured().is_some(), "PromptChain::run: step complete");

            context_filled_prompts.push(rendered);
            outputs.push(entry);
        }

        Ok(ChainRun {
            outputs,
            context_filled_prompts,
        })
    }
}
