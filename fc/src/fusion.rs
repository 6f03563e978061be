//! Multi-model fusion
//!
//! Runs the same prompt chain against several independently-configured
//! models (fan-out), then hands each model's final output to a
//! caller-supplied evaluator that scores them and picks a winner (fan-in).

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::{ChainRun, PromptChain};
use crate::context::ChainContext;
use crate::error::ChainError;
use crate::model::ModelClient;
use crate::output::OutputEntry;

/// Aggregate result of one fusion run
///
/// All per-model collections share the same length and order as the model
/// list the run was given; each per-model history has one entry per prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionChainResult {
    /// The evaluator's chosen winner
    pub top_response: OutputEntry,
    /// Full output history per model, in model order
    pub all_prompt_responses: Vec<Vec<OutputEntry>>,
    /// Full rendered-prompt history per model, in model order
    pub all_context_filled_prompts: Vec<Vec<String>>,
    /// Evaluator scores, one per model, in model order
    pub performance_scores: Vec<f64>,
    /// Display name per model, in model order
    pub model_names: Vec<String>,
}

/// Fan-out/fan-in execution of one chain across multiple models
pub struct FusionChain;

impl FusionChain {
    /// Run the chain against each model in order, then evaluate
    ///
    /// Serial mode: each model's chain completes before the next starts,
    /// fully deterministic ordering. The evaluator receives each model's
    /// *final* output in model order and returns the winning response plus
    /// one score per model.
    pub async fn run<E, Fut>(
        context: &ChainContext,
        models: &[Arc<dyn ModelClient>],
        prompts: &[String],
        evaluator: E,
    ) -> Result<FusionChainResult, ChainError>
    where
        E: FnOnce(Vec<OutputEntry>) -> Fut,
        Fut: Future<Output = Result<(OutputEntry, Vec<f64>), ChainError>>,
    {
        Self::check_prompts(prompts)?;

        let mut runs = Vec::with_capacity(models.len());
        for model in models {
            debug!(model = %model.name(), "FusionChain::run: starting chain");
            runs.push(PromptChain::run(context, model.as_ref(), prompts).await?);
        }

        Self::evaluate(models, runs, evaluator).await
    }

    /// Identical contract to [`FusionChain::run`], but per-model chains
    /// execute concurrently
    ///
    /// One tokio task per model, each owning a private context clone and
    /// prompt list; all tasks are joined before the evaluator runs, so it
    /// never sees a partial result set. Any task failure fails the whole
    /// call with no partial aggregate.
    pub async fn run_parallel<E, Fut>(
        context: &ChainContext,
        models: &[Arc<dyn ModelClient>],
        prompts: &[String],
        evaluator: E,
    ) -> Result<FusionChainResult, ChainError>
    where
        E: FnOnce(Vec<OutputEntry>) -> Fut,
        Fut: Future<Output = Result<(OutputEntry, Vec<f64>), ChainError>>,
    {
        Self::check_prompts(prompts)?;

        let mut handles = Vec::with_capacity(models.len());
        for model in models {
            let model = Arc::clone(model);
            let context = context.clone();
            let prompts = prompts.to_vec();
            debug!(model = %model.name(), "FusionChain::run_parallel: spawning chain task");
            handles.push(tokio::spawn(async move {
                PromptChain::run(&context, model.as_ref(), &prompts).await
            }));
        }

        // Barrier: join everything before evaluation. Join order matches
        // spawn order, so per-model collections stay aligned with `models`.
        let joined = try_join_all(handles).await?;
        let runs = joined.into_iter().collect::<Result<Vec<_>, _>>()?;

        Self::evaluate(models, runs, evaluator).await
    }

    fn check_prompts(prompts: &[String]) -> Result<(), ChainError> {
        if prompts.is_empty() {
            return Err(ChainError::FusionContract(
                "prompt list is empty; there is no final output to evaluate".to_string(),
            ));
        }
        Ok(())
    }

    async fn evaluate<E, Fut>(
        models: &[Arc<dyn ModelClient>],
        runs: Vec<ChainRun>,
        evaluator: E,
    ) -> Result<FusionChainResult, ChainError>
    where
        E: FnOnce(Vec<OutputEntry>) -> Fut,
        Fut: Future<Output = Result<(OutputEntry, Vec<f64>), ChainError>>,
    {
        let final_outputs = runs
            .iter()
            .map(|run| run.outputs.last().cloned())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ChainError::FusionContract("a chain run produced no outputs".to_string()))?;

        debug!(model_count = models.len(), "FusionChain: invoking evaluator");
        let (top_response, performance_scores) = evaluator(final_outputs).await?;

        if performance_scores.len() != models.len() {
            return Err(ChainError::FusionContract(format!(
                "evaluator returned {} scores for {} models",
                performance_scores.len(),
                models.len()
            )));
        }

        let mut all_prompt_responses = Vec::with_capacity(runs.len());
        let mut all_context_filled_prompts = Vec::with_capacity(runs.len());
        for run in runs {
            all_prompt_responses.push(run.outputs);
            all_context_filled_prompts.push(run.context_filled_prompts);
        }

        Ok(FusionChainResult {
            top_response,
            all_prompt_responses,
            all_context_filled_prompts,
            performance_scores,
            model_names: models.iter().map(|m| m.name()).collect(),
        })
    }
}
