//! Generation-validation loop
//!
//! The generator asks the model for a document, the judge passes a verdict
//! on it, and a bounded retry loop keeps the two honest: every attempt is
//! one generate call plus one judge call, so a budget of N attempts costs
//! at most 2N service calls. The judge's word is final; nothing here
//! inspects candidate documents structurally until a candidate has been
//! accepted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::agents::{GeneratorAgent, JudgeAgent, Verdict};
use crate::constants::retry::DEFAULT_MAX_ATTEMPTS;
use crate::document::StrategyDocument;
use crate::error::{CallStage, ConvertError};
use crate::llm::ChatService;
use crate::render::{
    phase_blocks, render_document, RenderOptions, RenderedDocument, StrategyBlocks,
};
use crate::repair::parse_document;
use crate::schema::Schema;

/// Cooperative cancellation flag shared between a caller and the loop.
/// Checked at the top of every attempt; an in-flight service call is left
/// to finish.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Generate + validate pairs before the loop gives up
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Everything a successful conversion produces.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: StrategyDocument,
    /// The repaired JSON exactly as parsed, for echoing back to the caller
    pub json: Value,
    pub rendered: RenderedDocument,
    pub blocks: Vec<StrategyBlocks>,
}

pub struct ConversionPipeline {
    service: Arc<dyn ChatService>,
    generator: GeneratorAgent,
    judge: JudgeAgent,
    retry: RetryPolicy,
    render_options: RenderOptions,
}

impl ConversionPipeline {
    pub fn new(
        service: Arc<dyn ChatService>,
        schema: &Schema,
        retry: RetryPolicy,
        render_options: RenderOptions,
    ) -> Self {
        Self {
            service,
            generator: GeneratorAgent::new(schema),
            judge: JudgeAgent::new(schema),
            retry,
            render_options,
        }
    }

    /// Runs generate + judge rounds until the judge says VALID or the
    /// budget runs out. Odd attempts use the initial prompt, even attempts
    /// the corrective one, so a full budget of 3 goes initial, corrective,
    /// initial. Transport failures abort immediately; they never consume
    /// the budget.
    pub async fn generate_validated(
        &self,
        instruction: &str,
        cancel: &CancelToken,
    ) -> Result<String, ConvertError> {
        let mut last_candidate: Option<String> = None;

        for attempt in 1..=self.retry.max_attempts {
            if cancel.is_cancelled() {
                info!("🛑 [PIPELINE] Cancelled before attempt {}", attempt);
                return Err(ConvertError::Cancelled);
            }

            let corrective = attempt % 2 == 0;
            let messages = if corrective {
                self.generator.corrective_messages(instruction)
            } else {
                self.generator.initial_messages(instruction)
            };
            info!(
                "📝 [PIPELINE] Attempt {}/{} ({} prompt)",
                attempt,
                self.retry.max_attempts,
                if corrective { "corrective" } else { "initial" }
            );

            let candidate =
                self.service
                    .complete(&messages)
                    .await
                    .map_err(|e| ConvertError::Transport {
                        stage: CallStage::Generate,
                        message: e.to_string(),
                        last_candidate: last_candidate.clone(),
                    })?;

            let verdict_text = self
                .service
                .complete(&self.judge.messages(&candidate))
                .await
                .map_err(|e| ConvertError::Transport {
                    stage: CallStage::Validate,
                    message: e.to_string(),
                    last_candidate: Some(candidate.clone()),
                })?;

            match Verdict::parse(&verdict_text) {
                Verdict::Valid => {
                    info!("✅ [JUDGE] Candidate accepted on attempt {}", attempt);
                    return Ok(candidate);
                }
                Verdict::Invalid => {
                    warn!(
                        "🔁 [JUDGE] Candidate rejected on attempt {} (verdict: {})",
                        attempt,
                        verdict_text.trim()
                    );
                    last_candidate = Some(candidate);
                }
            }
        }

        Err(ConvertError::ValidationExhausted {
            attempts: self.retry.max_attempts,
            last_candidate: last_candidate.unwrap_or_default(),
        })
    }

    /// Full conversion: validated generation, repairing parse, text render
    /// and YAML block extraction.
    pub async fn convert(
        &self,
        instruction: &str,
        cancel: &CancelToken,
    ) -> Result<Conversion, ConvertError> {
        let raw = self.generate_validated(instruction, cancel).await?;
        let (document, json) = parse_document(&raw)?;
        let rendered = render_document(&document, &self.render_options);
        let blocks = phase_blocks(&document, &self.render_options);
        info!(
            "📄 [PIPELINE] Conversion complete ({} sets, {} skipped fragments)",
            document.sets.len(),
            rendered.skipped.len()
        );
        Ok(Conversion {
            document,
            json,
            rendered,
            blocks,
        })
    }
}
