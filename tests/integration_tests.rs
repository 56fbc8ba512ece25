//! Integration tests for the conversion pipeline.
//! These tests verify that components work together correctly.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use rust_strategen::error::{ConvertError, LlmError};
use rust_strategen::llm::{ChatMessage, ChatService};
use rust_strategen::pipeline::{CancelToken, ConversionPipeline, RetryPolicy};
use rust_strategen::render::RenderOptions;
use rust_strategen::schema::Schema;

/// Deterministic stand-in for the text-generation service: plays back a
/// fixed sequence of responses and counts calls.
struct SequenceService {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl SequenceService {
    fn new(responses: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatService for SequenceService {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }
}

fn pipeline_over(service: &Arc<SequenceService>, max_attempts: u32) -> ConversionPipeline {
    let schema = Schema::load("schemas/strategy_schema.json").unwrap();
    ConversionPipeline::new(
        Arc::clone(service) as Arc<dyn ChatService>,
        &schema,
        RetryPolicy { max_attempts },
        RenderOptions::default(),
    )
}

/// Test the complete flow from instruction to rendered strategy card
#[tokio::test]
async fn test_instruction_to_strategy_card() {
    let document = json!({
        "strategy_sets": [{
            "set_index": 1,
            "phases": [{
                "phase_type": "Entry",
                "conditions": {
                    "condition_type": "COMPARE",
                    "left": { "function_name": "Time" },
                    "operator": ">",
                    "right": "09:30"
                },
                "positions": [{
                    "transaction_type": "BUY",
                    "product_type": "MIS",
                    "instrument": {
                        "exchange": "NFO",
                        "symbol_token": "NIFTY",
                        "instrument_type": "CALL",
                        "expiry_config": { "type": "Current Week", "offset": 0 },
                        "strike_config": { "selection_method": "ATM", "offset": 0 }
                    },
                    "quantity_setup": { "type": "Lots", "value": 1 }
                }]
            }]
        }]
    });
    let service = SequenceService::new(vec![document.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("buy one nifty call after 9:30", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(service.calls(), 2);
    assert_eq!(conversion.json, document);

    let text = &conversion.rendered.text;
    assert!(text.contains("Set #1"));
    assert!(text.contains("Phase: Entry"));
    assert!(text.contains("    Time > 09:30"));
    assert!(text.contains("    BUY [ NFO, NIFTY, CALL, Current Week, ATM, MIS, 1 ]"));
    assert!(conversion.rendered.skipped.is_empty());

    assert_eq!(conversion.blocks.len(), 1);
    assert!(conversion.blocks[0].conditions_yaml.is_some());
    assert!(conversion.blocks[0].positions_yaml.is_some());
}

/// Test that strangle legs keep opposite strike offset signs
#[tokio::test]
async fn test_strangle_offsets_keep_sign() {
    let document = json!({
        "strategy_sets": [{
            "phases": [{
                "phase_type": "Entry",
                "positions": [
                    {
                        "transaction_type": "SELL",
                        "instrument": {
                            "exchange": "NFO",
                            "symbol_token": "NIFTY",
                            "instrument_type": "CALL",
                            "expiry_config": { "type": "Current Week" },
                            "strike_config": { "selection_method": "ATM", "offset": 2 }
                        }
                    },
                    {
                        "transaction_type": "SELL",
                        "instrument": {
                            "exchange": "NFO",
                            "symbol_token": "NIFTY",
                            "instrument_type": "PUT",
                            "expiry_config": { "type": "Current Week" },
                            "strike_config": { "selection_method": "ATM", "offset": -2 }
                        }
                    }
                ]
            }]
        }]
    });
    let service = SequenceService::new(vec![document.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("sell a 2-strike nifty strangle", &CancelToken::new())
        .await
        .unwrap();

    let text = &conversion.rendered.text;
    assert!(text.contains("SELL [ NFO, NIFTY, CALL, Current Week, ATM+2, MIS, 1 ]"));
    assert!(text.contains("SELL [ NFO, NIFTY, PUT, Current Week, ATM-2, MIS, 1 ]"));
}

/// Test runtime variable capture and readback rendering
#[tokio::test]
async fn test_runtime_variable_strategy() {
    let document = json!({
        "strategy_sets": [{
            "phases": [{
                "phase_type": "Entry",
                "conditions": {
                    "condition_type": "GROUP",
                    "connection_logic": "AND",
                    "conditions": [
                        {
                            "keyword": "Set Runtime",
                            "params": {
                                "variable_name": "EntryCandleLow",
                                "value": {
                                    "function_name": "LOW",
                                    "timeframe": "15m",
                                    "inputs": {
                                        "instrument": {
                                            "symbol_token": "NIFTY 50",
                                            "instrument_type": "EQUITY"
                                        }
                                    }
                                }
                            }
                        },
                        {
                            "condition_type": "COMPARE",
                            "left": {
                                "keyword": "LTP",
                                "inputs": {
                                    "instrument": {
                                        "symbol_token": "NIFTY 50",
                                        "instrument_type": "EQUITY"
                                    }
                                }
                            },
                            "operator": ">",
                            "right": {
                                "keyword": "Get Runtime Number",
                                "params": { "variable_name": "EntryCandleLow" }
                            }
                        }
                    ]
                },
                "positions": []
            }]
        }]
    });
    let service = SequenceService::new(vec![document.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert(
            "capture the 15m low, then buy when price crosses above it",
            &CancelToken::new(),
        )
        .await
        .unwrap();

    let expected = [
        "    Set Runtime(EntryCandleLow = LOW (NIFTY 50, 15m))",
        "        AND",
        "        LTP (NIFTY 50) > Get Runtime (EntryCandleLow)",
    ]
    .join("\n");
    assert!(conversion.rendered.text.contains(&expected));
}

/// Test that markdown-fenced model output still converts
#[tokio::test]
async fn test_markdown_fenced_output_still_converts() {
    let fenced = "```json\n{\"strategy_sets\": [{\"phases\": [{\"positions\": [{\"instrument\": {\"exchange\": \"NSE\", \"symbol_token\": \"RELIANCE\", \"instrument_type\": \"EQUITY\"}}]}]}]}\n```";
    let service = SequenceService::new(vec![fenced.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("buy reliance", &CancelToken::new())
        .await
        .unwrap();

    assert!(conversion
        .rendered
        .text
        .contains("BUY [ NSE, RELIANCE, EQUITY, MIS, 1 ]"));
}

/// Test rejected-then-corrected generation over two attempts
#[tokio::test]
async fn test_corrective_retry_then_success() {
    let good = json!({ "strategy_sets": [{ "phases": [] }] });
    let service = SequenceService::new(vec![
        "{\"strategy_sets\": \"oops\"}".to_string(),
        "INVALID".to_string(),
        good.to_string(),
        "VALID".to_string(),
    ]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("buy nifty", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(service.calls(), 4);
    assert_eq!(conversion.json, good);
}

/// Test that an exhausted retry budget surfaces the last candidate
#[tokio::test]
async fn test_exhaustion_surfaces_last_candidate() {
    let service = SequenceService::new(vec![
        "draft-1".to_string(),
        "INVALID".to_string(),
        "draft-2".to_string(),
        "INVALID".to_string(),
    ]);
    let pipeline = pipeline_over(&service, 2);

    let err = pipeline
        .convert("buy nifty", &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(service.calls(), 4);
    assert!(matches!(err, ConvertError::ValidationExhausted { .. }));
    assert_eq!(err.raw_artifact(), Some("draft-2"));
}

/// Test legacy flat documents flowing through the whole pipeline
#[tokio::test]
async fn test_legacy_flat_document_renders() {
    let document = json!({
        "sets": [{
            "type": "intraday",
            "conditions": [{
                "logic": "AND",
                "rules": [{
                    "left": { "keyword": "LTP" },
                    "operator": ">",
                    "right": { "type": "number", "title": "100" }
                }]
            }],
            "positions": [{
                "transaction_type": "BUY",
                "instrument": {
                    "exchange": "NSE",
                    "symbol_token": "SBIN",
                    "instrument_type": "EQUITY"
                }
            }]
        }]
    });
    let service = SequenceService::new(vec![document.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("buy sbin above 100", &CancelToken::new())
        .await
        .unwrap();

    let text = &conversion.rendered.text;
    assert!(text.contains("Phase: intraday"));
    assert!(text.contains("LTP > 100"));
    assert!(text.contains("BUY [ NSE, SBIN, EQUITY, MIS, 1 ]"));
}

/// Test that a malformed position is reported, not fatal
#[tokio::test]
async fn test_bad_position_reported_not_fatal() {
    let document = json!({
        "strategy_sets": [{
            "phases": [{
                "phase_type": "Entry",
                "positions": [
                    {
                        "transaction_type": "BUY",
                        "instrument": { "exchange": "NFO", "symbol_token": "NIFTY" }
                    },
                    { "transaction_type": "HOLD" }
                ]
            }]
        }]
    });
    let service = SequenceService::new(vec![document.to_string(), "VALID".to_string()]);
    let pipeline = pipeline_over(&service, 3);

    let conversion = pipeline
        .convert("buy nifty and hold something", &CancelToken::new())
        .await
        .unwrap();

    assert!(conversion
        .rendered
        .text
        .contains("BUY [ NFO, NIFTY, FUT, MIS, 1 ]"));
    assert_eq!(conversion.rendered.skipped.len(), 1);
    assert_eq!(
        conversion.rendered.skipped[0].location,
        "set 1 / phase Entry / position 2"
    );
}
