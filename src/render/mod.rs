//! Text renderers for canonical strategy documents
//!
//! The document renderer produces the plain-text strategy card layout the
//! UI shows; the submodules hold the recursive condition renderer, the
//! operand formatter, the position leg renderer and the auxiliary YAML
//! block dumps. Rendering is pure and total: fragments that cannot be
//! rendered are skipped and reported, never fatal.

pub mod condition;
pub mod operand;
pub mod position;
pub mod yaml;

pub use condition::render_condition;
pub use operand::format_operand;
pub use position::{render_position, render_position_entry};
pub use yaml::{condition_block, phase_blocks, positions_block, StrategyBlocks};

use serde::Serialize;
use tracing::warn;

use crate::constants::render as fmt;
use crate::document::StrategyDocument;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Number set headers from zero instead of one
    pub zero_based_sets: bool,
}

impl RenderOptions {
    /// Display number for the set at a document-order position. Shared by
    /// the text renderer and the YAML blocks so both carry the same number.
    pub fn set_number(&self, ordinal: usize) -> usize {
        if self.zero_based_sets {
            ordinal
        } else {
            ordinal + 1
        }
    }
}

/// Fragment that could not be rendered. Reported alongside the text,
/// never fatal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderSkip {
    pub location: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RenderedDocument {
    pub text: String,
    pub skipped: Vec<RenderSkip>,
}

/// Renders the whole document. Set headers are numbered by document order;
/// the embedded `set_index` is not trusted for display.
pub fn render_document(doc: &StrategyDocument, options: &RenderOptions) -> RenderedDocument {
    let mut lines: Vec<String> = Vec::new();
    let mut skipped: Vec<RenderSkip> = Vec::new();

    for (ordinal, set) in doc.sets.iter().enumerate() {
        let shown = options.set_number(ordinal);
        lines.push(format!("Set #{shown}"));
        lines.push("-".repeat(fmt::SET_SEPARATOR_WIDTH));

        for phase in &set.phases {
            lines.push(format!("Phase: {}", phase.name));
            lines.push("  Conditions:".to_string());
            let condition_text = phase
                .conditions
                .as_ref()
                .map(render_condition)
                .unwrap_or_default();
            if condition_text.is_empty() {
                lines.push(format!("    {}", fmt::NONE_MARKER));
            } else {
                for line in condition_text.lines() {
                    lines.push(format!("    {line}"));
                }
            }

            if !phase.positions.is_empty() {
                lines.push(String::new());
                lines.push("  Positions:".to_string());
                for (slot, entry) in phase.positions.iter().enumerate() {
                    match render_position_entry(entry) {
                        Ok(text) => lines.push(format!("    {text}")),
                        Err(reason) => {
                            let skip = RenderSkip {
                                location: format!(
                                    "set {} / phase {} / position {}",
                                    shown,
                                    phase.name,
                                    slot + 1
                                ),
                                reason,
                            };
                            warn!("⚠️ [RENDER] Skipping {}: {}", skip.location, skip.reason);
                            skipped.push(skip);
                        }
                    }
                }
            }

            // Blank line between phases
            lines.push(String::new());
        }
    }

    RenderedDocument {
        text: lines.join("\n"),
        skipped,
    }
}
