//! Structural YAML block extraction
//!
//! Next to the rendered text the chat surface shows small YAML fragments:
//! the first comparison of a phase and the raw position list. These are
//! straight structural dumps of the document, not renders; operands and
//! positions serialize back under their source key names.

use serde::Serialize;

use crate::document::{ConditionNode, Operand, PositionEntry, StrategyDocument};
use crate::render::RenderOptions;

#[derive(Debug, Serialize)]
struct CompareBlock<'a> {
    left: &'a Operand,
    operator: &'a str,
    right: &'a Operand,
}

/// YAML dump of the first comparison found depth-first in the tree.
pub fn condition_block(node: &ConditionNode) -> Option<String> {
    let (left, operator, right) = first_compare(node)?;
    serde_yaml::to_string(&CompareBlock {
        left,
        operator,
        right,
    })
    .ok()
}

fn first_compare(node: &ConditionNode) -> Option<(&Operand, &str, &Operand)> {
    match node {
        ConditionNode::Compare {
            left,
            operator,
            right,
        } => Some((left, operator.as_str(), right)),
        ConditionNode::Group { children, .. } => children.iter().find_map(first_compare),
        _ => None,
    }
}

/// YAML dump of a phase's position list, renderable or not.
pub fn positions_block(entries: &[PositionEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    serde_yaml::to_string(entries).ok()
}

/// YAML fragments for one phase that had anything to show.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategyBlocks {
    /// Display number of the owning set, matching the rendered `Set #n`
    /// headers
    pub set: usize,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions_yaml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions_yaml: Option<String>,
}

/// Collects the YAML fragments for every phase of the document. Phases
/// with neither a comparison nor positions are left out; set numbers
/// follow the same display numbering as the text renderer.
pub fn phase_blocks(doc: &StrategyDocument, options: &RenderOptions) -> Vec<StrategyBlocks> {
    let mut blocks = Vec::new();
    for (ordinal, set) in doc.sets.iter().enumerate() {
        for phase in &set.phases {
            let conditions_yaml = phase.conditions.as_ref().and_then(condition_block);
            let positions_yaml = positions_block(&phase.positions);
            if conditions_yaml.is_none() && positions_yaml.is_none() {
                continue;
            }
            blocks.push(StrategyBlocks {
                set: options.set_number(ordinal),
                phase: phase.name.clone(),
                conditions_yaml,
                positions_yaml,
            });
        }
    }
    blocks
}
