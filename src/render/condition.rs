//! Recursive condition tree renderer
//!
//! Pure recursive descent over the tree (input is a tree, never a graph, so
//! there is no cycle risk). One group level is one indentation level; the
//! logic operator sits on its own line between siblings. Rendering the same
//! tree twice is byte-identical.
//!
//! Rendering runs in two passes: `collapse` prunes empty fragments and
//! dissolves groups left with a single renderable child, then `emit` lays
//! out the survivors with depth-scaled padding. Every node is formatted
//! exactly once, so cost stays linear however deeply wrappers nest.

use tracing::debug;

use crate::constants::render::INDENT_STEP;
use crate::document::{ConditionNode, Connective};
use crate::render::operand::format_operand;

/// Renders a condition tree into possibly multi-line text. Empty text means
/// the tree had nothing renderable in it.
pub fn render_condition(node: &ConditionNode) -> String {
    collapse(node).map(|tree| emit(&tree, 0)).unwrap_or_default()
}

/// Pruned tree ready for layout: leaves carry their final text (which is
/// depth-independent), groups hold two or more renderable children.
enum Collapsed {
    Line(String),
    Group {
        logic: Connective,
        children: Vec<Collapsed>,
    },
}

/// Formats leaves and drops unrenderable fragments. A group left with one
/// renderable child collapses to that child, so it later emits at the
/// group's own depth.
fn collapse(node: &ConditionNode) -> Option<Collapsed> {
    match node {
        ConditionNode::Compare {
            left,
            operator,
            right,
        } => Some(Collapsed::Line(format!(
            "{} {} {}",
            format_operand(left),
            operator,
            format_operand(right)
        ))),
        ConditionNode::Leaf(operand) => {
            let text = format_operand(operand);
            if text.is_empty() {
                None
            } else {
                Some(Collapsed::Line(text))
            }
        }
        ConditionNode::Opaque(_) => {
            debug!("🧹 [RENDER] Dropping unrecognized condition shape");
            None
        }
        ConditionNode::Group { logic, children } => {
            let mut kept: Vec<Collapsed> = children.iter().filter_map(collapse).collect();
            match kept.len() {
                0 => None,
                1 => kept.pop(),
                _ => Some(Collapsed::Group {
                    logic: *logic,
                    children: kept,
                }),
            }
        }
    }
}

fn emit(tree: &Collapsed, depth: usize) -> String {
    match tree {
        Collapsed::Line(text) => text.clone(),
        Collapsed::Group { logic, children } => {
            let pad = INDENT_STEP.repeat(depth + 1);
            let separator = format!("\n{pad}{logic}\n{pad}");
            let texts: Vec<String> = children.iter().map(|child| emit(child, depth + 1)).collect();
            texts.join(&separator)
        }
    }
}
