// Block-level container serialization.
//
// Serializes block children separated by blank lines.

use super::State;
use crate::mdast::Node;

/// Serialize a list of block-level (flow) children with blank lines
/// between them. Used for the root, blockquotes, and similar containers.
pub(crate) fn container_flow(state: &mut State, children: &[Node]) -> String {
    let mut result = String::new();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            result.push_str("\n\n");
        }
        result.push_str(&super::handlers::handle(state, child));
    }
    result
}

/// Serialize block-level children for a list item, respecting tight/spread.
/// `spread` = true → blank line between children, false → single newline.
pub(crate) fn container_flow_tight(state: &mut State, children: &[Node], spread: bool) -> String {
    let mut result = String::new();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            if spread {
                result.push_str("\n\n");
            } else {
                result.push('\n');
            }
        }
        result.push_str(&super::handlers::handle(state, child));
    }
    result
}
