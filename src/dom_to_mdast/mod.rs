// Normalized DOM → MDAST transform.
//
// Walks the owned DOM tree an importer has cleaned (blocks already tabled,
// inline runs already coalesced) and dispatches each element to a handler
// that produces MDAST nodes. Phrasing runs inside flow containers become
// implicit paragraphs; whitespace is collapsed in a post-pass.

pub(crate) mod handlers;
pub(crate) mod whitespace;
pub(crate) mod wrap;

use crate::{dom, mdast};

/// Options for the DOM → MDAST transformation.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Whether to preserve newlines in whitespace normalization.
    pub newlines: bool,
}

/// Transformation state threaded through all handlers.
pub(crate) struct State {
    /// Whether we're currently inside a table cell (flow content flattens).
    pub in_table: bool,
    pub options: TransformOptions,
}

impl State {
    fn new(options: TransformOptions) -> Self {
        Self {
            in_table: false,
            options,
        }
    }
}

/// Transform a normalized DOM subtree into an MDAST tree.
pub(crate) fn transform(root: &dom::Element, options: &TransformOptions) -> mdast::Node {
    let mut state = State::new(options.clone());
    let children = handlers::all(&mut state, &root.children);
    let children = wrap::wrap(children);
    let mut tree = mdast::Node::Root(mdast::Root { children });
    whitespace::post_process_whitespace(&mut tree, options.newlines);
    tree
}
