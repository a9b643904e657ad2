// Whitespace normalization for MDAST trees.
//
// Source HTML is indented and line-wrapped; that formatting must not leak
// into the Markdown. Collapses whitespace runs in text, merges adjacent
// text nodes, and trims the edges of headings, paragraphs, and the root.

use std::sync::LazyLock;

use regex::Regex;

use crate::mdast::Node;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n]+").expect("static pattern"));

/// Run whitespace post-processing on an MDAST tree.
pub(crate) fn post_process_whitespace(node: &mut Node, preserve_newlines: bool) {
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            post_process_whitespace(child, preserve_newlines);
        }

        // Merge before collapsing so a run split across two nodes still
        // collapses to a single space.
        merge_adjacent_text(children);
        if !preserve_newlines {
            for child in children.iter_mut() {
                if let Node::Text(text) = child {
                    text.value = WHITESPACE_RUN.replace_all(&text.value, " ").into_owned();
                }
            }
        }
        children.retain(|child| !is_empty_text(child));
    }

    let should_trim = matches!(
        node,
        Node::Heading(_) | Node::Paragraph(_) | Node::Root(_) | Node::TableCell(_)
    );
    if should_trim {
        if let Some(children) = node.children_mut() {
            trim_container(children);
            children.retain(|child| !is_empty_text(child));
        }
    }
}

/// Merge adjacent Text nodes into a single node.
fn merge_adjacent_text(children: &mut Vec<Node>) {
    let mut i = 0;
    while i + 1 < children.len() {
        if is_text(&children[i]) && is_text(&children[i + 1]) {
            if let Node::Text(next) = children.remove(i + 1) {
                if let Node::Text(current) = &mut children[i] {
                    current.value.push_str(&next.value);
                }
            }
        } else {
            i += 1;
        }
    }
}

/// Trim whitespace from the first and last text children of a container.
fn trim_container(children: &mut [Node]) {
    if let Some(Node::Text(first)) = children.first_mut() {
        first.value = first
            .value
            .trim_start_matches([' ', '\t', '\n', '\r'])
            .to_string();
    }
    if let Some(Node::Text(last)) = children.last_mut() {
        last.value = last
            .value
            .trim_end_matches([' ', '\t', '\n', '\r'])
            .to_string();
    }
}

fn is_text(node: &Node) -> bool {
    matches!(node, Node::Text(_))
}

fn is_empty_text(node: &Node) -> bool {
    matches!(node, Node::Text(t) if t.value.is_empty())
}
