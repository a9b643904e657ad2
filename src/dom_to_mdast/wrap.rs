// Implicit paragraph detection and block-in-inline resolution.
//
// Flow containers in migration markup freely mix loose text with block
// elements. Phrasing runs are wrapped into implicit Paragraph nodes, and
// straddling inline wrappers (a link or underline around a whole block of
// content) are split so the wrapper distributes around each block child.

use crate::mdast::{self, Node};

/// Wrap mixed content: phrasing runs become paragraphs, block content
/// passes through unchanged.
pub(crate) fn wrap(nodes: Vec<Node>) -> Vec<Node> {
    let nodes = flatten(nodes);
    let mut result = Vec::new();
    let mut phrasing_run: Vec<Node> = Vec::new();

    for node in nodes {
        if node.is_phrasing() {
            phrasing_run.push(node);
        } else {
            flush_run(&mut phrasing_run, &mut result);
            result.push(node);
        }
    }
    flush_run(&mut phrasing_run, &mut result);

    result
}

fn flush_run(run: &mut Vec<Node>, result: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let run = drop_surrounding_breaks(std::mem::take(run));
    if !is_whitespace_only(&run) {
        result.push(Node::Paragraph(mdast::Paragraph { children: run }));
    }
}

/// Whether any node in the list (or its descendants) is block content.
pub(crate) fn wrap_needed(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| {
        if !node.is_phrasing() {
            return true;
        }
        node.children().is_some_and(wrap_needed)
    })
}

/// Split straddling wrappers: a Link, Delete, or Underline containing block
/// content is distributed around each of its block children.
fn flatten(nodes: Vec<Node>) -> Vec<Node> {
    let mut result = Vec::new();
    for node in nodes {
        let straddles = matches!(node, Node::Link(_) | Node::Delete(_) | Node::Underline(_))
            && node.children().is_some_and(wrap_needed);
        if straddles {
            result.append(&mut split_straddling(node));
        } else {
            result.push(node);
        }
    }
    result
}

fn split_straddling(node: Node) -> Vec<Node> {
    let children = match node.children() {
        Some(c) => c.to_vec(),
        None => return vec![node],
    };

    let mut result: Vec<Node> = Vec::new();
    let mut phrasing_run: Vec<Node> = Vec::new();

    for child in flatten(children) {
        if child.is_phrasing() {
            phrasing_run.push(child);
            continue;
        }
        if !phrasing_run.is_empty() {
            let run = std::mem::take(&mut phrasing_run);
            if !is_whitespace_only(&run) {
                result.push(clone_with_children(&node, run));
            }
        }
        result.push(push_wrapper_inside(&node, child));
    }

    if !phrasing_run.is_empty() && !is_whitespace_only(&phrasing_run) {
        result.push(clone_with_children(&node, phrasing_run));
    }

    result
}

/// A new node of the same wrapper kind as `parent` with the given children.
fn clone_with_children(parent: &Node, children: Vec<Node>) -> Node {
    match parent {
        Node::Link(l) => Node::Link(mdast::Link {
            url: l.url.clone(),
            title: l.title.clone(),
            children,
        }),
        Node::Delete(_) => Node::Delete(mdast::Delete { children }),
        Node::Underline(_) => Node::Underline(mdast::Underline { children }),
        _ => Node::Paragraph(mdast::Paragraph { children }),
    }
}

/// Move the wrapper inside a block child: the block keeps its place in the
/// flow and its content gains the inline wrapper.
fn push_wrapper_inside(wrapper: &Node, child: Node) -> Node {
    let Some(child_children) = child.children().map(<[Node]>::to_vec) else {
        return child;
    };
    let inner = clone_with_children(wrapper, child_children);
    match child {
        Node::Heading(h) => Node::Heading(mdast::Heading {
            depth: h.depth,
            children: vec![inner],
        }),
        Node::Paragraph(_) => Node::Paragraph(mdast::Paragraph {
            children: vec![inner],
        }),
        Node::Blockquote(_) => Node::Blockquote(mdast::Blockquote {
            children: vec![inner],
        }),
        other => other,
    }
}

/// Remove leading and trailing Break nodes and whitespace-only Text nodes.
pub(crate) fn drop_surrounding_breaks(mut nodes: Vec<Node>) -> Vec<Node> {
    fn is_droppable_edge(n: &Node) -> bool {
        matches!(n, Node::Break(_))
            || matches!(n, Node::Text(t) if t.value.trim().is_empty())
    }

    let start = nodes
        .iter()
        .position(|n| !is_droppable_edge(n))
        .unwrap_or(nodes.len());
    if start > 0 {
        nodes.drain(..start);
    }
    while nodes.last().is_some_and(is_droppable_edge) {
        nodes.pop();
    }
    nodes
}

/// Check if a list of nodes contains only whitespace-only text.
pub(crate) fn is_whitespace_only(nodes: &[Node]) -> bool {
    nodes.iter().all(|n| match n {
        Node::Text(t) => t.value.trim().is_empty(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{Paragraph, Text};

    fn text(value: &str) -> Node {
        Node::Text(Text {
            value: value.into(),
        })
    }

    #[test]
    fn test_phrasing_run_becomes_paragraph() {
        let wrapped = wrap(vec![text("a"), text("b")]);
        assert_eq!(wrapped.len(), 1);
        assert!(matches!(&wrapped[0], Node::Paragraph(p) if p.children.len() == 2));
    }

    #[test]
    fn test_whitespace_only_run_dropped() {
        let para = Node::Paragraph(Paragraph {
            children: vec![text("kept")],
        });
        let wrapped = wrap(vec![text("  \n "), para]);
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn test_mixed_content_splits_runs() {
        let para = Node::Paragraph(Paragraph {
            children: vec![text("block")],
        });
        let wrapped = wrap(vec![text("before"), para, text("after")]);
        assert_eq!(wrapped.len(), 3);
        assert!(wrapped.iter().all(|n| matches!(n, Node::Paragraph(_))));
    }

    #[test]
    fn test_link_around_paragraph_is_split() {
        let link = Node::Link(mdast::Link {
            url: "x".into(),
            title: None,
            children: vec![Node::Paragraph(Paragraph {
                children: vec![text("inner")],
            })],
        });
        let wrapped = wrap(vec![link]);
        assert_eq!(wrapped.len(), 1);
        let Node::Paragraph(p) = &wrapped[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&p.children[0], Node::Link(l) if l.url == "x"));
    }

    #[test]
    fn test_drop_surrounding_breaks() {
        let nodes = vec![
            Node::Break(mdast::Break),
            text("  "),
            text("content"),
            Node::Break(mdast::Break),
        ];
        let kept = drop_surrounding_breaks(nodes);
        assert_eq!(kept.len(), 1);
    }
}
