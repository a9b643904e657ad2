// Inline element cleanup.
//
// Source markup splits formatting runs arbitrarily (three adjacent <a>s with
// the same href, empty <em>s, significant spaces trapped inside <strong>).
// This pass coalesces and cleans one inline tag at a time, in reverse
// document order so that merges cascade across runs of three or more.

use crate::dom::{Element, Node};

/// The fixed allow-list of inline tags the normalizer can review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTag {
    Anchor,
    Bold,
    Code,
    Emphasis,
    Italic,
    Label,
    Small,
    Span,
    Strike,
    Strong,
    Subscript,
    Superscript,
    Underline,
    Variable,
}

impl InlineTag {
    /// The HTML tag names this variant matches. Semantically equivalent
    /// spellings (`b`/`strong`, `em`/`i`, `s`/`strike`) are grouped so runs
    /// fragmented across both spellings still coalesce.
    pub fn tag_names(self) -> &'static [&'static str] {
        match self {
            InlineTag::Anchor => &["a"],
            InlineTag::Bold => &["b", "strong"],
            InlineTag::Code => &["code"],
            InlineTag::Emphasis => &["em", "i"],
            InlineTag::Italic => &["i", "em"],
            InlineTag::Label => &["label"],
            InlineTag::Small => &["small"],
            InlineTag::Span => &["span"],
            InlineTag::Strike => &["s", "strike"],
            InlineTag::Strong => &["strong", "b"],
            InlineTag::Subscript => &["sub"],
            InlineTag::Superscript => &["sup"],
            InlineTag::Underline => &["u"],
            InlineTag::Variable => &["var"],
        }
    }
}

/// Normalize every element of the given inline tag under `root`, in place.
pub fn review_inline_element(root: &mut Element, tag: InlineTag) {
    review_children(&mut root.children, tag.tag_names());
}

fn review_children(children: &mut Vec<Node>, tags: &[&str]) {
    // Right-to-left, descendants before the element itself: exact reverse of
    // document order, so merging into a previous sibling never revisits an
    // already-processed element.
    let mut i = children.len();
    while i > 0 {
        i -= 1;
        if let Some(el) = children[i].as_element_mut() {
            review_children(&mut el.children, tags);
        }
        let Some(el) = children[i].as_element() else {
            continue;
        };
        if !tags.contains(&el.tag.as_str()) {
            continue;
        }

        if is_single_nbsp(el) {
            children[i] = Node::Text(" ".to_string());
            continue;
        }

        // After the nbsp case, since U+00A0 trims as whitespace. Removing
        // whitespace-only elements here keeps a single pass at the fixed
        // point; relocation below never drains an element empty.
        if el.text_content().trim().is_empty() {
            children.remove(i);
            continue;
        }

        if i > 0 && can_merge_into_previous(el, &children[i - 1], tags) {
            if let Node::Element(current) = children.remove(i) {
                if let Some(prev) = children[i - 1].as_element_mut() {
                    prev.children.extend(current.children);
                }
            }
            continue;
        }

        if i == 0 {
            relocate_edge_spaces(children, i);
        }
    }
}

/// Inner content is exactly a non-breaking space.
fn is_single_nbsp(el: &Element) -> bool {
    matches!(el.children.as_slice(), [Node::Text(t)] if t == "\u{a0}")
}

/// Previous sibling carrying any of the reviewed spellings; links
/// additionally require no href on the current element or an identical
/// href on both. Merging keeps the previous sibling's spelling.
fn can_merge_into_previous(el: &Element, previous: &Node, tags: &[&str]) -> bool {
    let Some(prev) = previous.as_element() else {
        return false;
    };
    if !tags.contains(&prev.tag.as_str()) {
        return false;
    }
    if el.tag == "a" {
        match el.attr("href") {
            None => true,
            Some(href) => prev.attr("href") == Some(href),
        }
    } else {
        true
    }
}

/// Move a leading/trailing literal space out of the element at `index` into
/// new sibling text nodes, so the space survives serialization at the
/// element boundary.
fn relocate_edge_spaces(children: &mut Vec<Node>, index: usize) {
    let Some(el) = children[index].as_element_mut() else {
        return;
    };

    let mut leading = false;
    if let Some(Node::Text(first)) = el.children.first_mut() {
        if first.starts_with(' ') {
            leading = true;
            *first = first.trim_start_matches(' ').to_string();
        }
    }
    let mut trailing = false;
    if let Some(Node::Text(last)) = el.children.last_mut() {
        if last.ends_with(' ') {
            trailing = true;
            *last = last.trim_end_matches(' ').to_string();
        }
    }
    el.children.retain(|c| !matches!(c, Node::Text(t) if t.is_empty()));

    if trailing {
        children.insert(index + 1, Node::Text(" ".to_string()));
    }
    if leading {
        children.insert(index, Node::Text(" ".to_string()));
    }
}
