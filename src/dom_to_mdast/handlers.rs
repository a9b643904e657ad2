// Per-element conversion handlers.
//
// Each handler takes a DOM node and returns zero or more MDAST nodes.
// Handlers produce tree nodes only; no string formatting happens here.

use super::State;
use crate::dom::{Element, Node, EMBED_TAG};
use crate::mdast;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Convert a list of DOM nodes to MDAST nodes.
pub(crate) fn all(state: &mut State, children: &[Node]) -> Vec<mdast::Node> {
    let mut result = Vec::new();
    for child in children {
        result.append(&mut one(state, child));
    }
    result
}

/// Convert a single DOM node to MDAST node(s).
pub(crate) fn one(state: &mut State, node: &Node) -> Vec<mdast::Node> {
    match node {
        Node::Text(text) => {
            if text.is_empty() {
                vec![]
            } else {
                vec![mdast::Node::Text(mdast::Text { value: text.clone() })]
            }
        }
        Node::Element(el) => dispatch_element(state, el),
    }
}

/// Route an element to its handler based on tag name.
fn dispatch_element(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    if el.tag == EMBED_TAG {
        return handle_embed(el);
    }
    match el.tag.as_str() {
        // Ignored outright
        "script" | "style" | "meta" | "link" | "title" | "template" | "source" | "track"
        | "noscript" | "iframe" | "col" | "colgroup" | "caption" | "option" | "optgroup"
        | "datalist" | "base" => vec![],

        // Transparent containers, recurse without wrapping
        "span" | "small" | "sub" | "sup" | "abbr" | "cite" | "data" | "dfn" | "font"
        | "ins" | "label" | "mark" | "time" | "big" | "button" | "output" | "thead"
        | "tbody" | "tfoot" => all(state, &el.children),

        // Containers whose children are wrapped as flow content
        "div" | "section" | "article" | "aside" | "main" | "header" | "footer" | "nav"
        | "figure" | "figcaption" | "address" | "center" | "fieldset" | "form"
        | "hgroup" | "legend" | "picture" | "body" | "html" => {
            let children = all(state, &el.children);
            super::wrap::wrap(children)
        }

        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => handle_heading(state, el),
        "p" | "summary" => handle_paragraph(state, el),
        "a" => handle_link(state, el),
        "em" | "i" => wrap_phrasing(state, el, WrapKind::Emphasis),
        "strong" | "b" => wrap_phrasing(state, el, WrapKind::Strong),
        "del" | "s" | "strike" => wrap_phrasing(state, el, WrapKind::Delete),
        "u" => handle_underline(state, el),
        "code" | "kbd" | "samp" | "tt" | "var" => handle_inline_code(el),
        "pre" | "listing" | "xmp" => handle_pre(el),
        "br" => vec![mdast::Node::Break(mdast::Break)],
        "hr" => vec![mdast::Node::ThematicBreak(mdast::ThematicBreak)],
        "img" | "image" => handle_image(el),
        "blockquote" => handle_blockquote(state, el),
        "ul" | "ol" | "dir" => handle_list(state, el),
        "li" | "dt" | "dd" => handle_list_item(state, el),
        "table" => handle_table(state, el),
        "tr" | "td" | "th" => {
            // Handled by the table handler; reached only for stray markup.
            all(state, &el.children)
        }

        // Unknown elements, keep their content
        _ => all(state, &el.children),
    }
}

// ---------------------------------------------------------------------------
// Flow handlers
// ---------------------------------------------------------------------------

fn handle_heading(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let depth = el.tag.as_bytes()[1] - b'0';
    let children = all(state, &el.children);
    vec![mdast::Node::Heading(mdast::Heading { depth, children })]
}

fn handle_paragraph(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let children = all(state, &el.children);
    if children.is_empty() {
        return vec![];
    }
    vec![mdast::Node::Paragraph(mdast::Paragraph { children })]
}

fn handle_blockquote(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let children = super::wrap::wrap(all(state, &el.children));
    vec![mdast::Node::Blockquote(mdast::Blockquote { children })]
}

fn handle_pre(el: &Element) -> Vec<mdast::Node> {
    // <pre><code class="language-x"> carries the fence info string.
    let (value, lang) = match el.first_element_child() {
        Some(code) if code.tag == "code" => (code.text_content(), code_language(code)),
        _ => (el.text_content(), None),
    };
    let value = value.trim_end_matches('\n').to_string();
    vec![mdast::Node::Code(mdast::Code { value, lang })]
}

fn code_language(code: &Element) -> Option<String> {
    code.classes()
        .find_map(|c| c.strip_prefix("language-").or_else(|| c.strip_prefix("lang-")))
        .map(str::to_string)
}

fn handle_list(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let ordered = el.tag == "ol";
    let start = if ordered {
        el.attr("start").and_then(|s| s.parse().ok())
    } else {
        None
    };

    let mut items = Vec::new();
    for child in &el.children {
        if child.is_tag("li") || child.is_tag("dt") || child.is_tag("dd") {
            if let Node::Element(li) = child {
                items.append(&mut handle_list_item(state, li));
            }
        }
    }

    let spread = items.iter().any(|item| {
        matches!(item, mdast::Node::ListItem(li) if li.spread)
    });

    vec![mdast::Node::List(mdast::List {
        ordered,
        start,
        spread,
        children: items,
    })]
}

fn handle_list_item(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let children = super::wrap::wrap(all(state, &el.children));
    let spread = children.iter().filter(|c| c.is_flow()).count() > 1;
    vec![mdast::Node::ListItem(mdast::ListItem { spread, children })]
}

// ---------------------------------------------------------------------------
// Phrasing handlers
// ---------------------------------------------------------------------------

enum WrapKind {
    Emphasis,
    Strong,
    Delete,
}

fn wrap_phrasing(state: &mut State, el: &Element, kind: WrapKind) -> Vec<mdast::Node> {
    let children = all(state, &el.children);
    if children.is_empty() {
        return vec![];
    }
    let node = match kind {
        WrapKind::Emphasis => mdast::Node::Emphasis(mdast::Emphasis { children }),
        WrapKind::Strong => mdast::Node::Strong(mdast::Strong { children }),
        WrapKind::Delete => mdast::Node::Delete(mdast::Delete { children }),
    };
    vec![node]
}

fn handle_link(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    let children = all(state, &el.children);
    // Anchors without an href are navigation targets, not links.
    let Some(href) = el.attr("href") else {
        return children;
    };
    vec![mdast::Node::Link(mdast::Link {
        url: href.to_string(),
        title: el.attr("title").map(str::to_string),
        children,
    })]
}

/// Underlining a link is redundant; the wrapper is dropped and only the
/// inner content rendered. Otherwise the content keeps an Underline node
/// that serializes as a <u> passthrough.
fn handle_underline(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    if first_meaningful_child(el).is_some_and(|c| c.is_tag("a")) {
        return all(state, &el.children);
    }
    let children = all(state, &el.children);
    if children.is_empty() {
        return vec![];
    }
    vec![mdast::Node::Underline(mdast::Underline { children })]
}

fn first_meaningful_child(el: &Element) -> Option<&Node> {
    el.children.iter().find(|c| match c {
        Node::Text(t) => !t.trim().is_empty(),
        Node::Element(_) => true,
    })
}

fn handle_inline_code(el: &Element) -> Vec<mdast::Node> {
    let value = el.text_content();
    if value.is_empty() {
        return vec![];
    }
    vec![mdast::Node::InlineCode(mdast::InlineCode { value })]
}

fn handle_image(el: &Element) -> Vec<mdast::Node> {
    let Some(src) = el.attr("src").filter(|s| !s.is_empty()) else {
        return vec![];
    };
    vec![mdast::Node::Image(mdast::Image {
        url: src.to_string(),
        title: el.attr("title").map(str::to_string),
        alt: el.attr("alt").unwrap_or("").to_string(),
    })]
}

/// Embed markers carry a raw URL that must reach the output unescaped.
fn handle_embed(el: &Element) -> Vec<mdast::Node> {
    let value = el.text_content().trim().to_string();
    if value.is_empty() {
        return vec![];
    }
    vec![mdast::Node::Html(mdast::Html { value })]
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn handle_table(state: &mut State, el: &Element) -> Vec<mdast::Node> {
    if state.in_table {
        // Nested tables have no Markdown form; keep their text.
        let value = el.text_content();
        if value.trim().is_empty() {
            return vec![];
        }
        return vec![mdast::Node::Text(mdast::Text { value })];
    }
    let was_in_table = state.in_table;
    state.in_table = true;

    let mut rows = Vec::new();
    for section_or_row in table_rows(el) {
        let mut cells = Vec::new();
        for child in &section_or_row.children {
            let Node::Element(cell) = child else { continue };
            if cell.tag != "td" && cell.tag != "th" {
                continue;
            }
            let converted = all(state, &cell.children);
            let children = flatten_to_phrasing(converted);
            cells.push(mdast::Node::TableCell(mdast::TableCell { children }));
        }
        rows.push(mdast::Node::TableRow(mdast::TableRow { children: cells }));
    }

    state.in_table = was_in_table;
    vec![mdast::Node::Table(mdast::Table { children: rows })]
}

/// Collect <tr> elements, looking through <thead>/<tbody>/<tfoot>.
fn table_rows(table: &Element) -> Vec<&Element> {
    let mut rows = Vec::new();
    for child in &table.children {
        let Node::Element(el) = child else { continue };
        match el.tag.as_str() {
            "tr" => rows.push(el),
            "thead" | "tbody" | "tfoot" => {
                for inner in &el.children {
                    if let Node::Element(tr) = inner {
                        if tr.tag == "tr" {
                            rows.push(tr);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    rows
}

/// Table cells hold phrasing content only. Flow nodes produced inside a
/// cell (paragraphs, lists from irregular block markup) are flattened to
/// their phrasing content, separated by hard breaks.
fn flatten_to_phrasing(nodes: Vec<mdast::Node>) -> Vec<mdast::Node> {
    if nodes.iter().all(mdast::Node::is_phrasing) {
        return nodes;
    }

    let mut result = Vec::new();
    for node in nodes {
        if node.is_phrasing() {
            result.push(node);
            continue;
        }
        if !result.is_empty() {
            result.push(mdast::Node::Break(mdast::Break));
        }
        match node {
            mdast::Node::Code(code) => {
                result.push(mdast::Node::InlineCode(mdast::InlineCode { value: code.value }));
            }
            mdast::Node::Html(html) => {
                result.push(mdast::Node::Text(mdast::Text { value: html.value }));
            }
            mdast::Node::ThematicBreak(_) => {
                // Nothing worth keeping inside a cell.
                result.pop();
            }
            other => {
                if let Some(children) = other.children() {
                    result.extend(flatten_to_phrasing(children.to_vec()));
                }
            }
        }
    }
    result
}
