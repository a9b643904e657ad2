// Minimal owned DOM for migration pipelines.
//
// Importers hand the core a mutable tree; blocks are rewritten into tables
// and inline runs are coalesced in place before serialization. The tree is
// deliberately small (Element | Text) so the core is not tied to a DOM
// library's handle types. Parsing literal markup into detached subtrees
// goes through html5ever's fragment parser.

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Element tag used to carry a raw embeddable-resource URL through the
/// pipeline. The serializer emits its text content verbatim, with no
/// Markdown escaping.
pub const EMBED_TAG: &str = "embed-url";

/// A node in the migration DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with a tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Iterate the whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Whether the `class` attribute contains the given token.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// First child that is an element.
    pub fn first_element_child(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Whether this node is an element with the given tag name.
    pub fn is_tag(&self, tag: &str) -> bool {
        matches!(self, Node::Element(el) if el.tag == tag)
    }

    /// Text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(el) => el.text_content(),
            Node::Text(t) => t.clone(),
        }
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Create a detached embed marker wrapping a raw URL.
pub fn embed_marker(url: &str) -> Node {
    Node::Element(Element::new(EMBED_TAG).with_child(Node::Text(url.to_string())))
}

// ---------------------------------------------------------------------------
// Fragment parsing
// ---------------------------------------------------------------------------

/// Parse an HTML fragment into detached nodes.
///
/// The fragment is parsed in `<body>` context, so block and inline markup
/// behave as they would inside a page. Comments and doctypes are dropped;
/// migration output never carries them.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let parser = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
        false,
    );
    let dom = parser.from_utf8().one(html.as_bytes());

    // The fragment parser wraps parsed content in a synthetic <html> element.
    let document = dom.document.children.borrow();
    document
        .iter()
        .find_map(|child| match &child.data {
            NodeData::Element { .. } => Some(convert_children(child)),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parse an HTML fragment and wrap it in a detached `<body>` root element,
/// the shape importers hand to the transformation pipeline.
pub fn parse_root(html: &str) -> Element {
    let mut root = Element::new("body");
    root.children = parse_fragment(html);
    root
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.is_empty() {
                None
            } else {
                Some(Node::Text(text))
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let element = Element {
                tag: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect(),
                children: convert_children(handle),
            };
            Some(Node::Element(element))
        }
        _ => None,
    }
}
