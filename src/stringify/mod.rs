// MDAST to Markdown string serializer.
//
// Walks an MDAST tree and emits Markdown text. All formatting choices
// (heading style, list markers, emphasis characters, fences) live here.
// Embed markers travel through as raw-HTML nodes and come out verbatim.

pub(crate) mod escape;
pub(crate) mod flow;
pub(crate) mod handlers;
pub(crate) mod phrasing;

use crate::mdast::Node;

/// Heading style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `# Heading` (default).
    #[default]
    Atx,
    /// Only for h1/h2; falls back to ATX for h3–h6.
    Setext,
}

/// Serializer configuration.
#[derive(Debug, Clone)]
pub struct StringifyOptions {
    pub heading_style: HeadingStyle,
    pub bullet: char,
    pub bullet_ordered: char,
    pub emphasis: char,
    pub strong: char,
    pub fence: char,
    pub rule: char,
    pub rule_repetition: u8,
    pub quote: char,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            bullet: '-',
            bullet_ordered: '.',
            emphasis: '*',
            strong: '*',
            fence: '`',
            rule: '-',
            rule_repetition: 3,
            quote: '"',
        }
    }
}

/// Serializer state threaded through all handlers.
pub(crate) struct State<'a> {
    pub options: &'a StringifyOptions,
    /// Whether the next text to be emitted is at the start of a block.
    /// Used for at-break character escaping (e.g. a leading `-` would
    /// otherwise read as a list bullet).
    pub at_break: bool,
}

impl<'a> State<'a> {
    pub fn new(options: &'a StringifyOptions) -> Self {
        Self {
            options,
            at_break: false,
        }
    }
}

/// Serialize an MDAST tree to a Markdown string.
pub(crate) fn stringify(node: &Node, options: &StringifyOptions) -> String {
    let mut state = State::new(options);
    let mut output = handlers::handle(&mut state, node);

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    output
}
