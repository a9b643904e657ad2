// Per-node serialization handlers.

use super::State;
use crate::mdast::{self, Node};

/// Dispatch to the appropriate handler for a node.
pub(crate) fn handle(state: &mut State, node: &Node) -> String {
    match node {
        Node::Root(n) => handle_root(state, n),
        Node::Paragraph(n) => handle_paragraph(state, n),
        Node::Heading(n) => handle_heading(state, n),
        Node::ThematicBreak(_) => handle_thematic_break(state),
        Node::Blockquote(n) => handle_blockquote(state, n),
        Node::List(n) => handle_list(state, n),
        Node::ListItem(n) => handle_list_item(state, n),
        Node::Code(n) => handle_code(state, n),
        Node::Html(n) => handle_html(n),
        Node::Text(n) => handle_text(state, n),
        Node::Emphasis(n) => handle_emphasis(state, n),
        Node::Strong(n) => handle_strong(state, n),
        Node::InlineCode(n) => handle_inline_code(n),
        Node::Break(_) => handle_break(),
        Node::Link(n) => handle_link(state, n),
        Node::Image(n) => handle_image(state, n),
        Node::Delete(n) => handle_delete(state, n),
        Node::Underline(n) => handle_underline(state, n),
        Node::Table(n) => handle_table(state, n),
        Node::TableRow(_) | Node::TableCell(_) => {
            // Handled by the table handler directly.
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Flow (block) handlers
// ---------------------------------------------------------------------------

fn handle_root(state: &mut State, node: &mdast::Root) -> String {
    super::flow::container_flow(state, &node.children)
}

fn handle_paragraph(state: &mut State, node: &mdast::Paragraph) -> String {
    state.at_break = true;
    let content = super::phrasing::container_phrasing(state, &node.children);
    state.at_break = false;
    content
}

fn handle_heading(state: &mut State, node: &mdast::Heading) -> String {
    let content = super::phrasing::container_phrasing(state, &node.children);

    // Setext only works for h1/h2; multi-line content forces it too, since
    // an ATX heading cannot span lines.
    let use_setext = node.depth <= 2
        && (matches!(state.options.heading_style, super::HeadingStyle::Setext)
            || content.contains('\n'));

    if use_setext {
        let marker = if node.depth == 1 { '=' } else { '-' };
        let line_len = content
            .lines()
            .last()
            .map_or(content.chars().count(), |l| l.chars().count());
        let underline: String = std::iter::repeat(marker).take(line_len.max(3)).collect();
        return format!("{content}\n{underline}");
    }

    // Hard breaks first, then bare newlines; reversing would corrupt "\\\n".
    let content = content.replace("\\\n", " ").replace('\n', "&#xA;");
    let hashes = "#".repeat(node.depth as usize);
    format!("{hashes} {content}")
}

fn handle_thematic_break(state: &mut State) -> String {
    std::iter::repeat(state.options.rule)
        .take(state.options.rule_repetition as usize)
        .collect()
}

fn handle_blockquote(state: &mut State, node: &mdast::Blockquote) -> String {
    let content = super::flow::container_flow(state, &node.children);
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn handle_list(state: &mut State, node: &mdast::List) -> String {
    let mut result = Vec::new();

    for (i, child) in node.children.iter().enumerate() {
        let prefix = if node.ordered {
            let number = node.start.unwrap_or(1) + i as u32;
            format!("{}{}", number, state.options.bullet_ordered)
        } else {
            state.options.bullet.to_string()
        };

        let spread =
            node.spread || matches!(child, Node::ListItem(li) if li.spread);
        let content = match child {
            Node::ListItem(li) => {
                super::flow::container_flow_tight(state, &li.children, spread)
            }
            other => handle(state, other),
        };

        let indent = " ".repeat(prefix.len() + 1);
        let mut lines = content.lines();
        let first = match lines.next() {
            Some(line) if !line.is_empty() => format!("{prefix} {line}"),
            _ => prefix.clone(),
        };
        let mut item = first;
        for line in lines {
            item.push('\n');
            if !line.is_empty() {
                item.push_str(&indent);
                item.push_str(line);
            }
        }
        result.push(item);
    }

    let separator = if node.spread { "\n\n" } else { "\n" };
    result.join(separator)
}

fn handle_list_item(state: &mut State, node: &mdast::ListItem) -> String {
    // Called directly only for stray items outside a list.
    super::flow::container_flow_tight(state, &node.children, node.spread)
}

fn handle_code(state: &mut State, node: &mdast::Code) -> String {
    let fence_char = state.options.fence;
    // Find the minimum fence length that doesn't conflict with content.
    let content_max = node
        .value
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.chars().all(|c| c == fence_char) && trimmed.len() >= 3 {
                Some(trimmed.len())
            } else {
                None
            }
        })
        .max()
        .unwrap_or(0);
    let fence: String = std::iter::repeat(fence_char)
        .take((content_max + 1).max(3))
        .collect();

    let info = node.lang.as_deref().unwrap_or("");
    if node.value.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{}\n{fence}", node.value)
    }
}

/// Raw value, verbatim. Embed markers rely on this to keep their URLs
/// free of escaping.
fn handle_html(node: &mdast::Html) -> String {
    node.value.clone()
}

// ---------------------------------------------------------------------------
// Phrasing (inline) handlers
// ---------------------------------------------------------------------------

fn handle_text(state: &mut State, node: &mdast::Text) -> String {
    let escaped = super::escape::escape_phrasing(&node.value);
    if state.at_break {
        state.at_break = false;
        super::escape::escape_at_break_start(escaped)
    } else {
        escaped
    }
}

fn handle_emphasis(state: &mut State, node: &mdast::Emphasis) -> String {
    let marker = state.options.emphasis;
    let content = super::phrasing::container_phrasing(state, &node.children);
    format!("{marker}{content}{marker}")
}

fn handle_strong(state: &mut State, node: &mdast::Strong) -> String {
    let marker = state.options.strong;
    let content = super::phrasing::container_phrasing(state, &node.children);
    format!("{0}{0}{1}{0}{0}", marker, content)
}

fn handle_inline_code(node: &mdast::InlineCode) -> String {
    // Choose a backtick count that cannot conflict with the content.
    let ticks = "`".repeat(longest_backtick_run(&node.value) + 1);

    let needs_space = node.value.starts_with('`')
        || node.value.ends_with('`')
        || (node.value.starts_with(' ')
            && node.value.ends_with(' ')
            && !node.value.trim().is_empty());

    if needs_space {
        format!("{ticks} {} {ticks}", node.value)
    } else {
        format!("{ticks}{}{ticks}", node.value)
    }
}

fn handle_break() -> String {
    "\\\n".to_string()
}

fn handle_link(state: &mut State, node: &mdast::Link) -> String {
    let content = super::phrasing::container_phrasing(state, &node.children);
    let content = content.trim_start();

    // Autolink when the visible text is exactly the URL.
    if !node.url.is_empty()
        && node.title.is_none()
        && node.children.len() == 1
        && matches!(&node.children[0], mdast::Node::Text(_))
        && (content == node.url.as_str() || format!("mailto:{content}") == node.url)
        && node.url.contains(':')
        && !node
            .url
            .chars()
            .any(|c| c <= ' ' || c == '<' || c == '>' || c == '\x7f')
    {
        return format!("<{content}>");
    }

    match &node.title {
        Some(title) => {
            let quote = state.options.quote;
            format!("[{content}]({} {quote}{title}{quote})", node.url)
        }
        None => format!("[{content}]({})", node.url),
    }
}

fn handle_image(state: &mut State, node: &mdast::Image) -> String {
    match &node.title {
        Some(title) => {
            let quote = state.options.quote;
            format!("![{}]({} {quote}{title}{quote})", node.alt, node.url)
        }
        None => format!("![{}]({})", node.alt, node.url),
    }
}

fn handle_delete(state: &mut State, node: &mdast::Delete) -> String {
    let content = super::phrasing::container_phrasing(state, &node.children);
    format!("~~{content}~~")
}

/// Markdown has no underline syntax; fall back to an HTML passthrough.
fn handle_underline(state: &mut State, node: &mdast::Underline) -> String {
    let content = super::phrasing::container_phrasing(state, &node.children);
    format!("<u>{content}</u>")
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn handle_table(state: &mut State, node: &mdast::Table) -> String {
    if node.children.is_empty() {
        return String::new();
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in &node.children {
        if let Node::TableRow(tr) = row {
            let cells: Vec<String> = tr
                .children
                .iter()
                .map(|cell| {
                    if let Node::TableCell(tc) = cell {
                        let content =
                            super::phrasing::container_phrasing(state, &tc.children);
                        // Pipes would split the cell; hard breaks become
                        // spaces, bare newlines a character reference.
                        content
                            .trim()
                            .replace('|', "\\|")
                            .replace("\\\n", " ")
                            .replace('\n', "&#xA;")
                    } else {
                        String::new()
                    }
                })
                .collect();
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut col_widths = vec![1usize; col_count];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::new();
    lines.push(format_row(&rows[0], &col_widths, col_count));

    let sep: Vec<String> = col_widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(format!("| {} |", sep.join(" | ")));

    for row in rows.iter().skip(1) {
        lines.push(format_row(row, &col_widths, col_count));
    }

    lines.join("\n")
}

fn format_row(cells: &[String], widths: &[usize], col_count: usize) -> String {
    let padded: Vec<String> = (0..col_count)
        .map(|i| {
            let content = cells.get(i).map(String::as_str).unwrap_or("");
            let padding = widths[i].saturating_sub(content.chars().count());
            format!("{}{}", content, " ".repeat(padding))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Longest consecutive run of backticks in a string.
fn longest_backtick_run(s: &str) -> usize {
    let mut max = 0;
    let mut current = 0;
    for c in s.chars() {
        if c == '`' {
            current += 1;
            max = max.max(current);
        } else {
            current = 0;
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{
        Heading, Html, Image, InlineCode, Link, Paragraph, Root, Table, TableCell, TableRow,
        Text, Underline,
    };
    use crate::stringify::{stringify, StringifyOptions};
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Node {
        Node::Text(Text {
            value: value.into(),
        })
    }

    fn render(node: Node) -> String {
        stringify(&node, &StringifyOptions::default())
    }

    #[test]
    fn test_heading_atx() {
        let md = render(Node::Heading(Heading {
            depth: 2,
            children: vec![text("Title")],
        }));
        assert_eq!(md, "## Title\n");
    }

    #[test]
    fn test_embed_value_verbatim() {
        let md = render(Node::Root(Root {
            children: vec![Node::Html(Html {
                value: "https://youtu.be/abc?x=1&y=2".into(),
            })],
        }));
        assert_eq!(md, "https://youtu.be/abc?x=1&y=2\n");
    }

    #[test]
    fn test_underline_passthrough() {
        let md = render(Node::Paragraph(Paragraph {
            children: vec![Node::Underline(Underline {
                children: vec![text("important")],
            })],
        }));
        assert_eq!(md, "<u>important</u>\n");
    }

    #[test]
    fn test_inline_code_backtick_conflict() {
        let md = render(Node::Paragraph(Paragraph {
            children: vec![Node::InlineCode(InlineCode {
                value: "a`b".into(),
            })],
        }));
        assert_eq!(md, "``a`b``\n");
    }

    #[test]
    fn test_autolink() {
        let md = render(Node::Paragraph(Paragraph {
            children: vec![Node::Link(Link {
                url: "https://example.com/".into(),
                title: None,
                children: vec![text("https://example.com/")],
            })],
        }));
        assert_eq!(md, "<https://example.com/>\n");
    }

    #[test]
    fn test_image_with_title() {
        let md = render(Node::Paragraph(Paragraph {
            children: vec![Node::Image(Image {
                url: "https://example.com/a.png".into(),
                title: Some("caption".into()),
                alt: "alt".into(),
            })],
        }));
        assert_eq!(md, "![alt](https://example.com/a.png \"caption\")\n");
    }

    #[test]
    fn test_table_header_and_padding() {
        let table = Node::Table(Table {
            children: vec![
                Node::TableRow(TableRow {
                    children: vec![Node::TableCell(TableCell {
                        children: vec![text("Promotion")],
                    })],
                }),
                Node::TableRow(TableRow {
                    children: vec![Node::TableCell(TableCell {
                        children: vec![text("body")],
                    })],
                }),
            ],
        });
        let md = render(table);
        assert_eq!(md, "| Promotion |\n| --------- |\n| body      |\n");
    }

    #[test]
    fn test_table_cell_pipe_escaped() {
        let table = Node::Table(Table {
            children: vec![Node::TableRow(TableRow {
                children: vec![Node::TableCell(TableCell {
                    children: vec![text("a|b")],
                })],
            })],
        });
        let md = render(table);
        assert!(md.contains("a\\|b"));
    }

    #[test]
    fn test_leading_bullet_escaped_in_paragraph() {
        let md = render(Node::Paragraph(Paragraph {
            children: vec![text("- not a list")],
        }));
        assert_eq!(md, "\\- not a list\n");
    }
}
