// Block detection and table conversion.
//
// Source sites express pseudo-components as class-carrying <div>s with
// nested row/cell divs. This pass rewrites every such block into the
// canonical table shape, in document order, replacing each block in place.
// A replaced block's subtree is never re-matched.

use tracing::debug;

use crate::dom::{Element, Node};
use crate::table::{create_table, Cell};

/// Knobs for block conversion.
#[derive(Debug, Clone)]
pub struct BlockOptions {
    /// When a cell-div's element children are all class-less wrapper divs,
    /// unwrap one level and promote each grandchild div to its own cell.
    /// This is a heuristic tuned to transparent layout divs in legacy CMS
    /// markup; turn it off for sources where nesting is meaningful.
    pub unwrap_wrapper_divs: bool,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            unwrap_wrapper_divs: true,
        }
    }
}

/// Derive a human-readable block name from a CSS class string.
///
/// The most specific (last) class token is split on hyphens and each word
/// is titlecased: `hero-animation` → "Hero Animation".
pub fn derive_block_name(class: &str) -> String {
    let token = class.split_whitespace().last().unwrap_or("");
    token
        .split('-')
        .filter(|word| !word.is_empty())
        .map(titlecase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert every block container under `root` into a table, in place.
pub fn convert_blocks_to_tables(root: &mut Element) {
    convert_blocks_to_tables_with(root, &BlockOptions::default());
}

/// Convert blocks with explicit options.
pub fn convert_blocks_to_tables_with(root: &mut Element, options: &BlockOptions) {
    convert_in(&mut root.children, options);
}

fn convert_in(children: &mut [Node], options: &BlockOptions) {
    for slot in children.iter_mut() {
        let is_block = matches!(slot, Node::Element(el) if is_block_container(el));
        if is_block {
            // Take ownership of the block, then put the table in its place.
            // The table's subtree is not revisited.
            let taken = std::mem::replace(slot, Node::Text(String::new()));
            if let Node::Element(block) = taken {
                *slot = block_to_table(block, options);
            }
        } else if let Node::Element(el) = slot {
            convert_in(&mut el.children, options);
        }
    }
}

/// A block is a div carrying at least one class token.
fn is_block_container(el: &Element) -> bool {
    el.tag == "div" && el.classes().next().is_some()
}

fn block_to_table(block: Element, options: &BlockOptions) -> Node {
    let name = derive_block_name(block.attr("class").unwrap_or(""));
    let mut rows = vec![vec![Cell::Node(Node::Text(name))]];

    let has_div_children = block.children.iter().any(|c| c.is_tag("div"));
    if has_div_children {
        for child in block.children {
            match child {
                Node::Element(el) if el.tag == "div" => rows.push(row_cells(el, options)),
                // Stray non-div content between rows is preserved, one row
                // per node, rather than dropped.
                Node::Element(el) => rows.push(vec![Cell::Node(Node::Element(el))]),
                Node::Text(text) if !text.trim().is_empty() => {
                    rows.push(vec![Cell::Node(Node::Text(text))]);
                }
                Node::Text(_) => {}
            }
        }
    } else if !content_is_empty(&block.children) {
        rows.push(vec![Cell::Nodes(block.children)]);
    }

    create_table(rows)
}

/// Derive the cells of one row div.
fn row_cells(row: Element, options: &BlockOptions) -> Vec<Cell> {
    let has_div_children = row.children.iter().any(|c| c.is_tag("div"));
    if !has_div_children {
        // A row with no parseable cells keeps its full content as one cell.
        return vec![Cell::Nodes(row.children)];
    }

    let mut cells = Vec::new();
    for child in row.children {
        match child {
            Node::Element(el) if el.tag == "div" => {
                if options.unwrap_wrapper_divs && is_transparent_wrapper(&el) {
                    // Promote each grandchild div to its own cell.
                    for grandchild in el.children {
                        if let Node::Element(inner) = grandchild {
                            cells.push(Cell::Nodes(inner.children));
                        }
                    }
                } else {
                    cells.push(Cell::Nodes(el.children));
                }
            }
            Node::Element(el) => cells.push(Cell::Node(Node::Element(el))),
            Node::Text(text) if !text.trim().is_empty() => {
                cells.push(Cell::Node(Node::Text(text)));
            }
            Node::Text(_) => {}
        }
    }
    cells
}

/// Whether a cell-div exists only to group class-less layout divs.
///
/// Requires every element child to be a class-less div and no meaningful
/// text of its own outside those divs. Mixed nesting is ambiguous; it is
/// flagged and left alone rather than guessed at.
fn is_transparent_wrapper(cell: &Element) -> bool {
    let mut saw_div = false;
    let mut saw_other = false;
    for child in &cell.children {
        match child {
            Node::Element(el) if el.tag == "div" && el.classes().next().is_none() => {
                saw_div = true;
            }
            Node::Element(_) => saw_other = true,
            Node::Text(text) if !text.trim().is_empty() => saw_other = true,
            Node::Text(_) => {}
        }
    }
    if saw_div && saw_other {
        debug!("ambiguous cell nesting: wrapper divs mixed with other content, not unwrapping");
        return false;
    }
    saw_div
}

fn content_is_empty(children: &[Node]) -> bool {
    children.iter().all(|c| match c {
        Node::Text(text) => text.trim().is_empty(),
        Node::Element(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_root;
    use pretty_assertions::assert_eq;

    fn cell_at<'a>(table: &'a Element, row: usize, col: usize) -> &'a Element {
        table.children[row].as_element().unwrap().children[col]
            .as_element()
            .unwrap()
    }

    #[test]
    fn test_derive_block_name() {
        assert_eq!(derive_block_name("promotion"), "Promotion");
        assert_eq!(derive_block_name("hero-animation"), "Hero Animation");
        assert_eq!(derive_block_name("how-to-carousel"), "How To Carousel");
    }

    #[test]
    fn test_derive_block_name_uses_last_token() {
        assert_eq!(derive_block_name("component hero-banner"), "Hero Banner");
    }

    #[test]
    fn test_promotion_block_single_cell() {
        let mut root = parse_root(
            r#"<div class="promotion"><div><div><a href="https://blog.example.com/promos/doc.html">Doc</a></div></div></div>"#,
        );
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        assert_eq!(table.tag, "table");
        assert_eq!(table.children.len(), 2);

        let header = cell_at(table, 0, 0);
        assert_eq!(header.tag, "th");
        assert_eq!(header.text_content(), "Promotion");

        let data = cell_at(table, 1, 0);
        assert_eq!(data.tag, "td");
        assert_eq!(data.children.len(), 1);
        let link = data.children[0].as_element().unwrap();
        assert_eq!(link.tag, "a");
        assert_eq!(link.attr("href"), Some("https://blog.example.com/promos/doc.html"));
    }

    #[test]
    fn test_block_with_no_sub_divs() {
        let mut root = parse_root(r#"<div class="banner">Plain <em>content</em></div>"#);
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        assert_eq!(table.children.len(), 2);
        assert_eq!(cell_at(table, 0, 0).text_content(), "Banner");
        assert_eq!(cell_at(table, 1, 0).text_content(), "Plain content");
    }

    #[test]
    fn test_empty_block_yields_header_only_table() {
        let mut root = parse_root(r#"<div class="spacer">  </div>"#);
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        assert_eq!(table.children.len(), 1);
        assert_eq!(cell_at(table, 0, 0).text_content(), "Spacer");
    }

    #[test]
    fn test_multi_row_multi_cell() {
        let mut root = parse_root(
            r#"<div class="columns">
                 <div><div>one</div><div>two</div></div>
                 <div><div>three</div></div>
               </div>"#,
        );
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        assert_eq!(table.children.len(), 3);
        assert_eq!(table.children[1].as_element().unwrap().children.len(), 2);
        assert_eq!(cell_at(table, 1, 0).text_content(), "one");
        assert_eq!(cell_at(table, 1, 1).text_content(), "two");
        assert_eq!(table.children[2].as_element().unwrap().children.len(), 1);
        assert_eq!(cell_at(table, 2, 0).text_content(), "three");
    }

    #[test]
    fn test_wrapper_div_unwrapping() {
        let mut root = parse_root(
            r#"<div class="cards"><div><div><div><p>a</p></div><div><p>b</p></div></div></div></div>"#,
        );
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        let data_row = table.children[1].as_element().unwrap();
        assert_eq!(data_row.children.len(), 2);
        assert_eq!(cell_at(table, 1, 0).text_content(), "a");
        assert_eq!(cell_at(table, 1, 1).text_content(), "b");
    }

    #[test]
    fn test_unwrapping_disabled() {
        let mut root = parse_root(
            r#"<div class="cards"><div><div><div><p>a</p></div><div><p>b</p></div></div></div></div>"#,
        );
        let options = BlockOptions {
            unwrap_wrapper_divs: false,
        };
        convert_blocks_to_tables_with(&mut root, &options);

        let table = root.children[0].as_element().unwrap();
        let data_row = table.children[1].as_element().unwrap();
        assert_eq!(data_row.children.len(), 1);
        assert_eq!(cell_at(table, 1, 0).text_content(), "ab");
    }

    #[test]
    fn test_ambiguous_nesting_not_unwrapped() {
        let mut root = parse_root(
            r#"<div class="mixed"><div><div><div>wrapped</div><p>stray</p></div></div></div>"#,
        );
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        let data_row = table.children[1].as_element().unwrap();
        assert_eq!(data_row.children.len(), 1);
        assert_eq!(cell_at(table, 1, 0).text_content(), "wrappedstray");
    }

    #[test]
    fn test_converted_table_is_not_rematched() {
        // The inner block lands inside the outer block's table cell and must
        // stay a raw div there, not become a nested table.
        let mut root = parse_root(
            r#"<div class="outer"><div><div><div class="inner"><div>deep</div></div></div></div></div>"#,
        );
        convert_blocks_to_tables(&mut root);

        let table = root.children[0].as_element().unwrap();
        assert_eq!(cell_at(table, 0, 0).text_content(), "Outer");
        let data = cell_at(table, 1, 0);
        let inner = data.children[0].as_element().unwrap();
        assert_eq!(inner.tag, "div");
        assert!(inner.has_class("inner"));
    }

    #[test]
    fn test_sibling_blocks_converted_in_document_order() {
        let mut root = parse_root(
            r#"<div class="first"><div><div>1</div></div></div><div class="second"><div><div>2</div></div></div>"#,
        );
        convert_blocks_to_tables(&mut root);

        assert!(root.children[0].is_tag("table"));
        assert!(root.children[1].is_tag("table"));
        let first = root.children[0].as_element().unwrap();
        let second = root.children[1].as_element().unwrap();
        assert_eq!(cell_at(first, 0, 0).text_content(), "First");
        assert_eq!(cell_at(second, 0, 0).text_content(), "Second");
    }

    #[test]
    fn test_block_inside_plain_container_is_found() {
        let mut root =
            parse_root(r#"<main><section><div class="quote"><div>q</div></div></section></main>"#);
        convert_blocks_to_tables(&mut root);

        let main = root.children[0].as_element().unwrap();
        let section = main.children[0].as_element().unwrap();
        assert!(section.children[0].is_tag("table"));
    }
}
