// Table construction: the canonical target shape for converted blocks.
//
// Every block the classifier recognizes is rewritten into a <table> whose
// first row names the block and whose remaining rows carry its content.

use crate::dom::{self, Element, Node};

/// One table cell's content.
///
/// The tagged union replaces runtime shape-sniffing: callers say up front
/// whether a cell is literal markup, a single moved node, or a node list.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Raw inner markup, parsed as an HTML fragment.
    Html(String),
    /// A single detached node, moved into the cell.
    Node(Node),
    /// An ordered sequence of detached nodes, appended in order.
    Nodes(Vec<Node>),
}

/// Build a table node from rows of cells.
///
/// Row 0 becomes header (`<th>`) cells; all later rows become data (`<td>`)
/// cells. Rows need not have equal column counts; the source markup is
/// irregular and the table mirrors it.
pub fn create_table(rows: Vec<Vec<Cell>>) -> Node {
    let mut table = Element::new("table");
    for (index, row) in rows.into_iter().enumerate() {
        let cell_tag = if index == 0 { "th" } else { "td" };
        let mut tr = Element::new("tr");
        for cell in row {
            let mut holder = Element::new(cell_tag);
            match cell {
                Cell::Html(markup) => holder.children.extend(dom::parse_fragment(&markup)),
                Cell::Node(node) => holder.children.push(node),
                Cell::Nodes(nodes) => holder.children.extend(nodes),
            }
            tr.children.push(Node::Element(holder));
        }
        table.children.push(Node::Element(tr));
    }
    Node::Element(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row_cells(table: &Element, row: usize) -> &Element {
        table.children[row].as_element().unwrap()
    }

    #[test]
    fn test_shape_round_trip() {
        let rows = vec![
            vec![Cell::Html("Promotion".into()), Cell::Html("Extra".into())],
            vec![Cell::Nodes(dom::parse_fragment("<a href=\"x\">link</a>"))],
            vec![
                Cell::Node(Node::Text("a".into())),
                Cell::Node(Node::Text("b".into())),
                Cell::Node(Node::Text("c".into())),
            ],
        ];
        let table = create_table(rows);
        let table = table.as_element().unwrap();
        assert_eq!(table.children.len(), 3);

        let header = row_cells(table, 0);
        assert_eq!(header.children.len(), 2);
        assert!(header.children.iter().all(|c| c.is_tag("th")));

        let data1 = row_cells(table, 1);
        assert_eq!(data1.children.len(), 1);
        assert!(data1.children[0].is_tag("td"));

        let data2 = row_cells(table, 2);
        assert_eq!(data2.children.len(), 3);
        assert!(data2.children.iter().all(|c| c.is_tag("td")));
    }

    #[test]
    fn test_html_cell_is_parsed() {
        let table = create_table(vec![vec![Cell::Html("<em>hi</em> there".into())]]);
        let table = table.as_element().unwrap();
        let th = row_cells(table, 0).children[0].as_element().unwrap();
        assert_eq!(th.children.len(), 2);
        assert!(th.children[0].is_tag("em"));
        assert_eq!(th.children[1], Node::Text(" there".into()));
    }

    #[test]
    fn test_node_cell_is_moved_not_copied() {
        let detached = dom::embed_marker("https://example.com/clip");
        let table = create_table(vec![vec![Cell::Node(detached)]]);
        let table = table.as_element().unwrap();
        let th = row_cells(table, 0).children[0].as_element().unwrap();
        assert!(th.children[0].is_tag(dom::EMBED_TAG));
    }

    #[test]
    fn test_header_only_table() {
        let table = create_table(vec![vec![Cell::Html("Columns".into())]]);
        let table = table.as_element().unwrap();
        assert_eq!(table.children.len(), 1);
        assert!(row_cells(table, 0).children[0].is_tag("th"));
    }
}
