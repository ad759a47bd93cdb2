//! Table structural repair
//!
//! Rows never go straight into a `table` and cells never go straight into a `table` or a row
//! group: the missing `thead`/`tbody` and `tr` containers are found or created first. Lookup is
//! by the local name of the node being appended; everything else is a plain append.

use crate::dom::{append, Document, Handle};
use crate::error::ConversionError;
use html5ever::ns;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Places `child` somewhere under `parent`, creating intermediate containers as needed
pub type Placement = fn(&Document, &Handle, Handle) -> Result<(), ConversionError>;

static PLACEMENTS: Lazy<HashMap<&'static str, Placement>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Placement> = HashMap::new();
    table.insert("tr", place_row);
    table.insert("td", place_cell);
    table.insert("th", place_cell);
    table
});

const ROW_GROUPS: &[&str] = &["thead", "tbody", "tfoot"];

/// Append `child` to `parent`, applying the table rules
///
/// Fragments are placed child by child so rows inside a fragment are repaired too.
pub fn append_child(document: &Document, parent: &Handle, child: Handle) -> Result<(), ConversionError> {
    if child.is_fragment() {
        for node in child.child_nodes() {
            append_child(document, parent, node)?;
        }
        return Ok(());
    }

    let placement = child
        .qual_name()
        .filter(|name| name.ns == ns!(html))
        .and_then(|name| PLACEMENTS.get(&*name.local).copied());
    match placement {
        Some(place) => place(document, parent, child),
        None => append(parent, child),
    }
}

fn is_header_row(row: &Handle) -> bool {
    let cells: Vec<Handle> = row
        .child_nodes()
        .into_iter()
        .filter(|node| node.is_element())
        .collect();
    cells.iter().any(|cell| cell.is_html_element("th"))
        && !cells.iter().any(|cell| cell.is_html_element("td"))
}

fn last_child_named(parent: &Handle, local: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .rev()
        .find(|child| child.is_html_element(local))
        .cloned()
}

fn find_or_create(document: &Document, parent: &Handle, local: &str) -> Result<Handle, ConversionError> {
    if let Some(existing) = last_child_named(parent, local) {
        return Ok(existing);
    }
    let created = document.create_element(local)?;
    append(parent, created.clone())?;
    Ok(created)
}

fn place_row(document: &Document, parent: &Handle, row: Handle) -> Result<(), ConversionError> {
    if !parent.is_html_element("table") {
        return append(parent, row);
    }
    let group = if is_header_row(&row) { "thead" } else { "tbody" };
    let section = find_or_create(document, parent, group)?;
    append(&section, row)
}

fn place_cell(document: &Document, parent: &Handle, cell: Handle) -> Result<(), ConversionError> {
    let section = if parent.is_html_element("table") {
        let group = if cell.is_html_element("th") { "thead" } else { "tbody" };
        find_or_create(document, parent, group)?
    } else if ROW_GROUPS.iter().any(|group| parent.is_html_element(group)) {
        parent.clone()
    } else {
        return append(parent, cell);
    };
    let row = find_or_create(document, &section, "tr")?;
    append(&row, cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::serialize::serialize_node;
    use crate::dom::Dialect;

    fn render(node: &Handle) -> String {
        serialize_node(node, Dialect::Html).unwrap()
    }

    fn row(doc: &Document, cell: &str, text: &str) -> Handle {
        let tr = doc.create_element("tr").unwrap();
        let cell = doc.create_element(cell).unwrap();
        append(&cell, doc.create_text(text)).unwrap();
        append(&tr, cell).unwrap();
        tr
    }

    #[test]
    fn rows_go_into_body_or_head() {
        let doc = Document::html();
        let table = doc.create_element("table").unwrap();
        append_child(&doc, &table, row(&doc, "th", "h")).unwrap();
        append_child(&doc, &table, row(&doc, "td", "d")).unwrap();
        assert_eq!(
            render(&table),
            "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>d</td></tr></tbody></table>"
        );
    }

    #[test]
    fn bare_cells_use_the_last_body() {
        let doc = Document::html();
        let table = doc.create_element("table").unwrap();
        let first = doc.create_element("tbody").unwrap();
        let second = doc.create_element("tbody").unwrap();
        append(&table, first).unwrap();
        append(&table, second.clone()).unwrap();
        append(&second, row(&doc, "td", "a")).unwrap();

        let cell = doc.create_element("td").unwrap();
        append(&cell, doc.create_text("x")).unwrap();
        append_child(&doc, &table, cell).unwrap();
        assert_eq!(
            render(&table),
            "<table><tbody></tbody><tbody><tr><td>a</td><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn cells_in_a_row_group_get_a_row() {
        let doc = Document::html();
        let tbody = doc.create_element("tbody").unwrap();
        append_child(&doc, &tbody, doc.create_element("td").unwrap()).unwrap();
        assert_eq!(render(&tbody), "<tbody><tr><td></td></tr></tbody>");
    }

    #[test]
    fn other_parents_append_directly() {
        let doc = Document::html();
        let div = doc.create_element("div").unwrap();
        append_child(&doc, &div, doc.create_element("tr").unwrap()).unwrap();
        append_child(&doc, &div, doc.create_element("td").unwrap()).unwrap();
        assert_eq!(render(&div), "<div><tr></tr><td></td></div>");
    }

    #[test]
    fn fragments_are_placed_child_by_child() {
        let doc = Document::html();
        let table = doc.create_element("table").unwrap();
        let fragment = doc.create_fragment();
        append(&fragment, row(&doc, "td", "1")).unwrap();
        append(&fragment, row(&doc, "td", "2")).unwrap();
        append_child(&doc, &table, fragment).unwrap();
        assert_eq!(
            render(&table),
            "<table><tbody><tr><td>1</td></tr><tr><td>2</td></tr></tbody></table>"
        );
    }
}
