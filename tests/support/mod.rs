#![allow(dead_code)]

use configform::{BoxGeometry, Document, NodeId, Tag, VisualTree};

/// A `TABLE > TBODY` holding numbered rows of one repeated field followed by
/// the row with its add button.
pub struct FieldTable {
    pub doc: Document,
    pub tbody: NodeId,
    pub rows: Vec<NodeId>,
    pub add_row: NodeId,
    pub add_button: NodeId,
}

pub fn field_table(field: &str, count: usize) -> FieldTable {
    let mut doc = Document::new();
    let table = doc.create_element(Tag::Table);
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), table).unwrap();
    doc.append_child(table, tbody).unwrap();

    let mut rows = Vec::new();
    for index in 1..=count {
        let row = field_row(&mut doc, &format!("{field} {index}"), &format!("{field}[{index}]"));
        doc.append_child(tbody, row).unwrap();
        rows.push(row);
    }

    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    let add_button = doc.create_element(Tag::Button);
    doc.set_attribute(add_button, "type", "button").unwrap();
    doc.set_attribute(add_button, "name", field).unwrap();
    let caption = doc.create_text(&format!("Add {field}"));
    doc.append_child(add_button, caption).unwrap();
    doc.append_child(cell, add_button).unwrap();
    doc.append_child(add_row, cell).unwrap();
    let filler = doc.create_element(Tag::Td);
    doc.append_child(add_row, filler).unwrap();
    doc.append_child(tbody, add_row).unwrap();

    FieldTable {
        doc,
        tbody,
        rows,
        add_row,
        add_button,
    }
}

/// `TR > [TD(label), TD > INPUT(name)]` with a text input of size 24.
pub fn field_row(doc: &mut Document, label: &str, name: &str) -> NodeId {
    let row = doc.create_element(Tag::Tr);
    let label_cell = doc.create_element(Tag::Td);
    let text = doc.create_text(label);
    doc.append_child(label_cell, text).unwrap();
    doc.append_child(row, label_cell).unwrap();

    let input_cell = doc.create_element(Tag::Td);
    let input = doc.create_element(Tag::Input);
    doc.set_attribute(input, "type", "text").unwrap();
    doc.set_attribute(input, "size", "24").unwrap();
    doc.set_attribute(input, "name", name).unwrap();
    doc.set_attribute(input, "value", "stale").unwrap();
    doc.append_child(input_cell, input).unwrap();
    doc.append_child(row, input_cell).unwrap();
    row
}

pub fn row_label(doc: &Document, row: NodeId) -> String {
    let cell = doc.first_child(row).unwrap();
    doc.text_content(cell)
}

pub fn row_input(doc: &Document, row: NodeId) -> NodeId {
    let cell = doc.next_sibling(doc.first_child(row).unwrap()).unwrap();
    doc.first_child(cell).unwrap()
}

/// A hover target (`SPAN`) whose first child is an `INPUT` with `anchor`
/// geometry, positioned inside a `DIV` that sits at `container` offsets.
pub struct HoverTarget {
    pub container: NodeId,
    pub target: NodeId,
    pub anchor: NodeId,
}

pub fn hover_target(doc: &mut Document, container: BoxGeometry, anchor: BoxGeometry) -> HoverTarget {
    let div = doc.create_element(Tag::Div);
    let target = doc.create_element(Tag::Span);
    let input = doc.create_element(Tag::Input);
    doc.append_child(doc.body(), div).unwrap();
    doc.append_child(div, target).unwrap();
    doc.append_child(target, input).unwrap();
    doc.set_geometry(div, container).unwrap();
    doc.set_geometry(input, anchor).unwrap();
    doc.set_offset_parent(input, Some(div)).unwrap();
    doc.set_offset_parent(div, None).unwrap();
    HoverTarget {
        container: div,
        target,
        anchor: input,
    }
}

pub fn count_with_id(doc: &Document, id: &str) -> usize {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|node| doc.attribute(*node, "id") == Some(id))
        .count()
}
