use configform::{Document, Tag, VisualTree, add_field, add_field_named};

use crate::support::{field_row, field_table, row_input, row_label};

#[test]
fn appends_next_numbered_row_before_add_control() {
    let mut table = field_table("Field", 2);
    let row = add_field(&mut table.doc, table.add_button).expect("row inserted");
    let doc = &table.doc;

    assert_eq!(
        doc.children(table.tbody),
        &[table.rows[0], table.rows[1], row, table.add_row]
    );
    assert_eq!(row_label(doc, row), "Field 3");

    let input = row_input(doc, row);
    assert_eq!(doc.tag(input), Some(Tag::Input));
    assert_eq!(doc.attribute(input, "name"), Some("Field[3]"));
    assert_eq!(doc.attribute(input, "type"), Some("text"));
    assert_eq!(doc.attribute(input, "size"), Some("24"));
    assert_eq!(doc.attribute(input, "value"), None);
}

#[test]
fn repeated_clicks_keep_counting() {
    let mut table = field_table("Field", 1);
    add_field(&mut table.doc, table.add_button).unwrap();
    let last = add_field(&mut table.doc, table.add_button).unwrap();
    let doc = &table.doc;

    assert_eq!(doc.children(table.tbody).len(), 4);
    assert_eq!(row_label(doc, last), "Field 3");
    assert_eq!(doc.attribute(row_input(doc, last), "name"), Some("Field[3]"));
    assert_eq!(doc.previous_sibling(table.add_row), Some(last));
}

#[test]
fn trigger_name_selects_the_field() {
    let mut doc = Document::new();
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), tbody).unwrap();
    let row = field_row(&mut doc, "Route Dir 4", "Sender.Route Dir[4]");
    doc.append_child(tbody, row).unwrap();
    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    let button = doc.create_element(Tag::Button);
    doc.set_attribute(button, "name", "Route Dir").unwrap();
    doc.append_child(cell, button).unwrap();
    doc.append_child(add_row, cell).unwrap();
    doc.append_child(tbody, add_row).unwrap();

    let added = add_field(&mut doc, button).unwrap();
    assert_eq!(row_label(&doc, added), "Route Dir 5");
    assert_eq!(
        doc.attribute(row_input(&doc, added), "name"),
        Some("Sender.Route Dir[5]")
    );
}

#[test]
fn unnamed_trigger_uses_default_field() {
    let mut table = field_table("Field", 1);
    let button = table.add_button;
    table.doc.set_attribute(button, "name", "").unwrap();
    let row = add_field(&mut table.doc, button).unwrap();
    assert_eq!(row_label(&table.doc, row), "Field 2");
}

#[test]
fn explicit_field_name_overrides_trigger() {
    let mut doc = Document::new();
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), tbody).unwrap();
    let row = field_row(&mut doc, "Queue 2", "Queue[2]");
    doc.append_child(tbody, row).unwrap();
    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    doc.append_child(add_row, cell).unwrap();
    doc.append_child(tbody, add_row).unwrap();

    let added = add_field_named(&mut doc, cell, "Queue").unwrap();
    assert_eq!(row_label(&doc, added), "Queue 3");
    assert_eq!(doc.attribute(row_input(&doc, added), "name"), Some("Queue[3]"));
}

#[test]
fn unparsable_label_restarts_at_one() {
    let mut doc = Document::new();
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), tbody).unwrap();
    let row = field_row(&mut doc, "Field n/a", "Field[x]");
    doc.append_child(tbody, row).unwrap();
    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    doc.append_child(add_row, cell).unwrap();
    doc.append_child(tbody, add_row).unwrap();

    let added = add_field_named(&mut doc, cell, "Field").unwrap();
    assert_eq!(row_label(&doc, added), "Field 1");
    assert_eq!(doc.attribute(row_input(&doc, added), "name"), Some("Field[1]"));
}

#[test]
fn whitespace_between_rows_is_skipped() {
    let mut table = field_table("Field", 1);
    let gap = table.doc.create_text("\n  ");
    table
        .doc
        .insert_before(table.tbody, gap, table.add_row)
        .unwrap();

    let row = add_field(&mut table.doc, table.add_button).unwrap();
    assert_eq!(row_label(&table.doc, row), "Field 2");
    assert_eq!(table.doc.next_sibling(row), Some(table.add_row));
}

#[test]
fn no_previous_row_leaves_tree_untouched() {
    let mut table = field_table("Field", 0);
    let before = table.doc.len();
    assert_eq!(add_field(&mut table.doc, table.add_button), None);
    assert_eq!(table.doc.len(), before);
    assert_eq!(table.doc.children(table.tbody), &[table.add_row]);
}

#[test]
fn trigger_outside_a_row_is_rejected() {
    let mut doc = Document::new();
    let button = doc.create_element(Tag::Button);
    doc.append_child(doc.body(), button).unwrap();
    let before = doc.len();
    assert_eq!(add_field(&mut doc, button), None);
    assert_eq!(doc.len(), before);
}

#[test]
fn previous_row_without_input_is_rejected() {
    let mut doc = Document::new();
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), tbody).unwrap();
    let header = doc.create_element(Tag::Tr);
    let label = doc.create_element(Tag::Td);
    let caption = doc.create_text("Field 1");
    doc.append_child(label, caption).unwrap();
    doc.append_child(header, label).unwrap();
    doc.append_child(tbody, header).unwrap();
    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    doc.append_child(add_row, cell).unwrap();
    doc.append_child(tbody, add_row).unwrap();

    assert_eq!(add_field_named(&mut doc, cell, "Field"), None);
    assert_eq!(doc.children(tbody), &[header, add_row]);
}

#[test]
fn largest_label_index_leaves_tree_untouched() {
    let mut doc = Document::new();
    let tbody = doc.create_element(Tag::Tbody);
    doc.append_child(doc.body(), tbody).unwrap();
    let row = field_row(&mut doc, "Field 9223372036854775807", "Field[9223372036854775807]");
    doc.append_child(tbody, row).unwrap();
    let add_row = doc.create_element(Tag::Tr);
    let cell = doc.create_element(Tag::Td);
    doc.append_child(add_row, cell).unwrap();
    doc.append_child(tbody, add_row).unwrap();
    let before = doc.len();

    assert_eq!(add_field_named(&mut doc, cell, "Field"), None);
    assert_eq!(doc.len(), before);
    assert_eq!(doc.children(tbody), &[row, add_row]);
}
