use regex::Regex;
use tracing::{debug, trace};

use crate::dom::{
    Tag, TreeError, VisualTree, find_ancestor, find_child, find_next_sibling, find_prev_sibling,
};

/// Field name used when the add control carries no `name` of its own.
pub const DEFAULT_FIELD_NAME: &str = "Field";

/// Append another row to a repeated field, naming the group after the add
/// control's `name` attribute.
///
/// Returns the inserted row, or `None` when the surrounding markup does not
/// look like a repeated field or the last index cannot be incremented
/// (nothing is modified in either case).
pub fn add_field<T>(tree: &mut T, trigger: T::Node) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let name = tree
        .attribute(trigger, "name")
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FIELD_NAME)
        .to_string();
    add_field_named(tree, trigger, &name)
}

/// Append another row to the repeated field `field_name`.
///
/// The new row is numbered after the row just above the add control's row,
/// copies that row's input `type` and `size`, and is inserted right before
/// the add control's row.
pub fn add_field_named<T>(tree: &mut T, trigger: T::Node, field_name: &str) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let Some(template) = RowTemplate::locate(&*tree, trigger, field_name) else {
        debug!(field = field_name, "add control is not below a repeated field row");
        return None;
    };
    let Some(next_index) = template.index.checked_add(1) else {
        debug!(field = field_name, index = template.index, "row index cannot be advanced");
        return None;
    };

    let row = tree.create_element(Tag::Tr);
    let label_cell = tree.create_element(Tag::Td);
    let label = tree.create_text(&format!("{field_name} {next_index}"));
    let input_cell = tree.create_element(Tag::Td);
    let input = tree.create_element(Tag::Input);

    let built = (|| -> Result<(), TreeError> {
        tree.append_child(label_cell, label)?;
        tree.append_child(row, label_cell)?;
        if let Some(kind) = &template.input_type {
            tree.set_attribute(input, "type", kind)?;
        }
        if let Some(size) = &template.size {
            tree.set_attribute(input, "size", size)?;
        }
        let name = rewrite_indexed_name(&template.input_name, field_name, next_index);
        tree.set_attribute(input, "name", &name)?;
        tree.append_child(input_cell, input)?;
        tree.append_child(row, input_cell)?;
        tree.insert_before(template.container, row, template.anchor_row)
    })();

    match built {
        Ok(()) => {
            trace!(field = field_name, index = next_index, "inserted repeated field row");
            Some(row)
        }
        Err(err) => {
            debug!(field = field_name, error = %err, "failed to insert repeated field row");
            None
        }
    }
}

/// Everything `add_field_named` reads from the existing rows.
struct RowTemplate<N> {
    anchor_row: N,
    container: N,
    index: i64,
    input_type: Option<String>,
    size: Option<String>,
    input_name: String,
}

impl<N: Copy> RowTemplate<N> {
    fn locate<T>(tree: &T, trigger: N, field_name: &str) -> Option<Self>
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        let anchor_row = find_ancestor(tree, Some(trigger), Tag::Tr)?;
        let container = tree
            .parent(anchor_row)
            .or_else(|| tree.offset_parent(anchor_row))?;
        let previous = find_prev_sibling(tree, tree.previous_sibling(anchor_row), Tag::Tr)?;
        let label_cell = find_child(tree, Some(previous), Tag::Td)?;
        let index = parse_row_index(&tree.text_content(label_cell), field_name);
        let input_cell = find_next_sibling(tree, tree.next_sibling(label_cell), Tag::Td);
        let input = find_child(tree, input_cell, Tag::Input)?;
        Some(Self {
            anchor_row,
            container,
            index,
            input_type: tree.attribute(input, "type").map(str::to_string),
            size: tree.attribute(input, "size").map(str::to_string),
            input_name: tree.attribute(input, "name").unwrap_or_default().to_string(),
        })
    }
}

/// Index shown in a row label such as `"Field 3"`.
///
/// Anything that is not an integer once the field name is stripped counts as
/// zero, so a malformed label restarts numbering at 1.
pub fn parse_row_index(label: &str, field_name: &str) -> i64 {
    let pattern = format!(r"^\s*{}", regex::escape(field_name));
    let remainder = match Regex::new(&pattern) {
        Ok(prefix) => prefix.replace(label, ""),
        Err(_) => label.into(),
    };
    remainder.trim().parse().unwrap_or(0)
}

/// Replace the `<field>...]` part of an input name with `<field>[index]`.
/// Names that do not mention the field are returned unchanged.
pub fn rewrite_indexed_name(name: &str, field_name: &str, index: i64) -> String {
    let pattern = format!(r"{}.*\]", regex::escape(field_name));
    let Ok(indexed) = Regex::new(&pattern) else {
        return name.to_string();
    };
    let replacement = format!("{field_name}[{index}]");
    indexed
        .replace(name, regex::NoExpand(&replacement))
        .into_owned()
}
