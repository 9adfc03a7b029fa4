use std::fmt::Write;

use crate::dom::{Display, Document, NodeId, Position, Style, Tag, VisualTree};

/// Serialize the subtree at `node` as HTML. Inline styles are written only
/// for the properties that differ from their defaults.
pub fn render_markup(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let Some(tag) = doc.tag(node) else {
        return;
    };
    if tag == Tag::Text {
        out.push_str(&escape(doc.text(node), false));
        return;
    }
    let name = tag.as_str().to_ascii_lowercase();
    out.push('<');
    out.push_str(&name);
    if let Some(attributes) = doc.attributes(node) {
        for (key, value) in attributes {
            let _ = write!(out, " {key}=\"{}\"", escape(value, true));
        }
    }
    if let Some(style) = doc.style(node).map(inline_style)
        && !style.is_empty()
    {
        let _ = write!(out, " style=\"{style}\"");
    }
    if tag.is_void() {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in doc.children(node) {
        write_node(doc, *child, out);
    }
    let _ = write!(out, "</{name}>");
}

fn inline_style(style: &Style) -> String {
    let mut parts = Vec::new();
    match style.display {
        Display::Inline => {}
        Display::Block => parts.push("display: block".to_string()),
        Display::None => parts.push("display: none".to_string()),
    }
    match style.position {
        Position::Static => {}
        Position::Relative => parts.push("position: relative".to_string()),
        Position::Absolute => parts.push("position: absolute".to_string()),
        Position::Fixed => parts.push("position: fixed".to_string()),
    }
    if let Some(left) = style.left {
        parts.push(format!("left: {left}px"));
    }
    if let Some(top) = style.top {
        parts.push(format!("top: {top}px"));
    }
    parts.join("; ")
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
