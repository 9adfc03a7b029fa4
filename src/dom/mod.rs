mod document;
mod error;
pub mod query;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use document::{Document, NodeId};
pub use error::TreeError;
pub use query::{find_ancestor, find_child, find_next_sibling, find_prev_sibling};

/// Element identity for the nodes this crate reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    Html,
    Body,
    Div,
    Form,
    Table,
    Tbody,
    Tr,
    Td,
    Th,
    Input,
    Button,
    Select,
    Option,
    Label,
    Span,
    #[serde(rename = "#text")]
    Text,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Html => "HTML",
            Tag::Body => "BODY",
            Tag::Div => "DIV",
            Tag::Form => "FORM",
            Tag::Table => "TABLE",
            Tag::Tbody => "TBODY",
            Tag::Tr => "TR",
            Tag::Td => "TD",
            Tag::Th => "TH",
            Tag::Input => "INPUT",
            Tag::Button => "BUTTON",
            Tag::Select => "SELECT",
            Tag::Option => "OPTION",
            Tag::Label => "LABEL",
            Tag::Span => "SPAN",
            Tag::Text => "#text",
        }
    }

    /// Void elements never own children.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Input | Tag::Text)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offsets the host reports for a laid-out node, relative to its positioned ancestor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxGeometry {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

impl BoxGeometry {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Inline,
    Block,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn is_positioned(&self) -> bool {
        !matches!(self, Position::Static)
    }
}

/// The inline style properties the form scripts touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
}

impl Style {
    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.display == Display::None
    }
}

/// Read and mutation primitives of the rendered page, as exposed by the host.
///
/// Sibling links are derived from the parent's child order. Geometry and the
/// positioned-ancestor link are owned by the host's layout; implementors only
/// report them.
pub trait VisualTree {
    type Node: Copy + Eq + fmt::Debug;

    fn tag(&self, node: Self::Node) -> Option<Tag>;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn offset_parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn text_content(&self, node: Self::Node) -> String;
    fn geometry(&self, node: Self::Node) -> Option<BoxGeometry>;
    fn style(&self, node: Self::Node) -> Option<&Style>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The node floating elements are appended to.
    fn body(&self) -> Self::Node;

    /// Whether `offset_parent` answers at all in this environment.
    fn supports_offset_parent(&self) -> bool;

    fn create_element(&mut self, tag: Tag) -> Self::Node;
    fn create_text(&mut self, text: &str) -> Self::Node;
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), TreeError>;
    fn insert_before(
        &mut self,
        parent: Self::Node,
        child: Self::Node,
        reference: Self::Node,
    ) -> Result<(), TreeError>;
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), TreeError>;
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str)
    -> Result<(), TreeError>;
    fn style_mut(&mut self, node: Self::Node) -> Option<&mut Style>;

    /// Pre-order walk below `node`, excluding `node` itself.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut cursor = self.first_child(node);
        loop {
            match cursor {
                Some(current) => {
                    out.push(current);
                    stack.push(current);
                    cursor = self.first_child(current);
                }
                None => {
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    cursor = self.next_sibling(done);
                }
            }
        }
        out
    }
}
