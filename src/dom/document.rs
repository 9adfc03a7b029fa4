use indexmap::IndexMap;
use tracing::trace;

use super::{BoxGeometry, Display, Style, Tag, TreeError, VisualTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn raw(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: Tag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    offset_parent: Option<NodeId>,
    attributes: IndexMap<String, String>,
    text: String,
    style: Style,
    geometry: Option<BoxGeometry>,
}

impl NodeData {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            parent: None,
            children: Vec::new(),
            offset_parent: None,
            attributes: IndexMap::new(),
            text: String::new(),
            style: Style::default(),
            geometry: None,
        }
    }
}

/// Arena-backed visual tree with host-supplied geometry.
///
/// The document starts as `HTML > BODY`. Nodes are never freed; detached
/// nodes simply lose their parent link.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    offset_parent_support: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![NodeData::new(Tag::Html)],
            root: NodeId(0),
            body: NodeId(0),
            offset_parent_support: true,
        };
        let body = doc.alloc(NodeData::new(Tag::Body));
        doc.nodes[body.0].parent = Some(doc.root);
        doc.nodes[doc.root.0].children.push(body);
        doc.body = body;
        doc
    }

    /// Simulates a host whose layout engine does not expose positioned ancestors.
    pub fn with_offset_parent_support(mut self, supported: bool) -> Self {
        self.offset_parent_support = supported;
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn attributes(&self, node: NodeId) -> Option<&IndexMap<String, String>> {
        self.data(node).map(|data| &data.attributes)
    }

    /// Raw text of a text node; empty for elements.
    pub fn text(&self, node: NodeId) -> &str {
        self.data(node).map(|data| data.text.as_str()).unwrap_or("")
    }

    pub fn set_geometry(&mut self, node: NodeId, geometry: BoxGeometry) -> Result<(), TreeError> {
        self.data_mut(node)?.geometry = Some(geometry);
        Ok(())
    }

    /// Link `node` to its positioned ancestor. Chains that would loop back to
    /// `node` are rejected, so walking offset parents always terminates.
    pub fn set_offset_parent(
        &mut self,
        node: NodeId,
        ancestor: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.data(node).ok_or(TreeError::UnknownNode(node.0))?;
        if let Some(ancestor) = ancestor {
            self.data(ancestor).ok_or(TreeError::UnknownNode(ancestor.0))?;
            let mut cursor = Some(ancestor);
            while let Some(current) = cursor {
                if current == node {
                    return Err(TreeError::Cycle { node: node.0 });
                }
                cursor = self.nodes[current.0].offset_parent;
            }
        }
        self.nodes[node.0].offset_parent = ancestor;
        Ok(())
    }

    /// Recompute every positioned-ancestor link using the CSSOM rule: the
    /// nearest positioned ancestor, a `TD`/`TH`/`TABLE` for static elements,
    /// or `BODY`. Text nodes and anything not rendered get none.
    pub fn resolve_offset_parents(&mut self) {
        let mut links = Vec::with_capacity(self.nodes.len());
        for index in 0..self.nodes.len() {
            let node = NodeId(index);
            links.push((node, self.compute_offset_parent(node)));
        }
        for (node, link) in links {
            self.nodes[node.0].offset_parent = link;
        }
        trace!(nodes = self.nodes.len(), "resolved positioned ancestors");
    }

    fn compute_offset_parent(&self, node: NodeId) -> Option<NodeId> {
        let data = &self.nodes[node.0];
        if data.tag == Tag::Text || node == self.root || node == self.body {
            return None;
        }
        if !self.is_rendered(node) {
            return None;
        }
        let positioned = data.style.position.is_positioned();
        let mut cursor = data.parent;
        while let Some(current) = cursor {
            let ancestor = &self.nodes[current.0];
            if ancestor.style.position.is_positioned() || ancestor.tag == Tag::Body {
                return Some(current);
            }
            if !positioned && matches!(ancestor.tag, Tag::Td | Tag::Th | Tag::Table) {
                return Some(current);
            }
            cursor = ancestor.parent;
        }
        None
    }

    /// Connected to the root and not inside a `display: none` subtree.
    fn is_rendered(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            let data = &self.nodes[current.0];
            if data.style.display == Display::None {
                return false;
            }
            cursor = data.parent;
        }
        false
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn data_mut(&mut self, node: NodeId) -> Result<&mut NodeData, TreeError> {
        self.nodes
            .get_mut(node.0)
            .ok_or(TreeError::UnknownNode(node.0))
    }

    fn sibling_at(&self, node: NodeId, delta: isize) -> Option<NodeId> {
        let parent = self.data(node)?.parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|id| *id == node)?;
        let target = index.checked_add_signed(delta)?;
        siblings.get(target).copied()
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_data = self.data(parent).ok_or(TreeError::UnknownNode(parent.0))?;
        self.data(child).ok_or(TreeError::UnknownNode(child.0))?;
        if parent_data.tag.is_void() {
            return Err(TreeError::NotAContainer(parent.0));
        }
        if child == self.root {
            return Err(TreeError::Cycle { node: child.0 });
        }
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(TreeError::Cycle { node: child.0 });
            }
            cursor = self.nodes[current.0].parent;
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        if data.tag == Tag::Text {
            out.push_str(&data.text);
            return;
        }
        for child in &data.children {
            self.collect_text(*child, out);
        }
    }
}

impl VisualTree for Document {
    type Node = NodeId;

    fn tag(&self, node: NodeId) -> Option<Tag> {
        self.data(node).map(|data| data.tag)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.parent
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        if !self.offset_parent_support {
            return None;
        }
        self.data(node)?.offset_parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.children.first().copied()
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, -1)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, 1)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node)?.attributes.get(name).map(String::as_str)
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if self.data(node).is_some() {
            self.collect_text(node, &mut out);
        }
        out
    }

    fn geometry(&self, node: NodeId) -> Option<BoxGeometry> {
        self.data(node)?.geometry
    }

    fn style(&self, node: NodeId) -> Option<&Style> {
        self.data(node).map(|data| &data.style)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn supports_offset_parent(&self) -> bool {
        self.offset_parent_support
    }

    fn create_element(&mut self, tag: Tag) -> NodeId {
        self.alloc(NodeData::new(tag))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let mut data = NodeData::new(Tag::Text);
        data.text = text.to_string();
        self.alloc(data)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent: parent.0,
                child: reference.0,
            });
        }
        if child == reference {
            return Ok(());
        }
        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
            .ok_or(TreeError::NotAChild {
                parent: parent.0,
                child: reference.0,
            })?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent: parent.0,
                child: child.0,
            });
        }
        self.detach(child);
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        let data = self.data_mut(node)?;
        if data.tag == Tag::Text {
            return Err(TreeError::NotAContainer(node.0));
        }
        data.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn style_mut(&mut self, node: NodeId) -> Option<&mut Style> {
        self.nodes.get_mut(node.0).map(|data| &mut data.style)
    }
}
