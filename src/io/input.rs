use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    dom::{BoxGeometry, Document, NodeId, Style, Tag, VisualTree},
    page::{Action, ConsolePage, EventBindings, EventKind, PageOptions},
};

use super::DocumentFormat;

/// A whole page: the options its scripts share and the content of `BODY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub options: PageOptions,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

/// One node of a page document. Elements may give `text` as a shorthand for
/// a leading text child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<BoxGeometry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub on: IndexMap<EventKind, Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: IndexMap::new(),
            text: None,
            style: Style::default(),
            geometry: None,
            on: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

pub fn page_from_value(value: Value) -> Result<ConsolePage> {
    let spec: PageSpec = serde_json::from_value(value).context("invalid page document")?;
    build_page(spec)
}

pub fn parse_page_str(contents: &str, format: DocumentFormat) -> Result<ConsolePage> {
    page_from_value(parse_document_str(contents, format)?)
}

/// Load a page document, picking the format from the file extension.
pub fn load_page(path: impl AsRef<Path>) -> Result<ConsolePage> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| anyhow!("cannot infer document format of {}", path.display()))?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_page_str(&contents, format).with_context(|| format!("failed to load {}", path.display()))
}

/// Materialize a page: build the tree under `BODY`, register handlers and
/// resolve positioned ancestors.
pub fn build_page(spec: PageSpec) -> Result<ConsolePage> {
    let PageSpec {
        title,
        options,
        body,
    } = spec;
    let mut document = Document::new();
    let mut bindings = EventBindings::new();
    let root = document.body();
    for node in &body {
        build_node(&mut document, &mut bindings, root, node)?;
    }
    document.resolve_offset_parents();

    let page = ConsolePage::new(document, bindings, options);
    Ok(match title {
        Some(title) => page.with_title(title),
        None => page,
    })
}

fn build_node(
    document: &mut Document,
    bindings: &mut EventBindings,
    parent: NodeId,
    spec: &NodeSpec,
) -> Result<NodeId> {
    let node = if spec.tag == Tag::Text {
        document.create_text(spec.text.as_deref().unwrap_or_default())
    } else {
        let node = document.create_element(spec.tag);
        for (name, value) in &spec.attributes {
            document
                .set_attribute(node, name, value)
                .with_context(|| format!("cannot set attribute {name} on {}", spec.tag))?;
        }
        if let Some(text) = spec.text.as_deref() {
            let content = document.create_text(text);
            document
                .append_child(node, content)
                .with_context(|| format!("{} cannot hold text", spec.tag))?;
        }
        node
    };
    if let Some(style) = document.style_mut(node) {
        *style = spec.style.clone();
    }
    if let Some(geometry) = spec.geometry {
        document.set_geometry(node, geometry)?;
    }
    for (event, action) in &spec.on {
        bindings.bind(node, *event, action.clone());
    }
    document
        .append_child(parent, node)
        .with_context(|| format!("cannot place {} here", spec.tag))?;
    for child in &spec.children {
        build_node(document, bindings, node, child)?;
    }
    Ok(node)
}
