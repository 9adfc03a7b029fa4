use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    dom::{NodeId, Tag, VisualTree},
    page::ConsolePage,
};

use super::{
    DocumentFormat,
    input::{NodeSpec, PageSpec},
    markup::render_markup,
};

/// Destination for serialized output values.
#[derive(Debug, Clone)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

/// Controls how a page is serialized after its events have been replayed.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub markup: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            markup: false,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Emit HTML markup instead of a page document.
    pub fn with_markup(mut self, markup: bool) -> Self {
        self.markup = markup;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn add_destination(mut self, destination: OutputDestination) -> Self {
        self.destinations.push(destination);
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Capture the page's current tree and handlers as a loadable document.
pub fn snapshot_page(page: &ConsolePage) -> PageSpec {
    let doc = page.document();
    PageSpec {
        title: page.title().map(str::to_string),
        options: page.options().clone(),
        body: doc
            .children(doc.body())
            .iter()
            .map(|child| snapshot_node(page, *child))
            .collect(),
    }
}

fn snapshot_node(page: &ConsolePage, node: NodeId) -> NodeSpec {
    let doc = page.document();
    let tag = doc.tag(node).unwrap_or(Tag::Span);
    let mut spec = NodeSpec::new(tag);
    if tag == Tag::Text {
        spec.text = Some(doc.text(node).to_string());
    } else if let Some(attributes) = doc.attributes(node) {
        spec.attributes = attributes.clone();
    }
    spec.style = doc.style(node).cloned().unwrap_or_default();
    spec.geometry = doc.geometry(node);
    spec.on = page
        .bindings()
        .for_node(node)
        .map(|(event, action)| (event, action.clone()))
        .collect();
    spec.children = doc
        .children(node)
        .iter()
        .map(|child| snapshot_node(page, *child))
        .collect();
    spec
}

/// Serialize and write the page according to the configured format and destinations.
pub fn emit(page: &ConsolePage, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = if options.markup {
        render_markup(page.document(), page.document().root())
    } else {
        let value =
            serde_json::to_value(snapshot_page(page)).context("failed to snapshot page")?;
        serialize_value(&value, options)?
    };
    for destination in &options.destinations {
        write_payload(destination, &payload).with_context(|| match destination {
            OutputDestination::Stdout => "failed to write to stdout".to_string(),
            OutputDestination::File(path) => {
                format!("failed to write to file {}", path.display())
            }
        })?;
    }
    Ok(())
}

fn serialize_value(value: &Value, options: &OutputOptions) -> Result<String> {
    match options.format {
        DocumentFormat::Json => {
            if options.pretty {
                serde_json::to_string_pretty(value).context("failed to serialize JSON")
            } else {
                serde_json::to_string(value).context("failed to serialize JSON")
            }
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            if options.pretty {
                toml::to_string_pretty(value).context("failed to serialize TOML")
            } else {
                toml::to_string(value).context("failed to serialize TOML")
            }
        }
    }
}

fn write_payload(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout();
            stdout
                .write_all(payload.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context("failed to flush stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
        OutputDestination::File(path) => {
            let mut file = File::create(path)?;
            file.write_all(payload.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
            Ok(())
        }
    }
}
