mod bindings;
mod options;

use tracing::debug;

use crate::{
    dom::{Document, NodeId, VisualTree},
    form::{Confirm, RequestOutcome, Submitter, add_field_named, set_request_with},
    help::HelpBalloon,
};

pub use bindings::{Action, EventBindings, EventKind};
pub use options::PageOptions;

/// Result of delivering one event to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No element on the event path had a handler for it.
    Ignored,
    FieldAdded(NodeId),
    FieldUnchanged,
    Request(RequestOutcome),
    HelpShown,
    HelpUnavailable,
    HelpHidden,
}

/// One loaded configuration page: its tree, its handlers and the help
/// balloon that lives as long as the page.
#[derive(Debug, Clone)]
pub struct ConsolePage {
    title: Option<String>,
    document: Document,
    bindings: EventBindings,
    balloon: HelpBalloon<NodeId>,
    options: PageOptions,
}

impl ConsolePage {
    pub fn new(document: Document, bindings: EventBindings, options: PageOptions) -> Self {
        let mut document = document;
        let mut balloon = HelpBalloon::new()
            .with_id(options.balloon_id.clone())
            .with_class(options.balloon_class.clone())
            .with_nudge(options.nudge);
        if balloon.adopt(&mut document) {
            debug!(id = balloon.id(), "reusing help balloon present in page");
        }
        Self {
            title: None,
            document,
            bindings,
            balloon,
            options,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn bindings(&self) -> &EventBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut EventBindings {
        &mut self.bindings
    }

    pub fn balloon(&self) -> &HelpBalloon<NodeId> {
        &self.balloon
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    /// Look an element up by `id`, then by `name`.
    pub fn find_control(&self, key: &str) -> Option<NodeId> {
        let doc = &self.document;
        doc.element_by_id(key).or_else(|| {
            doc.descendants(doc.root())
                .into_iter()
                .find(|node| doc.attribute(*node, "name") == Some(key))
        })
    }

    /// Deliver `event` at `target`, bubbling to the nearest ancestor that has
    /// a handler for it. The handler runs against that ancestor, like `this`
    /// in an inline handler.
    pub fn dispatch(
        &mut self,
        target: NodeId,
        event: EventKind,
        confirm: &mut dyn Confirm,
        submitter: &mut dyn Submitter,
    ) -> Dispatch {
        let Some((current, action)) = self.handler_on_path(target, event) else {
            return Dispatch::Ignored;
        };
        debug!(node = current.raw(), %event, ?action, "dispatching");
        match action {
            Action::AddField { field } => {
                let name = field
                    .or_else(|| {
                        self.document
                            .attribute(current, "name")
                            .filter(|name| !name.is_empty())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| self.options.default_field_name.clone());
                match add_field_named(&mut self.document, current, &name) {
                    Some(row) => {
                        self.document.resolve_offset_parents();
                        Dispatch::FieldAdded(row)
                    }
                    None => Dispatch::FieldUnchanged,
                }
            }
            Action::SetRequest { value } => Dispatch::Request(set_request_with(
                &mut self.document,
                current,
                &value,
                &self.options.request_field,
                confirm,
                submitter,
            )),
            Action::ShowHelp { text } => {
                if self.balloon.show(&mut self.document, current, &text) {
                    Dispatch::HelpShown
                } else {
                    Dispatch::HelpUnavailable
                }
            }
            Action::HideHelp => {
                self.balloon.hide(&mut self.document);
                Dispatch::HelpHidden
            }
        }
    }

    fn handler_on_path(&self, target: NodeId, event: EventKind) -> Option<(NodeId, Action)> {
        let mut cursor = Some(target);
        while let Some(current) = cursor {
            if let Some(action) = self.bindings.action(current, event) {
                return Some((current, action.clone()));
            }
            cursor = self.document.parent(current);
        }
        None
    }
}
