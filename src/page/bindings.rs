use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    MouseOver,
    MouseOut,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Click => write!(f, "click"),
            EventKind::MouseOver => write!(f, "mouseover"),
            EventKind::MouseOut => write!(f, "mouseout"),
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "click" => Ok(EventKind::Click),
            "mouseover" | "hover" => Ok(EventKind::MouseOver),
            "mouseout" | "leave" => Ok(EventKind::MouseOut),
            other => Err(format!("unknown event '{other}'")),
        }
    }
}

/// What a bound element does when its event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    AddField {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },
    SetRequest {
        value: String,
    },
    ShowHelp {
        text: String,
    },
    HideHelp,
}

/// Event handlers registered per element, in registration order.
#[derive(Debug, Clone, Default)]
pub struct EventBindings {
    handlers: IndexMap<(NodeId, EventKind), Action>,
}

impl EventBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action`, returning whatever it replaced.
    pub fn bind(&mut self, node: NodeId, event: EventKind, action: Action) -> Option<Action> {
        self.handlers.insert((node, event), action)
    }

    pub fn unbind(&mut self, node: NodeId, event: EventKind) -> Option<Action> {
        self.handlers.shift_remove(&(node, event))
    }

    /// Bind the hover pair that shows `text` on enter and hides it on leave.
    /// Runs of whitespace in `text` collapse to a single space.
    pub fn bind_help(&mut self, node: NodeId, text: &str) {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.bind(node, EventKind::MouseOver, Action::ShowHelp { text });
        self.bind(node, EventKind::MouseOut, Action::HideHelp);
    }

    pub fn action(&self, node: NodeId, event: EventKind) -> Option<&Action> {
        self.handlers.get(&(node, event))
    }

    pub fn for_node(&self, node: NodeId) -> impl Iterator<Item = (EventKind, &Action)> + '_ {
        self.handlers
            .iter()
            .filter(move |((bound, _), _)| *bound == node)
            .map(|((_, event), action)| (*event, action))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
