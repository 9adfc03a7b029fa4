use serde::{Deserialize, Serialize};

use crate::{
    form::{DEFAULT_FIELD_NAME, REQUEST_FIELD},
    help::{BALLOON_CLASS, BALLOON_ID, Nudge},
};

/// Names and offsets shared between the page markup and its scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub request_field: String,
    pub balloon_id: String,
    pub balloon_class: String,
    pub nudge: Nudge,
    pub default_field_name: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            request_field: REQUEST_FIELD.to_string(),
            balloon_id: BALLOON_ID.to_string(),
            balloon_class: BALLOON_CLASS.to_string(),
            nudge: Nudge::default(),
            default_field_name: DEFAULT_FIELD_NAME.to_string(),
        }
    }
}

impl PageOptions {
    pub fn with_request_field(mut self, name: impl Into<String>) -> Self {
        self.request_field = name.into();
        self
    }

    pub fn with_balloon_id(mut self, id: impl Into<String>) -> Self {
        self.balloon_id = id.into();
        self
    }

    pub fn with_balloon_class(mut self, class: impl Into<String>) -> Self {
        self.balloon_class = class.into();
        self
    }

    pub fn with_nudge(mut self, left: i32, top: i32) -> Self {
        self.nudge = Nudge { left, top };
        self
    }

    pub fn with_default_field_name(mut self, name: impl Into<String>) -> Self {
        self.default_field_name = name.into();
        self
    }
}
