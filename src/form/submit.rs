use std::{fmt, str::FromStr};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, trace};

use crate::dom::{Tag, VisualTree, find_ancestor};

use super::error::IntentParseError;

/// Hidden control that carries the submission intent to the server.
pub const REQUEST_FIELD: &str = "ConfigurationRequest";

/// Characters left unescaped in `application/x-www-form-urlencoded` bodies.
/// Spaces pass through here and become `+` in [`form_encode`].
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// `"<control>:<value>"`, the record of which button asked for what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionIntent {
    pub control: String,
    pub value: String,
}

impl SubmissionIntent {
    pub fn new(control: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SubmissionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.control, self.value)
    }
}

impl FromStr for SubmissionIntent {
    type Err = IntentParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (control, value) = raw.split_once(':').ok_or_else(|| IntentParseError {
            raw: raw.to_string(),
        })?;
        Ok(Self::new(control, value))
    }
}

/// The successful controls of a form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: Option<String>,
    pub method: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Decode the intent stored under `request_field`, if any.
    pub fn intent(&self, request_field: &str) -> Option<SubmissionIntent> {
        self.field(request_field)?.parse().ok()
    }

    /// Body as posted with `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| {
                format!("{}={}", form_encode(name), form_encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn form_encode(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Blocking yes/no prompt supplied by the host.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Receives the collected form once the user agreed to send it.
pub trait Submitter {
    fn submit(&mut self, submission: FormSubmission);
}

impl<F> Submitter for F
where
    F: FnMut(FormSubmission),
{
    fn submit(&mut self, submission: FormSubmission) {
        self(submission)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Submitted,
    Declined,
    MissingForm,
    MissingRequestField,
}

/// [`set_request_with`] using the standard `ConfigurationRequest` field.
pub fn set_request<T>(
    tree: &mut T,
    control: T::Node,
    value: &str,
    confirm: &mut dyn Confirm,
    submitter: &mut dyn Submitter,
) -> RequestOutcome
where
    T: VisualTree + ?Sized,
{
    set_request_with(tree, control, value, REQUEST_FIELD, confirm, submitter)
}

/// Record `"<control name>:<value>"` in the form's request field, then submit
/// the form only if the user confirms the control's label.
///
/// The request field keeps the written intent even when the prompt is
/// declined; the next call overwrites it.
pub fn set_request_with<T>(
    tree: &mut T,
    control: T::Node,
    value: &str,
    request_field: &str,
    confirm: &mut dyn Confirm,
    submitter: &mut dyn Submitter,
) -> RequestOutcome
where
    T: VisualTree + ?Sized,
{
    let Some(form) = find_ancestor(&*tree, Some(control), Tag::Form) else {
        debug!("request control is not inside a form");
        return RequestOutcome::MissingForm;
    };
    let Some(field) = named_control(&*tree, form, request_field) else {
        debug!(field = request_field, "form has no request field");
        return RequestOutcome::MissingRequestField;
    };

    let name = tree.attribute(control, "name").unwrap_or_default();
    let intent = SubmissionIntent::new(name, value).to_string();
    if let Err(err) = tree.set_attribute(field, "value", &intent) {
        debug!(error = %err, "could not write request field");
        return RequestOutcome::MissingRequestField;
    }
    trace!(%intent, "request field updated");

    let label = display_label(&*tree, control);
    if !confirm.confirm(&label) {
        debug!(%intent, "submission declined");
        return RequestOutcome::Declined;
    }
    let submission = collect_submission(&*tree, form);
    debug!(%intent, fields = submission.fields.len(), "submitting form");
    submitter.submit(submission);
    RequestOutcome::Submitted
}

fn display_label<T>(tree: &T, control: T::Node) -> String
where
    T: VisualTree + ?Sized,
{
    match tree.attribute(control, "value") {
        Some(value) => value.to_string(),
        None => tree.text_content(control),
    }
}

/// Named lookup among a form's controls, like `form.elements[name]`.
pub fn named_control<T>(tree: &T, form: T::Node, name: &str) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    tree.descendants(form).into_iter().find(|node| {
        matches!(
            tree.tag(*node),
            Some(Tag::Input | Tag::Button | Tag::Select)
        ) && tree.attribute(*node, "name") == Some(name)
    })
}

/// Gather the controls a browser would post for `form`.
pub fn collect_submission<T>(tree: &T, form: T::Node) -> FormSubmission
where
    T: VisualTree + ?Sized,
{
    let mut submission = FormSubmission {
        action: tree.attribute(form, "action").map(str::to_string),
        method: tree.attribute(form, "method").map(str::to_string),
        fields: Vec::new(),
    };
    for node in tree.descendants(form) {
        let Some(name) = tree.attribute(node, "name").filter(|name| !name.is_empty()) else {
            continue;
        };
        let value = match tree.tag(node) {
            Some(Tag::Input) => input_value(tree, node),
            Some(Tag::Select) => select_value(tree, node),
            _ => None,
        };
        if let Some(value) = value {
            submission.fields.push((name.to_string(), value));
        }
    }
    submission
}

fn input_value<T>(tree: &T, input: T::Node) -> Option<String>
where
    T: VisualTree + ?Sized,
{
    let kind = tree
        .attribute(input, "type")
        .unwrap_or("text")
        .to_ascii_lowercase();
    match kind.as_str() {
        "button" | "submit" | "reset" | "image" => None,
        "checkbox" | "radio" => {
            tree.attribute(input, "checked")?;
            Some(tree.attribute(input, "value").unwrap_or("on").to_string())
        }
        _ => Some(tree.attribute(input, "value").unwrap_or_default().to_string()),
    }
}

fn select_value<T>(tree: &T, select: T::Node) -> Option<String>
where
    T: VisualTree + ?Sized,
{
    let options: Vec<_> = tree
        .descendants(select)
        .into_iter()
        .filter(|node| tree.tag(*node) == Some(Tag::Option))
        .collect();
    let chosen = options
        .iter()
        .copied()
        .find(|option| tree.attribute(*option, "selected").is_some())
        .or_else(|| options.first().copied())?;
    Some(match tree.attribute(chosen, "value") {
        Some(value) => value.to_string(),
        None => tree.text_content(chosen),
    })
}
