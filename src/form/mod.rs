mod error;
pub mod repeat;
pub mod submit;

pub use error::IntentParseError;
pub use repeat::{DEFAULT_FIELD_NAME, add_field, add_field_named};
pub use submit::{
    Confirm, FormSubmission, REQUEST_FIELD, RequestOutcome, SubmissionIntent, Submitter,
    collect_submission, named_control, set_request, set_request_with,
};
