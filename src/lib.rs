#![deny(rust_2018_idioms)]

pub mod dom;
pub mod form;
pub mod help;
mod io;
pub mod page;

pub use dom::{BoxGeometry, Document, NodeId, Tag, TreeError, VisualTree};
pub use form::{
    Confirm, FormSubmission, RequestOutcome, SubmissionIntent, Submitter, add_field,
    add_field_named, set_request,
};
pub use help::{HelpBalloon, Nudge, Placement, balloon_position, hide_help, show_help};
pub use io::{
    DocumentFormat, NodeSpec, OutputDestination, OutputOptions, PageSpec, build_page, emit,
    load_page, page_from_value, parse_document_str, parse_page_str, render_markup,
    snapshot_page,
};
pub use page::{Action, ConsolePage, Dispatch, EventBindings, EventKind, PageOptions};

pub mod prelude {
    pub use super::{
        ConsolePage, Document, EventKind, HelpBalloon, PageOptions, Tag, VisualTree,
    };
}
