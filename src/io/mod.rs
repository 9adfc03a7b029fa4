mod format;
mod input;
mod markup;
mod output;

pub use format::DocumentFormat;
pub use input::{
    NodeSpec, PageSpec, build_page, load_page, page_from_value, parse_document_str,
    parse_page_str,
};
pub use markup::render_markup;
pub use output::{OutputDestination, OutputOptions, emit, snapshot_page};
