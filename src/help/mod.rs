mod balloon;
mod placement;

pub use balloon::{BALLOON_CLASS, BALLOON_ID, HelpBalloon, hide_help, show_help};
pub use placement::{Nudge, Placement, balloon_position};
