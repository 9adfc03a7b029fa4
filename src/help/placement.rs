use serde::{Deserialize, Serialize};

use crate::dom::VisualTree;

/// Shift applied to the computed corner so the balloon sits up and to the
/// left of the control instead of covering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nudge {
    pub left: i32,
    pub top: i32,
}

impl Default for Nudge {
    fn default() -> Self {
        Self { left: 40, top: 15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub left: i32,
    pub top: i32,
}

/// Absolute balloon position for a hover on `target`.
///
/// The geometry anchor is the target's first child (the input inside the
/// hovered cell). Its own width and height seed the totals, then its offsets
/// and those of every positioned ancestor are added up. `None` when the host
/// cannot report positioned ancestors, the anchor has none, or the offsets
/// overflow.
pub fn balloon_position<T>(tree: &T, target: T::Node, nudge: Nudge) -> Option<Placement>
where
    T: VisualTree + ?Sized,
{
    if !tree.supports_offset_parent() {
        return None;
    }
    let anchor = tree.first_child(target)?;
    tree.offset_parent(anchor)?;

    let own = tree.geometry(anchor).unwrap_or_default();
    let mut left = own.width;
    let mut top = own.height;
    let mut cursor = Some(anchor);
    while let Some(node) = cursor {
        let geometry = tree.geometry(node).unwrap_or_default();
        left = left.checked_add(geometry.left)?;
        top = top.checked_add(geometry.top)?;
        cursor = tree.offset_parent(node);
    }
    Some(Placement {
        left: left.saturating_sub(nudge.left),
        top: top.saturating_sub(nudge.top),
    })
}
