//! Nearest-match navigation over a [`VisualTree`].
//!
//! Every query starts at the node it is given (inclusive) and accepts an
//! absent node, in which case the answer is absent too.

use super::{Tag, VisualTree};

/// Walk parent links (or the positioned-ancestor link for nodes without a
/// parent) until a node tagged `tag` is found.
pub fn find_ancestor<T>(tree: &T, node: Option<T::Node>, tag: Tag) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let mut cursor = node;
    while let Some(current) = cursor {
        if tree.tag(current) == Some(tag) {
            return Some(current);
        }
        cursor = tree
            .parent(current)
            .or_else(|| tree.offset_parent(current));
    }
    None
}

pub fn find_prev_sibling<T>(tree: &T, node: Option<T::Node>, tag: Tag) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let mut cursor = node;
    while let Some(current) = cursor {
        if tree.tag(current) == Some(tag) {
            return Some(current);
        }
        cursor = tree.previous_sibling(current);
    }
    None
}

pub fn find_next_sibling<T>(tree: &T, node: Option<T::Node>, tag: Tag) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let mut cursor = node;
    while let Some(current) = cursor {
        if tree.tag(current) == Some(tag) {
            return Some(current);
        }
        cursor = tree.next_sibling(current);
    }
    None
}

/// The first child of `node`, or a later sibling of it, tagged `tag`.
pub fn find_child<T>(tree: &T, node: Option<T::Node>, tag: Tag) -> Option<T::Node>
where
    T: VisualTree + ?Sized,
{
    let first = tree.first_child(node?);
    find_next_sibling(tree, first, tag)
}
