use tracing::{debug, trace};

use crate::dom::{Display, Position, Tag, TreeError, VisualTree};

use super::placement::{Nudge, balloon_position};

/// Reserved element id of the page's help balloon.
pub const BALLOON_ID: &str = "balloon_help";
pub const BALLOON_CLASS: &str = "tip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BalloonParts<N> {
    root: N,
    text: N,
}

/// Handle to the single help balloon of a page session.
///
/// The element is built on the first successful [`HelpBalloon::show`],
/// appended to the body once and then only re-filled, moved and hidden.
#[derive(Debug, Clone)]
pub struct HelpBalloon<N> {
    id: String,
    class: String,
    nudge: Nudge,
    parts: Option<BalloonParts<N>>,
}

impl<N: Copy + Eq> Default for HelpBalloon<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq> HelpBalloon<N> {
    pub fn new() -> Self {
        Self {
            id: BALLOON_ID.to_string(),
            class: BALLOON_CLASS.to_string(),
            nudge: Nudge::default(),
            parts: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_nudge(mut self, nudge: Nudge) -> Self {
        self.nudge = nudge;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The balloon element, once it exists.
    pub fn element(&self) -> Option<N> {
        self.parts.map(|parts| parts.root)
    }

    /// The region holding the help text, once the balloon exists.
    pub fn text_region(&self) -> Option<N> {
        self.parts.map(|parts| parts.text)
    }

    pub fn is_visible<T>(&self, tree: &T) -> bool
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        self.element()
            .and_then(|root| tree.style(root))
            .is_some_and(|style| !style.is_hidden())
    }

    /// Take over a balloon already present in the tree under the reserved id.
    pub fn adopt<T>(&mut self, tree: &mut T) -> bool
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        if self.parts.is_some() {
            return true;
        }
        let Some(root) = tree.element_by_id(&self.id) else {
            return false;
        };
        let existing = child_nodes(&*tree, root)
            .into_iter()
            .find(|child| has_class(&*tree, *child, "text"));
        let text = match existing {
            Some(text) => text,
            None => match append_text_region(tree, root) {
                Ok(text) => text,
                Err(err) => {
                    debug!(id = %self.id, error = %err, "cannot adopt help balloon");
                    return false;
                }
            },
        };
        self.parts = Some(BalloonParts { root, text });
        true
    }

    /// Fill the balloon with `text` and move it next to `target`.
    ///
    /// Returns `false`, leaving the page untouched, when the host cannot
    /// place it.
    pub fn show<T>(&mut self, tree: &mut T, target: N, text: &str) -> bool
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        let Some(placement) = balloon_position(&*tree, target, self.nudge) else {
            debug!("positioned ancestors unavailable; help balloon not shown");
            return false;
        };
        let parts = match self.ensure(tree) {
            Ok(parts) => parts,
            Err(err) => {
                debug!(error = %err, "failed to build help balloon");
                return false;
            }
        };

        for stale in child_nodes(&*tree, parts.text) {
            if let Err(err) = tree.remove_child(parts.text, stale) {
                debug!(error = %err, "failed to clear help text");
            }
        }
        let content = tree.create_text(text);
        if let Err(err) = tree.append_child(parts.text, content) {
            debug!(error = %err, "failed to set help text");
            return false;
        }

        let Some(style) = tree.style_mut(parts.root) else {
            return false;
        };
        style.display = Display::Block;
        style.left = Some(placement.left);
        style.top = Some(placement.top);
        trace!(left = placement.left, top = placement.top, "help balloon shown");
        true
    }

    pub fn hide<T>(&self, tree: &mut T)
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        let Some(root) = self.element() else {
            return;
        };
        if let Some(style) = tree.style_mut(root) {
            style.display = Display::None;
        }
    }

    fn ensure<T>(&mut self, tree: &mut T) -> Result<BalloonParts<N>, TreeError>
    where
        T: VisualTree<Node = N> + ?Sized,
    {
        if let Some(parts) = self.parts {
            return Ok(parts);
        }
        if self.adopt(tree)
            && let Some(parts) = self.parts
        {
            return Ok(parts);
        }

        let root = tree.create_element(Tag::Span);
        tree.set_attribute(root, "id", &self.id)?;
        tree.set_attribute(root, "class", &self.class)?;
        if let Some(style) = tree.style_mut(root) {
            style.position = Position::Absolute;
        }
        append_band(tree, root, "top")?;
        let text = append_text_region(tree, root)?;
        append_band(tree, root, "bottom")?;
        let body = tree.body();
        tree.append_child(body, root)?;

        let parts = BalloonParts { root, text };
        self.parts = Some(parts);
        debug!(id = %self.id, "created help balloon");
        Ok(parts)
    }
}

/// Show the page's help balloon for `target`; see [`HelpBalloon::show`].
pub fn show_help<T>(
    tree: &mut T,
    balloon: &mut HelpBalloon<T::Node>,
    target: T::Node,
    text: &str,
) -> bool
where
    T: VisualTree + ?Sized,
{
    balloon.show(tree, target, text)
}

pub fn hide_help<T>(tree: &mut T, balloon: &HelpBalloon<T::Node>)
where
    T: VisualTree + ?Sized,
{
    balloon.hide(tree)
}

fn append_band<T>(tree: &mut T, root: T::Node, class: &str) -> Result<T::Node, TreeError>
where
    T: VisualTree + ?Sized,
{
    let band = tree.create_element(Tag::Span);
    tree.set_attribute(band, "class", class)?;
    if let Some(style) = tree.style_mut(band) {
        style.display = Display::Block;
    }
    tree.append_child(root, band)?;
    Ok(band)
}

fn append_text_region<T>(tree: &mut T, root: T::Node) -> Result<T::Node, TreeError>
where
    T: VisualTree + ?Sized,
{
    let region = tree.create_element(Tag::Span);
    tree.set_attribute(region, "class", "text")?;
    tree.append_child(root, region)?;
    Ok(region)
}

fn child_nodes<T>(tree: &T, node: T::Node) -> Vec<T::Node>
where
    T: VisualTree + ?Sized,
{
    let mut out = Vec::new();
    let mut cursor = tree.first_child(node);
    while let Some(child) = cursor {
        out.push(child);
        cursor = tree.next_sibling(child);
    }
    out
}

fn has_class<T>(tree: &T, node: T::Node, class: &str) -> bool
where
    T: VisualTree + ?Sized,
{
    tree.attribute(node, "class")
        .is_some_and(|classes| classes.split_whitespace().any(|name| name == class))
}
