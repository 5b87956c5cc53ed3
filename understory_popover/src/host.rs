// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: the element tree, the mutations applied to it, and template loading.
//!
//! ## Overview
//!
//! The popover engine never touches a real element tree.
//! Instead, the host implements:
//!
//! - [`Document`] for read-only queries (rectangles, parents, lookups).
//! - [`Surface`] for the handful of mutations the engine performs on panels.
//! - [`TemplateSource`] for resolving panel markup, possibly asynchronously.
//!
//! Geometry queries come from [`ElementGeometry`], so the same host type can be
//! fed straight to [`understory_placement::bounding_rect`].

use alloc::string::String;

use understory_placement::{ElementGeometry, TriangleOffset};

use crate::dismissal::ListenerSet;
use crate::types::PopoverId;

/// Read-only queries against the host element tree.
pub trait Document: ElementGeometry {
    /// Returns the parent of `element`, or `None` at the document root.
    fn parent_of(&self, element: Self::Element) -> Option<Self::Element>;

    /// Find the first element matching `selector`.
    fn find_container(&self, selector: &str) -> Option<Self::Element>;

    /// The document body; used when a container selector matches nothing.
    fn body(&self) -> Self::Element;

    /// The pointer-triangle element inside `panel`, if its content has one.
    fn find_triangle(&self, panel: Self::Element) -> Option<Self::Element>;
}

/// Mutations the engine applies to the host element tree.
///
/// The listener hooks default to no-ops for hosts that route every event
/// through [`PopoverRoot`](crate::PopoverRoot) unconditionally; the engine
/// filters by attached listeners either way.
pub trait Surface: Document {
    /// Create a detached, hidden, absolutely positioned panel element.
    fn create_panel(&mut self, dom_id: &str, classes: &[String]) -> Self::Element;

    /// Replace the panel's content with `markup`.
    fn set_content(&mut self, panel: Self::Element, markup: &str);

    /// Add a class to the panel.
    fn add_class(&mut self, panel: Self::Element, class: &str);

    /// Append `panel` to `container`.
    fn append(&mut self, container: Self::Element, panel: Self::Element);

    /// Bind the panel's content to the live view. Called once, after [`append`](Self::append).
    fn bind(&mut self, panel: Self::Element);

    /// Remove the panel from the tree for good.
    fn remove(&mut self, panel: Self::Element);

    /// Show or hide the panel.
    fn set_visible(&mut self, panel: Self::Element, visible: bool);

    /// Move the panel's top-left corner (document space).
    fn set_position(&mut self, panel: Self::Element, position: kurbo::Point);

    /// Move the pointer triangle inside the panel.
    fn set_triangle_offset(&mut self, triangle: Self::Element, offset: TriangleOffset);

    /// Subscribe to the DOM event that opens popover `id` on `element`.
    fn subscribe_trigger(&mut self, _id: PopoverId, _element: Self::Element, _event: &str) {}

    /// Undo [`subscribe_trigger`](Self::subscribe_trigger).
    fn unsubscribe_trigger(&mut self, _id: PopoverId, _element: Self::Element, _event: &str) {}

    /// Dismissal listeners for `id` were attached.
    fn listen(&mut self, _id: PopoverId, _listeners: ListenerSet) {}

    /// Dismissal listeners for `id` were detached.
    fn unlisten(&mut self, _id: PopoverId, _listeners: ListenerSet) {}
}

/// Result of asking a [`TemplateSource`] for panel markup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemplateLoad {
    /// Markup is available now.
    Ready(String),
    /// A fetch was started; the host reports the outcome through
    /// [`PopoverRoot::resolve_template`](crate::PopoverRoot::resolve_template).
    Pending,
}

/// A template fetch that failed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("failed to load template `{template}`: {reason}")]
pub struct TemplateError {
    /// The template URI.
    pub template: String,
    /// Host-provided description of the failure.
    pub reason: String,
}

/// Fetch-or-cache provider of panel markup.
pub trait TemplateSource {
    /// Look up markup for a template URI.
    ///
    /// Return [`TemplateLoad::Ready`] on a cache hit, or start a fetch and return
    /// [`TemplateLoad::Pending`].
    fn fetch(&mut self, id: PopoverId, template: &str) -> TemplateLoad;
}

/// Resolve a popover template.
///
/// Empty templates resolve to empty markup and plain templates are the markup
/// itself; only URIs reach the [`TemplateSource`].
pub(crate) fn load_template<T: TemplateSource + ?Sized>(
    source: &mut T,
    id: PopoverId,
    template: &str,
    plain: bool,
) -> TemplateLoad {
    if template.is_empty() {
        TemplateLoad::Ready(String::new())
    } else if plain {
        TemplateLoad::Ready(String::from(template))
    } else {
        source.fetch(id, template)
    }
}

/// A source with nothing cached and no way to fetch: every URI stays pending.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTemplates;

impl TemplateSource for NoTemplates {
    fn fetch(&mut self, _id: PopoverId, _template: &str) -> TemplateLoad {
        TemplateLoad::Pending
    }
}

/// Returns true if `target` is `ancestor` or one of its descendants.
///
/// Walks parent links iteratively until it finds `ancestor` or runs out of
/// parents; the host guarantees acyclic ancestry.
pub fn is_within<D: Document + ?Sized>(doc: &D, target: D::Element, ancestor: D::Element) -> bool {
    let mut cur = Some(target);
    while let Some(el) = cur {
        if el == ancestor {
            return true;
        }
        cur = doc.parent_of(el);
    }
    false
}
