// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: turn pointer path changes into enter/leave transitions.
//!
//! Hosts that only see raw pointer paths (root→target element chains) can feed
//! them to [`PopoverRoot::pointer_moved`](crate::PopoverRoot::pointer_moved),
//! which uses [`HoverState`] to decide when the pointer entered or left a
//! trigger or panel.
//!
//! ```
//! use understory_popover::hover::{HoverEvent, HoverState};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! ```

use alloc::vec::Vec;

/// The currently hovered root→target path.
///
/// Leave events are emitted inner-most first, then enter events outer-most
/// first, for the part of the paths below their lowest common ancestor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// Pointer entered the element.
    Enter(K),
    /// Pointer left the element.
    Leave(K),
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The current root→target path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Returns true if `element` is anywhere on the hovered path.
    pub fn contains(&self, element: K) -> bool {
        self.current.contains(&element)
    }

    /// Forget the path without producing leave events.
    pub fn reset(&mut self) {
        self.current.clear();
    }

    /// Replace the hovered path and return the transitions needed to get there.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let lca = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out = Vec::new();
        for &k in self.current[lca..].iter().rev() {
            out.push(HoverEvent::Leave(k));
        }
        for &k in &new_path[lca..] {
            out.push(HoverEvent::Enter(k));
        }

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}
