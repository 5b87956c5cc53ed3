// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: popover handles, delays, dispositions, and lifecycle events.

use core::time::Duration;

use kurbo::Point;

/// Identifier for a popover registered in a [`PopoverRoot`](crate::PopoverRoot).
///
/// A slot index plus a generation counter, with the same semantics as a box
/// tree `NodeId`: removing a popover frees its slot, and reusing the slot bumps
/// the generation so stale ids never alias a live popover.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PopoverId(pub(crate) u32, pub(crate) u32);

impl PopoverId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How long to wait before hiding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HideDelay {
    /// Hide after the given delay.
    After(Duration),
    /// Never hide; cancels any pending hide and pins the popover open.
    Never,
}

impl HideDelay {
    /// Hide on the next poll.
    pub const NOW: Self = Self::After(Duration::ZERO);
}

impl Default for HideDelay {
    /// The hover-out timeout: 1.5 seconds.
    fn default() -> Self {
        Self::After(Duration::from_millis(1500))
    }
}

/// What the host should do with the event that triggered a popover.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Let the event's default action run.
    Default,
    /// Suppress the event's default action.
    PreventDefault,
}

/// The event that asked a popover to open.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TriggerEvent {
    /// Pointer position in document coordinates, when the event carries one.
    pub pointer: Option<Point>,
}

impl TriggerEvent {
    /// An event at the given document-space pointer position.
    pub const fn at(pointer: Point) -> Self {
        Self {
            pointer: Some(pointer),
        }
    }
}

/// Lifecycle notifications returned by [`PopoverRoot::poll`](crate::PopoverRoot::poll).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PopoverEvent {
    /// The popover became visible at `position` (panel top-left, document space).
    Opened {
        /// Which popover.
        id: PopoverId,
        /// Where the panel was placed.
        position: Point,
    },
    /// The popover was hidden.
    Closed {
        /// Which popover.
        id: PopoverId,
    },
}

impl PopoverEvent {
    /// The popover this event concerns.
    pub const fn id(&self) -> PopoverId {
        match *self {
            Self::Opened { id, .. } | Self::Closed { id } => id,
        }
    }
}
