// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility state machine: debounced show and hide with cancellation.
//!
//! ## States
//!
//! `Closed` → `ShowPending` → `Open` → `HidePending` → `Closed`.
//! The two pending states each carry exactly one deadline, so at most one
//! timer is ever outstanding per popover and cancelling is just a state change.
//!
//! ## Transitions
//!
//! | call            | Closed      | ShowPending        | Open        | HidePending   |
//! |-----------------|-------------|--------------------|-------------|---------------|
//! | `display`       | ShowPending | ShowPending (reset)| Open        | Open          |
//! | `hide(After)`   | Closed      | Closed             | HidePending | HidePending (reset) |
//! | `hide(Never)`   | Closed      | ShowPending        | Open        | Open          |
//! | deadline passes | -           | Open               | -           | Closed        |

use core::time::Duration;

use kurbo::Point;

/// Observable popover state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VisibilityState {
    /// Hidden, nothing scheduled.
    Closed,
    /// Waiting for the show delay to pass.
    ShowPending,
    /// Visible, nothing scheduled.
    Open,
    /// Visible, waiting for the hide delay to pass.
    HidePending,
}

/// A scheduled firing time. Ties on `due` fire in scheduling order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct Deadline {
    pub(crate) due: Duration,
    pub(crate) seq: u64,
}

/// Hands out deadlines with a monotonically increasing sequence number.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scheduler {
    next_seq: u64,
}

impl Scheduler {
    pub(crate) fn after(&mut self, now: Duration, delay: Duration) -> Deadline {
        let seq = self.next_seq;
        self.next_seq += 1;
        Deadline {
            due: now.saturating_add(delay),
            seq,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    Closed,
    ShowPending {
        at: Deadline,
        pointer: Option<Point>,
    },
    Open,
    HidePending {
        at: Deadline,
    },
}

/// What happened when a deadline passed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Fired {
    /// The show delay passed; position and reveal the panel.
    Show { pointer: Option<Point> },
    /// The hide delay passed; detach listeners and hide the panel.
    Hide,
}

#[derive(Clone, Debug)]
pub(crate) struct VisibilityController {
    phase: Phase,
}

impl VisibilityController {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Closed,
        }
    }

    pub(crate) fn state(&self) -> VisibilityState {
        match self.phase {
            Phase::Closed => VisibilityState::Closed,
            Phase::ShowPending { .. } => VisibilityState::ShowPending,
            Phase::Open => VisibilityState::Open,
            Phase::HidePending { .. } => VisibilityState::HidePending,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open | Phase::HidePending { .. })
    }

    pub(crate) fn deadline(&self) -> Option<Deadline> {
        match self.phase {
            Phase::ShowPending { at, .. } | Phase::HidePending { at } => Some(at),
            Phase::Closed | Phase::Open => None,
        }
    }

    /// Schedule a show at `at`, or cancel a pending hide if already visible.
    pub(crate) fn display(&mut self, at: Deadline, pointer: Option<Point>) {
        self.phase = match self.phase {
            Phase::Closed | Phase::ShowPending { .. } => Phase::ShowPending { at, pointer },
            Phase::Open | Phase::HidePending { .. } => Phase::Open,
        };
    }

    /// Schedule a hide at `at`; `None` pins the popover open.
    pub(crate) fn hide(&mut self, at: Option<Deadline>) {
        self.phase = match (self.phase, at) {
            (Phase::HidePending { .. }, None) => Phase::Open,
            (phase, None) => phase,
            (Phase::Open | Phase::HidePending { .. }, Some(at)) => Phase::HidePending { at },
            (Phase::Closed | Phase::ShowPending { .. }, Some(_)) => Phase::Closed,
        };
    }

    pub(crate) fn cancel_show(&mut self) {
        if let Phase::ShowPending { .. } = self.phase {
            self.phase = Phase::Closed;
        }
    }

    pub(crate) fn cancel_hide(&mut self) {
        if let Phase::HidePending { .. } = self.phase {
            self.phase = Phase::Open;
        }
    }

    /// Advance past a deadline that is due at `now`.
    pub(crate) fn fire(&mut self, now: Duration) -> Option<Fired> {
        match self.phase {
            Phase::ShowPending { at, pointer } if at.due <= now => {
                self.phase = Phase::Open;
                Some(Fired::Show { pointer })
            }
            Phase::HidePending { at } if at.due <= now => {
                self.phase = Phase::Closed;
                Some(Fired::Hide)
            }
            _ => None,
        }
    }
}
