// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popover --heading-base-level=0

//! Understory Popover: anchored, timer-debounced floating panels for a host view tree.
//!
//! ## Overview
//!
//! A popover is a panel attached to a trigger element. It opens when the trigger
//! fires, positions itself against the trigger (or the pointer) using
//! [`understory_placement`], and closes on clicks or hover loss according to its
//! configuration. Popovers sharing a group are mutually exclusive.
//!
//! This crate owns the state machine and bookkeeping only. The host owns the
//! element tree, the clock, and event delivery, and exposes them through a few
//! traits in [`host`]:
//!
//! - [`Document`]: read-only queries (geometry, parents, container lookup).
//! - [`Surface`]: panel creation and mutation, plus listener subscription.
//! - [`TemplateSource`]: template loading, possibly asynchronous.
//!
//! ## Time
//!
//! Nothing here reads a clock. Every operation that may schedule a timer takes
//! `now` as a [`Duration`](core::time::Duration) since an arbitrary epoch, and
//! timers fire only from [`PopoverRoot::poll`]. A zero-delay timer fires on the
//! next poll, never synchronously. Ask [`PopoverRoot::next_deadline`] when to
//! poll again.
//!
//! ## States
//!
//! Each popover is in one of four [`VisibilityState`]s: `Closed`, `ShowPending`,
//! `Open`, or `HidePending`. See [`visibility`] for the transition table.
//!
//! ## Configuration
//!
//! Options come from [`PopoverOptions`] (built directly or from string attributes)
//! resolved over the root's [`PopoverDefaults`]:
//!
//! ```
//! use understory_popover::{HideDelay, PopoverDefaults, PopoverOptions, Trigger};
//!
//! let opts = PopoverOptions::from_attributes([
//!     ("placement", "top|center"),
//!     ("trigger", "mouseenter"),
//!     ("timeout", "-1"),
//!     ("group", "menus"),
//! ])
//! .unwrap();
//! let config = opts.resolve(&PopoverDefaults::default()).unwrap();
//! assert_eq!(config.trigger, Trigger::Dom("mouseenter".into()));
//! assert_eq!(config.timeout, HideDelay::Never);
//! assert_eq!(config.group.as_deref(), Some("menus"));
//! ```
//!
//! A malformed placement fails at this point, not when the popover opens:
//!
//! ```
//! use understory_popover::{PopoverDefaults, PopoverOptions};
//!
//! let opts = PopoverOptions::with_placement("middle");
//! assert!(opts.resolve(&PopoverDefaults::default()).is_err());
//! ```
//!
//! ## Features
//!
//! - `std` (default) and `libm` select Kurbo's float backend.
//! - `serde` derives `Serialize`/`Deserialize` for the option types.
//! - `tracing` emits debug events on open/close and a warning on template failures.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod dismissal;
pub mod group;
pub mod host;
pub mod hover;
pub mod root;
pub mod types;
pub mod visibility;

pub use config::{PopoverConfig, PopoverDefaults, PopoverError, PopoverOptions, Trigger};
pub use dismissal::ListenerSet;
pub use group::GroupRegistry;
pub use host::{
    Document, NoTemplates, Surface, TemplateError, TemplateLoad, TemplateSource, is_within,
};
pub use root::PopoverRoot;
pub use types::{Disposition, HideDelay, PopoverEvent, PopoverId, TriggerEvent};
pub use visibility::VisibilityState;
