// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover configuration: root-wide defaults, per-instance options, and the
//! resolved configuration a popover runs with.
//!
//! ## Layers
//!
//! 1. [`PopoverDefaults`] holds the values used when an instance says nothing.
//!    Hosts can tweak them once per root.
//! 2. [`PopoverOptions`] holds per-instance overrides, either built directly
//!    or read from string attributes with [`PopoverOptions::from_attributes`].
//! 3. [`PopoverOptions::resolve`] merges the two into a [`PopoverConfig`],
//!    parsing the placement. A malformed placement fails here, at
//!    construction, and never later.

use alloc::string::{String, ToString};
use core::time::Duration;

use understory_placement::{InvalidPlacement, PlacementSpec, PointerTracking};

use crate::dismissal::ListenerSet;
use crate::types::HideDelay;

/// Errors raised while building a popover.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PopoverError {
    /// The placement string does not match the placement grammar.
    #[error(transparent)]
    InvalidPlacement(#[from] InvalidPlacement),
    /// An attribute value could not be interpreted.
    #[error("invalid value `{value}` for popover option `{name}`")]
    InvalidOption {
        /// Attribute name.
        name: String,
        /// Rejected value.
        value: String,
    },
}

/// Root-wide defaults for every option.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopoverDefaults {
    /// Root-wide event name that opens the popover.
    pub angular_event: Option<String>,
    /// Instance-scoped event name that opens the popover.
    pub scope_event: Option<String>,
    /// Selector of the element panels are appended to.
    pub container: String,
    /// Clicking the trigger while open hides the popover.
    pub hide_on_button_click: bool,
    /// Clicking inside the panel hides the popover.
    pub hide_on_inside_click: bool,
    /// Clicking outside the trigger and panel hides the popover.
    pub hide_on_outside_click: bool,
    /// Axes that follow the pointer instead of the trigger.
    pub mouse_relative: PointerTracking,
    /// Placement string.
    pub placement: String,
    /// Treat `template` as literal markup.
    pub plain: bool,
    /// Show debounce delay.
    pub popup_delay: Duration,
    /// Keep the panel horizontally inside its container.
    pub restrict_bounds: bool,
    /// Template URI or markup.
    pub template: String,
    /// Class added to the panel.
    pub theme: String,
    /// Hover-out hide delay.
    pub timeout: HideDelay,
    /// DOM event on the trigger element that opens the popover.
    pub trigger: String,
    /// Suppress the trigger event's default action.
    pub trigger_prevent: bool,
}

impl Default for PopoverDefaults {
    fn default() -> Self {
        Self {
            angular_event: None,
            scope_event: None,
            container: String::from("body"),
            hide_on_button_click: true,
            hide_on_inside_click: false,
            hide_on_outside_click: true,
            mouse_relative: PointerTracking::empty(),
            placement: String::from("bottom|left"),
            plain: false,
            popup_delay: Duration::ZERO,
            restrict_bounds: false,
            template: String::new(),
            theme: String::from("ns-popover-list-theme"),
            timeout: HideDelay::default(),
            trigger: String::from("click"),
            trigger_prevent: true,
        }
    }
}

/// Per-instance overrides. `None` falls back to [`PopoverDefaults`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopoverOptions {
    /// See [`PopoverDefaults::angular_event`].
    pub angular_event: Option<String>,
    /// See [`PopoverDefaults::scope_event`].
    pub scope_event: Option<String>,
    /// See [`PopoverDefaults::container`].
    pub container: Option<String>,
    /// Mutual-exclusion group; there is no root-wide default.
    pub group: Option<String>,
    /// See [`PopoverDefaults::hide_on_button_click`].
    pub hide_on_button_click: Option<bool>,
    /// See [`PopoverDefaults::hide_on_inside_click`].
    pub hide_on_inside_click: Option<bool>,
    /// See [`PopoverDefaults::hide_on_outside_click`].
    pub hide_on_outside_click: Option<bool>,
    /// See [`PopoverDefaults::mouse_relative`].
    pub mouse_relative: Option<PointerTracking>,
    /// See [`PopoverDefaults::placement`].
    pub placement: Option<String>,
    /// See [`PopoverDefaults::plain`].
    pub plain: Option<bool>,
    /// See [`PopoverDefaults::popup_delay`].
    pub popup_delay: Option<Duration>,
    /// See [`PopoverDefaults::restrict_bounds`].
    pub restrict_bounds: Option<bool>,
    /// See [`PopoverDefaults::template`].
    pub template: Option<String>,
    /// See [`PopoverDefaults::theme`].
    pub theme: Option<String>,
    /// See [`PopoverDefaults::timeout`].
    pub timeout: Option<HideDelay>,
    /// See [`PopoverDefaults::trigger`].
    pub trigger: Option<String>,
    /// See [`PopoverDefaults::trigger_prevent`].
    pub trigger_prevent: Option<bool>,
}

/// What opens a popover.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Trigger {
    /// A DOM event on the trigger element, e.g. `click` or `mouseover`.
    Dom(String),
    /// A named event broadcast across the whole root.
    RootEvent(String),
    /// A named event addressed to this popover's own scope.
    ScopeEvent(String),
}

/// Fully resolved popover configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PopoverConfig {
    /// What opens the popover.
    pub trigger: Trigger,
    /// Selector of the element the panel is appended to.
    pub container: String,
    /// Mutual-exclusion group.
    pub group: Option<String>,
    /// Dismissal listeners attached while open.
    pub listeners: ListenerSet,
    /// Axes that follow the pointer.
    pub mouse_relative: PointerTracking,
    /// Parsed placement.
    pub placement: PlacementSpec,
    /// Treat `template` as literal markup.
    pub plain: bool,
    /// Show debounce delay.
    pub popup_delay: Duration,
    /// Keep the panel horizontally inside its container.
    pub restrict_bounds: bool,
    /// Template URI or markup.
    pub template: String,
    /// Class added to the panel once its content resolves; empty for none.
    pub theme: String,
    /// Hover-out hide delay.
    pub timeout: HideDelay,
    /// Suppress the trigger event's default action.
    pub trigger_prevent: bool,
}

impl PopoverConfig {
    /// Resolve the stock defaults with no overrides.
    pub fn from_defaults(defaults: &PopoverDefaults) -> Result<Self, PopoverError> {
        PopoverOptions::default().resolve(defaults)
    }
}

impl PopoverOptions {
    /// Options with just a placement set.
    pub fn with_placement(placement: impl Into<String>) -> Self {
        Self {
            placement: Some(placement.into()),
            ..Self::default()
        }
    }

    /// Read options from `(name, value)` attribute pairs.
    ///
    /// Names are the camel-case option names (`popupDelay`, `hideOnInsideClick`, ...).
    /// Booleans are true only for a case-insensitive `true`, except
    /// `restrictBounds`, which is true for any non-empty value.
    /// Delays are decimal seconds; a `timeout` of `-1` pins the popover open.
    /// Unknown names are ignored.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, PopoverError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut out = Self::default();
        for (name, value) in attrs {
            let text = || Some(value.to_string());
            match name {
                "angularEvent" => out.angular_event = text(),
                "scopeEvent" => out.scope_event = text(),
                "container" => out.container = text(),
                "group" => out.group = text(),
                "hideOnButtonClick" => out.hide_on_button_click = Some(to_boolean(value)),
                "hideOnInsideClick" => out.hide_on_inside_click = Some(to_boolean(value)),
                "hideOnOutsideClick" => out.hide_on_outside_click = Some(to_boolean(value)),
                "mouseRelative" => out.mouse_relative = Some(PointerTracking::from_axes(value)),
                "placement" => out.placement = text(),
                "plain" => out.plain = Some(to_boolean(value)),
                "popupDelay" => out.popup_delay = Some(parse_seconds(name, value)?),
                "restrictBounds" => out.restrict_bounds = Some(!value.is_empty()),
                "template" => out.template = text(),
                "theme" => out.theme = text(),
                "timeout" => {
                    out.timeout = Some(if value.trim() == "-1" {
                        HideDelay::Never
                    } else {
                        HideDelay::After(parse_seconds(name, value)?)
                    });
                }
                "trigger" => out.trigger = text(),
                "triggerPrevent" => out.trigger_prevent = Some(to_boolean(value)),
                _ => {}
            }
        }
        Ok(out)
    }

    /// Merge with `defaults` and parse the placement.
    pub fn resolve(&self, defaults: &PopoverDefaults) -> Result<PopoverConfig, PopoverError> {
        let placement_str = self.placement.as_deref().unwrap_or(&defaults.placement);
        let placement = PlacementSpec::parse(placement_str)?;

        let angular_event = self.angular_event.as_ref().or(defaults.angular_event.as_ref());
        let scope_event = self.scope_event.as_ref().or(defaults.scope_event.as_ref());
        let trigger = match (angular_event, scope_event) {
            (Some(name), _) => Trigger::RootEvent(name.clone()),
            (None, Some(name)) => Trigger::ScopeEvent(name.clone()),
            (None, None) => Trigger::Dom(
                self.trigger
                    .clone()
                    .unwrap_or_else(|| defaults.trigger.clone()),
            ),
        };

        let listeners = ListenerSet::from_toggles(
            self.hide_on_button_click
                .unwrap_or(defaults.hide_on_button_click),
            self.hide_on_inside_click
                .unwrap_or(defaults.hide_on_inside_click),
            self.hide_on_outside_click
                .unwrap_or(defaults.hide_on_outside_click),
        );

        Ok(PopoverConfig {
            trigger,
            container: self
                .container
                .clone()
                .unwrap_or_else(|| defaults.container.clone()),
            group: self.group.clone().filter(|g| !g.is_empty()),
            listeners,
            mouse_relative: self.mouse_relative.unwrap_or(defaults.mouse_relative),
            placement,
            plain: self.plain.unwrap_or(defaults.plain),
            popup_delay: self.popup_delay.unwrap_or(defaults.popup_delay),
            restrict_bounds: self.restrict_bounds.unwrap_or(defaults.restrict_bounds),
            template: self
                .template
                .clone()
                .unwrap_or_else(|| defaults.template.clone()),
            theme: self.theme.clone().unwrap_or_else(|| defaults.theme.clone()),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            trigger_prevent: self.trigger_prevent.unwrap_or(defaults.trigger_prevent),
        })
    }
}

fn to_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn parse_seconds(name: &str, value: &str) -> Result<Duration, PopoverError> {
    let invalid = || PopoverError::InvalidOption {
        name: String::from(name),
        value: String::from(value),
    };
    let secs: f64 = value.trim().parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}
