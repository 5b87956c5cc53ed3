// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popover root: owns every popover under one view-tree root.
//!
//! ## Overview
//!
//! [`PopoverRoot`] is the composition root. It owns each popover's resolved
//! configuration, panel element, visibility state machine, and dismissal
//! listeners, plus the [`GroupRegistry`] shared by popovers under this root.
//! Dropping or [clearing](PopoverRoot::clear) the root tears all of that down.
//!
//! ## Driving it
//!
//! - Call [`insert`](PopoverRoot::insert) when a host element declares a popover,
//!   and [`remove`](PopoverRoot::remove) when it leaves the view tree.
//! - Forward input: [`trigger`](PopoverRoot::trigger) for the configured DOM
//!   trigger, [`emit_root_event`](PopoverRoot::emit_root_event) /
//!   [`emit_scope_event`](PopoverRoot::emit_scope_event) for named events,
//!   [`click`](PopoverRoot::click) for document clicks, and
//!   [`pointer_moved`](PopoverRoot::pointer_moved) (or
//!   [`pointer_over`](PopoverRoot::pointer_over) /
//!   [`pointer_out`](PopoverRoot::pointer_out)) for hover.
//!   When a click on the trigger also raises the trigger event, forward the
//!   trigger first.
//! - Call [`poll`](PopoverRoot::poll) at or after
//!   [`next_deadline`](PopoverRoot::next_deadline). Timers only ever fire there.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::Point;
use understory_placement::{
    adjust_for_pointer, bounding_rect, clamp_to_container, place, pointer_offset,
};

use crate::config::{PopoverConfig, PopoverDefaults, PopoverError, PopoverOptions, Trigger};
use crate::dismissal::{Dismissal, ListenerSet};
use crate::group::GroupRegistry;
use crate::host::{Document, Surface, TemplateError, TemplateLoad, TemplateSource, load_template};
use crate::hover::{HoverEvent, HoverState};
use crate::types::{Disposition, HideDelay, PopoverEvent, PopoverId, TriggerEvent};
use crate::visibility::{Fired, Scheduler, VisibilityController, VisibilityState};

type Callback = Box<dyn FnMut(PopoverId)>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Content {
    /// Panel created but detached, waiting for its template.
    Pending,
    /// Content set, panel appended to its container and bound.
    Attached,
}

struct Popover<E> {
    generation: u32,
    config: PopoverConfig,
    trigger: E,
    panel: E,
    container: E,
    triangle: Option<E>,
    content: Content,
    visibility: VisibilityController,
    dismissal: Dismissal,
    disabled: bool,
    on_open: Option<Callback>,
    on_close: Option<Callback>,
}

/// All popovers under one view-tree root.
pub struct PopoverRoot<E: Copy + Eq> {
    slots: Vec<Option<Popover<E>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    groups: GroupRegistry,
    defaults: PopoverDefaults,
    scheduler: Scheduler,
    hover: HoverState<E>,
    panels_created: u32,
}

impl<E: Copy + Eq + fmt::Debug> fmt::Debug for PopoverRoot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        let open = self
            .slots
            .iter()
            .flatten()
            .filter(|p| p.visibility.is_open())
            .count();
        f.debug_struct("PopoverRoot")
            .field("popovers_alive", &alive)
            .field("popovers_open", &open)
            .field("groups", &self.groups.len())
            .field("next_deadline", &self.next_deadline())
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + fmt::Debug> Default for PopoverRoot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + fmt::Debug> PopoverRoot<E> {
    /// Create an empty root with stock defaults.
    pub fn new() -> Self {
        Self::with_defaults(PopoverDefaults::default())
    }

    /// Create an empty root with custom defaults.
    pub fn with_defaults(defaults: PopoverDefaults) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            groups: GroupRegistry::new(),
            defaults,
            scheduler: Scheduler::default(),
            hover: HoverState::new(),
            panels_created: 0,
        }
    }

    /// Defaults applied to popovers inserted from now on.
    pub fn defaults(&self) -> &PopoverDefaults {
        &self.defaults
    }

    /// Mutable access to the defaults. Existing popovers keep their configuration.
    pub fn defaults_mut(&mut self) -> &mut PopoverDefaults {
        &mut self.defaults
    }

    /// The group registry for this root.
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Attach a popover to `trigger`.
    ///
    /// Resolves `options` against the root defaults (failing fast on a bad
    /// placement), creates the detached panel, subscribes the DOM trigger, and
    /// starts loading the template. If the template is ready immediately the
    /// panel is attached and bound before this returns; otherwise that happens
    /// in [`resolve_template`](Self::resolve_template).
    pub fn insert<S, T>(
        &mut self,
        host: &mut S,
        templates: &mut T,
        trigger: E,
        options: &PopoverOptions,
    ) -> Result<PopoverId, PopoverError>
    where
        S: Surface<Element = E> + ?Sized,
        T: TemplateSource + ?Sized,
    {
        let config = options.resolve(&self.defaults)?;
        let id = self.allocate();

        self.panels_created += 1;
        let dom_id = format!("nspopover-{}", self.panels_created);
        let panel = host.create_panel(&dom_id, &config.placement.class_names());
        let container = host
            .find_container(&config.container)
            .unwrap_or_else(|| host.body());

        if let Trigger::Dom(event) = &config.trigger {
            host.subscribe_trigger(id, trigger, event);
        }
        if let Some(group) = &config.group {
            self.groups.register(group, id);
        }

        let load = load_template(templates, id, &config.template, config.plain);
        self.slots[id.idx()] = Some(Popover {
            generation: id.1,
            dismissal: Dismissal::new(config.listeners),
            config,
            trigger,
            panel,
            container,
            triangle: None,
            content: Content::Pending,
            visibility: VisibilityController::new(),
            disabled: false,
            on_open: None,
            on_close: None,
        });

        match load {
            TemplateLoad::Ready(markup) => self.attach_content(host, id, &markup),
            TemplateLoad::Pending => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "popover.template.pending", ?id);
            }
        }
        Ok(id)
    }

    /// Finish a template fetch started by [`insert`](Self::insert).
    ///
    /// Continuations for destroyed popovers, or for popovers whose content is
    /// already attached, are ignored. A failed fetch is logged and the panel is
    /// attached with blank content.
    pub fn resolve_template<S>(
        &mut self,
        host: &mut S,
        id: PopoverId,
        result: Result<String, TemplateError>,
    ) where
        S: Surface<Element = E> + ?Sized,
    {
        let pending = self
            .get(id)
            .is_some_and(|p| p.content == Content::Pending);
        if !pending {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "popover.template.stale", ?id);
            return;
        }
        let markup = result.unwrap_or_else(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(message = "popover.template.failed", ?id, error = %_err);
            String::new()
        });
        self.attach_content(host, id, &markup);
    }

    /// Destroy a popover: detach listeners, drop timers, unsubscribe its
    /// trigger, remove the panel, and leave its group.
    ///
    /// Returns false if `id` is stale. No close notification is emitted.
    pub fn remove<S>(&mut self, host: &mut S, id: PopoverId) -> bool
    where
        S: Surface<Element = E> + ?Sized,
    {
        if !self.is_alive(id) {
            return false;
        }
        let Some(mut p) = self.slots[id.idx()].take() else {
            return false;
        };
        p.dismissal.detach(host, id);
        if let Trigger::Dom(event) = &p.config.trigger {
            host.unsubscribe_trigger(id, p.trigger, event);
        }
        host.remove(p.panel);
        if let Some(group) = &p.config.group {
            self.groups.unregister(group, id);
        }
        self.free_list.push(id.idx());
        true
    }

    /// Destroy every popover under this root.
    pub fn clear<S>(&mut self, host: &mut S)
    where
        S: Surface<Element = E> + ?Sized,
    {
        for id in self.ids() {
            self.remove(host, id);
        }
        self.groups.clear();
        self.hover.reset();
    }

    /// Returns true if `id` refers to a live popover.
    pub fn is_alive(&self, id: PopoverId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live popovers.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if there are no live popovers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live popovers, in slot order.
    pub fn ids(&self) -> Vec<PopoverId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| Self::make_id(i, p.generation)))
            .collect()
    }

    /// Current state of a popover.
    pub fn state(&self, id: PopoverId) -> Option<VisibilityState> {
        self.get(id).map(|p| p.visibility.state())
    }

    /// Returns true while the panel is visible (including while a hide is pending).
    pub fn is_open(&self, id: PopoverId) -> bool {
        self.get(id).is_some_and(|p| p.visibility.is_open())
    }

    /// Resolved configuration of a popover.
    pub fn config(&self, id: PopoverId) -> Option<&PopoverConfig> {
        self.get(id).map(|p| &p.config)
    }

    /// The popover's panel element.
    pub fn panel(&self, id: PopoverId) -> Option<E> {
        self.get(id).map(|p| p.panel)
    }

    /// Returns true once the panel's content has been attached and bound.
    pub fn is_attached(&self, id: PopoverId) -> bool {
        self.get(id).is_some_and(|p| p.content == Content::Attached)
    }

    /// Dismissal listeners currently attached; empty while closed.
    pub fn attached_listeners(&self, id: PopoverId) -> Option<ListenerSet> {
        self.get(id).map(|p| p.dismissal.attached())
    }

    /// The element path last reported to [`pointer_moved`](Self::pointer_moved).
    pub fn hovered_path(&self) -> &[E] {
        self.hover.current_path()
    }

    /// Returns true if the last reported pointer path runs through the
    /// popover's trigger or panel.
    pub fn is_hovered(&self, id: PopoverId) -> bool {
        self.get(id)
            .is_some_and(|p| self.hover.contains(p.trigger) || self.hover.contains(p.panel))
    }

    /// Disable or re-enable opening. While disabled, `display` is a no-op.
    pub fn set_disabled(&mut self, id: PopoverId, disabled: bool) {
        if let Some(p) = self.get_mut(id) {
            p.disabled = disabled;
        }
    }

    /// Register a callback run each time the popover finishes opening.
    pub fn set_on_open(&mut self, id: PopoverId, f: impl FnMut(PopoverId) + 'static) {
        if let Some(p) = self.get_mut(id) {
            p.on_open = Some(Box::new(f));
        }
    }

    /// Register a callback run each time the popover finishes closing.
    pub fn set_on_close(&mut self, id: PopoverId, f: impl FnMut(PopoverId) + 'static) {
        if let Some(p) = self.get_mut(id) {
            p.on_close = Some(Box::new(f));
        }
    }

    /// The popover's configured trigger event fired.
    ///
    /// Cancels a pending hide and schedules a show after the popup delay.
    /// Returns whether the host should suppress the event's default action.
    pub fn trigger(&mut self, id: PopoverId, event: TriggerEvent, now: Duration) -> Disposition {
        let Some(p) = self.get_mut(id) else {
            return Disposition::Default;
        };
        p.visibility.cancel_hide();
        let prevent = p.config.trigger_prevent;
        self.display(id, event.pointer, now);
        if prevent {
            Disposition::PreventDefault
        } else {
            Disposition::Default
        }
    }

    /// A named event was broadcast across the root. Triggers every popover
    /// whose root event is `name`; returns how many.
    pub fn emit_root_event(&mut self, name: &str, event: TriggerEvent, now: Duration) -> usize {
        let targets: Vec<PopoverId> = self
            .ids()
            .into_iter()
            .filter(|&id| {
                self.get(id).is_some_and(|p| {
                    matches!(&p.config.trigger, Trigger::RootEvent(n) if n == name)
                })
            })
            .collect();
        for &id in &targets {
            self.trigger(id, event, now);
        }
        targets.len()
    }

    /// A named event was emitted on popover `id`'s own scope. Triggers it if
    /// its scope event is `name`.
    pub fn emit_scope_event(
        &mut self,
        id: PopoverId,
        name: &str,
        event: TriggerEvent,
        now: Duration,
    ) -> bool {
        let listens = self
            .get(id)
            .is_some_and(|p| matches!(&p.config.trigger, Trigger::ScopeEvent(n) if n == name));
        if listens {
            self.trigger(id, event, now);
        }
        listens
    }

    /// Schedule a show after the popover's popup delay.
    ///
    /// No-op while disabled. Otherwise closes the rest of the popover's group
    /// first, then (re)starts the show timer. If the popover is already
    /// visible, a pending hide is cancelled and nothing else happens.
    pub fn display(&mut self, id: PopoverId, pointer: Option<Point>, now: Duration) {
        let Some(p) = self.get(id) else {
            return;
        };
        if p.disabled {
            return;
        }
        let delay = p.config.popup_delay;
        if let Some(group) = p.config.group.clone() {
            self.broadcast_close(&group, now);
        }
        let at = self.scheduler.after(now, delay);
        if let Some(p) = self.get_mut(id) {
            p.visibility.display(at, pointer);
        }
    }

    /// Schedule a hide. [`HideDelay::Never`] cancels a pending hide instead.
    pub fn hide(&mut self, id: PopoverId, delay: HideDelay, now: Duration) {
        if !self.is_alive(id) {
            return;
        }
        let at = match delay {
            HideDelay::After(d) => Some(self.scheduler.after(now, d)),
            HideDelay::Never => None,
        };
        if let Some(p) = self.get_mut(id) {
            p.visibility.hide(at);
        }
    }

    /// Close a popover programmatically, without delay.
    pub fn hide_popover(&mut self, id: PopoverId, now: Duration) {
        self.hide(id, HideDelay::NOW, now);
    }

    /// Drop a pending show without side effects.
    pub fn cancel_show(&mut self, id: PopoverId) {
        if let Some(p) = self.get_mut(id) {
            p.visibility.cancel_show();
        }
    }

    /// Drop a pending hide without side effects.
    pub fn cancel_hide(&mut self, id: PopoverId) {
        if let Some(p) = self.get_mut(id) {
            p.visibility.cancel_hide();
        }
    }

    /// Ask every member of `group` to hide without delay, in registration
    /// order. Returns how many popovers were notified.
    pub fn broadcast_close(&mut self, group: &str, now: Duration) -> usize {
        let members = self.groups.members(group).to_vec();
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "popover.group.close", group, members = members.len());
        for &member in &members {
            self.hide(member, HideDelay::NOW, now);
        }
        members.len()
    }

    /// A click landed on `target` somewhere in the document.
    ///
    /// Every open popover with matching dismissal listeners schedules an
    /// immediate hide. Returns how many popovers were dismissed.
    pub fn click<D>(&mut self, doc: &D, target: E, now: Duration) -> usize
    where
        D: Document<Element = E> + ?Sized,
    {
        let dismissed: Vec<PopoverId> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let p = s.as_ref()?;
                let hit = p.visibility.is_open()
                    && p.dismissal.click_dismisses(doc, p.trigger, p.panel, target);
                hit.then(|| Self::make_id(i, p.generation))
            })
            .collect();
        for &id in &dismissed {
            self.hide_popover(id, now);
        }
        dismissed.len()
    }

    /// The pointer entered popover `id`'s trigger or panel.
    pub fn pointer_over(&mut self, id: PopoverId, _now: Duration) {
        if let Some(p) = self.get_mut(id)
            && p.dismissal.hovering()
        {
            p.visibility.cancel_hide();
        }
    }

    /// The pointer left popover `id`'s trigger or panel; re-arms the hover timeout.
    pub fn pointer_out(&mut self, id: PopoverId, now: Duration) {
        let Some(p) = self.get(id) else {
            return;
        };
        if p.dismissal.hovering() {
            let timeout = p.config.timeout;
            self.hide(id, timeout, now);
        }
    }

    /// The pointer now rests on `path` (root→target element chain).
    ///
    /// Leaving a trigger or panel behaves like [`pointer_out`](Self::pointer_out)
    /// and entering one like [`pointer_over`](Self::pointer_over).
    pub fn pointer_moved(&mut self, path: &[E], now: Duration) {
        for event in self.hover.update_path(path) {
            let (el, entered) = match event {
                HoverEvent::Enter(el) => (el, true),
                HoverEvent::Leave(el) => (el, false),
            };
            let owners: Vec<PopoverId> = self
                .ids()
                .into_iter()
                .filter(|&id| self.get(id).is_some_and(|p| p.trigger == el || p.panel == el))
                .collect();
            for id in owners {
                if entered {
                    self.pointer_over(id, now);
                } else {
                    self.pointer_out(id, now);
                }
            }
        }
    }

    /// Earliest pending show or hide deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots
            .iter()
            .flatten()
            .filter_map(|p| p.visibility.deadline())
            .min()
            .map(|at| at.due)
    }

    /// Fire every timer due at `now`, in deadline then scheduling order.
    ///
    /// Opening positions and reveals the panel, attaches dismissal listeners,
    /// and runs the open callback. Closing detaches listeners, hides the panel,
    /// and runs the close callback.
    pub fn poll<S>(&mut self, host: &mut S, now: Duration) -> Vec<PopoverEvent>
    where
        S: Surface<Element = E> + ?Sized,
    {
        let mut out = Vec::new();
        loop {
            let next = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(i, s)| {
                    let at = s.as_ref()?.visibility.deadline()?;
                    (at.due <= now).then_some((at, i))
                })
                .min();
            let Some((_, idx)) = next else {
                break;
            };
            let Some(p) = self.slots[idx].as_mut() else {
                break;
            };
            let id = Self::make_id(idx, p.generation);
            let Some(fired) = p.visibility.fire(now) else {
                break;
            };
            match fired {
                Fired::Show { pointer } => {
                    let position = Self::reveal(p, host, id, pointer);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(message = "popover.open", ?id, x = position.x, y = position.y);
                    if let Some(cb) = p.on_open.as_mut() {
                        cb(id);
                    }
                    out.push(PopoverEvent::Opened { id, position });
                }
                Fired::Hide => {
                    p.dismissal.detach(host, id);
                    host.set_visible(p.panel, false);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(message = "popover.close", ?id);
                    if let Some(cb) = p.on_close.as_mut() {
                        cb(id);
                    }
                    out.push(PopoverEvent::Closed { id });
                }
            }
        }
        out
    }

    // --- internals ---

    fn reveal<S>(p: &mut Popover<E>, host: &mut S, id: PopoverId, pointer: Option<Point>) -> Point
    where
        S: Surface<Element = E> + ?Sized,
    {
        host.set_visible(p.panel, true);

        let mut anchor = bounding_rect(host, p.trigger);
        if let Some(pointer) = pointer
            && !p.config.mouse_relative.is_empty()
        {
            anchor = adjust_for_pointer(anchor, p.config.mouse_relative, pointer);
        }

        // Measured after it becomes visible so the host can lay it out.
        let size = host.client_rect(p.panel).size();
        let mut position = place(size, p.config.placement, anchor);
        if p.config.restrict_bounds {
            let container = bounding_rect(host, p.container);
            position = clamp_to_container(position, size, container);
        }
        host.set_position(p.panel, position);
        if let Some(triangle) = p.triangle {
            let offset = pointer_offset(p.config.placement, anchor, position);
            host.set_triangle_offset(triangle, offset);
        }

        p.dismissal.attach(host, id);
        position
    }

    fn attach_content<S>(&mut self, host: &mut S, id: PopoverId, markup: &str)
    where
        S: Surface<Element = E> + ?Sized,
    {
        let Some(p) = self.get_mut(id) else {
            return;
        };
        host.set_content(p.panel, markup);
        if !p.config.theme.is_empty() {
            host.add_class(p.panel, &p.config.theme);
        }
        host.append(p.container, p.panel);
        host.bind(p.panel);
        p.triangle = host.find_triangle(p.panel);
        p.content = Content::Attached;
    }

    fn allocate(&mut self) -> PopoverId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        Self::make_id(idx, generation)
    }

    fn make_id(idx: usize, generation: u32) -> PopoverId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "PopoverId slots are indexed by u32."
        )]
        let idx = idx as u32;
        PopoverId::new(idx, generation)
    }

    fn get(&self, id: PopoverId) -> Option<&Popover<E>> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|p| p.generation == id.1)
    }

    fn get_mut(&mut self, id: PopoverId) -> Option<&mut Popover<E>> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|p| p.generation == id.1)
    }
}
