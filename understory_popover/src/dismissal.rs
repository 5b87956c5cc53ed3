// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissal rules: which clicks and pointer moves close an open popover.
//!
//! Listeners are attached as a set when a popover finishes opening and
//! detached as a set when it finishes closing (or is destroyed). Events that
//! arrive while a listener is detached are ignored.

use crate::host::{Document, Surface, is_within};
use crate::types::PopoverId;

bitflags::bitflags! {
    /// Dismissal listeners a popover can attach while open.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenerSet: u8 {
        /// Document clicks outside the trigger and the panel hide the popover.
        const OUTSIDE_CLICK = 0b0000_0001;
        /// Clicks inside the panel hide the popover.
        const INSIDE_CLICK  = 0b0000_0010;
        /// Clicking the trigger again hides the popover.
        const BUTTON_CLICK  = 0b0000_0100;
        /// Pointer leaving the trigger or panel re-arms the hover timeout.
        const HOVER         = 0b0000_1000;
    }
}

impl ListenerSet {
    /// Build the set from the three click toggles; hover is always on.
    pub fn from_toggles(button: bool, inside: bool, outside: bool) -> Self {
        let mut set = Self::HOVER;
        set.set(Self::BUTTON_CLICK, button);
        set.set(Self::INSIDE_CLICK, inside);
        set.set(Self::OUTSIDE_CLICK, outside);
        set
    }
}

/// Tracks which listeners are configured and which are currently attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Dismissal {
    enabled: ListenerSet,
    attached: ListenerSet,
}

impl Dismissal {
    pub(crate) fn new(enabled: ListenerSet) -> Self {
        Self {
            enabled,
            attached: ListenerSet::empty(),
        }
    }

    pub(crate) fn attached(&self) -> ListenerSet {
        self.attached
    }

    pub(crate) fn hovering(&self) -> bool {
        self.attached.contains(ListenerSet::HOVER)
    }

    pub(crate) fn attach<S: Surface + ?Sized>(&mut self, host: &mut S, id: PopoverId) {
        // Re-attaching replaces, never stacks.
        self.detach(host, id);
        self.attached = self.enabled;
        host.listen(id, self.attached);
    }

    pub(crate) fn detach<S: Surface + ?Sized>(&mut self, host: &mut S, id: PopoverId) {
        if self.attached.is_empty() {
            return;
        }
        host.unlisten(id, self.attached);
        self.attached = ListenerSet::empty();
    }

    /// Returns true if a click on `target` should hide the popover.
    ///
    /// Button clicks include clicks bubbling up from the trigger's descendants.
    /// Only the trigger itself and the panel subtree are exempt from the
    /// outside-click check.
    pub(crate) fn click_dismisses<D: Document + ?Sized>(
        &self,
        doc: &D,
        trigger: D::Element,
        panel: D::Element,
        target: D::Element,
    ) -> bool {
        let on = |set| self.attached.contains(set);
        if on(ListenerSet::BUTTON_CLICK) && is_within(doc, target, trigger) {
            return true;
        }
        if is_within(doc, target, panel) {
            return on(ListenerSet::INSIDE_CLICK);
        }
        target != trigger && on(ListenerSet::OUTSIDE_CLICK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};
    use understory_placement::{ElementGeometry, TriangleOffset};

    // 1 = body, 2 = trigger, 3 = panel, 4 = panel child, 5 = elsewhere, 6 = trigger child
    #[derive(Default)]
    struct Host {
        calls: Vec<(bool, ListenerSet)>,
    }

    impl ElementGeometry for Host {
        type Element = u32;
        fn client_rect(&self, _element: u32) -> Rect {
            Rect::ZERO
        }
    }

    impl Document for Host {
        fn parent_of(&self, element: u32) -> Option<u32> {
            match element {
                4 => Some(3),
                6 => Some(2),
                2 | 3 | 5 => Some(1),
                _ => None,
            }
        }
        fn find_container(&self, _selector: &str) -> Option<u32> {
            None
        }
        fn body(&self) -> u32 {
            1
        }
        fn find_triangle(&self, _panel: u32) -> Option<u32> {
            None
        }
    }

    impl Surface for Host {
        fn create_panel(&mut self, _dom_id: &str, _classes: &[alloc::string::String]) -> u32 {
            3
        }
        fn set_content(&mut self, _panel: u32, _markup: &str) {}
        fn add_class(&mut self, _panel: u32, _class: &str) {}
        fn append(&mut self, _container: u32, _panel: u32) {}
        fn bind(&mut self, _panel: u32) {}
        fn remove(&mut self, _panel: u32) {}
        fn set_visible(&mut self, _panel: u32, _visible: bool) {}
        fn set_position(&mut self, _panel: u32, _position: Point) {}
        fn set_triangle_offset(&mut self, _triangle: u32, _offset: TriangleOffset) {}
        fn listen(&mut self, _id: PopoverId, listeners: ListenerSet) {
            self.calls.push((true, listeners));
        }
        fn unlisten(&mut self, _id: PopoverId, listeners: ListenerSet) {
            self.calls.push((false, listeners));
        }
    }

    const ID: PopoverId = PopoverId::new(0, 1);

    #[test]
    fn toggles_map_to_listeners() {
        let set = ListenerSet::from_toggles(true, false, true);
        assert_eq!(
            set,
            ListenerSet::HOVER | ListenerSet::BUTTON_CLICK | ListenerSet::OUTSIDE_CLICK
        );
        assert_eq!(ListenerSet::from_toggles(false, false, false), ListenerSet::HOVER);
    }

    #[test]
    fn detached_listeners_ignore_clicks() {
        let host = Host::default();
        let d = Dismissal::new(ListenerSet::all());
        for target in [2, 3, 4, 5, 6] {
            assert!(!d.click_dismisses(&host, 2, 3, target));
        }
    }

    #[test]
    fn click_classification() {
        let mut host = Host::default();
        let mut d = Dismissal::new(ListenerSet::from_toggles(true, false, true));
        d.attach(&mut host, ID);
        assert!(d.click_dismisses(&host, 2, 3, 2), "button click");
        assert!(!d.click_dismisses(&host, 2, 3, 3), "inside click disabled");
        assert!(!d.click_dismisses(&host, 2, 3, 4), "descendant counts as inside");
        assert!(d.click_dismisses(&host, 2, 3, 5), "outside click");
        assert!(d.click_dismisses(&host, 2, 3, 1), "body is outside");

        let mut d = Dismissal::new(ListenerSet::from_toggles(false, true, false));
        d.attach(&mut host, ID);
        assert!(!d.click_dismisses(&host, 2, 3, 2));
        assert!(d.click_dismisses(&host, 2, 3, 4));
        assert!(!d.click_dismisses(&host, 2, 3, 5));
    }

    #[test]
    fn trigger_descendants_count_as_button_clicks() {
        let mut host = Host::default();
        let mut d = Dismissal::new(ListenerSet::from_toggles(true, false, false));
        d.attach(&mut host, ID);
        assert!(d.click_dismisses(&host, 2, 3, 6), "icon inside the trigger");
        assert!(!d.click_dismisses(&host, 2, 3, 5));

        // Without the button listener, a trigger child is an outside click but the trigger is not.
        let mut d = Dismissal::new(ListenerSet::from_toggles(false, false, true));
        d.attach(&mut host, ID);
        assert!(d.click_dismisses(&host, 2, 3, 6));
        assert!(!d.click_dismisses(&host, 2, 3, 2));
    }

    #[test]
    fn attach_and_detach_are_balanced() {
        let mut host = Host::default();
        let mut d = Dismissal::new(ListenerSet::from_toggles(true, true, true));
        d.attach(&mut host, ID);
        d.attach(&mut host, ID);
        d.detach(&mut host, ID);
        d.detach(&mut host, ID);
        assert_eq!(host.calls.iter().filter(|(on, _)| *on).count(), 2);
        assert_eq!(host.calls.iter().filter(|(on, _)| !*on).count(), 2);
        assert!(d.attached().is_empty());
        assert!(!d.hovering());
    }
}
