// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group membership for mutual exclusion.
//!
//! A registry is owned by one [`PopoverRoot`](crate::PopoverRoot) and dies with
//! it. Popovers without a group never appear here.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::types::PopoverId;

/// Group name to members, in registration order.
#[derive(Clone, Debug, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<String, Vec<PopoverId>>,
}

impl GroupRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to `group`. Registering twice is a no-op.
    pub fn register(&mut self, group: &str, id: PopoverId) {
        let members = self.groups.entry(String::from(group)).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Remove `id` from `group`, dropping the group once empty.
    pub fn unregister(&mut self, group: &str, id: PopoverId) {
        if let Some(members) = self.groups.get_mut(group) {
            members.retain(|m| *m != id);
            if members.is_empty() {
                self.groups.remove(group);
            }
        }
    }

    /// Members of `group` in registration order.
    pub fn members(&self, group: &str) -> &[PopoverId] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no popover is registered in any group.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
    }
}
