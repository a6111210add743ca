// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! A form-level collection of field groups with an HTTP status.
//!
//! ```text
//! Catalog "signup" (422)
//! ├── FieldGroup "account"  { email: is taken }
//! └── FieldGroup "profile"  { age: is negative, name: is empty }
//!
//! display: "signup: account(email: is taken), profile(age: is negative, name: is empty)"
//! ```
//!
//! Groups are kept ordered by name, so the display string and
//! [`Catalog::all_failures`] are deterministic.

use std::collections::btree_map::{self, BTreeMap};
use std::error::Error as StdError;
use std::fmt;

use crate::field::{Field, FieldGroup};
use crate::status;

/// Group name to field key to message.
pub type FailureMap = BTreeMap<String, BTreeMap<String, String>>;

// =============================================================================
// Catalog
// =============================================================================

/// Field groups collected for one form, with the status to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    status: u16,
    key: String,
    groups: BTreeMap<String, FieldGroup>,
}

impl Catalog {
    /// Creates an empty catalog answering `422 Unprocessable Entity`.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_status(key, status::UNPROCESSABLE_ENTITY)
    }

    /// Creates an empty catalog with a custom status. `0` means the default.
    pub fn with_status(key: impl Into<String>, status: u16) -> Self {
        Self {
            status: if status == 0 {
                status::UNPROCESSABLE_ENTITY
            } else {
                status
            },
            key: key.into(),
            groups: BTreeMap::new(),
        }
    }

    /// The form key.
    pub fn form_key(&self) -> &str {
        &self.key
    }

    /// Total number of invalid fields across all groups.
    pub fn error_count(&self) -> usize {
        self.groups.values().map(FieldGroup::error_count).sum()
    }

    /// The status to answer with.
    pub fn http_status(&self) -> u16 {
        self.status
    }

    /// Answer with `400 Bad Request`.
    pub fn mark_as_bad_request(&mut self) {
        self.status = status::BAD_REQUEST;
    }

    /// Answer with `422 Unprocessable Entity`.
    pub fn mark_as_unprocessable_entity(&mut self) {
        self.status = status::UNPROCESSABLE_ENTITY;
    }

    /// Sets the status to answer with.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Adds groups, replacing any existing group of the same name.
    pub fn add<I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = FieldGroup>,
    {
        for group in groups {
            self.groups.insert(group.name.clone(), group);
        }
    }

    /// Installs a fresh, empty group named `name` and returns it.
    ///
    /// An existing group of that name is discarded.
    pub fn add_new_group(&mut self, name: impl Into<String>) -> &mut FieldGroup {
        let name = name.into();
        let fresh = FieldGroup::new(name.clone());
        match self.groups.entry(name) {
            btree_map::Entry::Occupied(mut slot) => {
                slot.insert(fresh);
                slot.into_mut()
            }
            btree_map::Entry::Vacant(slot) => slot.insert(fresh),
        }
    }

    /// Adds a field to `group`, creating the group if needed.
    pub fn add_field(
        &mut self,
        group: impl Into<String>,
        key: impl Into<String>,
        msg: impl Into<String>,
    ) {
        let group = group.into();
        self.groups
            .entry(group.clone())
            .or_insert_with(|| FieldGroup::new(group))
            .add_field(key, msg);
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&FieldGroup> {
        self.groups.get(name)
    }

    /// Iterates over the groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &FieldGroup> + '_ {
        self.groups.values()
    }

    /// Looks up the first field named `key` in `group`.
    pub fn field(&self, group: &str, key: &str) -> Option<&Field> {
        self.groups.get(group).and_then(|g| g.field(key))
    }

    /// `true` when any group has an invalid field.
    pub fn has_errors(&self) -> bool {
        self.groups.values().any(FieldGroup::has_errors)
    }

    /// Every failure as group name to key to message.
    ///
    /// Groups without errors are left out. A key repeated within a group
    /// keeps its last message.
    pub fn all_failures(&self) -> FailureMap {
        self.groups
            .iter()
            .filter(|(_, group)| group.has_errors())
            .map(|(name, group)| {
                let fields = group
                    .fields
                    .iter()
                    .map(|field| (field.key.clone(), field.msg.clone()))
                    .collect();
                (name.clone(), fields)
            })
            .collect()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_errors() {
            return Ok(());
        }

        write!(f, "{}: ", self.key)?;
        let populated = self.groups.values().filter(|group| group.has_errors());
        for (i, group) in populated.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

impl StdError for Catalog {}

// =============================================================================
// Tests
// =============================================================================
