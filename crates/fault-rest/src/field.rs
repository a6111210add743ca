// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Invalid fields and named groups of them.

use std::error::Error as StdError;
use std::fmt;

use fault_core::chain;

// =============================================================================
// Field
// =============================================================================

/// A form field, struct field or any other key whose value is invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Field {
    /// The offending key.
    pub key: String,
    /// What is wrong with it.
    pub msg: String,
}

impl Field {
    /// Creates a field error.
    pub fn new(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// `true` when both key and message are empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.msg.is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.msg)
    }
}

impl StdError for Field {}

/// Reports whether a [`Field`] is anywhere in `err`'s chain.
pub fn is_field_error(err: &(dyn StdError + 'static)) -> bool {
    chain::find::<Field>(err).is_some()
}

// =============================================================================
// FieldGroup
// =============================================================================

/// A named set of invalid fields, such as one form or one struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGroup {
    /// Group name.
    pub name: String,
    /// Invalid fields, in insertion order.
    pub fields: Vec<Field>,
}

impl FieldGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends fields.
    pub fn add<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Field>,
    {
        self.fields.extend(items);
    }

    /// Appends one field built from a key and message.
    pub fn add_field(&mut self, key: impl Into<String>, msg: impl Into<String>) {
        self.fields.push(Field::new(key, msg));
    }

    /// Number of invalid fields.
    pub fn error_count(&self) -> usize {
        self.fields.len()
    }

    /// `true` when at least one field is invalid.
    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// `true` when `key` is among the invalid fields.
    pub fn has_error(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// The message of the first field named `key`, or `""`.
    pub fn message(&self, key: &str) -> &str {
        self.field(key).map_or("", |field| field.msg.as_str())
    }

    /// The first field named `key`.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return Ok(());
        }

        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str(")")
    }
}

impl StdError for FieldGroup {}

// =============================================================================
// Tests
// =============================================================================
