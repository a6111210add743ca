// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Multi-error aggregation.
//!
//! An [`Aggregate`] collects independent failures (from a multi-step
//! validation, a batch, or a [`Group`](crate::group::Group) of tasks) into a
//! single error value.
//!
//! - **Append**: [`append`] tolerates a missing starting aggregate, skips
//!   empty entries and splices nested aggregates one level deep
//! - **Format**: a pluggable [`FormatFn`], defaulting to [`list_format`]
//! - **Introspection**: `source()` yields a [`Chain`] over the failures, so
//!   [`chain::is`](crate::chain::is) and [`chain::find`](crate::chain::find)
//!   reach every member
//! - **Flatten**: [`flatten`] inlines nested aggregates at any depth
//!
//! # Example
//!
//! ```
//! use fault_core::aggregate::{append, Aggregate, Entry};
//! use fault_core::category;
//!
//! let mut errs = Aggregate::new();
//! errs.push(category::validation("name is empty"));
//! errs.push(category::validation("age is negative"));
//!
//! let errs = append(errs, [Entry::error(category::not_found("user 7"))]);
//! assert_eq!(errs.len(), 3);
//! assert!(category::is_not_found(&errs));
//!
//! let result = errs.into_result();
//! assert!(result.is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::chain::Chain;
use crate::error::{shared, SharedError};

// =============================================================================
// Formatting
// =============================================================================

/// Renders a failure list as a display string.
pub type FormatFn = Arc<dyn Fn(&[SharedError]) -> String + Send + Sync>;

/// The default formatter: a count line followed by one bullet per failure.
///
/// ```text
/// 2 errors occurred:
/// \t* foo
/// \t* bar
///
/// ```
pub fn list_format(failures: &[SharedError]) -> String {
    if let [only] = failures {
        return format!("1 error occurred:\n\t* {}\n\n", only);
    }

    let points: Vec<String> = failures.iter().map(|err| format!("* {}", err)).collect();

    format!(
        "{} errors occurred:\n\t{}\n\n",
        failures.len(),
        points.join("\n\t")
    )
}

// =============================================================================
// Aggregate
// =============================================================================

/// Zero or more independent failures presented as one error.
///
/// Insertion order is both the display order and the order in which cause
/// chain queries visit the failures. An empty aggregate means "no error";
/// convert with [`Aggregate::error_or_none`] or [`Aggregate::into_result`]
/// before handing it to a caller.
pub struct Aggregate {
    failures: Vec<SharedError>,
    formatter: Option<FormatFn>,
    chain: OnceLock<Option<Chain>>,
}

impl Aggregate {
    /// Creates an empty aggregate with the default formatter.
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
            formatter: None,
            chain: OnceLock::new(),
        }
    }

    /// Wraps an existing ordered list of failures verbatim.
    ///
    /// Nested aggregates are kept as single failures; see [`flatten`].
    pub fn from_failures<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = SharedError>,
    {
        Self {
            failures: failures.into_iter().collect(),
            formatter: None,
            chain: OnceLock::new(),
        }
    }

    /// Replaces the formatter.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&[SharedError]) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets (or clears, with `None`) a shared formatter.
    pub fn set_formatter(&mut self, formatter: Option<FormatFn>) {
        self.formatter = formatter;
    }

    /// Returns the custom formatter, if one is set.
    pub fn formatter(&self) -> Option<&FormatFn> {
        self.formatter.as_ref()
    }

    /// Appends one error.
    ///
    /// An [`Aggregate`] argument has its failures spliced in rather than
    /// being nested.
    pub fn push<E>(&mut self, err: E)
    where
        E: StdError + Send + Sync + 'static,
    {
        self.push_shared(shared(err));
    }

    /// Appends one already shared error, splicing it if it is an aggregate.
    pub fn push_shared(&mut self, err: SharedError) {
        match err.downcast_ref::<Aggregate>() {
            Some(nested) => self.failures.extend(nested.failures.iter().cloned()),
            None => self.failures.push(err),
        }
        self.invalidate();
    }

    /// Appends an [`Entry`].
    pub fn push_entry(&mut self, entry: Entry) {
        match entry {
            Entry::Empty => {}
            Entry::Single(err) => self.push_shared(err),
            Entry::Many(mut other) => {
                self.failures.append(&mut other.failures);
                self.invalidate();
            }
        }
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` when nothing has failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failure list in insertion order.
    pub fn wrapped_failures(&self) -> &[SharedError] {
        &self.failures
    }

    /// Iterates over the failures.
    pub fn iter(&self) -> std::slice::Iter<'_, SharedError> {
        self.failures.iter()
    }

    /// Consumes the aggregate, returning its failures.
    pub fn into_failures(self) -> Vec<SharedError> {
        self.failures
    }

    /// Returns `None` when empty, the aggregate otherwise.
    pub fn error_or_none(self) -> Option<Self> {
        if self.failures.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Returns `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        match self.error_or_none() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Single-step unwrap as an owned value.
    ///
    /// No failures gives `None`, exactly one gives that failure, and two or
    /// more give a [`Chain`] snapshot that later appends do not affect.
    pub fn unwrapped(&self) -> Option<SharedError> {
        match self.failures.as_slice() {
            [] => None,
            [only] => Some(Arc::clone(only)),
            many => Chain::from_failures(many).map(|chain| Arc::new(chain) as SharedError),
        }
    }

    /// Sorts the failures by display string. Equal strings keep their order.
    pub fn sort(&mut self) {
        self.failures.sort_by_cached_key(|err| err.to_string());
        self.invalidate();
    }

    /// Returns a new aggregate with every nested aggregate inlined,
    /// depth-first and left to right.
    pub fn flattened(&self) -> Aggregate {
        let mut flat = Vec::with_capacity(self.failures.len());
        let mut pending = vec![self.failures.iter()];

        while let Some(level) = pending.last_mut() {
            match level.next() {
                Some(err) => match err.downcast_ref::<Aggregate>() {
                    Some(nested) => pending.push(nested.failures.iter()),
                    None => flat.push(Arc::clone(err)),
                },
                None => {
                    pending.pop();
                }
            }
        }

        Aggregate::from_failures(flat)
    }

    fn invalidate(&mut self) {
        self.chain = OnceLock::new();
    }
}

impl Default for Aggregate {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Aggregate {
    fn clone(&self) -> Self {
        Self {
            failures: self.failures.clone(),
            formatter: self.formatter.clone(),
            chain: OnceLock::new(),
        }
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("failures", &self.failures)
            .field("custom_formatter", &self.formatter.is_some())
            .finish()
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match &self.formatter {
            Some(formatter) => formatter(&self.failures),
            None => list_format(&self.failures),
        };
        f.write_str(&rendered)
    }
}

impl StdError for Aggregate {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.failures.as_slice() {
            [] => None,
            [only] => Some(&**only as &(dyn StdError + 'static)),
            many => self
                .chain
                .get_or_init(|| Chain::from_failures(many))
                .as_ref()
                .map(|chain| chain as &(dyn StdError + 'static)),
        }
    }
}

impl Extend<SharedError> for Aggregate {
    fn extend<I: IntoIterator<Item = SharedError>>(&mut self, iter: I) {
        for err in iter {
            self.push_shared(err);
        }
    }
}

impl FromIterator<SharedError> for Aggregate {
    fn from_iter<I: IntoIterator<Item = SharedError>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        aggregate.extend(iter);
        aggregate
    }
}

impl<'a> IntoIterator for &'a Aggregate {
    type Item = &'a SharedError;
    type IntoIter = std::slice::Iter<'a, SharedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// Builds an aggregate from a list, optionally with a custom formatter.
pub fn multiple(failures: Vec<SharedError>, formatter: Option<FormatFn>) -> Aggregate {
    let mut aggregate = Aggregate::from_failures(failures);
    aggregate.set_formatter(formatter);
    aggregate
}

// =============================================================================
// Entry
// =============================================================================

/// One argument to [`append`]: nothing, a single error, or an aggregate.
#[derive(Debug, Clone, Default)]
pub enum Entry {
    /// No error; skipped.
    #[default]
    Empty,
    /// A single error. If its concrete type is [`Aggregate`] it is still
    /// spliced.
    Single(SharedError),
    /// An aggregate whose failures are spliced.
    Many(Aggregate),
}

impl Entry {
    /// Creates an entry from any error value.
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Entry::Single(shared(err))
    }

    /// Creates an entry from an optional error (`None` becomes [`Entry::Empty`]).
    pub fn optional<E>(err: Option<E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        err.map_or(Entry::Empty, Entry::error)
    }

    /// Creates an entry from the error side of a result.
    pub fn from_result<T, E>(result: Result<T, E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Entry::optional(result.err())
    }
}

impl From<SharedError> for Entry {
    fn from(err: SharedError) -> Self {
        Entry::Single(err)
    }
}

impl From<Option<SharedError>> for Entry {
    fn from(err: Option<SharedError>) -> Self {
        err.map_or(Entry::Empty, Entry::Single)
    }
}

impl From<Aggregate> for Entry {
    fn from(aggregate: Aggregate) -> Self {
        Entry::Many(aggregate)
    }
}

impl From<Option<Aggregate>> for Entry {
    fn from(aggregate: Option<Aggregate>) -> Self {
        aggregate.map_or(Entry::Empty, Entry::Many)
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Appends `additional` to `existing`, returning the resulting aggregate.
///
/// - an absent `existing` (empty entry or `None` aggregate) starts a fresh
///   aggregate
/// - a single error becomes the first failure of a fresh aggregate, unless it
///   is itself an aggregate, which is continued (formatter included)
/// - each additional aggregate is spliced one level deep, empty entries are
///   skipped, anything else is appended as one failure
pub fn append<I>(existing: impl Into<Entry>, additional: I) -> Aggregate
where
    I: IntoIterator,
    I::Item: Into<Entry>,
{
    let mut aggregate = match existing.into() {
        Entry::Empty => Aggregate::new(),
        Entry::Many(aggregate) => aggregate,
        Entry::Single(err) => match err.downcast_ref::<Aggregate>() {
            Some(continued) => continued.clone(),
            None => Aggregate::from_failures([err]),
        },
    };

    for entry in additional {
        aggregate.push_entry(entry.into());
    }
    aggregate
}

/// Inlines nested aggregates.
///
/// A non-aggregate error is returned unchanged (the same allocation). An
/// aggregate yields a new, flat aggregate with the default formatter; the
/// input is not modified.
pub fn flatten(err: SharedError) -> SharedError {
    match err.downcast_ref::<Aggregate>() {
        Some(aggregate) => Arc::new(aggregate.flattened()) as SharedError,
        None => err,
    }
}

/// Reports whether `err`, or its immediate cause, is an [`Aggregate`].
pub fn is_aggregate(err: &(dyn StdError + 'static)) -> bool {
    err.is::<Aggregate>() || err.source().is_some_and(|cause| cause.is::<Aggregate>())
}

/// Returns the failures of `err` when it is itself an [`Aggregate`].
pub fn failures_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a [SharedError]> {
    err.downcast_ref::<Aggregate>()
        .map(Aggregate::wrapped_failures)
}

// =============================================================================
// Optional aggregates
// =============================================================================

/// Accessors that treat a missing aggregate as an empty one.
pub trait AggregateExt {
    /// The failures, or an empty slice.
    fn wrapped_failures(&self) -> &[SharedError];

    /// `None` when missing or empty.
    fn error_or_none(self) -> Option<Aggregate>;

    /// Single-step unwrap; `None` when missing.
    fn unwrapped(&self) -> Option<SharedError>;
}

impl AggregateExt for Option<Aggregate> {
    fn wrapped_failures(&self) -> &[SharedError] {
        match self {
            Some(aggregate) => aggregate.wrapped_failures(),
            None => &[],
        }
    }

    fn error_or_none(self) -> Option<Aggregate> {
        self.and_then(Aggregate::error_or_none)
    }

    fn unwrapped(&self) -> Option<SharedError> {
        self.as_ref().and_then(Aggregate::unwrapped)
    }
}

// =============================================================================
// Tests
// =============================================================================
