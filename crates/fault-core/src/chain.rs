// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cause-chain queries.
//!
//! Every error exposes its immediate cause through
//! [`std::error::Error::source`]. On top of that single-step unwrap this
//! module provides the two searches callers actually need:
//!
//! - [`is`] / [`is_same`]: identity search ("is this error, or anything it
//!   wraps, equal to `target`?")
//! - [`find`]: type extraction ("give me the first `T` in the chain")
//!
//! Both understand [`Chain`], the view an
//! [`Aggregate`](crate::aggregate::Aggregate) hands out from `source()` when it
//! holds two or more failures. At a chain node the search descends into the
//! node's head (and everything the head wraps) before moving on to the next
//! node, so every failure of an aggregate is reachable in insertion order.
//!
//! ```text
//! Aggregate[a, b, c]
//!     │ source()
//!     ▼
//!   Chain(a) ──source()──▶ Chain(b) ──source()──▶ Chain(c) ──▶ None
//!     │                      │                      │
//!     ▼ head                 ▼ head                 ▼ head
//!     a ─▶ a's causes        b ─▶ b's causes        c ─▶ c's causes
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::SharedError;

// =============================================================================
// Chain
// =============================================================================

/// A read-only view over "the remaining failures starting at index i".
///
/// A chain is never empty. Its display string is the head's, and its
/// `source()` is the chain over the following failures (or `None` at the last
/// one). Nodes hold shallow copies of the failures, so a chain produced from
/// an aggregate does not observe later appends to that aggregate.
#[derive(Debug)]
pub struct Chain {
    head: SharedError,
    rest: Option<Box<Chain>>,
}

impl Chain {
    /// Builds a chain over `failures`, or `None` if the slice is empty.
    pub fn from_failures(failures: &[SharedError]) -> Option<Self> {
        failures.iter().rev().fold(None, |rest, head| {
            Some(Chain {
                head: Arc::clone(head),
                rest: rest.map(Box::new),
            })
        })
    }

    /// Returns the failure this node represents.
    pub fn head(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.head
    }

    /// Returns the chain over the remaining failures.
    pub fn rest(&self) -> Option<&Chain> {
        self.rest.as_deref()
    }

    /// Number of failures from this node to the end.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always `false`; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the failures from this node to the end.
    pub fn iter(&self) -> impl Iterator<Item = &SharedError> + '_ {
        std::iter::successors(Some(self), |node| node.rest()).map(|node| &node.head)
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse on drop.
        let mut rest = self.rest.take();
        while let Some(mut node) = rest {
            rest = node.rest.take();
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.head, f)
    }
}

impl StdError for Chain {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.rest
            .as_deref()
            .map(|next| next as &(dyn StdError + 'static))
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Iterator over an error and each of its successive `source()`s.
///
/// This is the plain single-step walk; it does not descend into chain heads.
/// Use [`is`] or [`find`] for aggregate-aware searches.
pub struct Causes<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walks `err` and its sources.
pub fn causes<'a>(err: &'a (dyn StdError + 'static)) -> Causes<'a> {
    Causes { next: Some(err) }
}

/// Returns the first node (depth-first through chain heads) accepted by
/// `accept`.
fn search<'a>(
    err: &'a (dyn StdError + 'static),
    accept: &mut dyn FnMut(&(dyn StdError + 'static)) -> bool,
) -> Option<&'a (dyn StdError + 'static)> {
    let mut current = Some(err);
    while let Some(node) = current {
        if let Some(chain) = node.downcast_ref::<Chain>() {
            if let Some(hit) = search(chain.head(), accept) {
                return Some(hit);
            }
        } else if accept(node) {
            return Some(node);
        }
        current = node.source();
    }
    None
}

/// Reports whether `err`, or anything in its cause chain, equals `target`.
///
/// Equality is `T`'s `PartialEq`, checked only against nodes whose concrete
/// type is `T`.
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    search(err, &mut |node| node.downcast_ref::<T>() == Some(target)).is_some()
}

/// Reports whether the very value `target` (compared by address) appears in
/// the cause chain of `err`.
pub fn is_same(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    let wanted = target as *const dyn StdError as *const ();
    search(err, &mut |node| {
        std::ptr::eq(node as *const dyn StdError as *const (), wanted)
    })
    .is_some()
}

/// Returns the first `T` in the cause chain of `err`.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    search(err, &mut |node| node.is::<T>()).and_then(|node| node.downcast_ref::<T>())
}

// =============================================================================
// Tests
// =============================================================================
