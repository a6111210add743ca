// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers with failure messages that show the offending error.

use std::collections::BTreeSet;
use std::error::Error as StdError;

use fault_core::{Aggregate, Category};

// =============================================================================
// Aggregate Assertions
// =============================================================================

/// Assertion extensions for [`Aggregate`].
pub trait AggregateAssertions {
    /// Assert the number of failures.
    fn assert_len(&self, expected: usize);

    /// Assert that the failures' display strings are exactly `expected`,
    /// ignoring order.
    fn assert_messages(&self, expected: &[&str]);

    /// Assert that some failure's display string contains `needle`.
    fn assert_any_contains(&self, needle: &str);
}

impl AggregateAssertions for Aggregate {
    fn assert_len(&self, expected: usize) {
        assert_eq!(
            self.len(),
            expected,
            "Expected {} failures, got {}:\n{}",
            expected,
            self.len(),
            self
        );
    }

    fn assert_messages(&self, expected: &[&str]) {
        let actual: BTreeSet<String> = self.iter().map(|e| e.to_string()).collect();
        let expected: BTreeSet<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(actual, expected, "Failure messages differ for:\n{}", self);
    }

    fn assert_any_contains(&self, needle: &str) {
        assert!(
            self.iter().any(|e| e.to_string().contains(needle)),
            "No failure contains {:?}:\n{}",
            needle,
            self
        );
    }
}

// =============================================================================
// Category Assertions
// =============================================================================

/// Assert that `err` is tagged with `category` and with no other category.
pub fn assert_only_category(err: &(dyn StdError + 'static), category: Category) {
    for other in Category::ALL {
        assert_eq!(
            other.matches(err),
            other == category,
            "{:?} check was wrong for error: {}",
            other,
            err
        );
    }
}
