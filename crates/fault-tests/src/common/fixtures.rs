// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Realistic domain errors and task builders shared by the suites.

use std::sync::Arc;
use std::time::Duration;

use fault_core::{category, shared, Aggregate, Entry, SharedError, Wrapped};
use thiserror::Error;

// =============================================================================
// Domain Errors
// =============================================================================

/// A storage-layer error as a service would define it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The connection was refused.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Host that refused.
        host: String,
    },

    /// A row failed a constraint.
    #[error("constraint '{0}' violated")]
    Constraint(String),
}

impl StoreError {
    /// Connection refused by the primary database.
    pub fn refused() -> Self {
        Self::ConnectionRefused {
            host: "db-primary".to_string(),
        }
    }
}

// =============================================================================
// Error Fixtures
// =============================================================================

/// Fixture providing categorized errors.
pub struct ErrorFixtures;

impl ErrorFixtures {
    /// A validation failure for `field`.
    pub fn invalid(field: &str) -> Wrapped {
        category::validation(format!("{} is invalid", field))
    }

    /// A missing user.
    pub fn missing_user(id: u32) -> Wrapped {
        category::not_found(format!("user {}", id))
    }

    /// An aggregate of `count` validation failures named `field-<i>`.
    pub fn validation_batch(count: usize) -> Aggregate {
        fault_core::append(
            None::<Aggregate>,
            (0..count).map(|i| Entry::error(Self::invalid(&format!("field-{}", i)))),
        )
    }

    /// An aggregate nested `depth` levels deep, one failure per level.
    ///
    /// Built with `from_failures`, which keeps nested aggregates as-is.
    pub fn nested(depth: usize) -> Aggregate {
        let mut current = Aggregate::from_failures([shared(Self::invalid("level-0"))]);
        for level in 1..depth {
            let label = shared(Self::invalid(&format!("level-{}", level)));
            current = Aggregate::from_failures([label, Arc::new(current) as SharedError]);
        }
        current
    }
}

// =============================================================================
// Task Fixtures
// =============================================================================

/// Builds group tasks with predictable outcomes.
pub struct TaskFixtures;

impl TaskFixtures {
    /// A task that sleeps briefly, then fails with a timeout for odd ids.
    pub fn odd_fails(id: usize) -> impl FnOnce() -> Result<(), Wrapped> + Send + 'static {
        move || {
            std::thread::sleep(Duration::from_millis((id % 4) as u64));
            tracing::debug!(task = id, "fixture task running");
            if id % 2 == 1 {
                Err(category::timeout(format!("task {}", id)))
            } else {
                Ok(())
            }
        }
    }
}
