// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Group Integration Tests
//!
//! Completion order is nondeterministic, so these tests compare failures as
//! sets and check containment, never positions.
//!
//! - `test_group_*`: collection behaviour
//! - `test_config_*`: configuration loading and validation

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fault_core::{category, ConfigError, Group, GroupConfig};

use fault_tests::common::{init_test_logging, AggregateAssertions, StoreError, TaskFixtures};

// =============================================================================
// Group
// =============================================================================

#[test]
fn test_group_mixed_outcomes() {
    init_test_logging();

    let group = Group::new();
    group.go(|| Err(StoreError::refused())).unwrap();
    group.go(|| Ok::<(), StoreError>(())).unwrap();
    group.go(|| Err(StoreError::Constraint("uniq".into()))).unwrap();

    let errs = group.wait().unwrap();
    errs.assert_messages(&[
        "connection refused by db-primary",
        "constraint 'uniq' violated",
    ]);
}

#[test]
fn test_group_many_tasks() {
    init_test_logging();

    let group = Group::new();
    for id in 0..32 {
        group.go(TaskFixtures::odd_fails(id)).unwrap();
    }

    let errs = group.wait().unwrap();
    errs.assert_len(16);
    errs.assert_any_contains("task 31: timeout failure");
    assert!(category::is_timeout(&errs));
    assert_eq!(group.outstanding(), 0);
}

#[test]
fn test_group_all_succeed() {
    init_test_logging();

    let ran = Arc::new(AtomicUsize::new(0));
    let group = Group::new();
    for _ in 0..10 {
        let ran = Arc::clone(&ran);
        group
            .go(move || {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok::<(), StoreError>(())
            })
            .unwrap();
    }

    assert!(group.wait().is_none());
    assert_eq!(ran.load(Ordering::SeqCst), 10);
}

#[test]
fn test_group_result_is_usable_as_error() {
    init_test_logging();

    let group = Group::new();
    group.go(|| Err(category::not_found("invoice 9"))).unwrap();

    let outcome: Result<(), fault_core::Aggregate> = match group.wait() {
        Some(errs) => Err(errs),
        None => Ok(()),
    };
    let err = outcome.unwrap_err();
    assert_eq!(err.to_string(), "1 error occurred:\n\t* invoice 9: not found failure\n\n");
    assert!(category::is_not_found(&err));
}

#[test]
fn test_group_panic_reaches_waiter() {
    init_test_logging();

    let group = Group::new();
    group
        .go(|| -> Result<(), StoreError> { panic!("import aborted") })
        .unwrap();
    group.go(|| Err(StoreError::refused())).unwrap();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| group.wait()));
    let payload = outcome.expect_err("a panicked task must not look like success");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"import aborted"));

    let errs = group.wait().unwrap();
    errs.assert_len(1);
}

#[test]
fn test_group_configured() {
    init_test_logging();

    let config = GroupConfig::builder()
        .name("reindex")
        .thread_name_prefix("worker")
        .log_failures(false)
        .build();
    let group = Group::with_config(config).unwrap();

    for id in 0..4 {
        group
            .go(move || {
                let name = std::thread::current().name().unwrap_or_default().to_string();
                if name.starts_with("worker-reindex-") {
                    Err(category::ignore(format!("shard {}", id)))
                } else {
                    Err(category::invalid_state(name))
                }
            })
            .unwrap();
    }

    let errs = group.wait().unwrap();
    errs.assert_len(4);
    assert!(errs.iter().all(|e| category::is_ignore(&**e)));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_from_json() {
    let config: GroupConfig = serde_json::from_str(
        r#"{
            "name": "mailer",
            "thread_name_prefix": "mail",
            "stack_size": 262144
        }"#,
    )
    .unwrap();

    assert_eq!(config.name, "mailer");
    assert_eq!(config.stack_size, Some(262_144));
    assert!(config.log_failures);
    assert!(Group::with_config(config).is_ok());
}

#[test]
fn test_config_rejected() {
    let config: GroupConfig = serde_json::from_str(r#"{"stack_size": 64}"#).unwrap();
    let err = Group::with_config(config).unwrap_err();

    assert_eq!(err.field(), "stack_size");
    assert!(matches!(err, ConfigError::Validation { .. }));
}
