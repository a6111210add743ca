// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Aggregate Integration Tests
//!
//! - `test_append_*`: building aggregates from mixed inputs
//! - `test_format_*`: default and custom formatting
//! - `test_flatten_*`: inlining nested aggregates
//! - `test_search_*`: category, identity and type search across members

use std::error::Error as StdError;
use std::sync::Arc;

use fault_core::{
    append, category, chain, failures_of, flatten, is_aggregate, multiple, shared, wrap,
    Aggregate, AggregateExt, Chain, Entry, ErrorContext, FormatFn, SharedError,
};

use fault_tests::common::{AggregateAssertions, ErrorFixtures, StoreError};

// =============================================================================
// Append
// =============================================================================

#[test]
fn test_append_collects_validation_run() {
    let mut errs: Option<Aggregate> = None;

    for field in ["name", "email", "age"] {
        errs = Some(append(errs, [Entry::error(ErrorFixtures::invalid(field))]));
    }

    let errs = errs.error_or_none().unwrap();
    errs.assert_len(3);
    errs.assert_messages(&[
        "name is invalid: validation failure",
        "email is invalid: validation failure",
        "age is invalid: validation failure",
    ]);
}

#[test]
fn test_append_from_plain_error() {
    let first = shared(StoreError::refused());
    let errs = append(first, [Entry::error(StoreError::Constraint("uniq_email".into()))]);

    errs.assert_len(2);
    assert_eq!(errs.wrapped_failures()[0].to_string(), "connection refused by db-primary");
    assert_eq!(errs.wrapped_failures()[1].to_string(), "constraint 'uniq_email' violated");
}

#[test]
fn test_append_results_skip_successes() {
    let outcomes: Vec<Result<(), StoreError>> = vec![
        Ok(()),
        Err(StoreError::refused()),
        Ok(()),
        Err(StoreError::Constraint("fk_user".into())),
    ];

    let errs = append(None::<Aggregate>, outcomes.into_iter().map(Entry::from_result));
    errs.assert_len(2);

    let clean = append(None::<Aggregate>, [Ok::<(), StoreError>(())].map(Entry::from_result));
    assert!(clean.error_or_none().is_none());
}

#[test]
fn test_append_splices_batches() {
    let batch = ErrorFixtures::validation_batch(3);
    let errs = append(
        Entry::error(ErrorFixtures::missing_user(1)),
        [Entry::from(batch), Entry::error(ErrorFixtures::missing_user(2))],
    );

    errs.assert_len(5);
    assert!(errs.iter().all(|e| !is_aggregate(&**e)));
}

#[test]
fn test_append_absent_aggregate_helpers() {
    let absent: Option<Aggregate> = None;
    assert!(absent.wrapped_failures().is_empty());
    assert!(absent.unwrapped().is_none());
    assert!(absent.error_or_none().is_none());
}

// =============================================================================
// Format
// =============================================================================

#[test]
fn test_format_default() {
    let errs = append(
        None::<Aggregate>,
        [
            Entry::error(StoreError::Constraint("a".into())),
            Entry::error(StoreError::Constraint("b".into())),
        ],
    );

    assert_eq!(
        errs.to_string(),
        "2 errors occurred:\n\t* constraint 'a' violated\n\t* constraint 'b' violated\n\n"
    );
}

#[test]
fn test_format_custom_survives_append() {
    let semicolons: FormatFn = Arc::new(|failures: &[SharedError]| {
        failures
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    });

    let errs = multiple(vec![shared(StoreError::refused())], Some(semicolons));
    let errs = append(errs, [Entry::error(StoreError::Constraint("pk".into()))]);

    assert_eq!(
        errs.to_string(),
        "connection refused by db-primary; constraint 'pk' violated"
    );
}

#[test]
fn test_format_inside_wrapping() {
    let errs = ErrorFixtures::validation_batch(2);
    let result: Result<(), Aggregate> = errs.into_result();
    let err = result.context("create user").unwrap_err();

    assert!(err.to_string().starts_with("create user: 2 errors occurred:\n\t* "));
}

// =============================================================================
// Flatten
// =============================================================================

#[test]
fn test_flatten_deep_nesting() {
    let nested = ErrorFixtures::nested(4);
    assert_eq!(nested.len(), 2);

    let flat = nested.flattened();
    flat.assert_len(4);
    flat.assert_messages(&[
        "level-0 is invalid: validation failure",
        "level-1 is invalid: validation failure",
        "level-2 is invalid: validation failure",
        "level-3 is invalid: validation failure",
    ]);
    assert_eq!(nested.len(), 2);
}

#[test]
fn test_flatten_shared_values() {
    let plain = shared(StoreError::refused());
    assert!(Arc::ptr_eq(&flatten(Arc::clone(&plain)), &plain));

    let nested: SharedError = Arc::new(ErrorFixtures::nested(3));
    let flat = flatten(nested);
    assert_eq!(failures_of(&*flat).map(<[SharedError]>::len), Some(3));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_category_in_any_member() {
    let errs = append(
        None::<Aggregate>,
        [
            Entry::error(StoreError::refused()),
            Entry::error(wrap(ErrorFixtures::missing_user(5), "load profile")),
        ],
    );

    assert!(category::is_not_found(&errs));
    assert!(!category::is_validation(&errs));
}

#[test]
fn test_search_by_value_and_type() {
    let errs = append(
        None::<Aggregate>,
        [
            Entry::error(category::system("cpu")),
            Entry::error(wrap(StoreError::Constraint("uniq".into()), "insert")),
        ],
    );

    assert!(chain::is(&errs, &StoreError::Constraint("uniq".into())));
    assert!(!chain::is(&errs, &StoreError::refused()));
    assert_eq!(
        chain::find::<StoreError>(&errs),
        Some(&StoreError::Constraint("uniq".into()))
    );
}

#[test]
fn test_search_chain_snapshot() {
    let mut errs = ErrorFixtures::validation_batch(2);
    let snapshot = errs.unwrapped().unwrap();
    errs.push(StoreError::refused());

    let chain = snapshot.downcast_ref::<Chain>().unwrap();
    assert_eq!(chain.len(), 2);
    assert!(chain::find::<StoreError>(&*snapshot).is_none());
    assert!(chain::find::<StoreError>(&errs).is_some());
}

#[test]
fn test_search_source_walk() {
    let errs = ErrorFixtures::validation_batch(3);
    let first = errs.source().unwrap();
    assert_eq!(first.to_string(), "field-0 is invalid: validation failure");

    let seen: Vec<String> = chain::causes(&errs)
        .skip(1)
        .filter(|e| e.is::<Chain>())
        .map(|e| e.to_string())
        .collect();
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_sort_orders_by_message() {
    let mut errs = append(
        None::<Aggregate>,
        ["foo", "bar", "baz"].map(|s| Entry::error(StoreError::Constraint(s.into()))),
    );
    errs.sort();

    let order: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        order,
        vec![
            "constraint 'bar' violated",
            "constraint 'baz' violated",
            "constraint 'foo' violated",
        ]
    );
}
