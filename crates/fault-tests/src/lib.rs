// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # FAULT Integration Tests
//!
//! Integration tests that exercise `fault-core` and `fault-rest` together,
//! plus the shared helpers those suites use.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Domain errors and task builders
//!   - `assertions`: Assertion helpers for aggregates and categories
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p fault-tests
//!
//! # Run specific test suite
//! cargo test -p fault-tests --test integration_aggregate
//! cargo test -p fault-tests --test integration_category
//! cargo test -p fault-tests --test integration_group
//! cargo test -p fault-tests --test integration_rest
//!
//! # Show log output
//! RUST_LOG=fault_core=trace cargo test -p fault-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### Aggregate Tests (`integration_aggregate.rs`)
//! - Append, formatting and flattening
//! - Category and identity search across aggregates
//!
//! ### Category Tests (`integration_category.rs`)
//! - Tagging, relabeling and chain-aware checks for every category
//! - Public input errors
//!
//! ### Group Tests (`integration_group.rs`)
//! - Concurrent collection, configuration and logging
//!
//! ### REST Tests (`integration_rest.rs`)
//! - Catalogs, field groups and status-bearing errors

pub mod common;
