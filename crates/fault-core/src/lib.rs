// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fault-core
//!
//! Error categories and multi-error aggregation for services.
//!
//! This crate provides:
//!
//! - **Category**: Sentinel categories (`NotFound`, `Validation`, ...) with
//!   tagging, relabeling and chain-aware checks
//! - **Chain**: Cause-chain search that sees through wrapping and aggregates
//! - **Aggregate**: An ordered collection of failures that is itself an error
//! - **Group**: Runs tasks on threads and collects their failures
//! - **Error**: Wrapping helpers and the library's own error types
//!
//! ## Example
//!
//! ```
//! use fault_core::{append, category, Aggregate, Entry};
//!
//! let errs = append(None::<Aggregate>, [
//!     Entry::error(category::validation("email is malformed")),
//!     Entry::error(category::not_found("account 42")),
//! ]);
//!
//! assert_eq!(errs.len(), 2);
//! assert!(category::is_validation(&errs));
//! assert!(errs.to_string().starts_with("2 errors occurred:\n\t* "));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Core Modules
// =============================================================================

pub mod error;
pub mod chain;
pub mod category;

// =============================================================================
// Aggregation Modules
// =============================================================================

pub mod aggregate;
pub mod config;
pub mod group;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    shared, shared_boxed, wrap, ConfigError, ConfigResult, ErrorContext, GroupError, GroupResult,
    SharedError, Wrapped,
};

pub use chain::Chain;

pub use category::{input, input_message, is_any_auth_failure, is_input, Category, Input};

pub use aggregate::{
    append, failures_of, flatten, is_aggregate, list_format, multiple, Aggregate, AggregateExt,
    Entry, FormatFn,
};

pub use config::{GroupConfig, GroupConfigBuilder};

pub use group::Group;
