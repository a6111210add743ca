// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error plumbing shared by every FAULT component.
//!
//! This module defines:
//!
//! - [`SharedError`]: the reference-counted error handle every aggregate and
//!   wrapper stores, plus [`shared`] / [`shared_boxed`] to produce one
//! - [`Wrapped`]: the `"<message>: <cause>"` wrapper and the [`wrap`] helper
//! - [`ErrorContext`]: `Result` extension for attaching a message
//! - The library's own failures:
//!
//! ```text
//! GroupError   - Concurrent collector failures
//! ConfigError  - Invalid collector configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use fault_core::error::{wrap, ErrorContext};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//! let err = wrap(io, "loading settings");
//! assert_eq!(err.to_string(), "loading settings: no such file");
//!
//! let result: Result<(), std::io::Error> =
//!     Err(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
//! let err = result.context("flush").unwrap_err();
//! assert_eq!(err.to_string(), "flush: disk");
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

// =============================================================================
// SharedError
// =============================================================================

/// A cheaply clonable, thread-safe handle to any error value.
///
/// Aggregates, chains and wrappers all hold their causes through this type so
/// that snapshots (see [`crate::chain::Chain`]) are shallow copies.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Converts an error into a [`SharedError`].
///
/// A value that already is a [`SharedError`] is returned as-is rather than
/// being wrapped a second time, so downcasts keep seeing the concrete type.
pub fn shared<E>(err: E) -> SharedError
where
    E: StdError + Send + Sync + 'static,
{
    let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
    match boxed.downcast::<SharedError>() {
        Ok(already) => *already,
        Err(boxed) => Arc::from(boxed),
    }
}

/// Converts a boxed error into a [`SharedError`].
pub fn shared_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> SharedError {
    Arc::from(err)
}

// =============================================================================
// Wrapped
// =============================================================================

/// An error annotated with a message.
///
/// Displays as `"<message>: <cause>"` and unwraps (through
/// [`std::error::Error::source`]) to the cause. Wrapping repeatedly yields
/// strings such as `"a: b: c"`.
#[derive(Debug, Clone)]
pub struct Wrapped {
    message: String,
    source: SharedError,
}

impl Wrapped {
    /// Wraps an already shared cause.
    pub fn new(message: impl Into<String>, source: SharedError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Returns the annotation, without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapped cause.
    pub fn cause(&self) -> &SharedError {
        &self.source
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl StdError for Wrapped {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source as &(dyn StdError + 'static))
    }
}

/// Wraps `err` with `message`.
pub fn wrap<E>(err: E, message: impl Into<String>) -> Wrapped
where
    E: StdError + Send + Sync + 'static,
{
    Wrapped::new(message, shared(err))
}

// =============================================================================
// Error Context Extension
// =============================================================================

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, message: impl Into<String>) -> Result<T, Wrapped>;

    /// Adds context using a closure.
    fn with_context<F, M>(self, f: F) -> Result<T, Wrapped>
    where
        F: FnOnce() -> M,
        M: Into<String>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T, Wrapped> {
        self.map_err(|e| wrap(e, message))
    }

    fn with_context<F, M>(self, f: F) -> Result<T, Wrapped>
    where
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.map_err(|e| wrap(e, f()))
    }
}

// =============================================================================
// GroupError
// =============================================================================

/// Errors raised by [`crate::group::Group`].
#[derive(Debug, Error)]
pub enum GroupError {
    /// The operating system refused to start a worker thread.
    #[error("Failed to spawn task thread '{thread}': {source}")]
    Spawn {
        /// Name the thread would have had.
        thread: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GroupError {
    /// Creates a spawn error.
    pub fn spawn(thread: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            thread: thread.into(),
            source,
        }
    }

    /// Returns the error type for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            GroupError::Spawn { .. } => "spawn",
        }
    }
}

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration-related errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::Validation { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// A Result type with GroupError.
pub type GroupResult<T> = Result<T, GroupError>;

/// A Result type with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Tests
// =============================================================================
