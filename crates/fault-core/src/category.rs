// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Semantic error categories.
//!
//! A [`Category`] is a sentinel error: an immutable marker whose only job is
//! to be found again. Tagging an error wraps the sentinel with a message;
//! testing for a category searches the cause chain (aggregates included) for
//! the sentinel.
//!
//! ```text
//! not_found("user 7")                 -> "user 7: not found failure"
//! to_not_found(&io_err, "load user")  -> "load user: <io_err>: not found failure"
//! ```
//!
//! Categories are independent of one another: a `System` error is never a
//! `Server` error, even though the two read alike.
//!
//! # Example
//!
//! ```
//! use fault_core::category::{self, Category};
//!
//! let err = category::timeout("upstream took 30s");
//! assert!(category::is_timeout(&err));
//! assert!(!category::is_not_found(&err));
//! assert_eq!(err.to_string(), "upstream took 30s: timeout failure");
//! assert_eq!(Category::Timeout.status_code(), 504);
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::chain;
use crate::error::{shared, SharedError, Wrapped};

// =============================================================================
// Category
// =============================================================================

/// A closed set of error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Low level failure of the running system.
    System,
    /// Failure in the platform layer (third-party code, drivers, SDKs).
    Platform,
    /// Server-side failure.
    Server,
    /// The requested resource does not exist.
    NotFound,
    /// A validation rule was violated.
    Validation,
    /// The error should not be acted on; handlers decide whether to log it.
    Ignore,
    /// Configuration is missing or invalid.
    Config,
    /// A parameter was invalid.
    InvalidParam,
    /// An operation was attempted in the wrong state.
    InvalidState,
    /// Nothing changed.
    NoChange,
    /// A warning that should be fixed eventually.
    Warn,
    /// An index or offset was out of range.
    OutOfRange,
    /// A value expected in the request context was missing.
    MissingFromContext,
    /// A recovered panic.
    Panic,
    /// The resource already exists.
    AlreadyExists,
    /// Failure while starting up.
    Startup,
    /// Failure while shutting down.
    Shutdown,
    /// The operation timed out.
    Timeout,
    /// Access was refused.
    Forbidden,
    /// The caller is not authenticated.
    NotAuthenticated,
    /// The caller is not authorized.
    NotAuthorized,
    /// Failure inside deferred cleanup.
    Defer,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 22] = [
        Category::System,
        Category::Platform,
        Category::Server,
        Category::NotFound,
        Category::Validation,
        Category::Ignore,
        Category::Config,
        Category::InvalidParam,
        Category::InvalidState,
        Category::NoChange,
        Category::Warn,
        Category::OutOfRange,
        Category::MissingFromContext,
        Category::Panic,
        Category::AlreadyExists,
        Category::Startup,
        Category::Shutdown,
        Category::Timeout,
        Category::Forbidden,
        Category::NotAuthenticated,
        Category::NotAuthorized,
        Category::Defer,
    ];

    /// The sentinel's message.
    pub const fn message(self) -> &'static str {
        match self {
            Category::System => "system failure",
            Category::Platform => "platform failure",
            Category::Server => "server failure",
            Category::NotFound => "not found failure",
            Category::Validation => "validation failure",
            Category::Ignore => "ignore failure",
            Category::Config => "config failure",
            Category::InvalidParam => "invalid param failure",
            Category::InvalidState => "invalid state failure",
            Category::NoChange => "no change failure",
            Category::Warn => "warn failure",
            Category::OutOfRange => "out of range failure",
            Category::MissingFromContext => "missing from context failure",
            Category::Panic => "panic failure",
            Category::AlreadyExists => "already exists failure",
            Category::Startup => "startup failure",
            Category::Shutdown => "shutdown failure",
            Category::Timeout => "timeout failure",
            Category::Forbidden => "forbidden failure",
            Category::NotAuthenticated => "not authenticated failure",
            Category::NotAuthorized => "not authorized failure",
            Category::Defer => "defer failure",
        }
    }

    /// Returns the error type as a string for logging/metrics.
    pub const fn error_type(self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Platform => "platform",
            Category::Server => "server",
            Category::NotFound => "not_found",
            Category::Validation => "validation",
            Category::Ignore => "ignore",
            Category::Config => "config",
            Category::InvalidParam => "invalid_param",
            Category::InvalidState => "invalid_state",
            Category::NoChange => "no_change",
            Category::Warn => "warn",
            Category::OutOfRange => "out_of_range",
            Category::MissingFromContext => "missing_from_context",
            Category::Panic => "panic",
            Category::AlreadyExists => "already_exists",
            Category::Startup => "startup",
            Category::Shutdown => "shutdown",
            Category::Timeout => "timeout",
            Category::Forbidden => "forbidden",
            Category::NotAuthenticated => "not_authenticated",
            Category::NotAuthorized => "not_authorized",
            Category::Defer => "defer",
        }
    }

    /// Returns the HTTP status code for this category.
    pub const fn status_code(self) -> u16 {
        match self {
            Category::NotFound => 404,
            Category::Validation => 422,
            Category::InvalidParam | Category::OutOfRange => 400,
            Category::InvalidState | Category::AlreadyExists => 409,
            Category::NoChange => 304,
            Category::Startup | Category::Shutdown => 503,
            Category::Timeout => 504,
            Category::Forbidden | Category::NotAuthorized => 403,
            Category::NotAuthenticated => 401,
            _ => 500,
        }
    }

    /// Tags a new error with this category: `"<message>: <sentinel>"`.
    pub fn wrap(self, message: impl Into<String>) -> Wrapped {
        Wrapped::new(message, Arc::new(self) as SharedError)
    }

    /// Re-labels an outside error under this category.
    ///
    /// The outside error's text becomes the innermost message:
    /// `"<message>: <err>: <sentinel>"`.
    pub fn relabel(self, err: &dyn StdError, message: impl Into<String>) -> Wrapped {
        Wrapped::new(message, shared(self.wrap(err.to_string())))
    }

    /// Reports whether this category's sentinel is anywhere in `err`'s chain.
    pub fn matches(self, err: &(dyn StdError + 'static)) -> bool {
        chain::is(err, &self)
    }

    /// Returns the first category found in `err`'s chain.
    pub fn of(err: &(dyn StdError + 'static)) -> Option<Category> {
        chain::find::<Category>(err).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl StdError for Category {}

// =============================================================================
// Per-category helpers
// =============================================================================

macro_rules! category_helpers {
    ($($variant:ident => $new:ident, $is:ident, $to:ident;)*) => {
        $(
            #[doc = concat!("Creates an error tagged [`Category::", stringify!($variant), "`].")]
            pub fn $new(message: impl Into<String>) -> Wrapped {
                Category::$variant.wrap(message)
            }

            #[doc = concat!("Reports whether `err` is tagged [`Category::", stringify!($variant), "`].")]
            pub fn $is(err: &(dyn StdError + 'static)) -> bool {
                Category::$variant.matches(err)
            }

            #[doc = concat!("Re-labels `err` as [`Category::", stringify!($variant), "`].")]
            pub fn $to(err: &dyn StdError, message: impl Into<String>) -> Wrapped {
                Category::$variant.relabel(err, message)
            }
        )*
    };
}

category_helpers! {
    System => system, is_system, to_system;
    Platform => platform, is_platform, to_platform;
    Server => server, is_server, to_server;
    NotFound => not_found, is_not_found, to_not_found;
    Validation => validation, is_validation, to_validation;
    Ignore => ignore, is_ignore, to_ignore;
    Config => config, is_config, to_config;
    InvalidParam => invalid_param, is_invalid_param, to_invalid_param;
    InvalidState => invalid_state, is_invalid_state, to_invalid_state;
    NoChange => no_change, is_no_change, to_no_change;
    Warn => warn, is_warn, to_warn;
    OutOfRange => out_of_range, is_out_of_range, to_out_of_range;
    MissingFromContext => missing_from_context, is_missing_from_context, to_missing_from_context;
    Panic => panic, is_panic, to_panic;
    AlreadyExists => already_exists, is_already_exists, to_already_exists;
    Startup => startup, is_startup, to_startup;
    Shutdown => shutdown, is_shutdown, to_shutdown;
    Timeout => timeout, is_timeout, to_timeout;
    Forbidden => forbidden, is_forbidden, to_forbidden;
    NotAuthenticated => not_authenticated, is_not_authenticated, to_not_authenticated;
    NotAuthorized => not_authorized, is_not_authorized, to_not_authorized;
    Defer => defer, is_defer, to_defer;
}

/// Reports whether `err` is any of the authentication/authorization
/// categories.
pub fn is_any_auth_failure(err: &(dyn StdError + 'static)) -> bool {
    [
        Category::Forbidden,
        Category::NotAuthenticated,
        Category::NotAuthorized,
    ]
    .into_iter()
    .any(|category| category.matches(err))
}

// =============================================================================
// Input
// =============================================================================

/// Bad caller input, carrying a public message separate from the error that
/// gets logged.
///
/// Displays the internal error; the public one is only reachable through
/// [`input_message`]. An `Input` is a leaf: it has no `source()`.
#[derive(Debug, Clone)]
pub struct Input {
    public: SharedError,
    internal: SharedError,
}

impl Input {
    /// Returns the error that is safe to show to callers.
    pub fn public(&self) -> &SharedError {
        &self.public
    }

    /// Returns the error meant for logs.
    pub fn internal(&self) -> &SharedError {
        &self.internal
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.internal, f)
    }
}

impl StdError for Input {}

/// Creates an [`Input`] error.
pub fn input<P, I>(public: P, internal: I) -> Input
where
    P: StdError + Send + Sync + 'static,
    I: StdError + Send + Sync + 'static,
{
    Input {
        public: shared(public),
        internal: shared(internal),
    }
}

/// Reports whether `err` carries an [`Input`].
pub fn is_input(err: &(dyn StdError + 'static)) -> bool {
    chain::find::<Input>(err).is_some()
}

/// Returns the public message of the first [`Input`] in `err`'s chain.
pub fn input_message(err: &(dyn StdError + 'static)) -> Option<String> {
    chain::find::<Input>(err).map(|input| input.public.to_string())
}

// =============================================================================
// Tests
// =============================================================================
