// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors that carry an HTTP status and a public message.
//!
//! A [`RestApi`] keeps what the caller sees (status, message, invalid fields)
//! apart from the internal cause it wraps. It displays as the cause, so logs
//! keep the detail while responses use [`RestApi::msg`].
//!
//! Every query here searches the whole cause chain, so a `RestApi` is still
//! found after being wrapped or collected into an aggregate.
//!
//! ```
//! use fault_rest::api::{self, RestApi};
//!
//! let err = RestApi::invalid_fields([("email", "is malformed")], "signup rejected");
//! let err = fault_core::wrap(err, "handler");
//!
//! assert!(api::is_invalid_fields(&err));
//! assert_eq!(api::rest_status_code(&err), Some(422));
//! assert_eq!(api::rest_message(&err), Some("signup rejected"));
//! ```

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use fault_core::{chain, shared, SharedError};
use thiserror::Error;

use crate::status;

// =============================================================================
// Sentinels
// =============================================================================

/// Internal causes for REST errors that have no underlying error of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RestSentinel {
    /// Cause of [`RestApi::invalid_fields`].
    #[error("invalid api fields failure")]
    InvalidFields,

    /// Cause of [`RestApi::bad_request`].
    #[error("bad request failure")]
    BadRequest,
}

// =============================================================================
// RestApi
// =============================================================================

/// An error with an HTTP status, a public message and optional field errors.
#[derive(Debug, Clone)]
pub struct RestApi {
    status_code: u16,
    msg: String,
    fields: BTreeMap<String, String>,
    source: SharedError,
}

impl RestApi {
    /// Creates a REST error around an internal cause.
    pub fn new(status_code: u16, msg: impl Into<String>, source: SharedError) -> Self {
        Self {
            status_code,
            msg: msg.into(),
            fields: BTreeMap::new(),
            source,
        }
    }

    /// `422 Unprocessable Entity` with per-field messages.
    pub fn invalid_fields<I, K, V>(fields: I, msg: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut err = Self::new(
            status::UNPROCESSABLE_ENTITY,
            msg,
            Arc::new(RestSentinel::InvalidFields),
        );
        err.fields = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        err
    }

    /// `400 Bad Request` with no underlying cause.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(status::BAD_REQUEST, msg, Arc::new(RestSentinel::BadRequest))
    }

    /// `400 Bad Request` caused by `err`.
    pub fn to_bad_request<E>(err: E, msg: impl Into<String>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(status::BAD_REQUEST, msg, shared(err))
    }

    /// The HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The public message.
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// Field key to message. Empty unless built by
    /// [`invalid_fields`](Self::invalid_fields).
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// The internal cause.
    pub fn cause(&self) -> &SharedError {
        &self.source
    }
}

impl fmt::Display for RestApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.source, f)
    }
}

impl StdError for RestApi {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source as &(dyn StdError + 'static))
    }
}

// =============================================================================
// Queries
// =============================================================================

/// The first [`RestApi`] in `err`'s chain.
pub fn rest_api<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a RestApi> {
    chain::find::<RestApi>(err)
}

/// Reports whether `err` carries a [`RestApi`].
pub fn is_rest_api(err: &(dyn StdError + 'static)) -> bool {
    rest_api(err).is_some()
}

/// Status code of the first [`RestApi`] in the chain.
pub fn rest_status_code(err: &(dyn StdError + 'static)) -> Option<u16> {
    rest_api(err).map(RestApi::status_code)
}

/// Public message of the first [`RestApi`] in the chain.
pub fn rest_message<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a str> {
    rest_api(err).map(RestApi::msg)
}

/// Internal cause of the first [`RestApi`] in the chain.
pub fn rest_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a SharedError> {
    rest_api(err).map(RestApi::cause)
}

/// Field messages of the first [`RestApi`] in the chain.
pub fn invalid_fields_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a BTreeMap<String, String>> {
    rest_api(err).map(RestApi::fields)
}

/// `true` when the first [`RestApi`] in the chain is a 422.
pub fn is_invalid_fields(err: &(dyn StdError + 'static)) -> bool {
    rest_status_code(err) == Some(status::UNPROCESSABLE_ENTITY)
}

/// `true` when the first [`RestApi`] in the chain is a 400.
pub fn is_bad_request(err: &(dyn StdError + 'static)) -> bool {
    rest_status_code(err) == Some(status::BAD_REQUEST)
}

// =============================================================================
// Tests
// =============================================================================
