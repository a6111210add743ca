// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fault-rest
//!
//! Presentation-layer errors for HTTP services built on `fault-core`.
//!
//! - **Field / FieldGroup**: invalid keys and named sets of them
//! - **Catalog**: field groups for one form, with the status to answer with
//! - **RestApi**: an error carrying a status code, a public message and
//!   field errors, separate from its internal cause
//!
//! ## Example
//!
//! ```
//! use fault_rest::{Catalog, RestApi};
//!
//! let mut catalog = Catalog::new("signup");
//! catalog.add_field("account", "email", "is taken");
//! assert_eq!(catalog.to_string(), "signup: account(email: is taken)");
//!
//! let err = RestApi::bad_request("missing body");
//! assert_eq!(err.status_code(), 400);
//! assert!(fault_rest::is_bad_request(&err));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod catalog;
pub mod field;

/// HTTP status codes used by this crate.
pub mod status {
    /// `400 Bad Request`.
    pub const BAD_REQUEST: u16 = 400;
    /// `422 Unprocessable Entity`.
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
}

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{
    invalid_fields_of, is_bad_request, is_invalid_fields, is_rest_api, rest_api, rest_error,
    rest_message, rest_status_code, RestApi, RestSentinel,
};
pub use catalog::{Catalog, FailureMap};
pub use field::{is_field_error, Field, FieldGroup};
