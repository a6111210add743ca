// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration for [`Group`](crate::group::Group).
//!
//! Every field has a default, so an empty document deserializes to
//! [`GroupConfig::default`].
//!
//! ```
//! use fault_core::config::GroupConfig;
//!
//! let config = GroupConfig::builder()
//!     .name("importer")
//!     .stack_size(256 * 1024)
//!     .build();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.thread_name(3), "fault-group-importer-3");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Smallest stack size accepted for task threads.
pub const MIN_STACK_SIZE: usize = 16 * 1024;

/// Largest stack size accepted for task threads.
pub const MAX_STACK_SIZE: usize = 1024 * 1024 * 1024;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a concurrent failure collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Name of the group, used in log events and thread names.
    #[serde(default = "default_name")]
    pub name: String,

    /// Prefix for task thread names.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Stack size for task threads, in bytes. `None` keeps the platform default.
    #[serde(default)]
    pub stack_size: Option<usize>,

    /// Whether each task failure is logged at `warn` level as it arrives.
    #[serde(default = "default_log_failures")]
    pub log_failures: bool,
}

fn default_name() -> String {
    "group".to_string()
}

fn default_thread_name_prefix() -> String {
    "fault-group".to_string()
}

fn default_log_failures() -> bool {
    true
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            thread_name_prefix: default_thread_name_prefix(),
            stack_size: None,
            log_failures: default_log_failures(),
        }
    }
}

impl GroupConfig {
    /// Creates a new builder.
    pub fn builder() -> GroupConfigBuilder {
        GroupConfigBuilder::default()
    }

    /// Checks the configuration for values a group cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation("name", "must not be empty"));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(ConfigError::validation(
                "thread_name_prefix",
                "must not contain NUL bytes",
            ));
        }
        if self.name.contains('\0') {
            return Err(ConfigError::validation("name", "must not contain NUL bytes"));
        }
        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(ConfigError::validation(
                    "stack_size",
                    format!("must be at least {} bytes, got {}", MIN_STACK_SIZE, size),
                ));
            }
            if size > MAX_STACK_SIZE {
                return Err(ConfigError::validation(
                    "stack_size",
                    format!("must be at most {} bytes, got {}", MAX_STACK_SIZE, size),
                ));
            }
        }
        Ok(())
    }

    /// Returns the thread name for the task with the given id.
    pub fn thread_name(&self, task: usize) -> String {
        if self.thread_name_prefix.is_empty() {
            format!("{}-{}", self.name, task)
        } else {
            format!("{}-{}-{}", self.thread_name_prefix, self.name, task)
        }
    }
}

/// Builder for [`GroupConfig`].
#[derive(Debug, Default)]
pub struct GroupConfigBuilder {
    config: GroupConfig,
}

impl GroupConfigBuilder {
    /// Sets the group name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the thread name prefix.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Sets the task thread stack size.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Sets whether failures are logged as they arrive.
    pub fn log_failures(mut self, enabled: bool) -> Self {
        self.config.log_failures = enabled;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> GroupConfig {
        self.config
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GroupConfig::default();
        assert_eq!(config.name, "group");
        assert_eq!(config.thread_name_prefix, "fault-group");
        assert_eq!(config.stack_size, None);
        assert!(config.log_failures);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: GroupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GroupConfig::default());

        let config: GroupConfig =
            serde_json::from_str(r#"{"name": "fetch", "log_failures": false}"#).unwrap();
        assert_eq!(config.name, "fetch");
        assert!(!config.log_failures);
        assert_eq!(config.thread_name_prefix, "fault-group");
    }

    #[test]
    fn test_validate() {
        let err = GroupConfig::builder().name("  ").build().validate().unwrap_err();
        assert_eq!(err.field(), "name");

        let err = GroupConfig::builder().stack_size(1024).build().validate().unwrap_err();
        assert_eq!(err.field(), "stack_size");

        let err = GroupConfig::builder()
            .stack_size(usize::MAX / 2)
            .build()
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "stack_size");
        assert!(err.to_string().contains("at most"));
        assert!(GroupConfig::builder()
            .stack_size(MAX_STACK_SIZE)
            .build()
            .validate()
            .is_ok());

        let err = GroupConfig::builder()
            .thread_name_prefix("bad\0prefix")
            .build()
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "thread_name_prefix");
    }

    #[test]
    fn test_thread_name() {
        let config = GroupConfig::builder().name("io").build();
        assert_eq!(config.thread_name(0), "fault-group-io-0");

        let config = GroupConfig::builder().name("io").thread_name_prefix("").build();
        assert_eq!(config.thread_name(7), "io-7");
    }
}
