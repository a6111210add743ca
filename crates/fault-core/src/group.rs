// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Concurrent failure collection.
//!
//! A [`Group`] runs fallible tasks on their own threads and gathers every
//! failure into one [`Aggregate`]. [`Group::wait`] blocks until all submitted
//! tasks have finished.
//!
//! ```
//! use fault_core::category;
//! use fault_core::group::Group;
//!
//! let group = Group::new();
//! for id in 0..4 {
//!     group
//!         .go(move || {
//!             if id % 2 == 0 {
//!                 Err(category::not_found(format!("item {}", id)))
//!             } else {
//!                 Ok(())
//!             }
//!         })
//!         .unwrap();
//! }
//!
//! let errs = group.wait().unwrap();
//! assert_eq!(errs.len(), 2);
//! assert!(category::is_not_found(&errs));
//! ```
//!
//! # Task lifecycle
//!
//! ```text
//! go() ──▶ outstanding += 1 ──▶ spawn thread ──▶ catch_unwind(task) ──▶ Completion::finish
//!                                    │                                      │
//!                                    │ spawn fails (guard dropped)          ▼
//!                                    └──────────────────────────▶ lock { push failure or panic,
//!                                                                        outstanding -= 1,
//!                                                                        notify if 0 }
//! ```
//!
//! The count is raised before the thread exists, so a concurrent `wait`
//! never sees a false drained state.
//!
//! # Panics
//!
//! A task that panics is counted as finished and its payload is kept. The
//! next [`Group::wait`] re-raises it with [`std::panic::resume_unwind`] once
//! the group has drained. Only the first payload is kept; failures returned
//! by other tasks stay collected for later calls to `wait`.

use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::aggregate::Aggregate;
use crate::config::GroupConfig;
use crate::error::{shared, ConfigResult, GroupError, GroupResult, SharedError};

// =============================================================================
// Group
// =============================================================================

/// Runs tasks concurrently and collects their failures.
///
/// Cloning a `Group` yields another handle to the same collector, so tasks
/// may themselves submit further work.
#[derive(Clone)]
pub struct Group {
    inner: Arc<Inner>,
}

struct Inner {
    config: GroupConfig,
    state: Mutex<State>,
    drained: Condvar,
    next_task: AtomicUsize,
}

type PanicPayload = Box<dyn Any + Send + 'static>;

#[derive(Default)]
struct State {
    outstanding: usize,
    failures: Aggregate,
    panic: Option<PanicPayload>,
}

impl Group {
    /// Creates a group with the default configuration.
    pub fn new() -> Self {
        Self::from_valid(GroupConfig::default())
    }

    /// Creates a group with the given configuration.
    pub fn with_config(config: GroupConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: GroupConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(State::default()),
                drained: Condvar::new(),
                next_task: AtomicUsize::new(0),
            }),
        }
    }

    /// Returns the group's configuration.
    pub fn config(&self) -> &GroupConfig {
        &self.inner.config
    }

    /// Starts `task` on a new thread.
    ///
    /// An `Err` returned by the task is appended to the group's aggregate
    /// (aggregates are spliced, not nested).
    pub fn go<F, E>(&self, task: F) -> GroupResult<()>
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let id = self.inner.next_task.fetch_add(1, Ordering::Relaxed);
        let thread_name = self.inner.config.thread_name(id);

        self.inner.state.lock().outstanding += 1;
        let completion = Completion {
            inner: Arc::clone(&self.inner),
            task: id,
            finished: false,
        };

        let mut builder = thread::Builder::new().name(thread_name.clone());
        if let Some(size) = self.inner.config.stack_size {
            builder = builder.stack_size(size);
        }

        tracing::debug!(group = %self.inner.config.name, task = id, "Task submitted");

        // A refused spawn drops the closure, and with it the completion
        // guard, which gives the slot back.
        builder
            .spawn(move || {
                let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                    Ok(Ok(())) => Outcome::Succeeded,
                    Ok(Err(e)) => Outcome::Failed(shared(e)),
                    Err(payload) => Outcome::Panicked(payload),
                };
                completion.finish(outcome);
            })
            .map(drop)
            .map_err(|e| {
                tracing::error!(
                    group = %self.inner.config.name,
                    thread = %thread_name,
                    error = %e,
                    "Failed to spawn task thread"
                );
                GroupError::spawn(thread_name, e)
            })
    }

    /// Blocks until every submitted task has finished.
    ///
    /// Returns the collected failures, or `None` if no task failed. The
    /// result is a snapshot: `wait` may be called again, and sees tasks
    /// submitted in between.
    ///
    /// # Panics
    ///
    /// Resumes the panic of a task that panicked since the last `wait`.
    pub fn wait(&self) -> Option<Aggregate> {
        let mut state = self.inner.state.lock();
        while state.outstanding > 0 {
            self.inner.drained.wait(&mut state);
        }

        if let Some(payload) = state.panic.take() {
            drop(state);
            tracing::debug!(group = %self.inner.config.name, "Resuming task panic");
            panic::resume_unwind(payload);
        }

        tracing::debug!(
            group = %self.inner.config.name,
            failures = state.failures.len(),
            "Group drained"
        );

        if state.failures.is_empty() {
            None
        } else {
            Some(state.failures.clone())
        }
    }

    /// Number of tasks submitted but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.inner.state.lock().outstanding
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Group")
            .field("name", &self.inner.config.name)
            .field("outstanding", &state.outstanding)
            .field("failures", &state.failures.len())
            .finish()
    }
}

// =============================================================================
// Completion
// =============================================================================

enum Outcome {
    Succeeded,
    Failed(SharedError),
    Panicked(PanicPayload),
}

/// Gives a task's slot back exactly once.
///
/// [`finish`](Self::finish) records the outcome. Dropping an unfinished
/// guard, as happens when the thread is never spawned, only releases the slot.
struct Completion {
    inner: Arc<Inner>,
    task: usize,
    finished: bool,
}

impl Completion {
    fn finish(mut self, outcome: Outcome) {
        self.finished = true;
        self.release(Some(outcome));
    }

    fn release(&self, outcome: Option<Outcome>) {
        let config = &self.inner.config;

        match &outcome {
            Some(Outcome::Failed(err)) if config.log_failures => {
                tracing::warn!(group = %config.name, task = self.task, error = %err, "Task failed");
            }
            Some(Outcome::Panicked(payload)) => {
                tracing::error!(
                    group = %config.name,
                    task = self.task,
                    panic = panic_message(payload),
                    "Task panicked"
                );
            }
            _ => {}
        }

        let mut state = self.inner.state.lock();
        match outcome {
            Some(Outcome::Failed(err)) => state.failures.push_shared(err),
            Some(Outcome::Panicked(payload)) => {
                state.panic.get_or_insert(payload);
            }
            Some(Outcome::Succeeded) | None => {}
        }
        state.outstanding -= 1;
        tracing::trace!(
            group = %config.name,
            task = self.task,
            outstanding = state.outstanding,
            "Task completed"
        );
        if state.outstanding == 0 {
            self.inner.drained.notify_all();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.finished {
            self.release(None);
        }
    }
}

fn panic_message(payload: &PanicPayload) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category;
    use std::collections::BTreeSet;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_wait_without_tasks() {
        let group = Group::new();
        assert!(group.wait().is_none());
        assert_eq!(group.outstanding(), 0);
    }

    #[test]
    fn test_successes_only() {
        let group = Group::new();
        for _ in 0..8 {
            group.go(|| Ok::<(), std::io::Error>(())).unwrap();
        }
        assert!(group.wait().is_none());
    }

    #[test]
    fn test_collects_failures() {
        let group = Group::new();
        for i in 0..10 {
            group
                .go(move || {
                    if i % 3 == 0 {
                        Err(category::server(format!("task {}", i)))
                    } else {
                        Ok(())
                    }
                })
                .unwrap();
        }

        let errs = group.wait().unwrap();
        let seen: BTreeSet<String> = errs.iter().map(|e| e.to_string()).collect();
        let expected: BTreeSet<String> = [0, 3, 6, 9]
            .iter()
            .map(|i| format!("task {}: server failure", i))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_aggregate_failures_are_spliced() {
        let group = Group::new();
        group
            .go(|| {
                let mut errs = Aggregate::new();
                errs.push(category::warn("a"));
                errs.push(category::warn("b"));
                Err(errs)
            })
            .unwrap();

        let errs = group.wait().unwrap();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn test_wait_blocks_until_done() {
        let group = Group::new();
        let (release, gate) = mpsc::channel::<()>();
        group
            .go(move || {
                gate.recv_timeout(Duration::from_secs(5)).ok();
                Err(category::timeout("slow"))
            })
            .unwrap();
        assert_eq!(group.outstanding(), 1);

        release.send(()).unwrap();
        let errs = group.wait().unwrap();
        assert_eq!(errs.len(), 1);
        assert_eq!(group.outstanding(), 0);
    }

    #[test]
    fn test_wait_is_repeatable() {
        let group = Group::new();
        group.go(|| Err(category::defer("first"))).unwrap();
        assert_eq!(group.wait().map(|e| e.len()), Some(1));
        assert_eq!(group.wait().map(|e| e.len()), Some(1));

        group.go(|| Err(category::defer("second"))).unwrap();
        assert_eq!(group.wait().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_panicking_task_resumes_in_wait() {
        let group = Group::new();
        group
            .go(|| -> Result<(), std::io::Error> { panic!("work never finished") })
            .unwrap();
        group.go(|| Err(category::system("still collected"))).unwrap();

        let payload = panic::catch_unwind(AssertUnwindSafe(|| group.wait())).unwrap_err();
        assert_eq!(panic_message(&payload), "work never finished");
        assert_eq!(group.outstanding(), 0);

        let errs = group.wait().unwrap();
        assert_eq!(errs.len(), 1);
        assert!(category::is_system(&errs));
    }

    #[test]
    fn test_formatted_panic_message() {
        let group = Group::new();
        group
            .go(|| -> Result<(), std::io::Error> { panic!("task {} gave up", 7) })
            .unwrap();

        let payload = panic::catch_unwind(AssertUnwindSafe(|| group.wait())).unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("task 7 gave up"));
        assert!(group.wait().is_none());
    }

    #[test]
    fn test_spawn_failure_restores_count() {
        let config = GroupConfig::builder().stack_size(usize::MAX / 2).build();
        assert!(Group::with_config(config.clone()).is_err());

        let group = Group::from_valid(config);
        let result = group.go(|| Ok::<(), std::io::Error>(()));

        match result {
            Err(GroupError::Spawn { thread, .. }) => assert_eq!(thread, "fault-group-group-0"),
            Ok(()) => panic!("thread with an unbounded stack was spawned"),
        }
        assert_eq!(group.outstanding(), 0);
        assert!(group.wait().is_none());
    }

    #[test]
    fn test_nested_submission() {
        let group = Group::new();
        let handle = group.clone();
        group
            .go(move || {
                handle.go(|| Err(category::platform("inner")))?;
                Err::<(), GroupError>(GroupError::spawn(
                    "marker",
                    std::io::Error::new(std::io::ErrorKind::Other, "outer"),
                ))
            })
            .unwrap();

        let errs = group.wait().unwrap();
        assert_eq!(errs.len(), 2);
        assert!(category::is_platform(&errs));
    }

    #[test]
    fn test_with_config() {
        let config = GroupConfig::builder()
            .name("sized")
            .stack_size(512 * 1024)
            .log_failures(false)
            .build();
        let group = Group::with_config(config).unwrap();
        assert_eq!(group.config().name, "sized");

        group
            .go(|| {
                let name = thread::current().name().map(str::to_string);
                match name.as_deref() {
                    Some("fault-group-sized-0") => Ok(()),
                    _ => Err(category::invalid_state(format!("thread name {:?}", name))),
                }
            })
            .unwrap();
        assert!(group.wait().is_none());

        let invalid = GroupConfig::builder().name("").build();
        assert!(Group::with_config(invalid).is_err());
    }
}
