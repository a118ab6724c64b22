//! Common types and action implementations for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::Action;

/// Error type for test actions.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{0}")]
pub struct TestError(pub &'static str);

/// Shared record of forwards/backwards invocations, in call order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// A scripted action that records every invocation.
pub struct Probe {
    name: &'static str,
    log: CallLog,
    forwards: Result<u32, TestError>,
    backwards: Result<(), TestError>,
}

impl Probe {
    /// A probe whose forwards yields `value` and whose backwards succeeds.
    pub fn ok(name: &'static str, value: u32, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
            forwards: Ok(value),
            backwards: Ok(()),
        }
    }

    /// A probe whose forwards fails with `error`.
    pub fn failing(name: &'static str, error: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
            forwards: Err(TestError(error)),
            backwards: Ok(()),
        }
    }

    /// Script the backwards direction to fail with `error`.
    pub fn failing_backwards(mut self, error: &'static str) -> Self {
        self.backwards = Err(TestError(error));
        self
    }
}

#[async_trait]
impl Action for Probe {
    type Output = u32;
    type Error = TestError;

    async fn forwards(&mut self) -> Result<u32, TestError> {
        self.log.push(format!("{}.forwards", self.name));
        self.forwards.clone()
    }

    async fn backwards(&mut self) -> Result<(), TestError> {
        self.log.push(format!("{}.backwards", self.name));
        self.backwards.clone()
    }
}
