// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable failure reporting (SPEC_FULL.md §9, "Global `console.error`
//! capture in tests → pluggable error sink").

use std::fmt;

use async_trait::async_trait;
use jobq_core::{JobId, QueueName, TenantId};

/// A processor exception, or a `StaleChecker` timeout, surfaced the way
/// SPEC_FULL.md §7 describes as "the only consumer-facing failure stream".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Processor { tenant: TenantId, queue: QueueName, job_id: JobId, message: String },
    JobTimedOut { tenant: TenantId, queue_id: QueueName, job_id: JobId, timestamp_for_next_retry: Option<i64> },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processor { tenant, queue, job_id, message } => {
                write!(f, "processor error on {tenant}/{queue}/{job_id}: {message}")
            }
            Self::JobTimedOut { .. } => write!(f, "Job Timed Out"),
        }
    }
}

#[async_trait]
pub trait ErrorSink: Send + Sync {
    async fn report(&self, error: EngineError);
}

pub struct TracingErrorSink;

#[async_trait]
impl ErrorSink for TracingErrorSink {
    async fn report(&self, error: EngineError) {
        tracing::error!(%error, "job processing error");
    }
}

/// Test sink that accumulates reported errors for inspection instead of
/// logging them.
#[cfg(any(test, feature = "test-support"))]
pub struct BufferErrorSink {
    buffer: parking_lot::Mutex<Vec<EngineError>>,
}

#[cfg(any(test, feature = "test-support"))]
impl BufferErrorSink {
    pub fn new() -> Self {
        Self { buffer: parking_lot::Mutex::new(Vec::new()) }
    }

    pub fn drain(&self) -> Vec<EngineError> {
        std::mem::take(&mut self.buffer.lock())
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for BufferErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ErrorSink for BufferErrorSink {
    async fn report(&self, error: EngineError) {
        self.buffer.lock().push(error);
    }
}
