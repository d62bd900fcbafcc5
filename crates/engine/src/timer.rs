// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injected sleep point (SPEC_FULL.md §9, "Injected timers → trait"). Lets
//! tests drive backoff deterministically alongside a `FakeClock`.

use async_trait::async_trait;

#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep_ms(&self, duration_ms: i64);
}

/// Production timer backed by the tokio runtime.
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep_ms(&self, duration_ms: i64) {
        let millis = duration_ms.max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
    }
}

/// Test timer that only resolves when explicitly commanded, instead of
/// after real or virtual wall-clock time. Used together with `FakeClock`.
#[cfg(any(test, feature = "test-support"))]
pub struct ManualTimer {
    notify: tokio::sync::Notify,
}

#[cfg(any(test, feature = "test-support"))]
impl ManualTimer {
    pub fn new() -> Self {
        Self { notify: tokio::sync::Notify::new() }
    }

    /// Release every `sleep_ms` call currently waiting.
    pub fn fire(&self) {
        self.notify.notify_waiters();
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Timer for ManualTimer {
    async fn sleep_ms(&self, _duration_ms: i64) {
        self.notify.notified().await;
    }
}
