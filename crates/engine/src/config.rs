// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables for `JobDistributor` and `StaleChecker` — scoped to the queue's
//! own knobs (SPEC_FULL.md, Ambient stack), not deployment configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributorConfig {
    /// In-flight concurrency cap. Default 1.
    pub max_jobs: usize,
    /// Backoff between fetch sweeps when every tenant returned empty.
    pub poll_interval_ms: i64,
    /// Grace period added to `claim_time` for the `processing` deadline.
    pub stale_after_ms: i64,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self { max_jobs: 1, poll_interval_ms: 1000, stale_after_ms: 30_000 }
    }
}

impl DistributorConfig {
    pub fn from_toml(s: &str) -> Result<Self, EngineConfigError> {
        Ok(toml::from_str(s)?)
    }

    jobq_core::setters! {
        set { max_jobs: usize, poll_interval_ms: i64, stale_after_ms: i64 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaleCheckInterval {
    /// Run automatically every `ms`.
    Periodic { ms: i64 },
    /// Only run when a test calls `check()` directly.
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaleCheckerConfig {
    pub stale_after_ms: i64,
    pub interval: StaleCheckInterval,
}

impl Default for StaleCheckerConfig {
    fn default() -> Self {
        Self { stale_after_ms: 30_000, interval: StaleCheckInterval::Periodic { ms: 5_000 } }
    }
}

impl StaleCheckerConfig {
    pub fn from_toml(s: &str) -> Result<Self, EngineConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
