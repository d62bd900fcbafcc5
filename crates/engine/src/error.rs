// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use jobq_store::StoreError;

/// Fatal to a `JobDistributor`'s run loop: per SPEC_FULL.md §4.2, a failed
/// fetch propagates out of `start()` and the surrounding supervisor
/// restarts it. Nothing about dispatch/work failures lives here — those go
/// to the `ErrorSink` instead.
#[derive(Debug, thiserror::Error)]
pub enum DistributorError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
