// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The set of tenants a worker serves (SPEC_FULL.md §9, "Lazy tenant
//! generator → restartable iterator").

use std::collections::VecDeque;

use jobq_core::TenantId;

/// Called once per sweep. A finite source yields the same batch every call
/// (restartable); an exhausting source may shrink progressively or stop —
/// an empty batch ends that source's contribution for the sweep, but the
/// distributor keeps calling on the next one.
pub trait TenantSource: Send {
    fn next_batch(&mut self) -> Vec<TenantId>;
}

/// Serves a fixed set of tenants forever.
pub struct StaticTenantSource(Vec<TenantId>);

impl StaticTenantSource {
    pub fn new(tenants: impl IntoIterator<Item = TenantId>) -> Self {
        Self(tenants.into_iter().collect())
    }
}

impl TenantSource for StaticTenantSource {
    fn next_batch(&mut self) -> Vec<TenantId> {
        self.0.clone()
    }
}

/// Test source that yields a scripted sequence of batches, then repeats the
/// last one — lets a cluster-fairness test control each sweep exactly.
#[cfg(any(test, feature = "test-support"))]
pub struct ScriptedTenantSource {
    batches: VecDeque<Vec<TenantId>>,
    last: Vec<TenantId>,
}

#[cfg(any(test, feature = "test-support"))]
impl ScriptedTenantSource {
    pub fn new(batches: impl IntoIterator<Item = Vec<TenantId>>) -> Self {
        Self { batches: batches.into_iter().collect(), last: Vec::new() }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TenantSource for ScriptedTenantSource {
    fn next_batch(&mut self) -> Vec<TenantId> {
        match self.batches.pop_front() {
            Some(batch) => {
                self.last = batch.clone();
                batch
            }
            None => self.last.clone(),
        }
    }
}
