// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tagged outcome of a single fetch attempt (SPEC_FULL.md §9, "Dynamic
//! outcome tagging → sum type").

use std::fmt;
use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a tenant's fetch attempt produced. Pattern-matched exhaustively by
/// the distributor loop.
pub enum FetchOutcome<J> {
    Success(J),
    Empty,
    /// Holds an awaitable the caller awaits in-place for that tenant's
    /// slot; other tenants continue independently.
    Wait(BoxFuture<'static, ()>),
    /// Advance to the next tenant without busy-looping on this one.
    Retry,
}

impl<J: fmt::Debug> fmt::Debug for FetchOutcome<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(job) => f.debug_tuple("Success").field(job).finish(),
            Self::Empty => write!(f, "Empty"),
            Self::Wait(_) => write!(f, "Wait(..)"),
            Self::Retry => write!(f, "Retry"),
        }
    }
}
