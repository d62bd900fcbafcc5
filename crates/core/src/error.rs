// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error type for `jobq-core`.

use thiserror::Error;

/// Errors raised while building or decoding the shared data model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobqError {
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("unknown schedule kind: {0}")]
    UnknownScheduleKind(String),

    #[error("invalid schedule meta for {kind}: {reason}")]
    InvalidScheduleMeta { kind: String, reason: String },
}
