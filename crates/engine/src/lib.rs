// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workers, distribution, acknowledgement, stale reclamation and the
//! producer-side API built on top of `jobq-store` (SPEC_FULL.md §4).

mod acknowledger;
mod activity;
mod config;
mod distributor;
mod error;
mod error_sink;
mod outcome;
mod producer;
mod stale_checker;
mod tenant_source;
mod timer;
mod wake;
mod worker;

pub use acknowledger::{AckOptions, Acknowledger};
pub use activity::Activity;
pub use config::{DistributorConfig, StaleCheckInterval, StaleCheckerConfig};
pub use distributor::{Dispatch, Fetcher, JobDistributor, RepositoryFetcher, WorkFn};
pub use error::{DistributorError, EngineConfigError};
pub use error_sink::{EngineError, ErrorSink, TracingErrorSink};
pub use outcome::{BoxFuture, FetchOutcome};
pub use producer::Producer;
pub use stale_checker::StaleChecker;
pub use tenant_source::{StaticTenantSource, TenantSource};
pub use timer::{Timer, TokioTimer};
pub use wake::{BackingStoreWakeSource, NoWake, WakeSource};
pub use worker::{auto_ack_work_fn, processor_work_fn};

#[cfg(any(test, feature = "test-support"))]
pub use error_sink::BufferErrorSink;
#[cfg(any(test, feature = "test-support"))]
pub use tenant_source::ScriptedTenantSource;
#[cfg(any(test, feature = "test-support"))]
pub use timer::ManualTimer;
#[cfg(any(test, feature = "test-support"))]
pub use wake::ManualWake;
