// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScheduleMap`: a registry of named, pure `(lastFireTime, meta) ->
//! nextFireTime | null` functions.
//!
//! Schedule functions must be pure and total over valid input — no clock
//! reads, no I/O. `ScheduleEngine` (in `jobq-store`) calls through this
//! registry from inside the `acknowledge` transition.

use std::collections::HashMap;
use std::sync::Arc;

use crate::duration::parse_duration;
use crate::error::JobqError;

/// `None` means "terminate the schedule" (the `null` of the distilled spec).
pub type NextFire = Option<i64>;

type ScheduleFn = Arc<dyn Fn(i64, &str) -> Result<NextFire, JobqError> + Send + Sync>;

/// Registry mapping a schedule's `kind` string to its next-fire function.
#[derive(Clone)]
pub struct ScheduleMap {
    fns: HashMap<String, ScheduleFn>,
}

impl ScheduleMap {
    /// Empty registry — no schedule kinds known.
    pub fn empty() -> Self {
        Self { fns: HashMap::new() }
    }

    /// Registry with the two built-in kinds: `"every"` and `"cron"`.
    pub fn with_defaults() -> Self {
        let mut map = Self::empty();
        map.register("every", every_schedule);
        map.register("cron", cron_schedule);
        map
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        f: impl Fn(i64, &str) -> Result<NextFire, JobqError> + Send + Sync + 'static,
    ) {
        self.fns.insert(kind.into(), Arc::new(f));
    }

    /// Compute the next fire time for `kind` given the last fire time and
    /// that schedule's meta string. Returns `UnknownScheduleKind` if `kind`
    /// was never registered.
    pub fn next_fire(&self, kind: &str, last_fire_time: i64, meta: &str) -> Result<NextFire, JobqError> {
        let f = self
            .fns
            .get(kind)
            .ok_or_else(|| JobqError::UnknownScheduleKind(kind.to_string()))?;
        f(last_fire_time, meta)
    }
}

impl Default for ScheduleMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// `"every"` — meta is a duration string (`"30s"`, `"5m"`, `"500ms"`, or a
/// bare number of seconds). Fires at a fixed interval indefinitely.
fn every_schedule(last_fire_time: i64, meta: &str) -> Result<NextFire, JobqError> {
    let interval_ms = parse_duration(meta).map_err(|e| JobqError::InvalidScheduleMeta {
        kind: "every".to_string(),
        reason: e.to_string(),
    })?;
    if interval_ms <= 0 {
        return Err(JobqError::InvalidScheduleMeta {
            kind: "every".to_string(),
            reason: "interval must be positive".to_string(),
        });
    }
    Ok(Some(last_fire_time + interval_ms))
}

const DAY_MS: i64 = 86_400_000;

/// `"cron"` — meta is `"HH:MM"` in UTC wall-clock time. Fires at the first
/// occurrence of that time strictly after `last_fire_time`. A restricted
/// daily cadence, not a full five-field cron grammar (see SPEC_FULL.md §4.6).
fn cron_schedule(last_fire_time: i64, meta: &str) -> Result<NextFire, JobqError> {
    let time_of_day_ms = parse_hh_mm(meta)?;
    let last_day_start = last_fire_time.div_euclid(DAY_MS) * DAY_MS;
    let mut candidate = last_day_start + time_of_day_ms;
    if candidate <= last_fire_time {
        candidate += DAY_MS;
    }
    Ok(Some(candidate))
}

fn parse_hh_mm(meta: &str) -> Result<i64, JobqError> {
    let bad = || JobqError::InvalidScheduleMeta {
        kind: "cron".to_string(),
        reason: format!("expected \"HH:MM\", got {meta:?}"),
    };
    let (h, m) = meta.split_once(':').ok_or_else(bad)?;
    let h: i64 = h.parse().map_err(|_| bad())?;
    let m: i64 = m.parse().map_err(|_| bad())?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return Err(bad());
    }
    Ok(h * 3_600_000 + m * 60_000)
}
