// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration-string parsing shared by config loading and the `"every"`
//! schedule kind.

use crate::error::JobqError;

/// Parse a duration string like `"30s"`, `"5m"`, `"1h"`, `"500ms"` into
/// milliseconds. A bare number with no suffix is interpreted as seconds.
pub fn parse_duration(s: &str) -> Result<i64, JobqError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(JobqError::InvalidDuration("empty duration string".to_string()));
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: i64 = num_str
        .parse()
        .map_err(|_| JobqError::InvalidDuration(format!("invalid number in duration: {s}")))?;

    let ms_per_unit: i64 = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => 1,
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000,
        "d" | "day" | "days" => 86_400_000,
        other => {
            return Err(JobqError::InvalidDuration(format!("unknown duration suffix: {other}")))
        }
    };

    Ok(num * ms_per_unit)
}
