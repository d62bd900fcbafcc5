// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire encoding of a [`Job`] into the string-valued hash fields a real
//! backing store would hold at `job:{fingerprint}` (SPEC_FULL.md §6).

use std::collections::HashMap;

use base64::Engine;
use jobq_core::{Job, JobId, QueueName, Schedule, TenantId};

use crate::error::StoreError;

const F_ID: &str = "id";
const F_QUEUE: &str = "queue";
const F_TENANT: &str = "tenant";
const F_PAYLOAD: &str = "payload";
const F_RUN_AT: &str = "runAt";
const F_SCHEDULE_TYPE: &str = "schedule_type";
const F_SCHEDULE_META: &str = "schedule_meta";
const F_SCHEDULE_LAST: &str = "schedule_last";
const F_RETRY: &str = "retry";
const F_COUNT: &str = "count";
const F_MAX_TIMES: &str = "max_times";
const F_EXCLUSIVE: &str = "exclusive";

/// A job, encoded the way a real backing-store hash would hold it: every
/// value is a string. Owns the typed decoding back into [`Job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord(HashMap<String, String>);

impl JobRecord {
    pub fn encode(job: &Job) -> Self {
        let mut fields = HashMap::new();
        fields.insert(F_ID.to_string(), job.id.as_str().to_string());
        fields.insert(F_QUEUE.to_string(), job.queue.as_str().to_string());
        fields.insert(F_TENANT.to_string(), job.tenant.as_str().to_string());
        fields.insert(F_PAYLOAD.to_string(), base64::engine::general_purpose::STANDARD.encode(&job.payload));
        fields.insert(F_RUN_AT.to_string(), job.run_at.to_string());
        if let Some(schedule) = &job.schedule {
            fields.insert(F_SCHEDULE_TYPE.to_string(), schedule.kind.clone());
            fields.insert(F_SCHEDULE_META.to_string(), schedule.meta.clone());
            if let Some(last) = schedule.last_fire_time {
                fields.insert(F_SCHEDULE_LAST.to_string(), last.to_string());
            }
        }
        if !job.retry.is_empty() {
            let joined = job.retry.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
            fields.insert(F_RETRY.to_string(), joined);
        }
        fields.insert(F_COUNT.to_string(), job.count.to_string());
        if let Some(max) = job.max_times {
            fields.insert(F_MAX_TIMES.to_string(), max.to_string());
        }
        fields.insert(F_EXCLUSIVE.to_string(), if job.exclusive { "1" } else { "0" }.to_string());
        Self(fields)
    }

    pub fn decode(&self) -> Result<Job, StoreError> {
        let malformed = |field: &str| StoreError::TransientStoreError(format!("malformed job record: missing or invalid {field}"));

        let id = self.0.get(F_ID).ok_or_else(|| malformed(F_ID))?;
        let queue = self.0.get(F_QUEUE).ok_or_else(|| malformed(F_QUEUE))?;
        let tenant = self.0.get(F_TENANT).ok_or_else(|| malformed(F_TENANT))?;
        let payload_b64 = self.0.get(F_PAYLOAD).ok_or_else(|| malformed(F_PAYLOAD))?;
        let payload = base64::engine::general_purpose::STANDARD
            .decode(payload_b64)
            .map_err(|_| malformed(F_PAYLOAD))?;
        let run_at: i64 = self
            .0
            .get(F_RUN_AT)
            .ok_or_else(|| malformed(F_RUN_AT))?
            .parse()
            .map_err(|_| malformed(F_RUN_AT))?;
        let count: i64 = self
            .0
            .get(F_COUNT)
            .ok_or_else(|| malformed(F_COUNT))?
            .parse()
            .map_err(|_| malformed(F_COUNT))?;
        let exclusive = match self.0.get(F_EXCLUSIVE).map(String::as_str) {
            Some("1") => true,
            Some("0") | None => false,
            Some(_) => return Err(malformed(F_EXCLUSIVE)),
        };
        let max_times = self
            .0
            .get(F_MAX_TIMES)
            .map(|s| s.parse::<i64>().map_err(|_| malformed(F_MAX_TIMES)))
            .transpose()?;
        let retry = match self.0.get(F_RETRY) {
            Some(s) if !s.is_empty() => s
                .split(',')
                .map(|part| part.parse::<i64>().map_err(|_| malformed(F_RETRY)))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        let schedule = match self.0.get(F_SCHEDULE_TYPE) {
            Some(kind) => {
                let meta = self.0.get(F_SCHEDULE_META).ok_or_else(|| malformed(F_SCHEDULE_META))?;
                let last_fire_time = self
                    .0
                    .get(F_SCHEDULE_LAST)
                    .map(|s| s.parse::<i64>().map_err(|_| malformed(F_SCHEDULE_LAST)))
                    .transpose()?;
                Some(Schedule { kind: kind.clone(), meta: meta.clone(), last_fire_time })
            }
            None => None,
        };

        Ok(Job {
            tenant: TenantId::from(tenant.as_str()),
            queue: QueueName::from(queue.as_str()),
            id: JobId::from(id.as_str()),
            payload,
            run_at,
            schedule,
            retry,
            count,
            max_times,
            exclusive,
        })
    }
}
