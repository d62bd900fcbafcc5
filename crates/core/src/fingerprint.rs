// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable backing-store key derived from a job's `(tenant, queue, id)`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::ids::{JobId, QueueName, TenantId};

/// `hash(tenant, queue, id)` — the key under which `scheduled`, `pending`
/// and `processing` reference a job, and under which `job:{fp}` is stored.
///
/// Hex-encoded SHA-256 truncated to 16 bytes (32 hex chars): collision-safe
/// for any realistic job population while staying short enough to embed in
/// sorted-set members and hash keys without bloating the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn of(tenant: &TenantId, queue: &QueueName, id: &JobId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(tenant.as_str().as_bytes());
        hasher.update(0u8.to_le_bytes());
        hasher.update(queue.as_str().as_bytes());
        hasher.update(0u8.to_le_bytes());
        hasher.update(id.as_str().as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(bytes)
    }

    pub fn to_hex(self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
