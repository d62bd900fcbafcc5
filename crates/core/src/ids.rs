// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-supplied identifiers.
//!
//! Unlike internally-generated IDs (agent ids, run ids — the kind of thing
//! `define_id!` nanoid-stamps elsewhere in this workspace), tenant, queue and
//! job identities here are chosen by the producer. These are thin string
//! newtypes, not random-id generators.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(SmolStr);

        impl $name {
            pub fn new(id: impl Into<SmolStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(SmolStr::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(SmolStr::from(s))
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0.as_str() == *other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

string_id!(TenantId, "Logical partition over all queues. The empty string is the default tenant.");
string_id!(QueueName, "Named stream within a tenant; jobs in a queue share an identity namespace.");
string_id!(JobId, "Caller-chosen identity of a job, unique within `(tenant, queue)`.");

impl Default for TenantId {
    /// The empty string is the default tenant (§6: "empty string = default tenant").
    fn default() -> Self {
        Self(SmolStr::new_static(""))
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
