//! Security identity materialization
//!
//! Stored security identity rows are turned into [`SecurityIdentity`] values
//! once per resolution call. The arena is keyed by the storage key, so two
//! rows for the same logical identity share one materialized value.

use crate::acl::{Entry, SecurityIdentity};
use crate::store::{StoredEntry, StoredSecurityIdentity};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Map a stored row to its resolution-time identity
pub fn materialize(stored: &StoredSecurityIdentity) -> SecurityIdentity {
    SecurityIdentity::from_parts(stored.kind(), stored.identifier.as_str())
}

/// Call-scoped materialization cache
///
/// Created by one top-level resolution and passed down through ancestor
/// resolution; never shared between calls.
#[derive(Debug, Default)]
pub struct SidArena {
    materialized: HashMap<u64, Arc<SecurityIdentity>>,
}

impl SidArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialized identity for a stored row, materializing it on first use
    pub fn get_or_materialize(&mut self, stored: &StoredSecurityIdentity) -> Arc<SecurityIdentity> {
        self.materialized
            .entry(stored.id)
            .or_insert_with(|| Arc::new(materialize(stored)))
            .clone()
    }

    /// Convert stored entries, preserving order
    ///
    /// Also returns the distinct identities the entries reference, in order
    /// of first appearance.
    pub fn materialize_entries(
        &mut self,
        stored: &[StoredEntry],
    ) -> (Vec<Entry>, Vec<Arc<SecurityIdentity>>) {
        let mut entries = Vec::with_capacity(stored.len());
        let mut identities = Vec::new();
        let mut seen = HashSet::new();

        for row in stored {
            let sid = self.get_or_materialize(&row.security_identity);
            if seen.insert(row.security_identity.id) {
                identities.push(sid.clone());
            }
            entries.push(Entry::from_stored(row, sid));
        }

        (entries, identities)
    }

    /// Number of identities materialized so far
    pub fn len(&self) -> usize {
        self.materialized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materialized.is_empty()
    }
}
