//! In-memory storage collaborator
//!
//! Keeps object identities, security identities and entries in insertion
//! order behind a single `RwLock`. Used by the CLI (via fixtures) and tests.

use crate::acl::{MatchStrategy, ObjectIdentity, SecurityIdentity, SecurityIdentityKind};
use crate::error::{StoreError, StoreResult};
use crate::store::{
    EntryStore, HierarchyStore, ObjectIdentityRecord, StoredEntry, StoredSecurityIdentity,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::RwLock;
use tracing::trace;

/// Entry to be inserted into a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub object_identity: ObjectIdentity,
    pub security_identity: SecurityIdentity,
    pub mask: u32,
    pub granting: bool,
    pub strategy: MatchStrategy,
    pub field: Option<String>,
    pub audit_success: bool,
    pub audit_failure: bool,
    /// Explicit order index; appended after existing entries when `None`
    pub order: Option<u32>,
}

impl NewEntry {
    /// A granting entry with the default strategy
    pub fn grant(object_identity: ObjectIdentity, security_identity: SecurityIdentity, mask: u32) -> Self {
        Self {
            object_identity,
            security_identity,
            mask,
            granting: true,
            strategy: MatchStrategy::default(),
            field: None,
            audit_success: false,
            audit_failure: false,
            order: None,
        }
    }

    /// A denying entry with the default strategy
    pub fn deny(object_identity: ObjectIdentity, security_identity: SecurityIdentity, mask: u32) -> Self {
        Self {
            granting: false,
            ..Self::grant(object_identity, security_identity, mask)
        }
    }

    /// Scope the entry to a field
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn audited(mut self, success: bool, failure: bool) -> Self {
        self.audit_success = success;
        self.audit_failure = failure;
        self
    }
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<ObjectIdentityRecord>,
    by_identity: HashMap<ObjectIdentity, u64>,
    security_identities: Vec<StoredSecurityIdentity>,
    sid_keys: HashMap<SecurityIdentity, u64>,
    entries: Vec<StoredEntry>,
}

impl Inner {
    fn record(&self, id: u64) -> Option<&ObjectIdentityRecord> {
        // keys are 1-based positions
        id.checked_sub(1).and_then(|idx| self.records.get(idx as usize))
    }

    fn intern_sid(&mut self, sid: &SecurityIdentity) -> StoredSecurityIdentity {
        if let Some(id) = self.sid_keys.get(sid) {
            return self.security_identities[(*id - 1) as usize].clone();
        }

        let stored = StoredSecurityIdentity {
            id: self.security_identities.len() as u64 + 1,
            identifier: sid.identifier().to_string(),
            username: sid.kind() == SecurityIdentityKind::User,
        };
        self.sid_keys.insert(sid.clone(), stored.id);
        self.security_identities.push(stored.clone());
        stored
    }

    fn direct_children(&self, parent_id: u64) -> impl Iterator<Item = &ObjectIdentityRecord> {
        self.records
            .iter()
            .filter(move |r| r.parent_id == Some(parent_id))
    }
}

/// In-memory [`HierarchyStore`] and [`EntryStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object identity, optionally below an already registered parent
    pub async fn insert_object_identity(
        &self,
        object_identity: ObjectIdentity,
        parent: Option<&ObjectIdentity>,
        entries_inheriting: bool,
    ) -> StoreResult<ObjectIdentityRecord> {
        let mut inner = self.inner.write().await;

        if inner.by_identity.contains_key(&object_identity) {
            return Err(StoreError::DuplicateObjectIdentity(object_identity));
        }

        let parent_id = match parent {
            Some(parent) => Some(
                *inner
                    .by_identity
                    .get(parent)
                    .ok_or_else(|| StoreError::UnknownObjectIdentity(parent.clone()))?,
            ),
            None => None,
        };

        let record = ObjectIdentityRecord {
            id: inner.records.len() as u64 + 1,
            object_identity,
            parent_id,
            entries_inheriting,
        };

        inner
            .by_identity
            .insert(record.object_identity.clone(), record.id);
        inner.records.push(record.clone());

        trace!(object = %record.object_identity, id = record.id, "Inserted object identity");
        Ok(record)
    }

    /// Add an entry to a registered object identity
    pub async fn insert_entry(&self, entry: NewEntry) -> StoreResult<StoredEntry> {
        let mut inner = self.inner.write().await;

        let object_identity_id = *inner
            .by_identity
            .get(&entry.object_identity)
            .ok_or_else(|| StoreError::UnknownObjectIdentity(entry.object_identity.clone()))?;

        let order = match entry.order {
            Some(order) => order,
            None => {
                let last = inner
                    .entries
                    .iter()
                    .filter(|e| e.object_identity_id == object_identity_id)
                    .map(|e| e.order)
                    .max();

                match last {
                    None => 0,
                    Some(last) => last.checked_add(1).ok_or_else(|| {
                        StoreError::OrderExhausted(entry.object_identity.clone())
                    })?,
                }
            }
        };

        let stored = StoredEntry {
            id: inner.entries.len() as u64 + 1,
            object_identity_id,
            security_identity: inner.intern_sid(&entry.security_identity),
            mask: entry.mask,
            granting: entry.granting,
            strategy: entry.strategy,
            field: entry.field,
            audit_success: entry.audit_success,
            audit_failure: entry.audit_failure,
            order,
        };

        inner.entries.push(stored.clone());
        Ok(stored)
    }

    /// Number of registered object identities
    pub async fn object_identity_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Number of stored entries
    pub async fn entry_count(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

#[async_trait]
impl HierarchyStore for MemoryStore {
    async fn locate(
        &self,
        object_identity: &ObjectIdentity,
    ) -> StoreResult<Option<ObjectIdentityRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_identity
            .get(object_identity)
            .and_then(|id| inner.record(*id))
            .cloned())
    }

    async fn children(
        &self,
        parent: &ObjectIdentityRecord,
        direct_only: bool,
    ) -> StoreResult<Vec<ObjectIdentityRecord>> {
        let inner = self.inner.read().await;

        if direct_only {
            return Ok(inner.direct_children(parent.id).cloned().collect());
        }

        // breadth first, each record visited once
        let mut visited = HashSet::from([parent.id]);
        let mut queue = VecDeque::from([parent.id]);
        let mut descendants = Vec::new();

        while let Some(id) = queue.pop_front() {
            for child in inner.direct_children(id) {
                if visited.insert(child.id) {
                    queue.push_back(child.id);
                    descendants.push(child.clone());
                }
            }
        }

        Ok(descendants)
    }

    async fn parent(
        &self,
        record: &ObjectIdentityRecord,
    ) -> StoreResult<Option<ObjectIdentityRecord>> {
        let inner = self.inner.read().await;
        Ok(record
            .parent_id
            .and_then(|id| inner.record(id))
            .cloned())
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn entries_for(
        &self,
        object_identity: &ObjectIdentity,
        sids: &[SecurityIdentity],
        limit_to_requesting: bool,
    ) -> StoreResult<Vec<StoredEntry>> {
        let inner = self.inner.read().await;

        let Some(object_identity_id) = inner.by_identity.get(object_identity).copied() else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<StoredEntry> = inner
            .entries
            .iter()
            .filter(|e| e.object_identity_id == object_identity_id)
            .filter(|e| {
                !limit_to_requesting || sids.iter().any(|sid| e.security_identity.matches(sid))
            })
            .cloned()
            .collect();

        // stable: ties keep insertion order
        entries.sort_by_key(|e| e.order);
        Ok(entries)
    }
}
