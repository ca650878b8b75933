//! Storage collaborator
//!
//! The resolution engine reads object identities, their hierarchy and their
//! entries through the traits defined here. Storage owns its own consistency;
//! the engine performs plain sequential reads.
//!
//! [`MemoryStore`] is a reference implementation, and [`StoreFixture`] loads
//! one from TOML.

pub mod fixture;
pub mod memory;

pub use fixture::StoreFixture;
pub use memory::{MemoryStore, NewEntry};

use crate::acl::{MatchStrategy, ObjectIdentity, SecurityIdentity, SecurityIdentityKind};
use crate::error::StoreResult;
// async_trait required for dyn-compatibility with Arc<dyn AclStore>
use async_trait::async_trait;

/// Stored hierarchy record of an object identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentityRecord {
    /// Storage key
    pub id: u64,
    pub object_identity: ObjectIdentity,
    /// Storage key of the parent record, if linked
    pub parent_id: Option<u64>,
    pub entries_inheriting: bool,
}

/// Stored security identity row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecurityIdentity {
    /// Storage key, unique per logical identity
    pub id: u64,
    pub identifier: String,
    /// `true` for users, `false` for roles
    pub username: bool,
}

impl StoredSecurityIdentity {
    pub fn kind(&self) -> SecurityIdentityKind {
        if self.username {
            SecurityIdentityKind::User
        } else {
            SecurityIdentityKind::Role
        }
    }

    /// Check whether this row stores the given identity
    pub fn matches(&self, sid: &SecurityIdentity) -> bool {
        self.kind() == sid.kind() && self.identifier == sid.identifier()
    }
}

/// Stored access control entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Storage key
    pub id: u64,
    /// Storage key of the owning object identity record
    pub object_identity_id: u64,
    pub security_identity: StoredSecurityIdentity,
    pub mask: u32,
    pub granting: bool,
    pub strategy: MatchStrategy,
    /// Field name for field scoped entries
    pub field: Option<String>,
    pub audit_success: bool,
    pub audit_failure: bool,
    /// Evaluation order index
    pub order: u32,
}

/// Object identity hierarchy lookups
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// Find the record for an object identity. Absence is `Ok(None)`.
    async fn locate(&self, object_identity: &ObjectIdentity)
    -> StoreResult<Option<ObjectIdentityRecord>>;

    /// Direct children when `direct_only`, otherwise all descendants
    async fn children(
        &self,
        parent: &ObjectIdentityRecord,
        direct_only: bool,
    ) -> StoreResult<Vec<ObjectIdentityRecord>>;

    /// Parent record, if one is linked
    async fn parent(&self, record: &ObjectIdentityRecord)
    -> StoreResult<Option<ObjectIdentityRecord>>;
}

/// Access control entry lookups
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Entries of an object identity in evaluation order
    ///
    /// With `limit_to_requesting` only entries of one of `sids` are returned,
    /// otherwise all entries of the object identity.
    async fn entries_for(
        &self,
        object_identity: &ObjectIdentity,
        sids: &[SecurityIdentity],
        limit_to_requesting: bool,
    ) -> StoreResult<Vec<StoredEntry>>;
}

/// Everything the resolution engine reads
pub trait AclStore: HierarchyStore + EntryStore {}

impl<T: HierarchyStore + EntryStore + ?Sized> AclStore for T {}
