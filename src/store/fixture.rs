//! TOML fixtures for the in-memory store
//!
//! ```toml
//! [[object_identities]]
//! object = "Folder:1"
//!
//! [[object_identities]]
//! object = "Document:42"
//! parent = "Folder:1"
//! inheriting = true
//!
//! [[entries]]
//! object = "Document:42"
//! sid = "role:ADMIN"
//! mask = 7
//! ```
//!
//! Object identities may be listed in any order; parents are registered first.

use crate::acl::{MatchStrategy, ObjectIdentity, SecurityIdentity};
use crate::error::{StoreError, StoreResult};
use crate::store::HierarchyStore;
use crate::store::memory::{MemoryStore, NewEntry};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Root of a fixture document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreFixture {
    pub object_identities: Vec<ObjectIdentityFixture>,
    pub entries: Vec<EntryFixture>,
}

/// One object identity, written `type:identifier`
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectIdentityFixture {
    pub object: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_inheriting")]
    pub inheriting: bool,
}

/// One entry; `sid` is written `user:<id>` or `role:<id>`
#[derive(Debug, Clone, Deserialize)]
pub struct EntryFixture {
    pub object: String,
    pub sid: String,
    pub mask: u32,
    #[serde(default = "default_granting")]
    pub granting: bool,
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub audit_success: bool,
    #[serde(default)]
    pub audit_failure: bool,
    #[serde(default)]
    pub order: Option<u32>,
}

fn default_inheriting() -> bool {
    true
}

fn default_granting() -> bool {
    true
}

fn parse_object(s: &str) -> StoreResult<ObjectIdentity> {
    s.parse().map_err(StoreError::Fixture)
}

impl StoreFixture {
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Fixture(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Build a fresh store holding this fixture
    pub async fn into_store(self) -> StoreResult<MemoryStore> {
        let store = MemoryStore::new();
        self.load_into(&store).await?;
        Ok(store)
    }

    /// Insert the fixture's object identities and entries into `store`
    pub async fn load_into(&self, store: &MemoryStore) -> StoreResult<()> {
        let mut pending = Vec::with_capacity(self.object_identities.len());
        for oid in &self.object_identities {
            let parent = oid.parent.as_deref().map(parse_object).transpose()?;
            pending.push((parse_object(&oid.object)?, parent, oid.inheriting));
        }

        // insert in passes until every parent is known
        while !pending.is_empty() {
            let mut deferred = Vec::new();
            let before = pending.len();

            for (object, parent, inheriting) in pending {
                let parent_known = match &parent {
                    Some(parent) => store.locate(parent).await?.is_some(),
                    None => true,
                };

                if parent_known {
                    store
                        .insert_object_identity(object, parent.as_ref(), inheriting)
                        .await?;
                } else {
                    deferred.push((object, parent, inheriting));
                }
            }

            if deferred.len() == before {
                let (object, parent, _) = &deferred[0];
                return Err(StoreError::Fixture(format!(
                    "parent of {} is unknown or cyclic: {}",
                    object,
                    parent.as_ref().map(ToString::to_string).unwrap_or_default()
                )));
            }
            pending = deferred;
        }

        for entry in &self.entries {
            let sid: SecurityIdentity = entry.sid.parse().map_err(StoreError::Fixture)?;
            store
                .insert_entry(NewEntry {
                    object_identity: parse_object(&entry.object)?,
                    security_identity: sid,
                    mask: entry.mask,
                    granting: entry.granting,
                    strategy: entry.strategy,
                    field: entry.field.clone(),
                    audit_success: entry.audit_success,
                    audit_failure: entry.audit_failure,
                    order: entry.order,
                })
                .await?;
        }

        debug!(
            object_identities = self.object_identities.len(),
            entries = self.entries.len(),
            "Loaded store fixture"
        );
        Ok(())
    }
}
