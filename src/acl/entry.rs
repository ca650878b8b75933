//! Access control entries as held by an assembled ACL

use crate::acl::identity::SecurityIdentity;
use crate::store::StoredEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How an entry's mask is compared with a requested mask
///
/// This is data for the permission granting strategy; nothing in this crate
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// All bits of the required mask must be set
    #[default]
    All,
    /// At least one bit of the required mask must be set
    Any,
    /// The masks must be equal
    Equal,
}

impl MatchStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::All => "all",
            MatchStrategy::Any => "any",
            MatchStrategy::Equal => "equal",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grant or deny rule for a security identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    id: u64,
    security_identity: Arc<SecurityIdentity>,
    mask: u32,
    granting: bool,
    strategy: MatchStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    audit_success: bool,
    audit_failure: bool,
    order: u32,
}

impl Entry {
    /// Build an entry from its stored row and the already materialized identity
    pub fn from_stored(stored: &StoredEntry, security_identity: Arc<SecurityIdentity>) -> Self {
        Self {
            id: stored.id,
            security_identity,
            mask: stored.mask,
            granting: stored.granting,
            strategy: stored.strategy,
            field: stored.field.clone(),
            audit_success: stored.audit_success,
            audit_failure: stored.audit_failure,
            order: stored.order,
        }
    }

    /// Storage key of the entry
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn security_identity(&self) -> &SecurityIdentity {
        &self.security_identity
    }

    pub(crate) fn shared_security_identity(&self) -> &Arc<SecurityIdentity> {
        &self.security_identity
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn is_granting(&self) -> bool {
        self.granting
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Field this entry is scoped to, `None` for object scoped entries
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn is_audit_success(&self) -> bool {
        self.audit_success
    }

    pub fn is_audit_failure(&self) -> bool {
        self.audit_failure
    }

    /// Evaluation order index as stored
    pub fn order(&self) -> u32 {
        self.order
    }
}
