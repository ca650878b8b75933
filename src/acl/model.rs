//! The resolved, in-memory ACL

use crate::acl::entry::Entry;
use crate::acl::identity::{ObjectIdentity, SecurityIdentity};
use crate::acl::strategy::SharedStrategy;
use crate::error::{AclError, AclResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Access control list of one object identity
///
/// An ACL is a read-only snapshot. Its parent is shared with every other ACL
/// resolved in the same call and outlives none of them in particular.
///
/// When `entries_inheriting` is false the parent is still populated, but
/// permission evaluation must not consult it; see [`Acl::inherited_parent`].
#[derive(Clone, Serialize)]
pub struct Acl {
    pub(super) object_identity: ObjectIdentity,
    pub(super) object_aces: Vec<Entry>,
    pub(super) field_aces: BTreeMap<String, Vec<Entry>>,
    pub(super) security_identities: Vec<Arc<SecurityIdentity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) parent: Option<Arc<Acl>>,
    pub(super) entries_inheriting: bool,
    #[serde(skip)]
    pub(super) strategy: Option<SharedStrategy>,
}

impl Acl {
    pub fn object_identity(&self) -> &ObjectIdentity {
        &self.object_identity
    }

    /// Object scoped entries in evaluation order
    pub fn object_aces(&self) -> &[Entry] {
        &self.object_aces
    }

    /// Entries scoped to `field` in evaluation order, empty if there are none
    pub fn field_aces(&self, field: &str) -> &[Entry] {
        self.field_aces.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all fields carrying entries
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_aces.keys().map(String::as_str)
    }

    /// Number of entries, object and field scoped
    pub fn entry_count(&self) -> usize {
        self.object_aces.len() + self.field_aces.values().map(Vec::len).sum::<usize>()
    }

    /// Distinct security identities referenced by this ACL's entries
    pub fn security_identities(&self) -> impl ExactSizeIterator<Item = &SecurityIdentity> {
        self.security_identities.iter().map(Arc::as_ref)
    }

    /// Check whether every given security identity has entries in this ACL
    pub fn is_sid_loaded(&self, sids: &[SecurityIdentity]) -> bool {
        sids.iter()
            .all(|sid| self.security_identities.iter().any(|known| known.as_ref() == sid))
    }

    /// Check whether any object or field entry belongs to `sid`
    pub fn has_entries_for(&self, sid: &SecurityIdentity) -> bool {
        self.object_aces
            .iter()
            .chain(self.field_aces.values().flatten())
            .any(|entry| entry.security_identity() == sid)
    }

    /// Parent ACL, regardless of the inheriting flag
    pub fn parent_acl(&self) -> Option<&Acl> {
        self.parent.as_deref()
    }

    /// Parent ACL that evaluation should consult, `None` unless inheriting
    pub fn inherited_parent(&self) -> Option<&Acl> {
        if self.entries_inheriting {
            self.parent_acl()
        } else {
            None
        }
    }

    pub fn is_entries_inheriting(&self) -> bool {
        self.entries_inheriting
    }

    /// Delegate an object level decision to the attached strategy
    pub fn is_granted(
        &self,
        masks: &[u32],
        sids: &[SecurityIdentity],
        administrative_mode: bool,
    ) -> AclResult<bool> {
        self.strategy()?
            .is_granted(self, masks, sids, administrative_mode)
    }

    /// Delegate a field level decision to the attached strategy
    pub fn is_field_granted(
        &self,
        field: &str,
        masks: &[u32],
        sids: &[SecurityIdentity],
        administrative_mode: bool,
    ) -> AclResult<bool> {
        self.strategy()?
            .is_field_granted(self, field, masks, sids, administrative_mode)
    }

    fn strategy(&self) -> AclResult<&SharedStrategy> {
        self.strategy
            .as_ref()
            .ok_or_else(|| AclError::StrategyNotConfigured(self.object_identity.clone()))
    }
}

/// Strategies are compared by handle, everything else by value
impl PartialEq for Acl {
    fn eq(&self, other: &Self) -> bool {
        let same_strategy = match (&self.strategy, &other.strategy) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        same_strategy
            && self.object_identity == other.object_identity
            && self.object_aces == other.object_aces
            && self.field_aces == other.field_aces
            && self.security_identities == other.security_identities
            && self.parent == other.parent
            && self.entries_inheriting == other.entries_inheriting
    }
}

impl fmt::Debug for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acl")
            .field("object_identity", &self.object_identity)
            .field("object_aces", &self.object_aces)
            .field("field_aces", &self.field_aces)
            .field("security_identities", &self.security_identities)
            .field("parent", &self.parent)
            .field("entries_inheriting", &self.entries_inheriting)
            .field("strategy", &self.strategy.is_some())
            .finish()
    }
}
