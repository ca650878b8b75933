//! ACL assembly
//!
//! Pure construction of an [`Acl`] from already resolved parts. No lookups
//! happen here.

use crate::acl::entry::Entry;
use crate::acl::identity::{ObjectIdentity, SecurityIdentity};
use crate::acl::model::Acl;
use crate::acl::strategy::SharedStrategy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Assemble an ACL
///
/// Entries are split into object scoped and field scoped groups. Relative
/// order within each group is the order of `entries`; nothing is dropped.
pub fn assemble(
    entries: Vec<Entry>,
    object_identity: ObjectIdentity,
    security_identities: Vec<Arc<SecurityIdentity>>,
    parent: Option<Arc<Acl>>,
    entries_inheriting: bool,
    strategy: Option<SharedStrategy>,
) -> Acl {
    let mut object_aces = Vec::with_capacity(entries.len());
    let mut field_aces: BTreeMap<String, Vec<Entry>> = BTreeMap::new();

    for entry in entries {
        match entry.field() {
            Some(field) => field_aces.entry(field.to_string()).or_default().push(entry),
            None => object_aces.push(entry),
        }
    }

    Acl {
        object_identity,
        object_aces,
        field_aces,
        security_identities,
        parent,
        entries_inheriting,
        strategy,
    }
}
