//! Permission granting strategy seam
//!
//! The strategy turns an ACL plus requested masks into an allow/deny decision.
//! This crate only carries the strategy inside assembled ACLs; implementations
//! live with the caller.

use crate::acl::identity::SecurityIdentity;
use crate::acl::model::Acl;
use crate::error::AclResult;
use std::sync::Arc;

/// Evaluates permissions against an assembled ACL
pub trait PermissionGrantingStrategy: Send + Sync {
    /// Decide whether any of `masks` is granted to any of `sids` on the object
    ///
    /// Implementations return [`AclError::NoAceFound`](crate::error::AclError::NoAceFound)
    /// when no entry applies. When the ACL is inheriting, the parent is
    /// available through [`Acl::inherited_parent`].
    fn is_granted(
        &self,
        acl: &Acl,
        masks: &[u32],
        sids: &[SecurityIdentity],
        administrative_mode: bool,
    ) -> AclResult<bool>;

    /// Same as [`is_granted`](Self::is_granted) for entries scoped to `field`
    fn is_field_granted(
        &self,
        acl: &Acl,
        field: &str,
        masks: &[u32],
        sids: &[SecurityIdentity],
        administrative_mode: bool,
    ) -> AclResult<bool>;
}

/// Shared strategy handle, as carried by every ACL of one provider
pub type SharedStrategy = Arc<dyn PermissionGrantingStrategy>;
