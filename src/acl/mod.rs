//! ACL domain types
//!
//! Object and security identities, access control entries and the assembled
//! [`Acl`] value handed to a permission granting strategy.
//!
//! ## Inheritance
//!
//! ```text
//! Folder:1  (ROLE_ADMIN = 7)
//!    └── Document:42  (ROLE_ADMIN = 7, user:alice = 1, inheriting)
//! ```
//!
//! Every ACL keeps a reference to its parent's ACL. Whether evaluation walks
//! up to that parent is governed by the child's `entries_inheriting` flag.

pub mod assembly;
pub mod entry;
pub mod identity;
pub mod model;
pub mod strategy;

pub use assembly::assemble;
pub use entry::{Entry, MatchStrategy};
pub use identity::{ObjectIdentity, SecurityIdentity, SecurityIdentityKind};
pub use model::Acl;
pub use strategy::{PermissionGrantingStrategy, SharedStrategy};
