//! ACL provider
//!
//! Builds fully formed [`Acl`](crate::acl::Acl)s from a storage collaborator.
//!
//! ## Resolution Model
//!
//! ```text
//! resolve(Document:42, [user:alice])
//!   ├── entries of Document:42 for user:alice
//!   └── resolve(Folder:1, [])          full ACL, filter never applies to ancestors
//!         └── resolve(Root:0, [])      no entries yet: parent = None, not an error
//! ```
//!
//! Only "no ACL found" from an ancestor is tolerated; storage failures and
//! inconsistencies always propagate. Batch resolution is all or nothing.

pub mod materializer;
pub mod resolver;

pub use materializer::{SidArena, materialize};
pub use resolver::AclProvider;
