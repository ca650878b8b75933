//! Hierarchical ACL provider
//!
//! Resolves access control lists for hierarchically organized protected
//! objects, for a set of requesting users and roles.
//!
//! ## Features
//!
//! - **Ancestor resolution** - every ACL links the full ACL of its parent object
//! - **Tolerant inheritance** - parents without entries do not fail the child
//! - **Requester filtering** - load only the entries of the requesting identities
//! - **All-or-nothing batches** - resolve many objects atomically
//! - **Pluggable storage** via the [`store::HierarchyStore`] and [`store::EntryStore`] traits
//!
//! ## Example
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let provider = AclProvider::new(store);
//!
//! let acl = provider
//!     .resolve(&ObjectIdentity::new("42", "Document"), &[SecurityIdentity::user("alice")])
//!     .await?;
//!
//! for entry in acl.object_aces() {
//!     println!("{} {} {}", entry.security_identity(), entry.mask(), entry.is_granting());
//! }
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod provider;
pub mod store;

// Re-export main types
pub use acl::{Acl, Entry, ObjectIdentity, PermissionGrantingStrategy, SecurityIdentity};
pub use config::{AppConfig, load_config};
pub use error::{AclError, AclNotFound, AppError, NotFoundReason, Result};
pub use provider::AclProvider;
pub use store::{MemoryStore, StoreFixture};
