//! Error types for acl-provider
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary converts them into `anyhow` errors at the edge.

use crate::acl::ObjectIdentity;
use std::fmt;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("ACL error: {0}")]
    Acl(#[from] AclError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a storage collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object identity {0} is already registered")]
    DuplicateObjectIdentity(ObjectIdentity),

    #[error("Object identity {0} is not registered")]
    UnknownObjectIdentity(ObjectIdentity),

    #[error("No order index left after the last entry of {0}")]
    OrderExhausted(ObjectIdentity),

    #[error("Invalid fixture: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Why no ACL could be found for an object identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No entries exist for the object identity at all
    NoAcl,
    /// Entries exist, but none belong to the requesting security identities
    NoMatchingEntries,
}

impl NotFoundReason {
    /// Human readable hint for the caller
    pub const fn hint(&self) -> &'static str {
        match self {
            NotFoundReason::NoAcl => {
                "there is no ACL available for this object identity, create one first"
            }
            NotFoundReason::NoMatchingEntries => {
                "there is no ACL for this object identity and the given security identities, \
                 retrieve the ACL without a security identity filter and add entries for them"
            }
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hint())
    }
}

/// No entries were found for an object identity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No ACL found for {object_identity}: {reason}")]
pub struct AclNotFound {
    pub object_identity: ObjectIdentity,
    pub reason: NotFoundReason,
}

impl AclNotFound {
    pub fn new(object_identity: ObjectIdentity, reason: NotFoundReason) -> Self {
        Self {
            object_identity,
            reason,
        }
    }

    pub fn no_acl(object_identity: ObjectIdentity) -> Self {
        Self::new(object_identity, NotFoundReason::NoAcl)
    }

    pub fn no_matching_entries(object_identity: ObjectIdentity) -> Self {
        Self::new(object_identity, NotFoundReason::NoMatchingEntries)
    }

    /// Pick the reason from whether a security identity filter was supplied
    pub fn for_filter(object_identity: ObjectIdentity, filtered: bool) -> Self {
        if filtered {
            Self::no_matching_entries(object_identity)
        } else {
            Self::no_acl(object_identity)
        }
    }
}

/// ACL resolution and evaluation errors
#[derive(Error, Debug)]
pub enum AclError {
    #[error(transparent)]
    NotFound(#[from] AclNotFound),

    /// Entries were found but the hierarchy record they hang off is missing
    #[error("Inconsistent storage: entries exist for {object_identity} but its hierarchy record is missing")]
    InconsistentHierarchy { object_identity: ObjectIdentity },

    /// The hierarchy record names a parent that storage cannot return
    #[error("Inconsistent storage: parent record {parent_id} of {object_identity} is missing")]
    DanglingParent {
        object_identity: ObjectIdentity,
        parent_id: u64,
    },

    /// Following parent links from the object leads back into its own chain
    #[error("Inconsistent storage: parent record {parent_id} of {object_identity} closes a cycle")]
    CyclicHierarchy {
        object_identity: ObjectIdentity,
        parent_id: u64,
    },

    #[error("Ancestor chain of {object_identity} exceeds the maximum depth of {max_depth}")]
    DepthExceeded {
        object_identity: ObjectIdentity,
        max_depth: usize,
    },

    #[error("No permission granting strategy is attached to the ACL of {0}")]
    StrategyNotConfigured(ObjectIdentity),

    #[error("No applicable entry found for {0}")]
    NoAceFound(ObjectIdentity),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AclError {
    /// Check whether this is the recoverable "nothing exists yet" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, AclError::NotFound(_))
    }

    /// Get the not-found details, if this is a not-found error
    pub fn as_not_found(&self) -> Option<&AclNotFound> {
        match self {
            AclError::NotFound(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for ACL operations
pub type AclResult<T> = std::result::Result<T, AclError>;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ObjectIdentity {
        ObjectIdentity::new("42", "Document")
    }

    #[test]
    fn test_not_found_for_filter() {
        let err = AclNotFound::for_filter(document(), false);
        assert_eq!(err.reason, NotFoundReason::NoAcl);

        let err = AclNotFound::for_filter(document(), true);
        assert_eq!(err.reason, NotFoundReason::NoMatchingEntries);
    }

    #[test]
    fn test_not_found_messages_differ() {
        let none = AclNotFound::no_acl(document()).to_string();
        let unmatched = AclNotFound::no_matching_entries(document()).to_string();

        assert!(none.contains("Document"));
        assert!(unmatched.contains("given security identities"));
        assert_ne!(none, unmatched);
    }

    #[test]
    fn test_acl_error_classification() {
        let err: AclError = AclNotFound::no_acl(document()).into();
        assert!(err.is_not_found());
        assert_eq!(err.as_not_found().map(|e| e.reason), Some(NotFoundReason::NoAcl));

        let err = AclError::InconsistentHierarchy {
            object_identity: document(),
        };
        assert!(!err.is_not_found());
        assert!(err.as_not_found().is_none());
    }

    #[test]
    fn test_app_error_wraps_store_errors() {
        fn load() -> Result<()> {
            Err(StoreError::Fixture("bad sid".to_string()))?
        }

        let err = load().unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Fixture(_))));
        assert!(err.to_string().starts_with("Storage error"));
    }
}
