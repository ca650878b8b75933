//! Identity types
//!
//! Object identities name protected resources, security identities name the
//! users and roles requesting access to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A typed, uniquely identified protected resource
///
/// Two object identities are equal iff both the identifier and the type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIdentity {
    identifier: String,
    #[serde(rename = "type")]
    object_type: String,
}

impl ObjectIdentity {
    pub fn new(identifier: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            object_type: object_type.into(),
        }
    }

    /// Identifier, unique within the type
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Type name, e.g. a class or category
    pub fn object_type(&self) -> &str {
        &self.object_type
    }
}

/// Formats as `type:identifier`
impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.identifier)
    }
}

/// Parses `type:identifier`. The type must not contain a colon, the identifier may.
impl FromStr for ObjectIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((object_type, identifier)) if !object_type.is_empty() && !identifier.is_empty() => {
                Ok(Self::new(identifier, object_type))
            }
            _ => Err(format!(
                "invalid object identity '{}', expected 'type:identifier'",
                s
            )),
        }
    }
}

/// Discriminator of a security identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityIdentityKind {
    User,
    Role,
}

impl SecurityIdentityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SecurityIdentityKind::User => "user",
            SecurityIdentityKind::Role => "role",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(SecurityIdentityKind::User),
            "role" => Some(SecurityIdentityKind::Role),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityIdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requester of access: a user or a role
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "identifier", rename_all = "lowercase")]
pub enum SecurityIdentity {
    User(String),
    Role(String),
}

impl SecurityIdentity {
    pub fn user(identifier: impl Into<String>) -> Self {
        SecurityIdentity::User(identifier.into())
    }

    pub fn role(identifier: impl Into<String>) -> Self {
        SecurityIdentity::Role(identifier.into())
    }

    pub fn from_parts(kind: SecurityIdentityKind, identifier: impl Into<String>) -> Self {
        match kind {
            SecurityIdentityKind::User => Self::user(identifier),
            SecurityIdentityKind::Role => Self::role(identifier),
        }
    }

    pub fn kind(&self) -> SecurityIdentityKind {
        match self {
            SecurityIdentity::User(_) => SecurityIdentityKind::User,
            SecurityIdentity::Role(_) => SecurityIdentityKind::Role,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            SecurityIdentity::User(id) | SecurityIdentity::Role(id) => id,
        }
    }

    /// Equality key: discriminator plus identifier
    pub fn key(&self) -> (SecurityIdentityKind, &str) {
        (self.kind(), self.identifier())
    }
}

/// Formats as `user:<id>` or `role:<id>`
impl fmt::Display for SecurityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.identifier())
    }
}

impl FromStr for SecurityIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, identifier) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid security identity '{}', expected 'user:<id>' or 'role:<id>'", s))?;

        let kind = SecurityIdentityKind::try_parse(kind)
            .ok_or_else(|| format!("unknown security identity kind '{}'", kind))?;

        if identifier.is_empty() {
            return Err(format!("security identity '{}' has an empty identifier", s));
        }

        Ok(Self::from_parts(kind, identifier))
    }
}
