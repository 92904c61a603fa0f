//! # Actor Identity
//!
//! Every live actor is named by a hierarchical, path-like [`Identity`] such as
//! `/hello-world/child`. The root identity `/` belongs to the Core itself; actors
//! created from a [`Context`](crate::Context) are named relative to that context's
//! identity, so the namespace grows as actors create children.

use crate::error::ActorError;
use std::fmt;
use std::sync::Arc;

/// The identity of the Core's root context.
pub const ROOT_IDENTITY: &str = "/";

const SEPARATOR: char = '/';

/// A hierarchical actor name. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Arc<str>);

impl Identity {
    pub fn root() -> Self {
        Self(Arc::from(ROOT_IDENTITY))
    }

    /// Parses an absolute identity (`/`, `/a`, `/a/b`).
    pub fn parse(path: &str) -> Result<Self, ActorError> {
        if path == ROOT_IDENTITY {
            return Ok(Self::root());
        }
        match path.strip_prefix(SEPARATOR) {
            Some(rest) if is_valid_suffix(rest) => Ok(Self(Arc::from(path))),
            _ => Err(ActorError::InvalidIdentity(path.to_string())),
        }
    }

    /// Joins `suffix` under this identity.
    ///
    /// The suffix may span several segments (`a/b`) but must not be empty, start with
    /// `/`, or contain empty, `.` or `..` segments.
    pub fn child(&self, suffix: &str) -> Result<Self, ActorError> {
        if !is_valid_suffix(suffix) {
            return Err(ActorError::InvalidIdentity(suffix.to_string()));
        }
        let path = if self.is_root() {
            format!("{SEPARATOR}{suffix}")
        } else {
            format!("{}{SEPARATOR}{suffix}", self.0)
        };
        Ok(Self(Arc::from(path)))
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == ROOT_IDENTITY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment (`/` for the root).
    pub fn name(&self) -> &str {
        if self.is_root() {
            return ROOT_IDENTITY;
        }
        self.0.rsplit(SEPARATOR).next().unwrap_or(ROOT_IDENTITY)
    }

    pub fn parent(&self) -> Option<Identity> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(index) => Some(Self(Arc::from(&self.0[..index]))),
        }
    }

    /// Whether `other` lives strictly below this identity.
    pub fn is_ancestor_of(&self, other: &Identity) -> bool {
        if self == other {
            return false;
        }
        if self.is_root() {
            return true;
        }
        other
            .as_str()
            .strip_prefix(self.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix
            .split(SEPARATOR)
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:?})", &*self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
