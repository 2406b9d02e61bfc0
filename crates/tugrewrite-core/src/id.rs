//! Tree identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A globally unique identifier for a tree node or marker.
///
/// Ids are preserved by copy-on-write edits of the same logical node and are
/// freshly generated only when a node is constructed from nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(Uuid);

impl TreeId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        TreeId(Uuid::new_v4())
    }

    /// The all-zero id, used by empty marker sets.
    pub const fn nil() -> Self {
        TreeId(Uuid::nil())
    }

    /// Returns true for the all-zero id.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TreeId {
    fn from(value: Uuid) -> Self {
        TreeId(value)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(TreeId::random(), TreeId::random());
    }

    #[test]
    fn nil_id_is_stable() {
        assert!(TreeId::nil().is_nil());
        assert_eq!(TreeId::nil(), TreeId::nil());
        assert!(!TreeId::random().is_nil());
    }
}
