//! Per-item identity: an optional unique identifier and an optional name.

use std::fmt;

/// Header of a single item in a dataset.
///
/// Identifiers must be unique within a dataset; names need not be.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemHeader {
    Unidentified,
    NamedOnly(String),
    IdOnly(String),
    Full { id: String, name: String },
}

impl ItemHeader {
    /// Build a header from optional parts.
    pub fn from_parts(id: Option<String>, name: Option<String>) -> Self {
        match (id, name) {
            (None, None) => Self::Unidentified,
            (None, Some(name)) => Self::NamedOnly(name),
            (Some(id), None) => Self::IdOnly(id),
            (Some(id), Some(name)) => Self::Full { id, name },
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::IdOnly(id) | Self::Full { id, .. } => Some(id),
            Self::Unidentified | Self::NamedOnly(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NamedOnly(name) | Self::Full { name, .. } => Some(name),
            Self::Unidentified | Self::IdOnly(_) => None,
        }
    }

    pub fn is_identified(&self) -> bool {
        self.id().is_some()
    }
}

impl Default for ItemHeader {
    fn default() -> Self {
        Self::Unidentified
    }
}

/// Key of an item in a dataset's id-set.
///
/// Items without an explicit identifier are keyed by their index, which can
/// never collide with an explicit identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    Explicit(String),
    Positional(usize),
}

impl ItemKey {
    pub fn for_item(index: usize, header: &ItemHeader) -> Self {
        match header.id() {
            Some(id) => Self::Explicit(id.to_string()),
            None => Self::Positional(index),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "{}", id),
            Self::Positional(i) => write!(f, "#{}", i),
        }
    }
}
