//! Object identifiers and the shared OID tree.

mod node;
mod tree;

pub use node::OidNode;
pub use tree::{MergeLog, OidTree, Walk};

use std::fmt;
use std::str::FromStr;

/// A numeric OID path, `1.3.6.1.4.1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Create from arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    /// Parse dotted notation. An empty string is the empty OID.
    #[must_use]
    pub fn from_dotted(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::default());
        }
        s.split('.')
            .map(|part| part.parse().ok())
            .collect::<Option<Vec<u32>>>()
            .map(Self::new)
    }

    /// Dotted notation.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        self.to_string()
    }

    /// Arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if there are no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Last arc.
    #[must_use]
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// All arcs but the last; `None` for OIDs of one arc or less.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.arcs.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::new(rest.to_vec())),
            _ => None,
        }
    }

    /// This OID extended by one arc.
    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Self::new(arcs)
    }

    /// Check if this OID is a prefix of (or equal to) another.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Self::new(arcs)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::new(arcs.to_vec())
    }
}

impl FromStr for Oid {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .map(Self::new)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
            for arc in arcs {
                write!(f, ".{arc}")?;
            }
        }
        Ok(())
    }
}
