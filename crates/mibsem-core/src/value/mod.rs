//! Value system.
//!
//! A closed set of value variants. Two of them are transient and only exist
//! in declarations handed over by the parser:
//!
//! - [`Value::Reference`] names another value symbol
//! - [`Value::OidDeclaration`] is an OID not yet placed in the tree
//!
//! Resolution replaces both, so a resolved value graph contains neither.
//! Values compare by content, never by identity; an object identifier
//! compares by its tree node, which is unique per OID.

mod number;
mod oid;

pub use number::{Number, NumberFormat, NumberValue};
pub use oid::{OidArc, OidDeclaration, OidParent};

use std::collections::BTreeSet;
use std::fmt;

use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::ids::NodeId;

/// A reference to a value symbol, by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueReference {
    /// Referenced symbol name.
    pub name: String,
    /// Module qualifier, `SNMPv2-SMI.enterprises`.
    pub module: Option<String>,
    /// Location of the reference.
    pub location: FileLocation,
}

impl ValueReference {
    /// Unqualified reference.
    #[must_use]
    pub fn new(name: impl Into<String>, location: FileLocation) -> Self {
        Self {
            name: name.into(),
            module: None,
            location,
        }
    }

    /// Module-qualified reference.
    #[must_use]
    pub fn qualified(module: impl Into<String>, name: impl Into<String>, location: FileLocation) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
            location,
        }
    }

    /// The name as written, including the qualifier.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.module {
            Some(module) => format!("{module}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for ValueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A set of bit positions, `{ flag1, flag3 }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSetValue {
    /// Set bit positions.
    pub bits: BTreeSet<u32>,
    /// Named bits not yet mapped to positions.
    pub pending: Vec<ValueReference>,
}

impl BitSetValue {
    /// A bit set with named bits still to resolve.
    #[must_use]
    pub fn named(pending: Vec<ValueReference>) -> Self {
        Self {
            bits: BTreeSet::new(),
            pending,
        }
    }

    /// A bit set of known positions.
    #[must_use]
    pub fn from_bits(bits: impl IntoIterator<Item = u32>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
            pending: Vec::new(),
        }
    }
}

/// A MIB value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Integer, REAL sentinel, or binary/hex string.
    Number(NumberValue),
    /// `TRUE` / `FALSE`.
    Boolean(bool),
    /// `NULL`.
    Null,
    /// Quoted string.
    String(String),
    /// Set of bits.
    BitSet(BitSetValue),
    /// A node of the shared OID tree.
    ObjectIdentifier(NodeId),
    /// Transient: an OID not yet placed in the tree.
    OidDeclaration(OidDeclaration),
    /// Transient: a reference to a value symbol.
    Reference(ValueReference),
}

impl Value {
    /// Shorthand for a decimal integer value.
    #[must_use]
    pub fn integer(v: i64) -> Self {
        Self::Number(NumberValue::new(v))
    }

    /// Shorthand for an unqualified reference.
    #[must_use]
    pub fn reference(name: impl Into<String>, location: FileLocation) -> Self {
        Self::Reference(ValueReference::new(name, location))
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(n.number),
            _ => None,
        }
    }

    /// The OID node, if this is a resolved object identifier.
    #[must_use]
    pub fn as_oid(&self) -> Option<NodeId> {
        match self {
            Self::ObjectIdentifier(id) => Some(*id),
            _ => None,
        }
    }

    /// Check that no transient variant remains.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Reference(_) | Self::OidDeclaration(_) => false,
            Self::BitSet(bits) => bits.pending.is_empty(),
            _ => true,
        }
    }

    /// Produce the value seen through a reference to its symbol.
    ///
    /// Resolved values are shared by content; an OID reference yields the
    /// same tree node. Transient variants cannot be referenced.
    pub fn create_reference(&self) -> Result<Self> {
        match self {
            Self::Reference(r) => Err(SemanticError::UnsupportedReference {
                what: format!("unresolved value reference '{r}'"),
                location: Some(r.location.clone()),
            }),
            Self::OidDeclaration(decl) => Err(SemanticError::UnsupportedReference {
                what: "an object identifier that is not yet placed in the tree".into(),
                location: Some(decl.location.clone()),
            }),
            Self::BitSet(bits) if !bits.pending.is_empty() => {
                Err(SemanticError::unsupported("a bit set with unresolved named bits"))
            }
            other => Ok(other.clone()),
        }
    }

    /// Short variant description for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(n) if n.number.is_float() => "real",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
            Self::String(_) => "string",
            Self::BitSet(_) => "bit set",
            Self::ObjectIdentifier(_) | Self::OidDeclaration(_) => "object identifier",
            Self::Reference(_) => "value reference",
        }
    }
}

impl From<NumberValue> for Value {
    fn from(v: NumberValue) -> Self {
        Self::Number(v)
    }
}
