//! `OBJECT-TYPE`.

use super::{Access, Status};
use crate::types::{ElementType, Type, TypeKind};
use crate::value::Value;

/// Description given to object types synthesized for sequence elements
/// that have no declaration of their own.
pub const AUTO_CREATED_DESCRIPTION: &str = "AUTOMATICALLY CREATED SYMBOL";

/// One `INDEX` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// The index object or type.
    pub item: IndexItem,
    /// `IMPLIED`: the index length is not encoded. Only meaningful on the
    /// last entry.
    pub implied: bool,
}

/// What an index entry names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexItem {
    /// A columnar object (the usual case).
    Value(Value),
    /// A bare type (SMIv1 `INDEX { INTEGER }`).
    Type(Type),
}

impl IndexEntry {
    /// Plain index on a value.
    #[must_use]
    pub fn value(value: Value) -> Self {
        Self {
            item: IndexItem::Value(value),
            implied: false,
        }
    }

    /// `IMPLIED` index on a value.
    #[must_use]
    pub fn implied(value: Value) -> Self {
        Self {
            item: IndexItem::Value(value),
            implied: true,
        }
    }
}

/// `OBJECT-TYPE` macro payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectType {
    /// `SYNTAX`.
    pub syntax: Type,
    /// `UNITS`.
    pub units: Option<String>,
    /// `ACCESS` / `MAX-ACCESS`.
    pub access: Access,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: Option<String>,
    /// `REFERENCE`.
    pub reference: Option<String>,
    /// `INDEX`.
    pub index: Vec<IndexEntry>,
    /// `AUGMENTS`, used instead of `INDEX`.
    pub augments: Option<Value>,
    /// `DEFVAL`.
    pub default_value: Option<Value>,
}

impl ObjectType {
    /// Object type with only the mandatory clauses.
    #[must_use]
    pub fn new(syntax: Type, access: Access, status: Status) -> Self {
        Self {
            syntax,
            units: None,
            access,
            status,
            description: None,
            reference: None,
            index: Vec::new(),
            augments: None,
            default_value: None,
        }
    }

    /// Read-only, current object type standing in for a sequence element
    /// that was never declared.
    #[must_use]
    pub fn auto_created(syntax: Type) -> Self {
        Self {
            description: Some(AUTO_CREATED_DESCRIPTION.to_string()),
            ..Self::new(syntax, Access::ReadOnly, Status::Current)
        }
    }

    /// Check if this object type was synthesized by the loader.
    #[must_use]
    pub fn is_auto_created(&self) -> bool {
        self.description.as_deref() == Some(AUTO_CREATED_DESCRIPTION)
    }

    /// Elements of the `SEQUENCE` this object's syntax describes, looking
    /// through one `SEQUENCE OF`.
    #[must_use]
    pub fn sequence_elements(&self) -> Option<&[ElementType]> {
        match &self.syntax.kind {
            TypeKind::Sequence(elements) => Some(elements),
            TypeKind::SequenceOf { element, .. } => match &element.kind {
                TypeKind::Sequence(elements) => Some(elements),
                _ => None,
            },
            _ => None,
        }
    }

    /// Check if this object is a table (`SEQUENCE OF` syntax).
    #[must_use]
    pub fn is_table(&self) -> bool {
        matches!(self.syntax.kind, TypeKind::SequenceOf { .. })
    }

    /// Check if this object is a row (`INDEX` or `AUGMENTS`).
    #[must_use]
    pub fn is_row(&self) -> bool {
        !self.index.is_empty() || self.augments.is_some()
    }

    /// Check that the syntax and every embedded value are resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.syntax.is_resolved()
            && self.index.iter().all(|entry| match &entry.item {
                IndexItem::Value(v) => v.is_resolved(),
                IndexItem::Type(t) => t.is_resolved(),
            })
            && self.augments.as_ref().is_none_or(Value::is_resolved)
            && self.default_value.as_ref().is_none_or(Value::is_resolved)
    }
}
