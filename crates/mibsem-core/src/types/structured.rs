//! Elements of `SEQUENCE` and `CHOICE` types.

use super::Type;
use crate::value::Value;

/// A component of a `SEQUENCE` or `CHOICE`, `ifIndex InterfaceIndex`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementType {
    /// Component name. ASN.1 allows unnamed components.
    pub name: Option<String>,
    /// Component type.
    pub ty: Type,
}

impl ElementType {
    /// Named component.
    #[must_use]
    pub fn named(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    /// Unnamed component.
    #[must_use]
    pub fn unnamed(ty: Type) -> Self {
        Self { name: None, ty }
    }

    /// An element accepts what its type accepts.
    #[must_use]
    pub fn is_compatible(&self, value: &Value) -> bool {
        self.ty.is_compatible(value)
    }
}
