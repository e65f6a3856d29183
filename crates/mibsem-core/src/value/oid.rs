//! Unresolved object identifier declarations.

use std::fmt;

use super::ValueReference;
use crate::diagnostics::FileLocation;

/// Where an OID declaration is anchored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OidParent {
    /// `{ enterprises 9999 }`: the first component names another OID value.
    Reference(ValueReference),
    /// `{ iso(1) org(3) }` or `{ 1 3 6 }`: the first arc is a root arc.
    Root,
}

/// One numbered component of an OID declaration, `org(3)` or `3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OidArc {
    /// Name given to the arc, if any.
    pub name: Option<String>,
    /// Arc number.
    pub number: u32,
}

impl OidArc {
    /// A numbered arc without name.
    #[must_use]
    pub fn number(number: u32) -> Self {
        Self { name: None, number }
    }

    /// A named arc, `name(number)`.
    #[must_use]
    pub fn named(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: Some(name.into()),
            number,
        }
    }
}

impl fmt::Display for OidArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}({})", self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

/// An OID value as written in source, before it is placed in the tree.
///
/// Transient: resolution replaces it with a [`super::Value::ObjectIdentifier`]
/// node handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OidDeclaration {
    /// Anchor of the first arc.
    pub parent: OidParent,
    /// Arcs below the anchor, outermost first.
    pub arcs: Vec<OidArc>,
    /// Source location.
    pub location: FileLocation,
}

impl OidDeclaration {
    /// `{ parent arcs... }`.
    #[must_use]
    pub fn under(parent: ValueReference, arcs: Vec<OidArc>) -> Self {
        let location = parent.location.clone();
        Self {
            parent: OidParent::Reference(parent),
            arcs,
            location,
        }
    }

    /// `{ root(n) arcs... }`, where the first arc is a root arc.
    #[must_use]
    pub fn rooted(arcs: Vec<OidArc>, location: FileLocation) -> Self {
        Self {
            parent: OidParent::Root,
            arcs,
            location,
        }
    }
}

impl fmt::Display for OidDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        if let OidParent::Reference(parent) = &self.parent {
            write!(f, " {parent}")?;
        }
        for arc in &self.arcs {
            write!(f, " {arc}")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let loc = FileLocation::new("M", 1, 1);
        let decl = OidDeclaration::under(
            ValueReference::new("enterprises", loc.clone()),
            vec![OidArc::named("acme", 9999), OidArc::number(1)],
        );
        assert_eq!(decl.to_string(), "{ enterprises acme(9999) 1 }");

        let decl = OidDeclaration::rooted(vec![OidArc::named("iso", 1), OidArc::number(3)], loc);
        assert_eq!(decl.to_string(), "{ iso(1) 3 }");
    }
}
