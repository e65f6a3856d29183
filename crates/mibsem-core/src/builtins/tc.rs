//! Textual conventions of SNMPv2-TC (RFC 2579).

use super::types::BuiltinBaseType;
use crate::constraint::Constraint;
use crate::diagnostics::FileLocation;
use crate::snmp::{Status, TextualConvention};
use crate::types::{NamedValues, Type, TypeKind};
use crate::value::Value;

/// Syntax a textual convention refines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TcBaseSyntax {
    /// An application type, referenced by name.
    BuiltinType(BuiltinBaseType),
    /// `INTEGER`, possibly with named values.
    Integer,
    /// `OCTET STRING`.
    OctetString,
    /// `OBJECT IDENTIFIER`.
    ObjectIdentifier,
}

/// `SIZE` constraint of an octet string convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TcSizeConstraint {
    /// `SIZE (6)`.
    Fixed(u32),
    /// `SIZE (0..255)`.
    Range { min: u32, max: u32 },
    /// `SIZE (8 | 11)`.
    Union(&'static [u32]),
}

/// Constraint of a textual convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TcConstraint {
    /// `SIZE` of an octet string.
    Size(TcSizeConstraint),
    /// Value range of an integer.
    Range { min: i64, max: i64 },
}

impl TcConstraint {
    fn to_constraint(self) -> Option<Constraint> {
        Some(match self {
            Self::Range { min, max } => Constraint::range(min, max),
            Self::Size(TcSizeConstraint::Fixed(n)) => Constraint::fixed_size(n),
            Self::Size(TcSizeConstraint::Range { min, max }) => Constraint::size_range(min, max),
            Self::Size(TcSizeConstraint::Union(sizes)) => {
                let inner = sizes
                    .iter()
                    .map(|&n| Constraint::single(Value::integer(i64::from(n))))
                    .reduce(Constraint::or)?;
                Constraint::Size(Box::new(inner))
            }
        })
    }
}

/// A built-in textual convention.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinTextualConvention {
    /// Canonical name.
    pub name: &'static str,
    /// `DISPLAY-HINT`.
    pub display_hint: Option<&'static str>,
    /// Refined syntax.
    pub base_syntax: TcBaseSyntax,
    /// Constraint on the syntax.
    pub constraint: Option<TcConstraint>,
    /// `STATUS`.
    pub status: Status,
    /// Enumeration labels.
    pub enum_values: &'static [(&'static str, i64)],
}

const fn tc(name: &'static str, base_syntax: TcBaseSyntax) -> BuiltinTextualConvention {
    BuiltinTextualConvention {
        name,
        display_hint: None,
        base_syntax,
        constraint: None,
        status: Status::Current,
        enum_values: &[],
    }
}

const fn hinted(mut t: BuiltinTextualConvention, hint: &'static str) -> BuiltinTextualConvention {
    t.display_hint = Some(hint);
    t
}

const fn constrained(mut t: BuiltinTextualConvention, c: TcConstraint) -> BuiltinTextualConvention {
    t.constraint = Some(c);
    t
}

const fn enumerated(
    mut t: BuiltinTextualConvention,
    values: &'static [(&'static str, i64)],
) -> BuiltinTextualConvention {
    t.enum_values = values;
    t
}

const POSITIVE_INT32: TcConstraint = TcConstraint::Range {
    min: 0,
    max: i32::MAX as i64,
};

/// Every textual convention of SNMPv2-TC.
pub static BUILTIN_TEXTUAL_CONVENTIONS: &[BuiltinTextualConvention] = &[
    hinted(
        constrained(
            tc("DisplayString", TcBaseSyntax::OctetString),
            TcConstraint::Size(TcSizeConstraint::Range { min: 0, max: 255 }),
        ),
        "255a",
    ),
    hinted(tc("PhysAddress", TcBaseSyntax::OctetString), "1x:"),
    hinted(
        constrained(
            tc("MacAddress", TcBaseSyntax::OctetString),
            TcConstraint::Size(TcSizeConstraint::Fixed(6)),
        ),
        "1x:",
    ),
    enumerated(tc("TruthValue", TcBaseSyntax::Integer), &[("true", 1), ("false", 2)]),
    constrained(tc("TestAndIncr", TcBaseSyntax::Integer), POSITIVE_INT32),
    tc("AutonomousType", TcBaseSyntax::ObjectIdentifier),
    BuiltinTextualConvention {
        status: Status::Obsolete,
        ..tc("InstancePointer", TcBaseSyntax::ObjectIdentifier)
    },
    tc("VariablePointer", TcBaseSyntax::ObjectIdentifier),
    tc("RowPointer", TcBaseSyntax::ObjectIdentifier),
    enumerated(
        tc("RowStatus", TcBaseSyntax::Integer),
        &[
            ("active", 1),
            ("notInService", 2),
            ("notReady", 3),
            ("createAndGo", 4),
            ("createAndWait", 5),
            ("destroy", 6),
        ],
    ),
    tc("TimeStamp", TcBaseSyntax::BuiltinType(BuiltinBaseType::TimeTicks)),
    constrained(tc("TimeInterval", TcBaseSyntax::Integer), POSITIVE_INT32),
    hinted(
        constrained(
            tc("DateAndTime", TcBaseSyntax::OctetString),
            TcConstraint::Size(TcSizeConstraint::Union(&[8, 11])),
        ),
        "2d-1d-1d,1d:1d:1d.1d,1a1d:1d",
    ),
    enumerated(
        tc("StorageType", TcBaseSyntax::Integer),
        &[
            ("other", 1),
            ("volatile", 2),
            ("nonVolatile", 3),
            ("permanent", 4),
            ("readOnly", 5),
        ],
    ),
    tc("TDomain", TcBaseSyntax::ObjectIdentifier),
    constrained(
        tc("TAddress", TcBaseSyntax::OctetString),
        TcConstraint::Size(TcSizeConstraint::Range { min: 1, max: 255 }),
    ),
];

impl BuiltinTextualConvention {
    /// Look up a textual convention by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<&'static Self> {
        BUILTIN_TEXTUAL_CONVENTIONS.iter().find(|tc| tc.name == name)
    }

    /// Iterate over all built-in textual conventions.
    pub fn all() -> impl Iterator<Item = &'static Self> {
        BUILTIN_TEXTUAL_CONVENTIONS.iter()
    }

    /// The `TEXTUAL-CONVENTION` type of the declaration. Application types
    /// are referenced by name and resolve through SNMPv2-SMI.
    #[must_use]
    pub fn to_type(&self, location: &FileLocation) -> Type {
        let syntax = match self.base_syntax {
            TcBaseSyntax::BuiltinType(bt) => Type::reference(bt.name(), location.clone()),
            TcBaseSyntax::Integer if self.enum_values.is_empty() => Type::integer(),
            TcBaseSyntax::Integer => {
                Type::enumeration(NamedValues::from_numbers(self.enum_values.iter().copied()))
            }
            TcBaseSyntax::OctetString => Type::octet_string(),
            TcBaseSyntax::ObjectIdentifier => Type::object_identifier(),
        };
        let syntax = match self.constraint.and_then(TcConstraint::to_constraint) {
            Some(c) => syntax.with_constraint(c),
            None => syntax,
        };

        let mut tc = TextualConvention::new(syntax, "");
        tc.status = self.status;
        if let Some(hint) = self.display_hint {
            tc = tc.with_display_hint(hint);
        }
        Type::new(TypeKind::TextualConvention(Box::new(tc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_lookup() {
        assert_eq!(BuiltinTextualConvention::all().count(), 16);
        let ds = BuiltinTextualConvention::from_name("DisplayString").unwrap();
        assert_eq!(ds.display_hint, Some("255a"));
        assert!(BuiltinTextualConvention::from_name("displaystring").is_none());
    }

    #[test]
    fn test_union_size_constraint() {
        let c = TcConstraint::Size(TcSizeConstraint::Union(&[8, 11])).to_constraint().unwrap();
        assert!(c.is_compatible(&Value::String("12345678".into())));
        assert!(!c.is_compatible(&Value::String("123456789".into())));
        assert!(c.is_compatible(&Value::String("12345678901".into())));
        assert!(TcConstraint::Size(TcSizeConstraint::Union(&[])).to_constraint().is_none());
    }

    #[test]
    fn test_enumerated_syntax() {
        let location = FileLocation::synthetic("SNMPv2-TC");
        let ty = BuiltinTextualConvention::from_name("RowStatus").unwrap().to_type(&location);
        assert_eq!(ty.named_value("destroy"), Some(&Value::integer(6)));
        assert_eq!(ty.macro_name(), Some("TEXTUAL-CONVENTION"));
    }
}
