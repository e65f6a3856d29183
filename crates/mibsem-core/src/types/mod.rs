//! Type system.
//!
//! A closed set of type variants. Every variant except the transient
//! [`TypeKind::Reference`] supports value compatibility testing and
//! [`Type::create_reference`], which produces the non-primitive type seen
//! through a named reference, optionally refined with a constraint or with
//! named values supplied at the reference site.

mod named;
mod structured;

pub use named::NamedValues;
pub use structured::ElementType;

use std::fmt;

use crate::constraint::Constraint;
use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::snmp::{
    AgentCapabilities, ModuleCompliance, ModuleIdentity, NotificationGroup, NotificationType,
    ObjectGroup, ObjectIdentity, ObjectType, TextualConvention, TrapType,
};
use crate::value::Value;

/// ASN.1 tag class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// `[UNIVERSAL n]`.
    Universal,
    /// `[APPLICATION n]`.
    Application,
    /// `[n]`.
    ContextSpecific,
    /// `[PRIVATE n]`.
    Private,
}

/// An explicit ASN.1 tag, `[APPLICATION 1] IMPLICIT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Tag class.
    pub class: TagClass,
    /// Tag number.
    pub number: u32,
    /// `IMPLICIT` tagging.
    pub implicit: bool,
}

impl TypeTag {
    /// `[APPLICATION n] IMPLICIT`, the tagging of the SMI application types.
    #[must_use]
    pub const fn application(number: u32) -> Self {
        Self {
            class: TagClass::Application,
            number,
            implicit: true,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TagClass::Universal => write!(f, "[UNIVERSAL {}]", self.number)?,
            TagClass::Application => write!(f, "[APPLICATION {}]", self.number)?,
            TagClass::ContextSpecific => write!(f, "[{}]", self.number)?,
            TagClass::Private => write!(f, "[PRIVATE {}]", self.number)?,
        }
        if self.implicit {
            write!(f, " IMPLICIT")?;
        }
        Ok(())
    }
}

/// What a reference site adds to the referenced type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refinement {
    /// `Integer32 (1..10)`.
    Constraint(Constraint),
    /// `BITS { a(0), b(1) }` style labels on a referenced type.
    NamedValues(NamedValues),
}

impl Refinement {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Constraint(_) => "a constraint",
            Self::NamedValues(_) => "named values",
        }
    }
}

/// Transient reference to a type symbol, by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeReference {
    /// Referenced symbol name.
    pub name: String,
    /// Module qualifier, `SNMPv2-TC.DisplayString`.
    pub module: Option<String>,
    /// Location of the reference.
    pub location: FileLocation,
    /// Refinement given at the reference site.
    pub refinement: Option<Refinement>,
}

impl TypeReference {
    /// Unqualified reference without refinement.
    #[must_use]
    pub fn new(name: impl Into<String>, location: FileLocation) -> Self {
        Self {
            name: name.into(),
            module: None,
            location,
            refinement: None,
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

/// Type variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// `INTEGER`, optionally constrained or enumerated.
    Integer {
        /// Value constraint.
        constraint: Option<Constraint>,
        /// Enumeration labels.
        named_values: NamedValues,
    },
    /// `OCTET STRING`.
    OctetString {
        /// Usually a `SIZE` constraint.
        constraint: Option<Constraint>,
    },
    /// `BITS` / `BIT STRING`.
    BitSet {
        /// Constraint applied to each set bit.
        constraint: Option<Constraint>,
        /// Bit names.
        named_values: NamedValues,
    },
    /// `NULL`.
    Null,
    /// `REAL`.
    Real,
    /// `BOOLEAN`.
    Boolean,
    /// `OBJECT IDENTIFIER`.
    ObjectIdentifier,
    /// `CHOICE { ... }`.
    Choice(Vec<ElementType>),
    /// `SEQUENCE { ... }`.
    Sequence(Vec<ElementType>),
    /// `SEQUENCE OF element`.
    SequenceOf {
        /// Element type.
        element: Box<Type>,
        /// `SIZE` constraint on the element count.
        constraint: Option<Constraint>,
    },
    /// `OBJECT-TYPE`.
    ObjectType(Box<ObjectType>),
    /// `TRAP-TYPE`.
    TrapType(Box<TrapType>),
    /// `NOTIFICATION-TYPE`.
    NotificationType(Box<NotificationType>),
    /// `MODULE-IDENTITY`.
    ModuleIdentity(Box<ModuleIdentity>),
    /// `MODULE-COMPLIANCE`.
    ModuleCompliance(Box<ModuleCompliance>),
    /// `OBJECT-GROUP`.
    ObjectGroup(Box<ObjectGroup>),
    /// `NOTIFICATION-GROUP`.
    NotificationGroup(Box<NotificationGroup>),
    /// `AGENT-CAPABILITIES`.
    AgentCapabilities(Box<AgentCapabilities>),
    /// `OBJECT-IDENTITY`.
    ObjectIdentity(Box<ObjectIdentity>),
    /// `TEXTUAL-CONVENTION`.
    TextualConvention(Box<TextualConvention>),
    /// Transient: a reference to a type symbol.
    Reference(TypeReference),
}

/// A MIB type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    /// Variant and payload.
    pub kind: TypeKind,
    /// Explicit ASN.1 tag.
    pub tag: Option<TypeTag>,
    /// `true` for a type's first definition, `false` when seen through a
    /// named reference.
    pub primitive: bool,
    /// Name of the type symbol this type was referenced through.
    pub reference_name: Option<String>,
}

impl From<TypeKind> for Type {
    fn from(kind: TypeKind) -> Self {
        Self::new(kind)
    }
}

impl Type {
    /// Primitive type of the given kind.
    #[must_use]
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            tag: None,
            primitive: true,
            reference_name: None,
        }
    }

    /// Unconstrained `INTEGER`.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(TypeKind::Integer {
            constraint: None,
            named_values: NamedValues::new(),
        })
    }

    /// `INTEGER { ... }`.
    #[must_use]
    pub fn enumeration(named_values: NamedValues) -> Self {
        Self::new(TypeKind::Integer {
            constraint: None,
            named_values,
        })
    }

    /// Unconstrained `OCTET STRING`.
    #[must_use]
    pub fn octet_string() -> Self {
        Self::new(TypeKind::OctetString { constraint: None })
    }

    /// `BITS { ... }`.
    #[must_use]
    pub fn bits(named_values: NamedValues) -> Self {
        Self::new(TypeKind::BitSet {
            constraint: None,
            named_values,
        })
    }

    /// `OBJECT IDENTIFIER`.
    #[must_use]
    pub fn object_identifier() -> Self {
        Self::new(TypeKind::ObjectIdentifier)
    }

    /// `SEQUENCE { ... }`.
    #[must_use]
    pub fn sequence(elements: Vec<ElementType>) -> Self {
        Self::new(TypeKind::Sequence(elements))
    }

    /// `CHOICE { ... }`.
    #[must_use]
    pub fn choice(elements: Vec<ElementType>) -> Self {
        Self::new(TypeKind::Choice(elements))
    }

    /// `SEQUENCE OF element`.
    #[must_use]
    pub fn sequence_of(element: Type) -> Self {
        Self::new(TypeKind::SequenceOf {
            element: Box::new(element),
            constraint: None,
        })
    }

    /// Transient reference to a type symbol.
    #[must_use]
    pub fn reference(name: impl Into<String>, location: FileLocation) -> Self {
        Self::new(TypeKind::Reference(TypeReference::new(name, location)))
    }

    /// Transient reference refined with a constraint, `Integer32 (0..10)`.
    #[must_use]
    pub fn constrained_reference(
        name: impl Into<String>,
        location: FileLocation,
        constraint: Constraint,
    ) -> Self {
        let mut reference = TypeReference::new(name, location);
        reference.refinement = Some(Refinement::Constraint(constraint));
        Self::new(TypeKind::Reference(reference))
    }

    /// Set the constraint of a scalar type. Other kinds are returned
    /// unchanged.
    #[must_use]
    pub fn with_constraint(mut self, c: Constraint) -> Self {
        match &mut self.kind {
            TypeKind::Integer { constraint, .. }
            | TypeKind::OctetString { constraint }
            | TypeKind::BitSet { constraint, .. }
            | TypeKind::SequenceOf { constraint, .. } => *constraint = Some(c),
            _ => {}
        }
        self
    }

    /// Set the tag.
    #[must_use]
    pub fn with_tag(mut self, tag: TypeTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Check if this is a transient reference.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, TypeKind::Reference(_))
    }

    /// Macro keyword for SNMP macro variants.
    #[must_use]
    pub fn macro_name(&self) -> Option<&'static str> {
        Some(match self.kind {
            TypeKind::ObjectType(_) => "OBJECT-TYPE",
            TypeKind::TrapType(_) => "TRAP-TYPE",
            TypeKind::NotificationType(_) => "NOTIFICATION-TYPE",
            TypeKind::ModuleIdentity(_) => "MODULE-IDENTITY",
            TypeKind::ModuleCompliance(_) => "MODULE-COMPLIANCE",
            TypeKind::ObjectGroup(_) => "OBJECT-GROUP",
            TypeKind::NotificationGroup(_) => "NOTIFICATION-GROUP",
            TypeKind::AgentCapabilities(_) => "AGENT-CAPABILITIES",
            TypeKind::ObjectIdentity(_) => "OBJECT-IDENTITY",
            TypeKind::TextualConvention(_) => "TEXTUAL-CONVENTION",
            _ => return None,
        })
    }

    /// Short description of the variant, `INTEGER`, `OBJECT-TYPE`, ...
    #[must_use]
    pub fn description(&self) -> String {
        if let Some(name) = self.macro_name() {
            return name.to_string();
        }
        match &self.kind {
            TypeKind::Integer { .. } => "INTEGER".into(),
            TypeKind::OctetString { .. } => "OCTET STRING".into(),
            TypeKind::BitSet { .. } => "BITS".into(),
            TypeKind::Null => "NULL".into(),
            TypeKind::Real => "REAL".into(),
            TypeKind::Boolean => "BOOLEAN".into(),
            TypeKind::ObjectIdentifier => "OBJECT IDENTIFIER".into(),
            TypeKind::Choice(_) => "CHOICE".into(),
            TypeKind::Sequence(_) => "SEQUENCE".into(),
            TypeKind::SequenceOf { .. } => "SEQUENCE OF".into(),
            TypeKind::Reference(r) => r.display_name(),
            _ => String::new(),
        }
    }

    /// Check if a value is compatible with this type, constraint included.
    #[must_use]
    pub fn is_compatible(&self, value: &Value) -> bool {
        match &self.kind {
            TypeKind::Integer {
                constraint,
                named_values,
            } => {
                self.accepts_unconstrained(value)
                    && constraint.as_ref().is_none_or(|c| c.is_compatible(value))
                    && (named_values.is_empty() || named_values.contains_value(value))
            }
            TypeKind::OctetString { constraint } => {
                self.accepts_unconstrained(value)
                    && constraint.as_ref().is_none_or(|c| c.is_compatible(value))
            }
            TypeKind::BitSet { constraint, .. } => match value {
                Value::BitSet(bits) if bits.pending.is_empty() => {
                    constraint.as_ref().is_none_or(|c| {
                        bits.bits
                            .iter()
                            .all(|bit| c.is_compatible(&Value::integer(i64::from(*bit))))
                    })
                }
                _ => false,
            },
            TypeKind::Choice(_)
            | TypeKind::Sequence(_)
            | TypeKind::SequenceOf { .. }
            | TypeKind::TextualConvention(_)
            | TypeKind::Reference(_) => false,
            _ => self.accepts_unconstrained(value),
        }
    }

    /// Check if a value has the right shape for this type, ignoring any
    /// constraint or enumeration.
    #[must_use]
    pub fn accepts_unconstrained(&self, value: &Value) -> bool {
        let number = value.as_number();
        match &self.kind {
            TypeKind::Integer { .. } | TypeKind::TrapType(_) => {
                number.is_some_and(|n| !n.is_float())
            }
            TypeKind::OctetString { .. } => match value {
                Value::String(_) => true,
                Value::Number(n) => n.is_radix_string(),
                _ => false,
            },
            TypeKind::BitSet { .. } => match value {
                Value::BitSet(_) => true,
                Value::Number(n) => n.number.as_u32().is_some(),
                _ => false,
            },
            TypeKind::Null => matches!(value, Value::Null),
            TypeKind::Real => number.is_some_and(|n| n.is_float()),
            TypeKind::Boolean => matches!(value, Value::Boolean(_)),
            TypeKind::ObjectIdentifier
            | TypeKind::ObjectType(_)
            | TypeKind::NotificationType(_)
            | TypeKind::ModuleIdentity(_)
            | TypeKind::ModuleCompliance(_)
            | TypeKind::ObjectGroup(_)
            | TypeKind::NotificationGroup(_)
            | TypeKind::AgentCapabilities(_)
            | TypeKind::ObjectIdentity(_) => matches!(value, Value::ObjectIdentifier(_)),
            TypeKind::TextualConvention(tc) => tc.syntax.accepts_unconstrained(value),
            TypeKind::Choice(_)
            | TypeKind::Sequence(_)
            | TypeKind::SequenceOf { .. }
            | TypeKind::Reference(_) => false,
        }
    }

    /// Check if `SIZE` constraints apply to this type.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        match &self.kind {
            TypeKind::OctetString { .. } | TypeKind::BitSet { .. } | TypeKind::SequenceOf { .. } => {
                true
            }
            TypeKind::TextualConvention(tc) => tc.syntax.is_sized(),
            _ => false,
        }
    }

    /// Constraint of this type, looking through a textual convention.
    #[must_use]
    pub fn constraint(&self) -> Option<&Constraint> {
        match &self.kind {
            TypeKind::Integer { constraint, .. }
            | TypeKind::OctetString { constraint }
            | TypeKind::BitSet { constraint, .. }
            | TypeKind::SequenceOf { constraint, .. } => constraint.as_ref(),
            TypeKind::TextualConvention(tc) => tc.syntax.constraint(),
            _ => None,
        }
    }

    /// Named values of this type, looking through a textual convention.
    #[must_use]
    pub fn named_values(&self) -> Option<&NamedValues> {
        match &self.kind {
            TypeKind::Integer { named_values, .. } | TypeKind::BitSet { named_values, .. } => {
                Some(named_values)
            }
            TypeKind::TextualConvention(tc) => tc.syntax.named_values(),
            _ => None,
        }
    }

    /// Look up one named value.
    #[must_use]
    pub fn named_value(&self, name: &str) -> Option<&Value> {
        self.named_values()?.get(name)
    }

    /// Produce the type seen through a named reference to this type.
    ///
    /// The result is non-primitive and carries `refinement` in place of the
    /// corresponding part of this type. Macro types cannot be referenced; a
    /// textual convention delegates to its syntax.
    pub fn create_reference(&self, refinement: Option<Refinement>) -> Result<Self> {
        if let TypeKind::TextualConvention(tc) = &self.kind {
            return tc.syntax.create_reference(refinement);
        }
        if let TypeKind::Reference(r) = &self.kind {
            return Err(SemanticError::UnsupportedReference {
                what: format!("unresolved type reference '{}'", r.display_name()),
                location: Some(r.location.clone()),
            });
        }
        if let Some(name) = self.macro_name() {
            return Err(SemanticError::unsupported(format!("{name} type")));
        }

        let kind = match (&self.kind, refinement) {
            (kind, None) => kind.clone(),
            (TypeKind::Integer { named_values, .. }, Some(Refinement::Constraint(c))) => {
                TypeKind::Integer {
                    constraint: Some(c),
                    named_values: named_values.clone(),
                }
            }
            (TypeKind::Integer { constraint, .. }, Some(Refinement::NamedValues(named))) => {
                TypeKind::Integer {
                    constraint: constraint.clone(),
                    named_values: named,
                }
            }
            (TypeKind::BitSet { named_values, .. }, Some(Refinement::Constraint(c))) => {
                TypeKind::BitSet {
                    constraint: Some(c),
                    named_values: named_values.clone(),
                }
            }
            (TypeKind::BitSet { constraint, .. }, Some(Refinement::NamedValues(named))) => {
                TypeKind::BitSet {
                    constraint: constraint.clone(),
                    named_values: named,
                }
            }
            (TypeKind::OctetString { .. }, Some(Refinement::Constraint(c))) => {
                TypeKind::OctetString {
                    constraint: Some(c),
                }
            }
            (TypeKind::SequenceOf { element, .. }, Some(Refinement::Constraint(c))) => {
                TypeKind::SequenceOf {
                    element: element.clone(),
                    constraint: Some(c),
                }
            }
            (_, Some(refinement)) => {
                return Err(SemanticError::unsupported(format!(
                    "{} with {}",
                    self.description(),
                    refinement.kind_name()
                )));
            }
        };

        Ok(Self {
            kind,
            tag: self.tag,
            primitive: false,
            reference_name: None,
        })
    }

    /// Check that no transient reference remains anywhere in this type.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        let resolved = |c: &Option<Constraint>| c.as_ref().is_none_or(Constraint::is_resolved);
        match &self.kind {
            TypeKind::Reference(_) => false,
            TypeKind::Integer {
                constraint,
                named_values,
            }
            | TypeKind::BitSet {
                constraint,
                named_values,
            } => resolved(constraint) && named_values.is_resolved(),
            TypeKind::OctetString { constraint } => resolved(constraint),
            TypeKind::Null | TypeKind::Real | TypeKind::Boolean | TypeKind::ObjectIdentifier => {
                true
            }
            TypeKind::Choice(elements) | TypeKind::Sequence(elements) => {
                elements.iter().all(|e| e.ty.is_resolved())
            }
            TypeKind::SequenceOf {
                element,
                constraint,
            } => element.is_resolved() && resolved(constraint),
            TypeKind::ObjectType(obj) => obj.is_resolved(),
            TypeKind::TrapType(trap) => trap.is_resolved(),
            TypeKind::NotificationType(notif) => notif.objects.iter().all(Value::is_resolved),
            TypeKind::ModuleIdentity(identity) => {
                identity.revisions.iter().all(|r| r.value.is_resolved())
            }
            TypeKind::ModuleCompliance(compliance) => compliance.is_resolved(),
            TypeKind::ObjectGroup(group) => group.objects.iter().all(Value::is_resolved),
            TypeKind::NotificationGroup(group) => {
                group.notifications.iter().all(Value::is_resolved)
            }
            TypeKind::AgentCapabilities(caps) => caps.is_resolved(),
            TypeKind::ObjectIdentity(_) => true,
            TypeKind::TextualConvention(tc) => tc.syntax.is_resolved(),
        }
    }
}
