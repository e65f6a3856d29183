//! Best-effort textual rendering of constraints, types, values and resolved
//! declarations, approximating MIB notation.
//!
//! Meant for diagnostics and dumps; the output is not a stable format.

use std::fmt;

use crate::constraint::{Constraint, ValueRange};
use crate::module::{Resolution, Symbol};
use crate::oid::OidTree;
use crate::resolver::MibLoader;
use crate::snmp::{Compliance, IndexItem, ObjectType};
use crate::types::{ElementType, NamedValues, Type, TypeKind};
use crate::value::Value;

const INDENT: &str = "    ";

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_constraint(f, self)?;
        write!(f, ")")
    }
}

fn write_constraint(f: &mut fmt::Formatter<'_>, c: &Constraint) -> fmt::Result {
    match c {
        Constraint::SingleValue(v) => write_value(f, v, None),
        Constraint::ValueRange(range) => write_range(f, range),
        Constraint::Size(inner) => {
            write!(f, "SIZE (")?;
            write_constraint(f, inner)?;
            write!(f, ")")
        }
        Constraint::Compound(a, b) => {
            write_constraint(f, a)?;
            write!(f, " | ")?;
            write_constraint(f, b)
        }
    }
}

fn write_range(f: &mut fmt::Formatter<'_>, range: &ValueRange) -> fmt::Result {
    match &range.lower {
        Some(v) => write_value(f, v, None)?,
        None => write!(f, "MIN")?,
    }
    if range.lower_strict {
        write!(f, "<")?;
    }
    write!(f, "..")?;
    if range.upper_strict {
        write!(f, "<")?;
    }
    match &range.upper {
        Some(v) => write_value(f, v, None),
        None => write!(f, "MAX"),
    }
}

/// A value rendered against the tree its object identifiers live in.
pub struct ValueDisplay<'a> {
    value: &'a Value,
    tree: &'a OidTree,
}

impl Value {
    /// Render this value. Object identifiers print as `{ parent arc }`, or
    /// with the alternate flag as the full `iso(1).org(3)...` detail form.
    #[must_use]
    pub fn display<'a>(&'a self, tree: &'a OidTree) -> ValueDisplay<'a> {
        ValueDisplay { value: self, tree }
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.value, Some(self.tree))
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, tree: Option<&OidTree>) -> fmt::Result {
    match value {
        Value::Number(n) => write!(f, "{n}"),
        Value::Boolean(true) => write!(f, "TRUE"),
        Value::Boolean(false) => write!(f, "FALSE"),
        Value::Null => write!(f, "NULL"),
        Value::String(s) => write!(f, "\"{s}\""),
        Value::BitSet(bits) => {
            let items: Vec<String> = bits
                .bits
                .iter()
                .map(u32::to_string)
                .chain(bits.pending.iter().map(|r| r.display_name()))
                .collect();
            if items.is_empty() {
                write!(f, "{{}}")
            } else {
                write!(f, "{{ {} }}", items.join(", "))
            }
        }
        Value::ObjectIdentifier(node) => {
            let Some(tree) = tree else {
                return write!(f, "{{ #{} }}", node.to_raw());
            };
            if f.alternate() {
                return write!(f, "{}", tree.detail(*node));
            }
            let arc = tree.node(*node).map_or(0, |n| n.arc());
            match tree.parent(*node) {
                Some(parent) => match tree.node(parent).and_then(|p| p.name()) {
                    Some(name) => write!(f, "{{ {name} {arc} }}"),
                    None => write!(f, "{{ {} {arc} }}", tree.dotted(parent)),
                },
                None => write!(f, "{{ {arc} }}"),
            }
        }
        Value::OidDeclaration(decl) => write!(f, "{decl}"),
        Value::Reference(r) => write!(f, "{r}"),
    }
}

fn write_named_values(f: &mut fmt::Formatter<'_>, named: &NamedValues) -> fmt::Result {
    if named.is_empty() {
        return Ok(());
    }
    let items: Vec<String> = named
        .iter()
        .map(|(name, v)| match v.as_number() {
            Some(n) => format!("{name}({n})"),
            None => name.to_string(),
        })
        .collect();
    write!(f, " {{ {} }}", items.join(", "))
}

fn write_constraint_suffix(f: &mut fmt::Formatter<'_>, c: Option<&Constraint>) -> fmt::Result {
    match c {
        Some(c) => write!(f, " {c}"),
        None => Ok(()),
    }
}

fn write_elements(f: &mut fmt::Formatter<'_>, keyword: &str, elements: &[ElementType]) -> fmt::Result {
    write!(f, "{keyword} {{")?;
    for (i, element) in elements.iter().enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        match &element.name {
            Some(name) => write!(f, "{sep}{name} {}", element.ty)?,
            None => write!(f, "{sep}{}", element.ty)?,
        }
    }
    write!(f, " }}")
}

impl fmt::Display for Type {
    /// Referenced types print by name, `DisplayString (SIZE (0..32))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.primitive
            && let Some(name) = &self.reference_name
        {
            write!(f, "{name}")?;
            if let Some(named) = self.named_values()
                && !named.is_empty()
                && self.constraint().is_none()
            {
                return write_named_values(f, named);
            }
            return write_constraint_suffix(f, self.constraint());
        }
        if self.primitive
            && let Some(tag) = self.tag
        {
            write!(f, "{tag} ")?;
        }

        match &self.kind {
            TypeKind::Integer {
                constraint,
                named_values,
            } => {
                write!(f, "INTEGER")?;
                write_named_values(f, named_values)?;
                write_constraint_suffix(f, constraint.as_ref())
            }
            TypeKind::OctetString { constraint } => {
                write!(f, "OCTET STRING")?;
                write_constraint_suffix(f, constraint.as_ref())
            }
            TypeKind::BitSet {
                constraint,
                named_values,
            } => {
                write!(f, "BITS")?;
                write_named_values(f, named_values)?;
                write_constraint_suffix(f, constraint.as_ref())
            }
            TypeKind::Choice(elements) => write_elements(f, "CHOICE", elements),
            TypeKind::Sequence(elements) => write_elements(f, "SEQUENCE", elements),
            TypeKind::SequenceOf {
                element,
                constraint,
            } => {
                write!(f, "SEQUENCE")?;
                write_constraint_suffix(f, constraint.as_ref())?;
                write!(f, " OF {element}")
            }
            TypeKind::TextualConvention(tc) => write!(f, "{}", tc.syntax),
            _ => write!(f, "{}", self.description()),
        }
    }
}

/// Render a resolved declaration, approximating its source notation:
/// `ifIndex OBJECT-TYPE SYNTAX ... ::= { ifEntry 1 }`.
#[must_use]
pub fn render_symbol(loader: &MibLoader, symbol: &Symbol) -> String {
    SymbolDisplay {
        tree: loader.tree(),
        symbol,
    }
    .to_string()
}

struct SymbolDisplay<'a> {
    tree: &'a OidTree,
    symbol: &'a Symbol,
}

impl SymbolDisplay<'_> {
    fn value(&self, v: &Value) -> String {
        v.display(self.tree).to_string()
    }

    /// Name of the node an OID value points at, or the rendered value.
    fn name(&self, v: &Value) -> String {
        v.as_oid()
            .and_then(|node| self.tree.node(node))
            .and_then(|n| n.name())
            .map_or_else(|| self.value(v), str::to_string)
    }

    fn list(&self, values: &[Value]) -> String {
        let items: Vec<String> = values.iter().map(|v| self.name(v)).collect();
        format!("{{ {} }}", items.join(", "))
    }

    fn object_type(&self, f: &mut fmt::Formatter<'_>, obj: &ObjectType) -> fmt::Result {
        writeln!(f, "{INDENT}SYNTAX {}", obj.syntax)?;
        if let Some(units) = &obj.units {
            writeln!(f, "{INDENT}UNITS \"{units}\"")?;
        }
        writeln!(f, "{INDENT}MAX-ACCESS {}", obj.access)?;
        writeln!(f, "{INDENT}STATUS {}", obj.status)?;
        if let Some(description) = &obj.description {
            writeln!(f, "{INDENT}DESCRIPTION \"{description}\"")?;
        }
        if !obj.index.is_empty() {
            let items: Vec<String> = obj
                .index
                .iter()
                .map(|entry| {
                    let item = match &entry.item {
                        IndexItem::Value(v) => self.name(v),
                        IndexItem::Type(t) => t.to_string(),
                    };
                    if entry.implied { format!("IMPLIED {item}") } else { item }
                })
                .collect();
            writeln!(f, "{INDENT}INDEX {{ {} }}", items.join(", "))?;
        }
        if let Some(augments) = &obj.augments {
            writeln!(f, "{INDENT}AUGMENTS {{ {} }}", self.name(augments))?;
        }
        if let Some(default_value) = &obj.default_value {
            writeln!(f, "{INDENT}DEFVAL {{ {} }}", self.value(default_value))?;
        }
        Ok(())
    }

    fn clauses(&self, f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
        match &ty.kind {
            TypeKind::ObjectType(obj) => self.object_type(f, obj),
            TypeKind::TrapType(trap) => {
                writeln!(f, "{INDENT}ENTERPRISE {}", self.name(&trap.enterprise))?;
                if !trap.variables.is_empty() {
                    writeln!(f, "{INDENT}VARIABLES {}", self.list(&trap.variables))?;
                }
                Ok(())
            }
            TypeKind::NotificationType(n) => {
                if !n.objects.is_empty() {
                    writeln!(f, "{INDENT}OBJECTS {}", self.list(&n.objects))?;
                }
                writeln!(f, "{INDENT}STATUS {}", n.status)
            }
            TypeKind::ModuleIdentity(identity) => {
                writeln!(f, "{INDENT}LAST-UPDATED \"{}\"", identity.last_updated)?;
                writeln!(f, "{INDENT}ORGANIZATION \"{}\"", identity.organization)?;
                for revision in &identity.revisions {
                    writeln!(f, "{INDENT}REVISION {}", self.value(&revision.value))?;
                }
                Ok(())
            }
            TypeKind::ObjectIdentity(identity) => writeln!(f, "{INDENT}STATUS {}", identity.status),
            TypeKind::ObjectGroup(group) => {
                writeln!(f, "{INDENT}OBJECTS {}", self.list(&group.objects))?;
                writeln!(f, "{INDENT}STATUS {}", group.status)
            }
            TypeKind::NotificationGroup(group) => {
                writeln!(f, "{INDENT}NOTIFICATIONS {}", self.list(&group.notifications))?;
                writeln!(f, "{INDENT}STATUS {}", group.status)
            }
            TypeKind::ModuleCompliance(compliance) => {
                writeln!(f, "{INDENT}STATUS {}", compliance.status)?;
                for module in &compliance.modules {
                    match &module.module {
                        Some(name) => writeln!(f, "{INDENT}MODULE {name}")?,
                        None => writeln!(f, "{INDENT}MODULE")?,
                    }
                    if !module.mandatory_groups.is_empty() {
                        writeln!(f, "{INDENT}{INDENT}MANDATORY-GROUPS {}", self.list(&module.mandatory_groups))?;
                    }
                    for c in &module.compliances {
                        let keyword = match c {
                            Compliance::Group { .. } => "GROUP",
                            Compliance::Object { .. } => "OBJECT",
                        };
                        writeln!(f, "{INDENT}{INDENT}{keyword} {}", self.name(c.value()))?;
                    }
                }
                Ok(())
            }
            TypeKind::AgentCapabilities(caps) => {
                writeln!(f, "{INDENT}PRODUCT-RELEASE \"{}\"", caps.product_release)?;
                writeln!(f, "{INDENT}STATUS {}", caps.status)?;
                for module in &caps.modules {
                    writeln!(f, "{INDENT}SUPPORTS {}", module.module)?;
                    writeln!(f, "{INDENT}{INDENT}INCLUDES {}", self.list(&module.includes))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.symbol.name();
        match self.symbol.resolution() {
            None => write!(f, "{name} -- unresolved"),
            Some(Resolution::Type(ty)) => match &ty.kind {
                TypeKind::TextualConvention(tc) => {
                    writeln!(f, "{name} ::= TEXTUAL-CONVENTION")?;
                    if let Some(hint) = &tc.display_hint {
                        writeln!(f, "{INDENT}DISPLAY-HINT \"{hint}\"")?;
                    }
                    writeln!(f, "{INDENT}STATUS {}", tc.status)?;
                    write!(f, "{INDENT}SYNTAX {}", tc.syntax)
                }
                _ => write!(f, "{name} ::= {ty}"),
            },
            Some(Resolution::Value { ty, value }) => match ty.macro_name() {
                Some(keyword) => {
                    writeln!(f, "{name} {keyword}")?;
                    self.clauses(f, ty)?;
                    write!(f, "{INDENT}::= {}", self.value(value))
                }
                None => write!(f, "{name} {ty} ::= {}", self.value(value)),
            },
        }
    }
}
