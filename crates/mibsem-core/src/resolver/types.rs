//! Type resolution.

use super::MibLoader;
use crate::constraint::Constraint;
use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::ids::ModuleId;
use crate::snmp::TextualConvention;
use crate::types::{ElementType, NamedValues, Refinement, Type, TypeKind, TypeReference};

impl MibLoader {
    /// Resolve every reference inside a type.
    ///
    /// Macro types only get their `SYNTAX` resolved here; their other
    /// clauses are values resolved with the macro.
    pub(super) fn resolve_type(&mut self, module: ModuleId, ty: &Type) -> Result<Type> {
        let kind = match &ty.kind {
            TypeKind::Reference(reference) => return self.resolve_type_reference(module, ty, reference),
            TypeKind::Integer {
                constraint,
                named_values,
            } => {
                let host = Type::integer();
                TypeKind::Integer {
                    constraint: self.resolve_constraint(module, constraint.as_ref(), &host, None)?,
                    named_values: self.resolve_named_values(module, named_values)?,
                }
            }
            TypeKind::OctetString { constraint } => {
                let host = Type::octet_string();
                TypeKind::OctetString {
                    constraint: self.resolve_constraint(module, constraint.as_ref(), &host, None)?,
                }
            }
            TypeKind::BitSet {
                constraint,
                named_values,
            } => {
                let host = Type::bits(NamedValues::new());
                TypeKind::BitSet {
                    constraint: self.resolve_constraint(module, constraint.as_ref(), &host, None)?,
                    named_values: self.resolve_named_values(module, named_values)?,
                }
            }
            TypeKind::Choice(elements) => TypeKind::Choice(self.resolve_elements(module, elements)?),
            TypeKind::Sequence(elements) => TypeKind::Sequence(self.resolve_elements(module, elements)?),
            TypeKind::SequenceOf {
                element,
                constraint,
            } => {
                let element = self.resolve_type(module, element)?;
                let host = Type::sequence_of(element.clone());
                TypeKind::SequenceOf {
                    constraint: self.resolve_constraint(module, constraint.as_ref(), &host, None)?,
                    element: Box::new(element),
                }
            }
            TypeKind::ObjectType(obj) => {
                let mut obj = obj.clone();
                obj.syntax = self.resolve_type(module, &obj.syntax)?;
                TypeKind::ObjectType(obj)
            }
            TypeKind::TextualConvention(tc) => {
                let syntax = self.resolve_type(module, &tc.syntax)?;
                TypeKind::TextualConvention(Box::new(TextualConvention {
                    syntax,
                    ..(**tc).clone()
                }))
            }
            other => other.clone(),
        };
        Ok(Type { kind, ..ty.clone() })
    }

    /// Resolve a reference to a type symbol and derive the type seen
    /// through it.
    fn resolve_type_reference(
        &mut self,
        module: ModuleId,
        ty: &Type,
        reference: &TypeReference,
    ) -> Result<Type> {
        let location = &reference.location;
        let target = self.lookup(module, &reference.name, reference.module.as_deref(), location)?;
        let base = self.referenced_type(target, location)?;

        let refinement = match &reference.refinement {
            None => None,
            Some(Refinement::Constraint(c)) => {
                let host = unconstrained(&base);
                let name = reference.display_name();
                let c = self.resolve_constraint(module, Some(c), &host, Some((&base, &name, location)))?;
                c.map(Refinement::Constraint)
            }
            Some(Refinement::NamedValues(named)) => {
                Some(Refinement::NamedValues(self.resolve_named_values(module, named)?))
            }
        };

        let mut resolved = base.create_reference(refinement).map_err(|e| e.at(location))?;
        resolved.reference_name = Some(reference.name.clone());
        if ty.tag.is_some() {
            resolved.tag = ty.tag;
        }
        Ok(resolved)
    }

    fn resolve_elements(&mut self, module: ModuleId, elements: &[ElementType]) -> Result<Vec<ElementType>> {
        elements
            .iter()
            .map(|e| {
                Ok(ElementType {
                    name: e.name.clone(),
                    ty: self.resolve_type(module, &e.ty)?,
                })
            })
            .collect()
    }

    fn resolve_named_values(&mut self, module: ModuleId, named: &NamedValues) -> Result<NamedValues> {
        named.try_map_values(&mut |v| self.resolve_value(module, v, None))
    }

    /// Resolve the bounds of a constraint, then check them against the
    /// unconstrained host type and, for a refinement, against the base
    /// type's own constraint. Problems are logged as warnings.
    fn resolve_constraint(
        &mut self,
        module: ModuleId,
        constraint: Option<&Constraint>,
        host: &Type,
        refines: Option<(&Type, &str, &FileLocation)>,
    ) -> Result<Option<Constraint>> {
        let Some(constraint) = constraint else {
            return Ok(None);
        };
        let resolved = constraint.try_map_values(&mut |v| self.resolve_value(module, v, None))?;

        let location = refines.map_or_else(|| self.site_location(module), |(_, _, l)| l.clone());
        if !resolved.is_compatible_type(host) {
            let err = SemanticError::ConstraintConflict {
                constraint: resolved.to_string(),
                type_name: host.description(),
                location: location.clone(),
            };
            self.warn(module, &location, err.to_string());
        } else if let Some((base, name, _)) = refines
            && let Some(outer) = base.constraint()
            && !narrows(outer, &resolved)
        {
            self.warn(
                module,
                &location,
                format!("constraint {resolved} is not within {outer}, the constraint of '{name}'"),
            );
        }
        Ok(Some(resolved))
    }

    /// Location of the innermost declaration being resolved.
    fn site_location(&self, module: ModuleId) -> FileLocation {
        match self.sites.last() {
            Some(site) => site.clone(),
            None => self
                .module_by_id(module)
                .map_or_else(|| FileLocation::synthetic(""), |m| m.location().clone()),
        }
    }
}

/// The base type without its constraint, used to check a refinement's
/// bounds.
fn unconstrained(base: &Type) -> Type {
    let kind = match &base.kind {
        TypeKind::Integer { .. } => TypeKind::Integer {
            constraint: None,
            named_values: NamedValues::new(),
        },
        TypeKind::OctetString { .. } => TypeKind::OctetString { constraint: None },
        TypeKind::BitSet { .. } => TypeKind::BitSet {
            constraint: None,
            named_values: NamedValues::new(),
        },
        TypeKind::SequenceOf { element, .. } => TypeKind::SequenceOf {
            element: element.clone(),
            constraint: None,
        },
        TypeKind::TextualConvention(tc) => return unconstrained(&tc.syntax),
        other => other.clone(),
    };
    Type::new(kind)
}

/// Check that every bound of `inner` is accepted by `outer`. Constraints of
/// different shapes (a size against a value range) are not compared.
fn narrows(outer: &Constraint, inner: &Constraint) -> bool {
    match (outer, inner) {
        (Constraint::Size(outer), Constraint::Size(inner)) => narrows(outer, inner),
        (Constraint::Size(_), _) | (_, Constraint::Size(_)) => true,
        (_, Constraint::Compound(a, b)) => narrows(outer, a) && narrows(outer, b),
        _ => inner.values().into_iter().all(|v| outer.is_compatible(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleDecl;
    use crate::resolver::LoaderOptions;
    use crate::types::TypeTag;
    use crate::value::Value;

    fn loc(line: u32) -> FileLocation {
        FileLocation::new("TEST-MIB", line, 1)
    }

    fn resolved(loader: &MibLoader, name: &str) -> Type {
        loader
            .module("TEST-MIB")
            .and_then(|m| m.get_symbol(name))
            .and_then(|s| s.resolved_type())
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_reference_is_non_primitive_and_named() {
        let mut loader = MibLoader::new();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .import("SNMPv2-TC", ["DisplayString"])
                .with_type("Name", Type::reference("DisplayString", loc(3)), loc(3)),
        );
        assert!(log.is_empty(), "{log}");

        let ty = resolved(&loader, "Name");
        assert!(!ty.primitive);
        assert_eq!(ty.reference_name.as_deref(), Some("DisplayString"));
        assert!(matches!(ty.kind, TypeKind::OctetString { .. }));
        assert!(ty.is_compatible(&Value::String("eth0".into())));
        assert!(!ty.is_compatible(&Value::String("x".repeat(256))));
    }

    #[test]
    fn test_refinement_narrows_base() {
        let mut loader = MibLoader::new();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .import("SNMPv2-SMI", ["Integer32"])
                .with_type(
                    "Level",
                    Type::constrained_reference("Integer32", loc(3), Constraint::range(1, 5)),
                    loc(3),
                ),
        );
        assert!(log.is_empty(), "{log}");
        let ty = resolved(&loader, "Level");
        assert!(ty.is_compatible(&Value::integer(5)));
        assert!(!ty.is_compatible(&Value::integer(6)));
    }

    #[test]
    fn test_refinement_outside_base_warns() {
        let mut loader = MibLoader::new();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .import("SNMPv2-TC", ["DisplayString"])
                .with_type(
                    "Long",
                    Type::constrained_reference("DisplayString", loc(3), Constraint::size_range(0, 300)),
                    loc(3),
                ),
        );
        assert_eq!(log.error_count(), 0);
        assert_eq!(log.warning_count(), 1);
        assert_eq!(log.entries()[0].location, loc(3));
        assert!(loader.module("TEST-MIB").unwrap().get_symbol("Long").unwrap().is_resolved());
    }

    #[test]
    fn test_constraint_conflict_is_a_warning() {
        let mut loader = MibLoader::with_options(LoaderOptions::default().with_builtin_modules(false));
        let log = loader.load(ModuleDecl::new("TEST-MIB", loc(1)).with_type(
            "Odd",
            Type::integer().with_constraint(Constraint::fixed_size(4)),
            loc(2),
        ));
        assert_eq!(log.error_count(), 0);
        assert_eq!(log.warning_count(), 1);
        assert!(log.entries()[0].message.contains("INTEGER"));
    }

    #[test]
    fn test_constraint_bound_reference_resolves() {
        let mut loader = MibLoader::with_options(LoaderOptions::default().with_builtin_modules(false));
        let bounded = Type::integer().with_constraint(Constraint::ValueRange(
            crate::constraint::ValueRange::inclusive(
                Some(Value::integer(0)),
                Some(Value::reference("maxLevel", loc(3))),
            ),
        ));
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_value("maxLevel", Type::integer(), Value::integer(9), loc(2))
                .with_type("Level", bounded, loc(3)),
        );
        assert!(log.is_empty(), "{log}");
        let ty = resolved(&loader, "Level");
        assert!(ty.is_resolved());
        assert!(ty.is_compatible(&Value::integer(9)));
        assert!(!ty.is_compatible(&Value::integer(10)));
    }

    #[test]
    fn test_explicit_tag_overrides_referenced_tag() {
        let mut loader = MibLoader::new();
        let mut tagged = Type::reference("Counter32", loc(3));
        tagged.tag = Some(TypeTag::application(9));
        loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .import("SNMPv2-SMI", ["Counter32", "Gauge32"])
                .with_type("Plain", Type::reference("Gauge32", loc(2)), loc(2))
                .with_type("Tagged", tagged, loc(3)),
        );
        assert_eq!(resolved(&loader, "Plain").tag, Some(TypeTag::application(2)));
        assert_eq!(resolved(&loader, "Tagged").tag, Some(TypeTag::application(9)));
    }

    #[test]
    fn test_sequence_elements_resolve() {
        let mut loader = MibLoader::new();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .import("SNMPv2-SMI", ["Integer32"])
                .with_type(
                    "Entry",
                    Type::sequence(vec![
                        ElementType::named("index", Type::reference("Integer32", loc(3))),
                        ElementType::named("descr", Type::octet_string()),
                    ]),
                    loc(2),
                )
                .with_type("Table", Type::sequence_of(Type::reference("Entry", loc(5))), loc(5)),
        );
        assert!(log.is_empty(), "{log}");
        let table = resolved(&loader, "Table");
        assert!(table.is_resolved());
        let TypeKind::SequenceOf { element, .. } = &table.kind else {
            panic!("expected SEQUENCE OF");
        };
        assert_eq!(element.reference_name.as_deref(), Some("Entry"));
    }

    #[test]
    fn test_narrows() {
        assert!(narrows(&Constraint::range(0, 100), &Constraint::range(1, 5)));
        assert!(!narrows(&Constraint::range(0, 100), &Constraint::range(1, 500)));
        assert!(narrows(&Constraint::size_range(0, 255), &Constraint::fixed_size(6)));
        assert!(!narrows(&Constraint::size_range(0, 255), &Constraint::fixed_size(300)));
        let either = Constraint::range(1, 2).or(Constraint::range(8, 9));
        assert!(narrows(&Constraint::range(0, 10), &either));
    }
}
