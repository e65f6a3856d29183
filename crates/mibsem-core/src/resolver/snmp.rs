//! SNMP macro validators.
//!
//! Resolves the clauses of a declared macro value: indices, `DEFVAL`,
//! group members, compliance and capability statements. `OBJECT-TYPE` rows
//! additionally get their `SEQUENCE` checked against the declared columns.

use tracing::debug;

use super::MibLoader;
use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::ids::{ModuleId, NodeId, SymbolId};
use crate::module::{Declaration, Resolution, Symbol, SymbolKind, SymbolState, ValueDeclaration};
use crate::oid::MergeLog;
use crate::snmp::{
    AgentCapabilities, Compliance, ComplianceModule, IndexEntry, IndexItem, ModuleCompliance,
    ModuleIdentity, ObjectType, Revision, SupportedModule, TrapType, Variation,
};
use crate::types::{ElementType, Type, TypeKind};
use crate::value::{Value, ValueReference};

impl MibLoader {
    /// Resolve the clauses of a macro value and return the completed type.
    pub(super) fn resolve_macro(
        &mut self,
        module: ModuleId,
        name: &str,
        location: &FileLocation,
        ty: &Type,
        value: &Value,
    ) -> Result<Type> {
        let kind = match &ty.kind {
            TypeKind::ObjectType(obj) => {
                let obj = self.resolve_object_type(module, name, location, obj)?;
                if let Some(node) = value.as_oid() {
                    self.check_columns(module, name, location, &obj, node);
                }
                TypeKind::ObjectType(Box::new(obj))
            }
            TypeKind::TrapType(trap) => {
                let enterprise = self.resolve_value(module, &trap.enterprise, None)?;
                if enterprise.as_oid().is_none() {
                    let (what, at) = match &trap.enterprise {
                        Value::Reference(r) => (format!("'{}'", r.display_name()), &r.location),
                        other => (format!("{} value", other.kind_name()), location),
                    };
                    return Err(SemanticError::kind_mismatch(
                        format!("TRAP-TYPE enterprise {what} of '{name}' is not an object identifier"),
                        at,
                    ));
                }
                TypeKind::TrapType(Box::new(TrapType {
                    enterprise,
                    variables: self.resolve_values(module, &trap.variables)?,
                    ..(**trap).clone()
                }))
            }
            TypeKind::NotificationType(notification) => {
                let mut notification = notification.clone();
                notification.objects = self.resolve_values(module, &notification.objects)?;
                TypeKind::NotificationType(notification)
            }
            TypeKind::ModuleIdentity(identity) => {
                let revisions = identity
                    .revisions
                    .iter()
                    .map(|r| {
                        Ok(Revision {
                            value: self.resolve_value(module, &r.value, None)?,
                            description: r.description.clone(),
                        })
                    })
                    .collect::<Result<_>>()?;
                TypeKind::ModuleIdentity(Box::new(ModuleIdentity {
                    revisions,
                    ..(**identity).clone()
                }))
            }
            TypeKind::ObjectGroup(group) => {
                let mut group = group.clone();
                group.objects = self.resolve_values(module, &group.objects)?;
                TypeKind::ObjectGroup(group)
            }
            TypeKind::NotificationGroup(group) => {
                let mut group = group.clone();
                group.notifications = self.resolve_values(module, &group.notifications)?;
                TypeKind::NotificationGroup(group)
            }
            TypeKind::ModuleCompliance(compliance) => {
                TypeKind::ModuleCompliance(Box::new(self.resolve_compliance(module, compliance)?))
            }
            TypeKind::AgentCapabilities(caps) => {
                TypeKind::AgentCapabilities(Box::new(self.resolve_capabilities(module, caps)?))
            }
            other => other.clone(),
        };
        Ok(Type { kind, ..ty.clone() })
    }

    fn resolve_values(&mut self, module: ModuleId, values: &[Value]) -> Result<Vec<Value>> {
        values
            .iter()
            .map(|v| self.resolve_value(module, v, None))
            .collect()
    }

    fn resolve_object_type(
        &mut self,
        module: ModuleId,
        name: &str,
        location: &FileLocation,
        obj: &ObjectType,
    ) -> Result<ObjectType> {
        let mut index = Vec::with_capacity(obj.index.len());
        for entry in &obj.index {
            let item = match &entry.item {
                IndexItem::Value(Value::Reference(r)) => {
                    let target = self.lookup(module, &r.name, r.module.as_deref(), &r.location)?;
                    if self.symbol(target).map(Symbol::kind) == Some(SymbolKind::Type) {
                        let ty = self.referenced_type(target, &r.location)?;
                        let mut ty = ty.create_reference(None).map_err(|e| e.at(&r.location))?;
                        ty.reference_name = Some(r.name.clone());
                        IndexItem::Type(ty)
                    } else {
                        let value = self.referenced_value(target, &r.location)?;
                        IndexItem::Value(value.create_reference().map_err(|e| e.at(&r.location))?)
                    }
                }
                IndexItem::Value(v) => IndexItem::Value(self.resolve_value(module, v, None)?),
                IndexItem::Type(t) => IndexItem::Type(self.resolve_type(module, t)?),
            };
            index.push(IndexEntry {
                item,
                implied: entry.implied,
            });
        }
        if let Some(pos) = obj.index.iter().position(|e| e.implied)
            && pos + 1 != obj.index.len()
        {
            self.warn(
                module,
                location,
                format!("IMPLIED may only apply to the last index of '{name}'"),
            );
        }

        let augments = match &obj.augments {
            Some(v) => Some(self.resolve_value(module, v, None)?),
            None => None,
        };
        if augments.is_some() && !index.is_empty() {
            self.warn(module, location, format!("'{name}' has both INDEX and AUGMENTS"));
        }

        let default_value = match &obj.default_value {
            Some(v) => {
                let v = self.resolve_value(module, v, Some(&obj.syntax))?;
                if !obj.syntax.is_compatible(&v) {
                    self.warn(
                        module,
                        location,
                        format!(
                            "default value of '{name}' is not compatible with {}",
                            obj.syntax.description()
                        ),
                    );
                }
                Some(v)
            }
            None => None,
        };

        Ok(ObjectType {
            index,
            augments,
            default_value,
            ..obj.clone()
        })
    }

    /// Check that every element of a row's `SEQUENCE` is declared in the
    /// module, creating an `OBJECT-TYPE` for each missing one.
    ///
    /// For a table the columns live under the row, arc 1 of the table.
    fn check_columns(
        &mut self,
        module: ModuleId,
        owner: &str,
        location: &FileLocation,
        obj: &ObjectType,
        node: NodeId,
    ) {
        let Some(elements) = obj.sequence_elements() else {
            return;
        };
        let mut missing = Vec::new();
        for (element, arc) in elements.iter().zip(1u32..) {
            let Some(name) = element.name.as_deref() else {
                continue;
            };
            let declared = self
                .lookup_strict(module, name)
                .and_then(|id| self.symbol(id))
                .map(Symbol::kind);
            match declared {
                Some(SymbolKind::Type) => {
                    let err = SemanticError::kind_mismatch(
                        format!("element '{name}' of '{owner}' names a type, not an OBJECT-TYPE"),
                        location,
                    );
                    self.error(module, location, &err);
                }
                Some(SymbolKind::Value) => {}
                None => missing.push((arc, element)),
            }
        }

        if missing.is_empty() {
            return;
        }
        if !self.options.synthesize_missing_columns {
            for (_, element) in missing {
                let err = SemanticError::UndefinedSymbol {
                    name: element.name.clone().unwrap_or_default(),
                    location: location.clone(),
                };
                self.error(module, location, &err);
            }
            return;
        }

        let row = if obj.is_table() {
            self.tree.child(Some(node), 1, None, None)
        } else {
            Ok(node)
        };
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                self.error(module, location, &err);
                return;
            }
        };
        for (arc, element) in missing {
            if let Err(err) = self.synthesize_column(module, owner, location, row, arc, element) {
                self.error(module, location, &err);
            }
        }
    }

    /// Create an auto-generated `OBJECT-TYPE` for a missing column at
    /// `row.arc`.
    fn synthesize_column(
        &mut self,
        module: ModuleId,
        owner: &str,
        location: &FileLocation,
        row: NodeId,
        arc: u32,
        element: &ElementType,
    ) -> Result<()> {
        let Some(name) = element.name.clone() else {
            return Ok(());
        };

        let column = {
            let Self { modules, tree, .. } = self;
            let Some(Some(owner_module)) = modules.get_mut(module.to_index()) else {
                return Err(SemanticError::unsupported("a symbol of an unloaded module"));
            };
            let mut sink = MergeLog::new(&mut owner_module.log, location);
            tree.child(Some(row), arc, Some(&name), Some(&mut sink))?
        };

        let ty = Type::new(TypeKind::ObjectType(Box::new(ObjectType::auto_created(
            element.ty.clone(),
        ))));
        let value = Value::ObjectIdentifier(column);
        let declaration = Declaration::Value(ValueDeclaration {
            name: name.clone(),
            ty: ty.clone(),
            value: value.clone(),
            location: location.clone(),
        });

        let Some(m) = self.module_mut(module) else {
            return Err(SemanticError::unsupported("a symbol of an unloaded module"));
        };
        let index = u32::try_from(m.symbols.len())
            .map_err(|_| SemanticError::unsupported("a module with this many symbols"))?;
        let id = SymbolId::new(module, index);
        let mut symbol = Symbol::new(id, declaration);
        symbol.state = SymbolState::Resolved(Resolution::Value { ty, value });
        symbol.synthesized = true;
        m.symbols.insert(name.clone(), symbol);

        self.tree.attach_symbol(column, id);
        let oid = self.tree.dotted(column);
        debug!(column = %name, %oid, "synthesized missing column");
        self.warn(
            module,
            location,
            format!("sequence element '{name}' of '{owner}' is not declared, created OBJECT-TYPE at {oid}"),
        );
        Ok(())
    }

    fn resolve_compliance(&mut self, module: ModuleId, compliance: &ModuleCompliance) -> Result<ModuleCompliance> {
        let mut modules = Vec::with_capacity(compliance.modules.len());
        for m in &compliance.modules {
            let qualifier = self.statement_qualifier(m.module.as_deref());
            let q = qualifier.as_deref();
            let mandatory_groups = self.resolve_members(module, q, &m.mandatory_groups)?;
            let mut compliances = Vec::with_capacity(m.compliances.len());
            for c in &m.compliances {
                compliances.push(match c {
                    Compliance::Group { value, description } => Compliance::Group {
                        value: self.resolve_member(module, q, value)?,
                        description: description.clone(),
                    },
                    Compliance::Object {
                        value,
                        syntax,
                        write_syntax,
                        min_access,
                        description,
                    } => Compliance::Object {
                        value: self.resolve_member(module, q, value)?,
                        syntax: self.resolve_optional_type(module, syntax.as_ref())?,
                        write_syntax: self.resolve_optional_type(module, write_syntax.as_ref())?,
                        min_access: *min_access,
                        description: description.clone(),
                    },
                });
            }
            modules.push(ComplianceModule {
                module: m.module.clone(),
                mandatory_groups,
                compliances,
            });
        }
        Ok(ModuleCompliance {
            modules,
            ..compliance.clone()
        })
    }

    fn resolve_capabilities(&mut self, module: ModuleId, caps: &AgentCapabilities) -> Result<AgentCapabilities> {
        let mut modules = Vec::with_capacity(caps.modules.len());
        for supported in &caps.modules {
            let qualifier = self.statement_qualifier(Some(&supported.module));
            let q = qualifier.as_deref();
            let includes = self.resolve_members(module, q, &supported.includes)?;
            let mut variations = Vec::with_capacity(supported.variations.len());
            for v in &supported.variations {
                let syntax = self.resolve_optional_type(module, v.syntax.as_ref())?;
                let default_value = match &v.default_value {
                    Some(d) => Some(self.resolve_value(module, d, syntax.as_ref())?),
                    None => None,
                };
                variations.push(Variation {
                    value: self.resolve_member(module, q, &v.value)?,
                    write_syntax: self.resolve_optional_type(module, v.write_syntax.as_ref())?,
                    creation_requires: self.resolve_members(module, q, &v.creation_requires)?,
                    syntax,
                    default_value,
                    ..v.clone()
                });
            }
            modules.push(SupportedModule {
                module: supported.module.clone(),
                includes,
                variations,
            });
        }
        Ok(AgentCapabilities {
            modules,
            ..caps.clone()
        })
    }

    fn resolve_optional_type(&mut self, module: ModuleId, ty: Option<&Type>) -> Result<Option<Type>> {
        ty.map(|t| self.resolve_type(module, t)).transpose()
    }

    /// Qualifier for the names of a `MODULE` clause: the named module when
    /// it is loaded. Otherwise names resolve in the declaring module.
    fn statement_qualifier(&self, named: Option<&str>) -> Option<String> {
        named.filter(|n| self.module_id(n).is_some()).map(str::to_string)
    }

    fn resolve_member(&mut self, module: ModuleId, qualifier: Option<&str>, value: &Value) -> Result<Value> {
        match (value, qualifier) {
            (Value::Reference(r), Some(q)) if r.module.is_none() => {
                let qualified = ValueReference::qualified(q, r.name.clone(), r.location.clone());
                self.resolve_value(module, &Value::Reference(qualified), None)
            }
            _ => self.resolve_value(module, value, None),
        }
    }

    fn resolve_members(&mut self, module: ModuleId, qualifier: Option<&str>, values: &[Value]) -> Result<Vec<Value>> {
        values
            .iter()
            .map(|v| self.resolve_member(module, qualifier, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleDecl;
    use crate::resolver::LoaderOptions;
    use crate::snmp::{Access, ComplianceModule, NotificationGroup, NotificationType, ObjectGroup, Status};
    use crate::types::NamedValues;
    use crate::value::{OidArc, OidDeclaration};

    fn loc(line: u32) -> FileLocation {
        FileLocation::new("TEST-MIB", line, 1)
    }

    fn options() -> LoaderOptions {
        LoaderOptions::default().with_builtin_modules(false)
    }

    fn under(parent: &str, arc: u32, line: u32) -> Value {
        Value::OidDeclaration(OidDeclaration::under(
            ValueReference::new(parent, loc(line)),
            vec![OidArc::number(arc)],
        ))
    }

    fn object(syntax: Type) -> ObjectType {
        ObjectType::new(syntax, Access::ReadOnly, Status::Current)
    }

    fn macro_type(kind: TypeKind) -> Type {
        Type::new(kind)
    }

    /// Table with a row whose `SEQUENCE` lists `demoIndex` and `demoName`;
    /// only `demoIndex` is declared.
    fn demo_table() -> ModuleDecl {
        demo_table_with(vec![ElementType::named("demoName", Type::octet_string())])
    }

    /// Same table, with `extra` elements listed after `demoIndex`.
    fn demo_table_with(extra: Vec<ElementType>) -> ModuleDecl {
        let mut elements = vec![ElementType::named("demoIndex", Type::integer())];
        elements.extend(extra);
        let entry = Type::sequence(elements);
        let table = ObjectType::new(
            Type::sequence_of(Type::reference("DemoEntry", loc(4))),
            Access::NotAccessible,
            Status::Current,
        );
        let mut row = ObjectType::new(Type::reference("DemoEntry", loc(5)), Access::NotAccessible, Status::Current);
        row.index = vec![IndexEntry::value(Value::reference("demoIndex", loc(5)))];

        ModuleDecl::new("TEST-MIB", loc(1))
            .with_value(
                "demo",
                Type::object_identifier(),
                Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(2))),
                loc(2),
            )
            .with_type("DemoEntry", entry, loc(3))
            .with_value(
                "demoTable",
                macro_type(TypeKind::ObjectType(Box::new(table))),
                under("demo", 1, 4),
                loc(4),
            )
            .with_value(
                "demoEntry",
                macro_type(TypeKind::ObjectType(Box::new(row))),
                under("demoTable", 1, 5),
                loc(5),
            )
            .with_value(
                "demoIndex",
                macro_type(TypeKind::ObjectType(Box::new(object(Type::integer())))),
                under("demoEntry", 1, 6),
                loc(6),
            )
    }

    #[test]
    fn test_missing_column_is_synthesized_once() {
        let mut loader = MibLoader::with_options(options());
        let log = loader.load(demo_table());
        assert_eq!(log.error_count(), 0, "{log}");
        assert_eq!(log.warning_count(), 1, "{log}");
        assert!(log.warnings().next().unwrap().message.contains("'demoName'"));

        let module = loader.module("TEST-MIB").unwrap();
        let name = module.get_symbol("demoName").unwrap();
        assert!(name.is_synthesized());
        assert!(name.is_resolved());
        let node = name.node().unwrap();
        assert_eq!(loader.tree().dotted(node), "1.1.1.2");
        assert_eq!(loader.symbol_at(node).map(Symbol::name), Some("demoName"));
        let Some(TypeKind::ObjectType(obj)) = name.resolved_type().map(|t| &t.kind) else {
            panic!("expected OBJECT-TYPE");
        };
        assert!(obj.is_auto_created());
        assert!(matches!(obj.syntax.kind, TypeKind::OctetString { .. }));

        let row = loader.tree().find_by_name_path(&["demo", "demoTable", "demoEntry"]).unwrap();
        assert_eq!(loader.tree().dotted(row), "1.1.1");
    }

    #[test]
    fn test_synthesis_disabled_reports_undefined_column() {
        let mut loader = MibLoader::with_options(options().with_synthesize_missing_columns(false));
        let log = loader.load(demo_table());
        // Once for the table, once for the row.
        assert_eq!(log.error_count(), 2, "{log}");
        assert!(log.errors().all(|e| e.message.contains("demoName")));
        assert!(loader.module("TEST-MIB").unwrap().get_symbol("demoName").is_none());
    }

    #[test]
    fn test_column_naming_a_type_is_an_error() {
        let mut loader = MibLoader::with_options(options());
        let entry = Type::sequence(vec![ElementType::named("Foo", Type::integer())]);
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_type("Foo", Type::integer(), loc(2))
                .with_type("FooEntry", entry, loc(3))
                .with_value(
                    "fooEntry",
                    macro_type(TypeKind::ObjectType(Box::new(object(Type::reference("FooEntry", loc(4)))))),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(4))),
                    loc(4),
                ),
        );
        assert_eq!(log.error_count(), 1, "{log}");
        assert!(log.errors().next().unwrap().message.contains("names a type"));
        assert!(loader.module("TEST-MIB").unwrap().get_symbol("fooEntry").unwrap().is_resolved());
    }

    #[test]
    fn test_index_naming_a_type_keeps_the_type() {
        let mut loader = MibLoader::with_options(options());
        let mut row = object(Type::integer());
        row.index = vec![IndexEntry::value(Value::reference("Index", loc(3)))];
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_type("Index", Type::integer(), loc(2))
                .with_value(
                    "row",
                    macro_type(TypeKind::ObjectType(Box::new(row))),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(3))),
                    loc(3),
                ),
        );
        assert!(log.is_empty(), "{log}");
        let row = loader.module("TEST-MIB").unwrap().get_symbol("row").unwrap();
        let Some(TypeKind::ObjectType(obj)) = row.resolved_type().map(|t| &t.kind) else {
            panic!("expected OBJECT-TYPE");
        };
        let IndexItem::Type(ty) = &obj.index[0].item else {
            panic!("expected a type index");
        };
        assert_eq!(ty.reference_name.as_deref(), Some("Index"));
        assert!(!ty.primitive);
    }

    #[test]
    fn test_defval_uses_enumeration_labels() {
        let mut loader = MibLoader::with_options(options());
        let mut status = object(Type::enumeration(NamedValues::from_numbers([("up", 1), ("down", 2)])));
        status.default_value = Some(Value::reference("down", loc(2)));
        let mut bad = object(Type::integer());
        bad.default_value = Some(Value::String("none".into()));
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_value(
                    "status",
                    macro_type(TypeKind::ObjectType(Box::new(status))),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(2))),
                    loc(2),
                )
                .with_value(
                    "bad",
                    macro_type(TypeKind::ObjectType(Box::new(bad))),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(2)], loc(3))),
                    loc(3),
                ),
        );
        assert_eq!(log.error_count(), 0, "{log}");
        assert_eq!(log.warning_count(), 1, "{log}");
        assert_eq!(log.warnings().next().unwrap().location, loc(3));

        let status = loader.module("TEST-MIB").unwrap().get_symbol("status").unwrap();
        let Some(TypeKind::ObjectType(obj)) = status.resolved_type().map(|t| &t.kind) else {
            panic!("expected OBJECT-TYPE");
        };
        assert_eq!(obj.default_value, Some(Value::integer(2)));
    }

    #[test]
    fn test_implied_not_last_warns() {
        let mut loader = MibLoader::with_options(options());
        let mut row = object(Type::integer());
        row.index = vec![
            IndexEntry::implied(Value::reference("a", loc(3))),
            IndexEntry::value(Value::reference("b", loc(3))),
        ];
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_value("a", Type::integer(), Value::integer(1), loc(2))
                .with_value("b", Type::integer(), Value::integer(2), loc(2))
                .with_value(
                    "row",
                    macro_type(TypeKind::ObjectType(Box::new(row))),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(3))),
                    loc(3),
                ),
        );
        assert_eq!(log.warning_count(), 1, "{log}");
        assert!(log.warnings().next().unwrap().message.contains("IMPLIED"));
    }

    #[test]
    fn test_unresolvable_clause_fails_and_unbinds() {
        let mut loader = MibLoader::with_options(options());
        let notification = NotificationType::new(vec![Value::reference("ghost", loc(2))], Status::Current);
        let log = loader.load(ModuleDecl::new("TEST-MIB", loc(1)).with_value(
            "trapped",
            macro_type(TypeKind::NotificationType(Box::new(notification))),
            Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(7)], loc(2))),
            loc(2),
        ));
        assert_eq!(log.error_count(), 1, "{log}");
        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("trapped").unwrap();
        assert!(matches!(symbol.error(), Some(SemanticError::UndefinedSymbol { .. })));
        let node = loader.tree().lookup_by_name(None, "trapped").unwrap();
        assert!(loader.symbol_at(node).is_none());
    }

    #[test]
    fn test_compliance_names_resolve_in_named_module() {
        let mut loader = MibLoader::with_options(options());
        let group = ObjectGroup {
            objects: vec![Value::reference("other", FileLocation::new("OTHER-MIB", 3, 1))],
            ..ObjectGroup::default()
        };
        let other = ModuleDecl::new("OTHER-MIB", FileLocation::new("OTHER-MIB", 1, 1))
            .with_value(
                "other",
                Type::object_identifier(),
                Value::OidDeclaration(OidDeclaration::rooted(
                    vec![OidArc::number(3)],
                    FileLocation::new("OTHER-MIB", 2, 1),
                )),
                FileLocation::new("OTHER-MIB", 2, 1),
            )
            .with_value(
                "otherGroup",
                macro_type(TypeKind::ObjectGroup(Box::new(group))),
                Value::OidDeclaration(OidDeclaration::under(
                    ValueReference::new("other", FileLocation::new("OTHER-MIB", 3, 1)),
                    vec![OidArc::number(1)],
                )),
                FileLocation::new("OTHER-MIB", 3, 1),
            );
        let compliance = ModuleCompliance {
            modules: vec![ComplianceModule {
                module: Some("OTHER-MIB".into()),
                mandatory_groups: vec![Value::reference("otherGroup", loc(2))],
                compliances: Vec::new(),
            }],
            ..ModuleCompliance::default()
        };
        let test = ModuleDecl::new("TEST-MIB", loc(1)).with_value(
            "testCompliance",
            macro_type(TypeKind::ModuleCompliance(Box::new(compliance))),
            Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(4)], loc(2))),
            loc(2),
        );

        let log = loader.load_all(vec![other, test]);
        assert!(log.is_empty(), "{log}");
        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("testCompliance").unwrap();
        let Some(TypeKind::ModuleCompliance(compliance)) = symbol.resolved_type().map(|t| &t.kind) else {
            panic!("expected MODULE-COMPLIANCE");
        };
        let group = loader.tree().find_by_name_path(&["other", "otherGroup"]).unwrap();
        assert_eq!(compliance.modules[0].mandatory_groups, vec![Value::ObjectIdentifier(group)]);
    }

    #[test]
    fn test_two_missing_columns_follow_sequence_order() {
        let mut loader = MibLoader::with_options(options());
        let log = loader.load(demo_table_with(vec![
            ElementType::named("demoName", Type::octet_string()),
            ElementType::named("demoCount", Type::integer()),
        ]));
        assert_eq!(log.error_count(), 0, "{log}");
        assert_eq!(log.warning_count(), 2, "{log}");

        let module = loader.module("TEST-MIB").unwrap();
        for (column, dotted) in [("demoName", "1.1.1.2"), ("demoCount", "1.1.1.3")] {
            let symbol = module.get_symbol(column).unwrap();
            assert!(symbol.is_synthesized());
            assert_eq!(loader.tree().dotted(symbol.node().unwrap()), dotted);
            assert!(log.warnings().any(|w| w.message.contains(&format!("'{column}'"))));
        }
        let row = loader.tree().find_by_name_path(&["demo", "demoTable", "demoEntry"]).unwrap();
        assert_eq!(loader.tree().children(Some(row)).len(), 3);
    }

    /// `demo`, a variable under it and an integer value symbol.
    fn trap_base() -> ModuleDecl {
        ModuleDecl::new("TEST-MIB", loc(1))
            .with_value(
                "demo",
                Type::object_identifier(),
                Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(2))),
                loc(2),
            )
            .with_value(
                "demoVar",
                macro_type(TypeKind::ObjectType(Box::new(object(Type::integer())))),
                under("demo", 1, 3),
                loc(3),
            )
            .with_value("demoCount", Type::integer(), Value::integer(5), loc(4))
    }

    fn trap(enterprise: &str, line: u32) -> Type {
        let mut trap = TrapType::new(Value::reference(enterprise, loc(line)));
        trap.variables = vec![Value::reference("demoVar", loc(line))];
        macro_type(TypeKind::TrapType(Box::new(trap)))
    }

    #[test]
    fn test_trap_type_resolves_enterprise_and_variables() {
        let mut loader = MibLoader::with_options(options());
        let log = loader.load(trap_base().with_value("demoTrap", trap("demo", 5), Value::integer(3), loc(5)));
        assert!(log.is_empty(), "{log}");

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoTrap").unwrap();
        assert!(symbol.is_resolved());
        assert_eq!(symbol.value(), Some(&Value::integer(3)));
        assert!(symbol.node().is_none());
        let Some(TypeKind::TrapType(resolved)) = symbol.resolved_type().map(|t| &t.kind) else {
            panic!("expected TRAP-TYPE");
        };
        let tree = loader.tree();
        let demo = tree.find_by_name_path(&["demo"]).unwrap();
        let var = tree.find_by_name_path(&["demo", "demoVar"]).unwrap();
        assert_eq!(resolved.enterprise, Value::ObjectIdentifier(demo));
        assert_eq!(resolved.variables, vec![Value::ObjectIdentifier(var)]);
    }

    #[test]
    fn test_trap_type_rejects_oid_value() {
        let mut loader = MibLoader::with_options(options());
        let log = loader.load(trap_base().with_value("demoTrap", trap("demo", 5), under("demo", 9, 5), loc(5)));
        assert_eq!(log.error_count(), 1, "{log}");
        let error = log.errors().next().unwrap();
        assert_eq!(error.location, loc(5));
        assert!(error.message.starts_with("value of 'demoTrap' is not compatible"), "{}", error.message);

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoTrap").unwrap();
        assert!(symbol.is_resolved());
        assert!(symbol.value().and_then(Value::as_oid).is_some());
    }

    #[test]
    fn test_trap_enterprise_must_be_an_object_identifier() {
        let mut loader = MibLoader::with_options(options());
        let log = loader.load(trap_base().with_value("demoTrap", trap("demoCount", 5), Value::integer(3), loc(5)));
        assert_eq!(log.error_count(), 1, "{log}");
        assert_eq!(
            log.errors().next().unwrap().message,
            "TRAP-TYPE enterprise 'demoCount' of 'demoTrap' is not an object identifier"
        );

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoTrap").unwrap();
        let Some(SemanticError::KindMismatch { location, .. }) = symbol.error() else {
            panic!("expected a kind mismatch, got {:?}", symbol.error());
        };
        assert_eq!(location, &loc(5));
    }

    #[test]
    fn test_module_identity_resolves_revisions() {
        let mut loader = MibLoader::with_options(options());
        let identity = ModuleIdentity {
            last_updated: "202401010000Z".into(),
            revisions: vec![
                Revision {
                    value: Value::String("202401010000Z".into()),
                    description: "Second release.".into(),
                },
                Revision {
                    value: Value::String("200001010000Z".into()),
                    description: "Initial release.".into(),
                },
            ],
            ..ModuleIdentity::default()
        };
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1)).with_value(
                "demoMib",
                macro_type(TypeKind::ModuleIdentity(Box::new(identity))),
                Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(2))),
                loc(2),
            ),
        );
        assert!(log.is_empty(), "{log}");

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoMib").unwrap();
        assert_eq!(symbol.node().map(|n| loader.tree().dotted(n)).as_deref(), Some("1"));
        let Some(TypeKind::ModuleIdentity(resolved)) = symbol.resolved_type().map(|t| &t.kind) else {
            panic!("expected MODULE-IDENTITY");
        };
        let dates: Vec<_> = resolved.revisions.iter().map(|r| &r.value).collect();
        assert_eq!(
            dates,
            [&Value::String("202401010000Z".into()), &Value::String("200001010000Z".into())]
        );
        assert_eq!(resolved.revisions[1].description, "Initial release.");
    }

    #[test]
    fn test_notification_group_resolves_members() {
        let mut loader = MibLoader::with_options(options());
        let notification = NotificationType::new(vec![Value::reference("demoVar", loc(5))], Status::Current);
        let group = NotificationGroup {
            notifications: vec![Value::reference("demoNotify", loc(6))],
            ..NotificationGroup::default()
        };
        let log = loader.load(
            trap_base()
                .with_value(
                    "demoNotify",
                    macro_type(TypeKind::NotificationType(Box::new(notification))),
                    under("demo", 2, 5),
                    loc(5),
                )
                .with_value(
                    "demoNotifications",
                    macro_type(TypeKind::NotificationGroup(Box::new(group))),
                    under("demo", 3, 6),
                    loc(6),
                ),
        );
        assert!(log.is_empty(), "{log}");

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoNotifications").unwrap();
        let Some(TypeKind::NotificationGroup(resolved)) = symbol.resolved_type().map(|t| &t.kind) else {
            panic!("expected NOTIFICATION-GROUP");
        };
        let notify = loader.tree().find_by_name_path(&["demo", "demoNotify"]).unwrap();
        assert_eq!(resolved.notifications, vec![Value::ObjectIdentifier(notify)]);
    }

    #[test]
    fn test_agent_capabilities_resolve_in_supported_module() {
        let mut loader = MibLoader::with_options(options());
        let at = |line| FileLocation::new("OTHER-MIB", line, 1);
        let other = ModuleDecl::new("OTHER-MIB", at(1))
            .with_value(
                "other",
                Type::object_identifier(),
                Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(3)], at(2))),
                at(2),
            )
            .with_value(
                "otherIndex",
                macro_type(TypeKind::ObjectType(Box::new(object(Type::integer())))),
                Value::OidDeclaration(OidDeclaration::under(ValueReference::new("other", at(3)), vec![
                    OidArc::number(1),
                ])),
                at(3),
            )
            .with_value(
                "otherStatus",
                macro_type(TypeKind::ObjectType(Box::new(object(Type::integer())))),
                Value::OidDeclaration(OidDeclaration::under(ValueReference::new("other", at(4)), vec![
                    OidArc::number(2),
                ])),
                at(4),
            );

        let mut variation = Variation::new(Value::reference("otherStatus", loc(3)), "Only 1 and 2.");
        variation.syntax = Some(Type::integer());
        variation.access = Some(Access::ReadOnly);
        variation.creation_requires = vec![Value::reference("otherIndex", loc(3))];
        variation.default_value = Some(Value::integer(2));
        let caps = AgentCapabilities {
            product_release: "Demo agent 1.0".into(),
            modules: vec![SupportedModule {
                module: "OTHER-MIB".into(),
                includes: vec![Value::reference("otherIndex", loc(2))],
                variations: vec![variation],
            }],
            ..AgentCapabilities::default()
        };
        let test = ModuleDecl::new("TEST-MIB", loc(1)).with_value(
            "demoAgent",
            macro_type(TypeKind::AgentCapabilities(Box::new(caps))),
            Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(4)], loc(2))),
            loc(2),
        );

        // Unqualified, these names would only resolve with a fallback warning.
        let log = loader.load_all(vec![other, test]);
        assert!(log.is_empty(), "{log}");

        let symbol = loader.module("TEST-MIB").unwrap().get_symbol("demoAgent").unwrap();
        let Some(TypeKind::AgentCapabilities(resolved)) = symbol.resolved_type().map(|t| &t.kind) else {
            panic!("expected AGENT-CAPABILITIES");
        };
        let tree = loader.tree();
        let index = tree.find_by_name_path(&["other", "otherIndex"]).unwrap();
        let status = tree.find_by_name_path(&["other", "otherStatus"]).unwrap();
        let supported = &resolved.modules[0];
        assert_eq!(supported.module, "OTHER-MIB");
        assert_eq!(supported.includes, vec![Value::ObjectIdentifier(index)]);
        let variation = &supported.variations[0];
        assert_eq!(variation.value, Value::ObjectIdentifier(status));
        assert_eq!(variation.creation_requires, vec![Value::ObjectIdentifier(index)]);
        assert_eq!(variation.default_value, Some(Value::integer(2)));
        assert_eq!(variation.access, Some(Access::ReadOnly));
    }
}
