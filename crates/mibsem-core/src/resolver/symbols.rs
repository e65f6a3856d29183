//! Per-symbol resolution and memoization.

use tracing::{debug, trace};

use super::MibLoader;
use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::ids::{ModuleId, SymbolId};
use crate::module::{Declaration, Resolution, SymbolState, TypeDeclaration, ValueDeclaration};
use crate::types::{Type, TypeKind};
use crate::value::{OidArc, Value};

impl MibLoader {
    /// Resolve every symbol of a module, including symbols synthesized
    /// along the way.
    pub(super) fn resolve_module_symbols(&mut self, module: ModuleId) {
        debug!(module = %self.module_name(module), "resolving module");
        let mut index = 0;
        while let Some(count) = self.module_by_id(module).map(|m| m.len()) {
            if index >= count {
                break;
            }
            let Ok(raw) = u32::try_from(index) else {
                break;
            };
            let id = SymbolId::new(module, raw);
            // Failures are logged and stored on the symbol.
            let _ = self.declare_symbol(id);
            self.complete_symbol(id);
            index += 1;
        }
    }

    /// Resolve the type and value of a symbol, memoized.
    ///
    /// For a value symbol with an OID value this places the node in the tree
    /// and binds the symbol to it. Macro clauses are left for
    /// [`Self::complete_symbol`].
    pub(super) fn declare_symbol(&mut self, id: SymbolId) -> Result<Resolution> {
        let Some(symbol) = self.symbol_mut(id) else {
            return Err(SemanticError::unsupported(format!("stale symbol {id}")));
        };
        let declaration = match &symbol.state {
            SymbolState::Declared(r) | SymbolState::Resolved(r) => return Ok(r.clone()),
            SymbolState::Failed(err) => return Err(err.clone()),
            SymbolState::InProgress => {
                return Err(SemanticError::CycleDetected {
                    name: symbol.name().to_string(),
                    location: symbol.location().clone(),
                });
            }
            SymbolState::Pending => symbol.declaration.clone(),
        };
        symbol.state = SymbolState::InProgress;
        trace!(symbol = declaration.name(), "declaring symbol");

        self.sites.push(declaration.location().clone());
        let result = match &declaration {
            Declaration::Type(decl) => self.declare_type_symbol(id.module, decl),
            Declaration::Value(decl) => self.declare_value_symbol(id.module, decl),
        };
        self.sites.pop();

        match result {
            Ok(resolution) => {
                if let Resolution::Value { value, .. } = &resolution
                    && let Some(node) = value.as_oid()
                    && !self.tree.attach_symbol(node, id)
                {
                    trace!(symbol = declaration.name(), "OID node already bound to another symbol");
                }
                let state = match (&declaration, &resolution) {
                    (Declaration::Value(_), Resolution::Value { ty, .. })
                        if ty.macro_name().is_some() =>
                    {
                        SymbolState::Declared(resolution.clone())
                    }
                    _ => SymbolState::Resolved(resolution.clone()),
                };
                if let Some(symbol) = self.symbol_mut(id) {
                    symbol.state = state;
                }
                Ok(resolution)
            }
            Err(err) => {
                self.error(id.module, declaration.location(), &err);
                if let Some(symbol) = self.symbol_mut(id) {
                    symbol.state = SymbolState::Failed(err.clone());
                }
                Err(err)
            }
        }
    }

    fn declare_type_symbol(&mut self, module: ModuleId, decl: &TypeDeclaration) -> Result<Resolution> {
        if let Some(name) = decl.ty.macro_name()
            && !matches!(decl.ty.kind, TypeKind::TextualConvention(_))
        {
            return Err(SemanticError::kind_mismatch(
                format!("{name} cannot define the type '{}'; it only applies to value symbols", decl.name),
                &decl.location,
            ));
        }
        let ty = self.resolve_type(module, &decl.ty)?;
        Ok(Resolution::Type(ty))
    }

    fn declare_value_symbol(&mut self, module: ModuleId, decl: &ValueDeclaration) -> Result<Resolution> {
        if matches!(decl.ty.kind, TypeKind::TextualConvention(_)) {
            return Err(SemanticError::kind_mismatch(
                format!("TEXTUAL-CONVENTION cannot define the value '{}'; it only applies to type symbols", decl.name),
                &decl.location,
            ));
        }
        let ty = self.resolve_type(module, &decl.ty)?;

        let value = match &decl.value {
            Value::OidDeclaration(oid) => {
                let leaf = oid.arcs.last().is_some_and(|arc: &OidArc| arc.name.is_none());
                let name = leaf.then_some(decl.name.as_str());
                Value::ObjectIdentifier(self.resolve_oid(module, oid, name)?)
            }
            other => self.resolve_value(module, other, Some(&ty))?,
        };

        if !ty.is_compatible(&value) {
            let err = SemanticError::IncompatibleValue {
                name: decl.name.clone(),
                type_name: ty.description(),
                location: decl.location.clone(),
            };
            self.error(module, &decl.location, &err);
        }
        Ok(Resolution::Value { ty, value })
    }

    /// Resolve the macro clauses of a declared value symbol.
    ///
    /// On failure the symbol is abandoned and unbound from its OID node.
    pub(super) fn complete_symbol(&mut self, id: SymbolId) {
        let Some(symbol) = self.symbol(id) else {
            return;
        };
        let SymbolState::Declared(Resolution::Value { ty, value }) = &symbol.state else {
            return;
        };
        let (ty, value) = (ty.clone(), value.clone());
        let name = symbol.name().to_string();
        let location = symbol.location().clone();
        trace!(symbol = %name, "completing macro clauses");

        self.sites.push(location.clone());
        let result = self.resolve_macro(id.module, &name, &location, &ty, &value);
        self.sites.pop();
        match result {
            Ok(ty) => {
                if let Some(symbol) = self.symbol_mut(id) {
                    symbol.state = SymbolState::Resolved(Resolution::Value { ty, value });
                }
            }
            Err(err) => {
                self.error(id.module, &location, &err);
                if let Some(node) = value.as_oid() {
                    self.tree.detach_symbol(node, id);
                }
                if let Some(symbol) = self.symbol_mut(id) {
                    symbol.state = SymbolState::Failed(err);
                }
            }
        }
    }

    /// Resolve a referenced symbol and return its type, which must be a
    /// type symbol.
    pub(super) fn referenced_type(&mut self, target: SymbolId, location: &FileLocation) -> Result<Type> {
        match self.declare_referenced(target, location)? {
            Resolution::Type(ty) => Ok(ty),
            Resolution::Value { .. } => Err(SemanticError::kind_mismatch(
                format!("'{}' is a value, not a type", self.symbol_name(target)),
                location,
            )),
        }
    }

    /// Resolve a referenced symbol and return its value, which must be a
    /// value symbol.
    pub(super) fn referenced_value(&mut self, target: SymbolId, location: &FileLocation) -> Result<Value> {
        match self.declare_referenced(target, location)? {
            Resolution::Value { value, .. } => Ok(value),
            Resolution::Type(_) => Err(SemanticError::kind_mismatch(
                format!("'{}' is a type, not a value", self.symbol_name(target)),
                location,
            )),
        }
    }

    fn declare_referenced(&mut self, target: SymbolId, location: &FileLocation) -> Result<Resolution> {
        let name = self.symbol_name(target);
        match self.symbol(target).map(|s| &s.state) {
            Some(SymbolState::InProgress) => Err(SemanticError::CycleDetected {
                name,
                location: location.clone(),
            }),
            Some(SymbolState::Failed(_)) => Err(SemanticError::UnsupportedReference {
                what: format!("'{name}', which failed to resolve"),
                location: Some(location.clone()),
            }),
            _ => self.declare_symbol(target),
        }
    }

    pub(super) fn symbol_name(&self, id: SymbolId) -> String {
        self.symbol(id).map_or_else(String::new, |s| s.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::FileLocation;
    use crate::error::SemanticError;
    use crate::module::{ModuleDecl, SymbolState};
    use crate::resolver::{LoaderOptions, MibLoader};
    use crate::snmp::{Access, ObjectType, Status};
    use crate::types::{Type, TypeKind};
    use crate::value::{OidArc, OidDeclaration, Value, ValueReference};

    fn loc(line: u32) -> FileLocation {
        FileLocation::new("TEST-MIB", line, 1)
    }

    fn bare() -> MibLoader {
        MibLoader::with_options(LoaderOptions::default().with_builtin_modules(false))
    }

    #[test]
    fn test_type_cycle_is_detected() {
        let mut loader = bare();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_type("A", Type::reference("B", loc(2)), loc(2))
                .with_type("B", Type::reference("A", loc(3)), loc(3)),
        );
        assert!(log.has_errors());
        let module = loader.module("TEST-MIB").unwrap();
        let b = module.get_symbol("B").unwrap();
        assert!(matches!(b.error(), Some(SemanticError::CycleDetected { .. })));
        assert!(module.get_symbol("A").unwrap().error().is_some());
    }

    #[test]
    fn test_macro_on_type_symbol_is_rejected() {
        let mut loader = bare();
        let obj = ObjectType::new(Type::integer(), Access::ReadOnly, Status::Current);
        loader.load(ModuleDecl::new("TEST-MIB", loc(1)).with_type(
            "Foo",
            Type::new(TypeKind::ObjectType(Box::new(obj))),
            loc(2),
        ));
        let foo = loader.module("TEST-MIB").unwrap().get_symbol("Foo").unwrap();
        let Some(SemanticError::KindMismatch { detail, .. }) = foo.error() else {
            panic!("expected kind mismatch, got {:?}", foo.state());
        };
        assert!(detail.contains("OBJECT-TYPE"));
    }

    #[test]
    fn test_value_reference_to_type_is_kind_mismatch() {
        let mut loader = bare();
        loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_type("Foo", Type::integer(), loc(2))
                .with_value("bar", Type::integer(), Value::reference("Foo", loc(3)), loc(3)),
        );
        let bar = loader.module("TEST-MIB").unwrap().get_symbol("bar").unwrap();
        assert!(matches!(bar.error(), Some(SemanticError::KindMismatch { .. })));
    }

    #[test]
    fn test_incompatible_value_is_logged_and_kept() {
        let mut loader = bare();
        let log = loader.load(ModuleDecl::new("TEST-MIB", loc(1)).with_value(
            "name",
            Type::integer(),
            Value::String("eth0".into()),
            loc(2),
        ));
        assert_eq!(log.error_count(), 1);
        let name = loader.module("TEST-MIB").unwrap().get_symbol("name").unwrap();
        assert!(name.is_resolved());
        assert_eq!(name.value(), Some(&Value::String("eth0".into())));
    }

    #[test]
    fn test_reference_to_failed_symbol() {
        let mut loader = bare();
        loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_value("broken", Type::integer(), Value::reference("ghost", loc(2)), loc(2))
                .with_value("user", Type::integer(), Value::reference("broken", loc(3)), loc(3)),
        );
        let module = loader.module("TEST-MIB").unwrap();
        assert!(matches!(
            module.get_symbol("broken").unwrap().error(),
            Some(SemanticError::UndefinedSymbol { .. })
        ));
        assert!(matches!(
            module.get_symbol("user").unwrap().error(),
            Some(SemanticError::UnsupportedReference { .. })
        ));
    }

    #[test]
    fn test_forward_reference_resolves_on_demand() {
        let mut loader = bare();
        let log = loader.load(
            ModuleDecl::new("TEST-MIB", loc(1))
                .with_value(
                    "child",
                    Type::object_identifier(),
                    Value::OidDeclaration(OidDeclaration::under(
                        ValueReference::new("root", loc(2)),
                        vec![OidArc::number(7)],
                    )),
                    loc(2),
                )
                .with_value(
                    "root",
                    Type::object_identifier(),
                    Value::OidDeclaration(OidDeclaration::rooted(vec![OidArc::number(1)], loc(3))),
                    loc(3),
                ),
        );
        assert!(log.is_empty(), "{log}");
        let module = loader.module("TEST-MIB").unwrap();
        let child = module.get_symbol("child").unwrap();
        assert!(matches!(child.state(), SymbolState::Resolved(_)));
        let node = loader.tree().node(child.node().unwrap()).unwrap();
        assert_eq!(node.name(), Some("child"));
        assert_eq!(loader.tree().dotted(child.node().unwrap()), "1.7");
    }
}
