//! Symbol resolution for MIB modules.
//!
//! The [`MibLoader`] owns every loaded [`Module`] and the shared
//! [`OidTree`]. Loading a batch of modules proceeds in three steps:
//!
//! 1. **Registration**: index every module and its declarations
//! 2. **Imports**: check that imported modules and names exist
//! 3. **Resolution**: resolve each symbol in declaration order
//!
//! # Symbol resolution
//!
//! A symbol resolves on demand the first time another declaration refers
//! to it, and its result is memoized in the symbol itself. Value symbols
//! resolve in two steps: first their type and value (placing OID values in
//! the tree), then the clauses of their macro. References only ever need
//! the first step, so `INDEX { ifIndex }` inside `ifEntry` can refer to a
//! column declared under `ifEntry` itself.
//!
//! Reaching a symbol whose first step is already on the stack is a cycle
//! and fails with [`SemanticError::CycleDetected`].
//!
//! # Lookup scope
//!
//! Names are looked up in the strict scope (the module and its imports)
//! first, then in the expanded scope (every loaded module) with a warning.
//! See [`LoaderOptions::expanded_scope_fallback`].
//!
//! # Built-in Definitions
//!
//! Unless disabled in [`LoaderOptions`], the loader is pre-seeded with the
//! SMI base modules from [`crate::builtins`], so imports from
//! `SNMPv2-SMI`, `SNMPv2-TC` and friends resolve without user files.

mod context;
mod snmp;
mod symbols;
mod types;
mod unload;
mod values;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::builtins;
use crate::diagnostics::{FileLocation, MibLog};
use crate::error::{Result, SemanticError};
use crate::ids::{ModuleId, NodeId, SymbolId};
use crate::module::{Module, ModuleDecl, Symbol};
use crate::oid::OidTree;

/// Loader configuration.
///
/// Construct with [`LoaderOptions::default`] and adjust with the `with_*`
/// methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Resolve names missing from the strict scope against every loaded
    /// module, with a warning. When disabled such names are undefined.
    pub expanded_scope_fallback: bool,
    /// Create `OBJECT-TYPE` symbols for table columns that are listed in a
    /// row's `SEQUENCE` but never declared. When disabled each missing
    /// column is an error.
    pub synthesize_missing_columns: bool,
    /// Pre-load the SMI base modules.
    pub builtin_modules: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            expanded_scope_fallback: true,
            synthesize_missing_columns: true,
            builtin_modules: true,
        }
    }
}

impl LoaderOptions {
    /// Set [`Self::expanded_scope_fallback`].
    #[must_use]
    pub fn with_expanded_scope_fallback(mut self, enabled: bool) -> Self {
        self.expanded_scope_fallback = enabled;
        self
    }

    /// Set [`Self::synthesize_missing_columns`].
    #[must_use]
    pub fn with_synthesize_missing_columns(mut self, enabled: bool) -> Self {
        self.synthesize_missing_columns = enabled;
        self
    }

    /// Set [`Self::builtin_modules`].
    #[must_use]
    pub fn with_builtin_modules(mut self, enabled: bool) -> Self {
        self.builtin_modules = enabled;
        self
    }
}

/// Loads modules, resolves their symbols and maintains the shared OID tree.
#[derive(Debug)]
pub struct MibLoader {
    options: LoaderOptions,
    /// Module arena; unloaded modules leave `None`.
    modules: Vec<Option<Module>>,
    by_name: BTreeMap<String, ModuleId>,
    tree: OidTree,
    /// Locations of the declarations being resolved, innermost last.
    sites: Vec<FileLocation>,
}

impl Default for MibLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MibLoader {
    /// Create a loader with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LoaderOptions::default())
    }

    /// Create a loader with the given options.
    #[must_use]
    pub fn with_options(options: LoaderOptions) -> Self {
        let mut loader = Self {
            options,
            modules: Vec::new(),
            by_name: BTreeMap::new(),
            tree: OidTree::new(),
            sites: Vec::new(),
        };
        if options.builtin_modules {
            let log = loader.load_all(builtins::base_modules());
            debug!(
                errors = log.error_count(),
                warnings = log.warning_count(),
                "loaded built-in modules"
            );
        }
        loader
    }

    /// Loader options.
    #[must_use]
    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Load one module against the modules already loaded.
    pub fn load(&mut self, decl: ModuleDecl) -> MibLog {
        self.load_all(vec![decl])
    }

    /// Load a batch of modules.
    ///
    /// Every module is registered before any is resolved, so modules in the
    /// batch may import from each other in any order. Returns the
    /// diagnostics of the whole batch; each module also keeps its own in
    /// [`Module::log`].
    pub fn load_all(&mut self, decls: Vec<ModuleDecl>) -> MibLog {
        let mut log = MibLog::new();
        let mut batch = Vec::with_capacity(decls.len());

        for decl in decls {
            if self.by_name.contains_key(&decl.name) {
                log.add_error(
                    decl.location.clone(),
                    format!("module '{}' is already loaded", decl.name),
                );
                continue;
            }
            let Some(id) = ModuleId::from_index(self.modules.len()) else {
                log.add_error(decl.location.clone(), "too many modules loaded");
                break;
            };
            debug!(module = %decl.name, declarations = decl.declarations.len(), "registering module");
            self.by_name.insert(decl.name.clone(), id);
            self.modules.push(Some(Module::register(id, decl)));
            batch.push(id);
        }

        // Imports may chain through other modules of the batch, so every
        // import map is filled before any is checked.
        for &id in &batch {
            self.record_imports(id);
        }
        for &id in &batch {
            self.check_imports(id);
        }
        for &id in &batch {
            self.resolve_module_symbols(id);
        }

        for &id in &batch {
            if let Some(module) = self.module_by_id(id) {
                info!(
                    module = %module.name,
                    symbols = module.len(),
                    errors = module.log.error_count(),
                    warnings = module.log.warning_count(),
                    "module loaded"
                );
                log.extend(module.log.clone());
            }
        }
        log
    }

    /// Resolve any symbol of a loaded module that is not resolved yet.
    /// Already resolved symbols are left untouched.
    pub fn resolve_module(&mut self, name: &str) -> Result<()> {
        let id = self.module_id(name).ok_or_else(|| SemanticError::UnknownModule {
            name: name.to_string(),
        })?;
        self.resolve_module_symbols(id);
        Ok(())
    }

    /// The shared OID tree.
    #[must_use]
    pub fn tree(&self) -> &OidTree {
        &self.tree
    }

    /// Handle of a loaded module.
    #[must_use]
    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    /// Get a loaded module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.module_by_id(self.module_id(name)?)
    }

    /// Get a loaded module by handle.
    #[must_use]
    pub fn module_by_id(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.to_index())?.as_ref()
    }

    fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id.to_index())?.as_mut()
    }

    /// Loaded modules in load order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().flatten()
    }

    /// Get a symbol by handle.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.module_by_id(id.module)?.symbol(id)
    }

    fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.module_mut(id.module)?.symbol_mut(id)
    }

    /// Find a symbol by name in the first module, in load order, that
    /// defines it.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.modules().find_map(|m| m.get_symbol(name))
    }

    /// The symbol bound to an OID node.
    #[must_use]
    pub fn symbol_at(&self, node: NodeId) -> Option<&Symbol> {
        self.symbol(self.tree.node(node)?.symbol()?)
    }

    /// Name of the module owning a symbol handle.
    fn module_name(&self, id: ModuleId) -> &str {
        self.module_by_id(id).map_or("", Module::name)
    }

    fn warn(&mut self, module: ModuleId, location: &FileLocation, message: impl Into<String>) {
        if let Some(m) = self.module_mut(module) {
            m.log.add_warning(location.clone(), message);
        }
    }

    fn error(&mut self, module: ModuleId, location: &FileLocation, err: &SemanticError) {
        if let Some(m) = self.module_mut(module) {
            m.log.add_semantic_error(location, err);
        }
    }

    /// Record which module each imported name comes from.
    fn record_imports(&mut self, id: ModuleId) {
        let Some(module) = self.module_mut(id) else {
            return;
        };
        let imported: BTreeMap<_, _> = module
            .imports
            .iter()
            .flat_map(|import| import.symbols.iter().map(move |name| (name.clone(), import.module.clone())))
            .collect();
        module.imported = imported;
    }

    /// Check every import of a freshly registered module.
    fn check_imports(&mut self, id: ModuleId) {
        let Some(module) = self.module_by_id(id) else {
            return;
        };

        let mut problems = Vec::new();
        for import in &module.imports {
            let Some(source) = self.module(&import.module) else {
                problems.push((
                    import.location.clone(),
                    format!("imported module '{}' is not loaded", import.module),
                ));
                continue;
            };
            for name in &import.symbols {
                let found = source.defines_macro(name)
                    || self.lookup_strict(source.id, name).is_some();
                if !found {
                    let err = SemanticError::UndefinedSymbol {
                        name: format!("{}.{name}", import.module),
                        location: import.location.clone(),
                    };
                    problems.push((import.location.clone(), err.to_string()));
                }
            }
        }

        if let Some(module) = self.module_mut(id) {
            for (location, message) in problems {
                module.log.add_error(location, message);
            }
        }
    }
}
