//! Name lookup in strict, expanded and qualified scope.

use std::collections::BTreeSet;

use tracing::trace;

use super::MibLoader;
use crate::diagnostics::FileLocation;
use crate::error::{Result, SemanticError};
use crate::ids::{ModuleId, SymbolId};

impl MibLoader {
    /// Look up `name` as seen from `module`.
    ///
    /// A qualified name is looked up in the named module only. Otherwise the
    /// strict scope is tried first, then the expanded scope with a warning
    /// logged to `module` at `location`.
    pub(super) fn lookup(
        &mut self,
        module: ModuleId,
        name: &str,
        qualifier: Option<&str>,
        location: &FileLocation,
    ) -> Result<SymbolId> {
        if let Some(qualifier) = qualifier {
            return self
                .module_id(qualifier)
                .and_then(|source| self.lookup_strict(source, name))
                .ok_or_else(|| SemanticError::UndefinedSymbol {
                    name: format!("{qualifier}.{name}"),
                    location: location.clone(),
                });
        }

        if let Some(id) = self.lookup_strict(module, name) {
            return Ok(id);
        }

        if self.options.expanded_scope_fallback
            && let Some(id) = self.lookup_expanded(module, name)
        {
            let source = self.module_name(id.module).to_string();
            self.warn(
                module,
                location,
                format!("missing import for '{name}', falling back to definition from module {source}"),
            );
            return Ok(id);
        }

        Err(SemanticError::UndefinedSymbol {
            name: name.to_string(),
            location: location.clone(),
        })
    }

    /// Look up a name among the module's own symbols and its imports,
    /// following re-exports through the import chain.
    ///
    /// Cycle-safe: returns `None` if the import chain loops.
    pub(super) fn lookup_strict(&self, module: ModuleId, name: &str) -> Option<SymbolId> {
        let mut visited = BTreeSet::new();
        let mut current = module;

        loop {
            if !visited.insert(current) {
                trace!(name, "import chain loops");
                return None;
            }
            let scope = self.module_by_id(current)?;
            if let Some(id) = scope.symbol_id(name) {
                return Some(id);
            }
            let source = scope.imported_from(name)?;
            current = self.module_id(source)?;
        }
    }

    /// Look up a name among the symbols of every other loaded module, in
    /// load order.
    pub(super) fn lookup_expanded(&self, module: ModuleId, name: &str) -> Option<SymbolId> {
        self.modules()
            .filter(|m| m.id() != module)
            .find_map(|m| m.symbol_id(name))
    }
}
