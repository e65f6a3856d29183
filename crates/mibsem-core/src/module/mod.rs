//! MIB modules: declaration input and resolved symbol tables.
//!
//! A parser hands the loader one [`ModuleDecl`] per module. Registration
//! turns it into a [`Module`], whose [`Symbol`]s carry their own resolution
//! state so dependencies can be resolved on demand and memoized.
//!
//! # Pipeline Position
//!
//! ```text
//! Parser → ModuleDecl → [Registration] → Module → [Resolver] → resolved Module + OidTree
//! ```

mod decl;
mod symbol;

pub use decl::{Declaration, Import, ModuleDecl, TypeDeclaration, ValueDeclaration};
pub use symbol::{Resolution, Symbol, SymbolKind, SymbolState};

use std::collections::BTreeMap;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::diagnostics::{FileLocation, MibLog};
use crate::ids::{ModuleId, SymbolId};

/// A registered module.
#[derive(Clone, Debug)]
pub struct Module {
    pub(crate) id: ModuleId,
    pub(crate) name: String,
    pub(crate) location: FileLocation,
    pub(crate) imports: Vec<Import>,
    pub(crate) macros: Vec<String>,
    /// Imported name -> source module name.
    pub(crate) imported: BTreeMap<String, String>,
    /// Symbols in declaration order; the index is the [`SymbolId`] index.
    pub(crate) symbols: IndexMap<String, Symbol>,
    pub(crate) log: MibLog,
}

impl Module {
    /// Register the declarations of `decl` as symbols. A duplicate name is
    /// logged and the first declaration kept.
    pub(crate) fn register(id: ModuleId, decl: ModuleDecl) -> Self {
        let ModuleDecl {
            name,
            location,
            imports,
            macros,
            declarations,
        } = decl;
        let mut module = Self {
            id,
            name,
            location,
            imports,
            macros,
            imported: BTreeMap::new(),
            symbols: IndexMap::with_capacity(declarations.len()),
            log: MibLog::new(),
        };

        for declaration in declarations {
            let Ok(index) = u32::try_from(module.symbols.len()) else {
                module
                    .log
                    .add_error(declaration.location().clone(), "too many symbols in module");
                break;
            };
            let symbol = Symbol::new(SymbolId::new(id, index), declaration);
            match module.symbols.entry(symbol.name().to_string()) {
                Entry::Occupied(first) => {
                    let message = format!(
                        "duplicate definition of '{}', first defined at {}",
                        first.key(),
                        first.get().location()
                    );
                    module.log.add_error(symbol.location().clone(), message);
                }
                Entry::Vacant(slot) => {
                    slot.insert(symbol);
                }
            }
        }
        module
    }

    /// Module handle.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the module header.
    #[must_use]
    pub fn location(&self) -> &FileLocation {
        &self.location
    }

    /// Import clauses as declared.
    #[must_use]
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Macro names defined by this module.
    #[must_use]
    pub fn macros(&self) -> &[String] {
        &self.macros
    }

    /// Check if this module defines the macro `name`.
    #[must_use]
    pub fn defines_macro(&self, name: &str) -> bool {
        self.macros.iter().any(|m| m == name)
    }

    /// Module an imported name comes from.
    #[must_use]
    pub fn imported_from(&self, name: &str) -> Option<&str> {
        self.imported.get(name).map(String::as_str)
    }

    /// Get a symbol defined in this module.
    #[must_use]
    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Get a symbol by handle.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        if id.module != self.id {
            return None;
        }
        self.symbols
            .get_index(usize::try_from(id.index).ok()?)
            .map(|(_, s)| s)
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.module != self.id {
            return None;
        }
        self.symbols
            .get_index_mut(usize::try_from(id.index).ok()?)
            .map(|(_, s)| s)
    }

    /// Handle of a symbol defined in this module.
    #[must_use]
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).map(Symbol::id)
    }

    /// Symbols in declaration order, synthesized ones last.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the module declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Diagnostics recorded while loading this module.
    #[must_use]
    pub fn log(&self) -> &MibLog {
        &self.log
    }

    /// Check if every symbol resolved and no error was logged.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.log.has_errors() && self.symbols.values().all(Symbol::is_resolved)
    }
}
