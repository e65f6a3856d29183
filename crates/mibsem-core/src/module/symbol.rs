//! Symbols and their resolution state.

use super::decl::Declaration;
use crate::diagnostics::FileLocation;
use crate::error::SemanticError;
use crate::ids::{NodeId, SymbolId};
use crate::types::Type;
use crate::value::Value;

/// Whether a symbol names a type or a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `Name ::= Type`.
    Type,
    /// `name Type ::= value`.
    Value,
}

/// Result of resolving a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A resolved type symbol.
    Type(Type),
    /// A resolved value symbol with its (possibly macro) type.
    Value {
        /// Resolved type or macro.
        ty: Type,
        /// Resolved value.
        value: Value,
    },
}

/// Resolution progress of a symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SymbolState {
    /// Not visited yet.
    #[default]
    Pending,
    /// Resolution is on the stack. Reaching a symbol in this state is a
    /// cycle.
    InProgress,
    /// Type and value are known; macro clauses are still to be resolved.
    Declared(Resolution),
    /// Fully resolved.
    Resolved(Resolution),
    /// Resolution failed; the symbol has no result.
    Failed(SemanticError),
}

/// A named declaration in a module.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub(crate) id: SymbolId,
    pub(crate) declaration: Declaration,
    pub(crate) state: SymbolState,
    pub(crate) synthesized: bool,
}

impl Symbol {
    pub(crate) fn new(id: SymbolId, declaration: Declaration) -> Self {
        Self {
            id,
            declaration,
            state: SymbolState::Pending,
            synthesized: false,
        }
    }

    /// Handle of this symbol.
    #[must_use]
    pub fn id(&self) -> SymbolId {
        self.id
    }

    /// Symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    /// The declaration as handed to the loader.
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Type or value symbol.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self.declaration {
            Declaration::Type(_) => SymbolKind::Type,
            Declaration::Value(_) => SymbolKind::Value,
        }
    }

    /// Location of the declaration.
    #[must_use]
    pub fn location(&self) -> &FileLocation {
        self.declaration.location()
    }

    /// Current resolution state.
    #[must_use]
    pub fn state(&self) -> &SymbolState {
        &self.state
    }

    /// The resolution result, complete or not.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            SymbolState::Declared(r) | SymbolState::Resolved(r) => Some(r),
            _ => None,
        }
    }

    /// Resolved type of a type symbol, or the resolved type of a value
    /// symbol.
    #[must_use]
    pub fn resolved_type(&self) -> Option<&Type> {
        match self.resolution()? {
            Resolution::Type(ty) | Resolution::Value { ty, .. } => Some(ty),
        }
    }

    /// Resolved value of a value symbol.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self.resolution()? {
            Resolution::Value { value, .. } => Some(value),
            Resolution::Type(_) => None,
        }
    }

    /// OID node of a value symbol whose value is an object identifier.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.value()?.as_oid()
    }

    /// Error that abandoned this symbol.
    #[must_use]
    pub fn error(&self) -> Option<&SemanticError> {
        match &self.state {
            SymbolState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Check if resolution completed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SymbolState::Resolved(_))
    }

    /// Check if the loader created this symbol for a missing table column.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }
}
