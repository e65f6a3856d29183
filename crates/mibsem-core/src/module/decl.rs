//! Unresolved module declarations, as handed over by a parser.

use crate::diagnostics::FileLocation;
use crate::types::Type;
use crate::value::Value;

/// `IMPORTS a, b FROM M`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    /// Source module name.
    pub module: String,
    /// Imported names.
    pub symbols: Vec<String>,
    /// Location of the `FROM` clause.
    pub location: FileLocation,
}

impl Import {
    /// Create an import.
    #[must_use]
    pub fn new<S: Into<String>>(
        module: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
        location: FileLocation,
    ) -> Self {
        Self {
            module: module.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
            location,
        }
    }
}

/// `Name ::= Type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Symbol name.
    pub name: String,
    /// Declared type, possibly containing references.
    pub ty: Type,
    /// Location of the name.
    pub location: FileLocation,
}

/// `name Type ::= value`, including macro declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueDeclaration {
    /// Symbol name.
    pub name: String,
    /// Declared type or macro.
    pub ty: Type,
    /// Declared value, possibly containing references.
    pub value: Value,
    /// Location of the name.
    pub location: FileLocation,
}

/// A top-level declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    /// Type assignment.
    Type(TypeDeclaration),
    /// Value assignment.
    Value(ValueDeclaration),
}

impl Declaration {
    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(d) => &d.name,
            Self::Value(d) => &d.name,
        }
    }

    /// Location of the declaration.
    #[must_use]
    pub fn location(&self) -> &FileLocation {
        match self {
            Self::Type(d) => &d.location,
            Self::Value(d) => &d.location,
        }
    }

    /// Declared type (the macro for macro value declarations).
    #[must_use]
    pub fn ty(&self) -> &Type {
        match self {
            Self::Type(d) => &d.ty,
            Self::Value(d) => &d.ty,
        }
    }
}

/// One parsed module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    /// Module name.
    pub name: String,
    /// Location of the module header.
    pub location: FileLocation,
    /// Import clauses.
    pub imports: Vec<Import>,
    /// Macro definitions (`OBJECT-TYPE MACRO ::= ...`), by name only.
    pub macros: Vec<String>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl ModuleDecl {
    /// Empty module.
    #[must_use]
    pub fn new(name: impl Into<String>, location: FileLocation) -> Self {
        Self {
            name: name.into(),
            location,
            imports: Vec::new(),
            macros: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Add an import clause.
    #[must_use]
    pub fn import<S: Into<String>>(
        mut self,
        module: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        let location = self.location.clone();
        self.imports.push(Import::new(module, symbols, location));
        self
    }

    /// Add a type declaration.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>, ty: Type, location: FileLocation) -> Self {
        self.declarations.push(Declaration::Type(TypeDeclaration {
            name: name.into(),
            ty,
            location,
        }));
        self
    }

    /// Add a value declaration.
    #[must_use]
    pub fn with_value(
        mut self,
        name: impl Into<String>,
        ty: Type,
        value: Value,
        location: FileLocation,
    ) -> Self {
        self.declarations.push(Declaration::Value(ValueDeclaration {
            name: name.into(),
            ty,
            value,
            location,
        }));
        self
    }

    /// Declare a macro name.
    #[must_use]
    pub fn with_macro(mut self, name: impl Into<String>) -> Self {
        self.macros.push(name.into());
        self
    }
}
