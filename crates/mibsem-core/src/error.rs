//! Semantic error taxonomy.

use crate::diagnostics::FileLocation;

/// Errors raised while resolving MIB declarations.
///
/// Most variants carry the location of the reference or declaration that
/// triggered them so they can be logged without further context.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// A reference names nothing in either the strict or the expanded scope.
    #[error("undefined symbol '{name}'")]
    UndefinedSymbol {
        /// The referenced name (module-qualified when written that way).
        name: String,
        /// Location of the reference.
        location: FileLocation,
    },

    /// A symbol of the wrong kind was referenced, or a macro decorates the
    /// wrong kind of declaration.
    #[error("{detail}")]
    KindMismatch {
        /// What went wrong.
        detail: String,
        /// Location of the reference or declaration.
        location: FileLocation,
    },

    /// A reference to a type or value variant that cannot be referenced.
    #[error("cannot reference {what}")]
    UnsupportedReference {
        /// Description of the referenced construct.
        what: String,
        /// Location of the reference, if known.
        location: Option<FileLocation>,
    },

    /// A constraint bound is structurally incompatible with its host type.
    #[error("constraint {constraint} is not compatible with type {type_name}")]
    ConstraintConflict {
        /// Rendered constraint.
        constraint: String,
        /// Description of the constrained type.
        type_name: String,
        /// Location of the constrained declaration.
        location: FileLocation,
    },

    /// Two declarations at the same arc cannot be reconciled.
    #[error("OID conflict at arc {arc}: {detail}")]
    OidConflict {
        /// The contested arc value.
        arc: u32,
        /// What could not be reconciled.
        detail: String,
        /// Location of the later declaration, if known.
        location: Option<FileLocation>,
    },

    /// A symbol's resolution depends on itself.
    #[error("cyclic reference to '{name}'")]
    CycleDetected {
        /// The symbol whose resolution is already in progress.
        name: String,
        /// Location of the reference that closed the cycle.
        location: FileLocation,
    },

    /// A resolved value is rejected by the resolved type of its declaration.
    #[error("value of '{name}' is not compatible with type {type_name}")]
    IncompatibleValue {
        /// Declaring symbol.
        name: String,
        /// Description of the declared type.
        type_name: String,
        /// Location of the declaration.
        location: FileLocation,
    },

    /// The named module is not loaded.
    #[error("module '{name}' is not loaded")]
    UnknownModule {
        /// Module name.
        name: String,
    },
}

impl SemanticError {
    /// Location attached to this error, if any.
    #[must_use]
    pub fn location(&self) -> Option<&FileLocation> {
        match self {
            Self::UndefinedSymbol { location, .. }
            | Self::KindMismatch { location, .. }
            | Self::ConstraintConflict { location, .. }
            | Self::CycleDetected { location, .. }
            | Self::IncompatibleValue { location, .. } => Some(location),
            Self::UnsupportedReference { location, .. } | Self::OidConflict { location, .. } => {
                location.as_ref()
            }
            Self::UnknownModule { .. } => None,
        }
    }

    /// Attach a location to an error that was raised without one.
    #[must_use]
    pub fn at(mut self, at: &FileLocation) -> Self {
        match &mut self {
            Self::UnsupportedReference { location, .. } | Self::OidConflict { location, .. } => {
                if location.is_none() {
                    *location = Some(at.clone());
                }
            }
            _ => {}
        }
        self
    }

    /// Shorthand for a [`SemanticError::KindMismatch`].
    #[must_use]
    pub fn kind_mismatch(detail: impl Into<String>, location: &FileLocation) -> Self {
        Self::KindMismatch {
            detail: detail.into(),
            location: location.clone(),
        }
    }

    /// Shorthand for a [`SemanticError::UnsupportedReference`] without location.
    #[must_use]
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedReference {
            what: what.into(),
            location: None,
        }
    }
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, SemanticError>;
