//! `TEXTUAL-CONVENTION`.

use super::Status;
use crate::types::Type;

/// `TEXTUAL-CONVENTION` payload.
///
/// A textual convention is a named refinement of its `SYNTAX`; references
/// to it behave like references to the syntax type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextualConvention {
    /// `DISPLAY-HINT`.
    pub display_hint: Option<String>,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
    /// `SYNTAX`.
    pub syntax: Type,
}

impl TextualConvention {
    /// Textual convention over `syntax`.
    #[must_use]
    pub fn new(syntax: Type, description: impl Into<String>) -> Self {
        Self {
            display_hint: None,
            status: Status::Current,
            description: description.into(),
            reference: None,
            syntax,
        }
    }

    /// Set the display hint.
    #[must_use]
    pub fn with_display_hint(mut self, hint: impl Into<String>) -> Self {
        self.display_hint = Some(hint.into());
        self
    }
}
