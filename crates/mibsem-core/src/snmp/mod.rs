//! SNMP macro type payloads.
//!
//! Each SMI macro (`OBJECT-TYPE`, `TRAP-TYPE`, ...) is a type variant whose
//! payload lives here. The payloads carry the embedded types and values the
//! macro clauses declare; the resolver in [`crate::resolver`] walks them.

mod conformance;
mod identity;
mod notification;
mod object_type;
mod textual_convention;

pub use conformance::{
    AgentCapabilities, Compliance, ComplianceModule, ModuleCompliance, NotificationGroup,
    ObjectGroup, SupportedModule, Variation,
};
pub use identity::{ModuleIdentity, ObjectIdentity, Revision};
pub use notification::{NotificationType, TrapType};
pub use object_type::{AUTO_CREATED_DESCRIPTION, IndexEntry, IndexItem, ObjectType};
pub use textual_convention::TextualConvention;

use std::fmt;

/// Status of a definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// Currently in use.
    #[default]
    Current,
    /// Being phased out.
    Deprecated,
    /// No longer in use.
    Obsolete,
    /// SMIv1: must be implemented.
    Mandatory,
    /// SMIv1: may be implemented.
    Optional,
}

impl Status {
    /// Get a string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Deprecated => "deprecated",
            Self::Obsolete => "obsolete",
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
        }
    }

    /// Parse the keyword used in `STATUS` clauses.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "current" => Some(Self::Current),
            "deprecated" => Some(Self::Deprecated),
            "obsolete" => Some(Self::Obsolete),
            "mandatory" => Some(Self::Mandatory),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Can only be read.
    ReadOnly,
    /// Can be read and written.
    ReadWrite,
    /// Can be read, written, or used to create rows.
    ReadCreate,
    /// Not accessible via SNMP.
    NotAccessible,
    /// Accessible only for notifications.
    AccessibleForNotify,
    /// Write-only (deprecated but seen in wild).
    WriteOnly,
    /// Agent capabilities variation: not implemented.
    NotImplemented,
}

impl Access {
    /// Get a string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
            Self::ReadCreate => "read-create",
            Self::NotAccessible => "not-accessible",
            Self::AccessibleForNotify => "accessible-for-notify",
            Self::WriteOnly => "write-only",
            Self::NotImplemented => "not-implemented",
        }
    }

    /// Parse the keyword used in `ACCESS` / `MAX-ACCESS` clauses.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "read-only" => Some(Self::ReadOnly),
            "read-write" => Some(Self::ReadWrite),
            "read-create" => Some(Self::ReadCreate),
            "not-accessible" => Some(Self::NotAccessible),
            "accessible-for-notify" => Some(Self::AccessibleForNotify),
            "write-only" => Some(Self::WriteOnly),
            "not-implemented" => Some(Self::NotImplemented),
            _ => None,
        }
    }

    /// Check if the object is accessible for GET operations.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite | Self::ReadCreate)
    }

    /// Check if the object accepts SET operations.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadCreate | Self::WriteOnly)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
