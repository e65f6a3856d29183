//! `TRAP-TYPE` and `NOTIFICATION-TYPE`.

use super::Status;
use crate::value::Value;

/// SMIv1 `TRAP-TYPE` payload. The symbol's value is the trap number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapType {
    /// `ENTERPRISE`.
    pub enterprise: Value,
    /// `VARIABLES`.
    pub variables: Vec<Value>,
    /// `DESCRIPTION`.
    pub description: Option<String>,
    /// `REFERENCE`.
    pub reference: Option<String>,
}

impl TrapType {
    /// Trap type without variables.
    #[must_use]
    pub fn new(enterprise: Value) -> Self {
        Self {
            enterprise,
            variables: Vec::new(),
            description: None,
            reference: None,
        }
    }

    /// Check that the enterprise and the variables are resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.enterprise.is_resolved() && self.variables.iter().all(Value::is_resolved)
    }
}

/// SMIv2 `NOTIFICATION-TYPE` payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationType {
    /// `OBJECTS`.
    pub objects: Vec<Value>,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: Option<String>,
    /// `REFERENCE`.
    pub reference: Option<String>,
}

impl NotificationType {
    /// Notification carrying `objects`.
    #[must_use]
    pub fn new(objects: Vec<Value>, status: Status) -> Self {
        Self {
            objects,
            status,
            description: None,
            reference: None,
        }
    }
}
