//! Conformance macros: groups, compliance statements, agent capabilities.

use super::{Access, Status};
use crate::types::Type;
use crate::value::Value;

/// `OBJECT-GROUP` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectGroup {
    /// `OBJECTS`.
    pub objects: Vec<Value>,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
}

/// `NOTIFICATION-GROUP` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationGroup {
    /// `NOTIFICATIONS`.
    pub notifications: Vec<Value>,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
}

/// `MODULE-COMPLIANCE` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleCompliance {
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
    /// `MODULE` clauses.
    pub modules: Vec<ComplianceModule>,
}

impl ModuleCompliance {
    /// Check that every referenced group, object and syntax is resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.modules.iter().all(|module| {
            module.mandatory_groups.iter().all(Value::is_resolved)
                && module.compliances.iter().all(Compliance::is_resolved)
        })
    }
}

/// One `MODULE` clause of a compliance statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplianceModule {
    /// Module the clause refers to; `None` is the enclosing module.
    pub module: Option<String>,
    /// `MANDATORY-GROUPS`.
    pub mandatory_groups: Vec<Value>,
    /// `GROUP` and `OBJECT` refinements.
    pub compliances: Vec<Compliance>,
}

/// A `GROUP` or `OBJECT` clause inside a compliance module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compliance {
    /// Conditionally required group.
    Group {
        /// The group.
        value: Value,
        /// `DESCRIPTION`.
        description: String,
    },
    /// Refinement of an object's requirements.
    Object {
        /// The refined object.
        value: Value,
        /// `SYNTAX`.
        syntax: Option<Type>,
        /// `WRITE-SYNTAX`.
        write_syntax: Option<Type>,
        /// `MIN-ACCESS`.
        min_access: Option<Access>,
        /// `DESCRIPTION`.
        description: String,
    },
}

impl Compliance {
    /// The group or object this clause refers to.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Group { value, .. } | Self::Object { value, .. } => value,
        }
    }

    fn is_resolved(&self) -> bool {
        match self {
            Self::Group { value, .. } => value.is_resolved(),
            Self::Object {
                value,
                syntax,
                write_syntax,
                ..
            } => {
                value.is_resolved()
                    && syntax.as_ref().is_none_or(Type::is_resolved)
                    && write_syntax.as_ref().is_none_or(Type::is_resolved)
            }
        }
    }
}

/// `AGENT-CAPABILITIES` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentCapabilities {
    /// `PRODUCT-RELEASE`.
    pub product_release: String,
    /// `STATUS`.
    pub status: Status,
    /// `DESCRIPTION`.
    pub description: String,
    /// `REFERENCE`.
    pub reference: Option<String>,
    /// `SUPPORTS` clauses.
    pub modules: Vec<SupportedModule>,
}

impl AgentCapabilities {
    /// Check that every included group and variation is resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.modules.iter().all(|module| {
            module.includes.iter().all(Value::is_resolved)
                && module.variations.iter().all(|v| {
                    v.value.is_resolved()
                        && v.syntax.as_ref().is_none_or(Type::is_resolved)
                        && v.write_syntax.as_ref().is_none_or(Type::is_resolved)
                        && v.creation_requires.iter().all(Value::is_resolved)
                        && v.default_value.as_ref().is_none_or(Value::is_resolved)
                })
        })
    }
}

/// One `SUPPORTS` clause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportedModule {
    /// Supported module name.
    pub module: String,
    /// `INCLUDES`.
    pub includes: Vec<Value>,
    /// `VARIATION` clauses.
    pub variations: Vec<Variation>,
}

/// One `VARIATION` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variation {
    /// The varied object or notification.
    pub value: Value,
    /// `SYNTAX`.
    pub syntax: Option<Type>,
    /// `WRITE-SYNTAX`.
    pub write_syntax: Option<Type>,
    /// `ACCESS`.
    pub access: Option<Access>,
    /// `CREATION-REQUIRES`.
    pub creation_requires: Vec<Value>,
    /// `DEFVAL`.
    pub default_value: Option<Value>,
    /// `DESCRIPTION`.
    pub description: String,
}

impl Variation {
    /// Variation with only a description.
    #[must_use]
    pub fn new(value: Value, description: impl Into<String>) -> Self {
        Self {
            value,
            syntax: None,
            write_syntax: None,
            access: None,
            creation_requires: Vec::new(),
            default_value: None,
            description: description.into(),
        }
    }
}
