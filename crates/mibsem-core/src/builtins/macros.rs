//! Macros the SMI base modules define.

use super::modules::BaseModule;

/// Macros of the SMI base modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinMacro {
    /// `MODULE-IDENTITY`.
    ModuleIdentity,
    /// `OBJECT-IDENTITY`.
    ObjectIdentity,
    /// `OBJECT-TYPE`, in SNMPv2-SMI and RFC-1212.
    ObjectType,
    /// `NOTIFICATION-TYPE`.
    NotificationType,
    /// `TEXTUAL-CONVENTION`.
    TextualConvention,
    /// `OBJECT-GROUP`.
    ObjectGroup,
    /// `NOTIFICATION-GROUP`.
    NotificationGroup,
    /// `MODULE-COMPLIANCE`.
    ModuleCompliance,
    /// `AGENT-CAPABILITIES`.
    AgentCapabilities,
    /// `TRAP-TYPE`, SMIv1 only.
    TrapType,
}

impl BuiltinMacro {
    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModuleIdentity => "MODULE-IDENTITY",
            Self::ObjectIdentity => "OBJECT-IDENTITY",
            Self::ObjectType => "OBJECT-TYPE",
            Self::NotificationType => "NOTIFICATION-TYPE",
            Self::TextualConvention => "TEXTUAL-CONVENTION",
            Self::ObjectGroup => "OBJECT-GROUP",
            Self::NotificationGroup => "NOTIFICATION-GROUP",
            Self::ModuleCompliance => "MODULE-COMPLIANCE",
            Self::AgentCapabilities => "AGENT-CAPABILITIES",
            Self::TrapType => "TRAP-TYPE",
        }
    }

    /// Check if `module` defines this macro.
    #[must_use]
    pub const fn is_defined_in(self, module: BaseModule) -> bool {
        match self {
            Self::ObjectType => matches!(module, BaseModule::SnmpV2Smi | BaseModule::Rfc1212),
            Self::ModuleIdentity | Self::ObjectIdentity | Self::NotificationType => {
                matches!(module, BaseModule::SnmpV2Smi)
            }
            Self::TextualConvention => matches!(module, BaseModule::SnmpV2Tc),
            Self::ObjectGroup
            | Self::NotificationGroup
            | Self::ModuleCompliance
            | Self::AgentCapabilities => matches!(module, BaseModule::SnmpV2Conf),
            Self::TrapType => matches!(module, BaseModule::Rfc1215),
        }
    }

    /// Look up a macro by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|m| m.name() == name)
    }

    /// Iterate over all macros.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::ModuleIdentity,
            Self::ObjectIdentity,
            Self::ObjectType,
            Self::NotificationType,
            Self::TextualConvention,
            Self::ObjectGroup,
            Self::NotificationGroup,
            Self::ModuleCompliance,
            Self::AgentCapabilities,
            Self::TrapType,
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for m in BuiltinMacro::all() {
            assert_eq!(BuiltinMacro::from_name(m.name()), Some(m), "{}", m.name());
        }
        assert!(BuiltinMacro::from_name("UNKNOWN-MACRO").is_none());
    }

    #[test]
    fn test_every_macro_has_a_home() {
        for m in BuiltinMacro::all() {
            assert!(BaseModule::all().any(|b| m.is_defined_in(b)), "{}", m.name());
        }
        assert!(BuiltinMacro::ObjectType.is_defined_in(BaseModule::Rfc1212));
        assert!(!BuiltinMacro::TrapType.is_defined_in(BaseModule::SnmpV2Smi));
    }
}
