//! The SMI base modules as module declarations.

use super::macros::BuiltinMacro;
use super::oid::{self, BUILTIN_OID_NODES, SMIV1_OID_NAMES};
use super::tc::BuiltinTextualConvention;
use super::types::{self, BuiltinBaseType, SMIV1_TYPES};
use crate::diagnostics::FileLocation;
use crate::module::ModuleDecl;
use crate::snmp::{ObjectIdentity, Status};
use crate::types::{Type, TypeKind};

/// SMI base modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseModule {
    /// SNMPv2-SMI (RFC 2578): application types, well-known OIDs, macros.
    SnmpV2Smi,
    /// SNMPv2-TC (RFC 2579): textual conventions.
    SnmpV2Tc,
    /// SNMPv2-CONF (RFC 2580): conformance macros.
    SnmpV2Conf,
    /// RFC1155-SMI: SMIv1 types and OIDs.
    Rfc1155Smi,
    /// RFC-1212: SMIv1 `OBJECT-TYPE`.
    Rfc1212,
    /// RFC-1215: SMIv1 `TRAP-TYPE`.
    Rfc1215,
}

impl BaseModule {
    /// Canonical module name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SnmpV2Smi => "SNMPv2-SMI",
            Self::SnmpV2Tc => "SNMPv2-TC",
            Self::SnmpV2Conf => "SNMPv2-CONF",
            Self::Rfc1155Smi => "RFC1155-SMI",
            Self::Rfc1212 => "RFC-1212",
            Self::Rfc1215 => "RFC-1215",
        }
    }

    /// Check if this is an SMIv2 module.
    #[must_use]
    pub const fn is_smiv2(self) -> bool {
        matches!(self, Self::SnmpV2Smi | Self::SnmpV2Tc | Self::SnmpV2Conf)
    }

    /// Check if this is an SMIv1 module.
    #[must_use]
    pub const fn is_smiv1(self) -> bool {
        !self.is_smiv2()
    }

    /// Look up a base module by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|m| m.name() == name)
    }

    /// Iterate over all base modules, dependencies first.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SnmpV2Smi,
            Self::SnmpV2Tc,
            Self::SnmpV2Conf,
            Self::Rfc1155Smi,
            Self::Rfc1212,
            Self::Rfc1215,
        ]
        .into_iter()
    }

    /// Declaration of this module, ready to be loaded.
    #[must_use]
    pub fn declaration(self) -> ModuleDecl {
        let location = FileLocation::synthetic(self.name());
        let mut decl = ModuleDecl::new(self.name(), location.clone());
        for m in BuiltinMacro::all().filter(|m| m.is_defined_in(self)) {
            decl = decl.with_macro(m.name());
        }

        match self {
            Self::SnmpV2Smi => {
                let scope: Vec<&str> = BUILTIN_OID_NODES.iter().map(|n| n.name).collect();
                for node in BUILTIN_OID_NODES {
                    let ty = if node.name == "zeroDotZero" {
                        Type::new(TypeKind::ObjectIdentity(Box::new(ObjectIdentity {
                            status: Status::Current,
                            description: "A value used for null identifiers.".into(),
                            reference: None,
                        })))
                    } else {
                        Type::object_identifier()
                    };
                    let value = oid::declaration(node, &scope, &location);
                    decl = decl.with_value(node.name, ty, value, location.clone());
                }
                for bt in BuiltinBaseType::all() {
                    decl = decl.with_type(bt.name(), bt.to_type(), location.clone());
                }
                decl.with_type("ObjectName", types::object_name(), location.clone())
                    .with_type("NotificationName", types::object_name(), location.clone())
                    .with_type("ExtUTCTime", types::ext_utc_time(), location)
            }
            Self::SnmpV2Tc => {
                decl = decl.import(Self::SnmpV2Smi.name(), [BuiltinBaseType::TimeTicks.name()]);
                for tc in BuiltinTextualConvention::all() {
                    decl = decl.with_type(tc.name, tc.to_type(&location), location.clone());
                }
                decl
            }
            Self::Rfc1155Smi => {
                for node in BUILTIN_OID_NODES.iter().filter(|n| SMIV1_OID_NAMES.contains(&n.name)) {
                    let value = oid::declaration(node, SMIV1_OID_NAMES, &location);
                    decl = decl.with_value(node.name, Type::object_identifier(), value, location.clone());
                }
                for &(name, bt) in SMIV1_TYPES {
                    decl = decl.with_type(name, bt.to_type(), location.clone());
                }
                decl.with_type("NetworkAddress", types::network_address(&location), location.clone())
                    .with_type("ObjectName", types::object_name(), location)
            }
            Self::SnmpV2Conf | Self::Rfc1212 | Self::Rfc1215 => decl,
        }
    }
}

/// Check if a module name is one of the base modules.
#[must_use]
pub fn is_base_module(name: &str) -> bool {
    BaseModule::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for m in BaseModule::all() {
            assert_eq!(BaseModule::from_name(m.name()), Some(m), "{}", m.name());
        }
        assert!(!is_base_module("IF-MIB"));
        assert!(!is_base_module("snmpv2-smi"));
    }

    #[test]
    fn test_smi_versions() {
        assert!(BaseModule::SnmpV2Tc.is_smiv2());
        assert!(BaseModule::Rfc1215.is_smiv1());
        assert!(!BaseModule::SnmpV2Conf.is_smiv1());
    }

    #[test]
    fn test_conformance_module_only_has_macros() {
        let decl = BaseModule::SnmpV2Conf.declaration();
        assert!(decl.declarations.is_empty());
        assert_eq!(decl.macros.len(), 4);
        assert!(decl.macros.iter().any(|m| m == "MODULE-COMPLIANCE"));
    }

    #[test]
    fn test_textual_conventions_import_time_ticks() {
        let decl = BaseModule::SnmpV2Tc.declaration();
        assert_eq!(decl.imports.len(), 1);
        assert_eq!(decl.imports[0].module, "SNMPv2-SMI");
        assert_eq!(decl.declarations.len(), 16);
    }
}
