//! Built-in SMI definitions.
//!
//! The SMI base modules every MIB imports from, expressed as ordinary module
//! declarations so the loader resolves them like any other module:
//!
//! - **Application types** (8): Integer32, Counter32, Counter64, Gauge32,
//!   Unsigned32, TimeTicks, IpAddress, Opaque, plus their SMIv1 aliases
//! - **Textual conventions** (16): DisplayString, TruthValue, RowStatus, ...
//! - **Well-known OIDs** (19): ccitt, iso, internet, enterprises, mib-2, ...
//! - **Macros** (10): OBJECT-TYPE, MODULE-IDENTITY, ...
//! - **Base modules** (6): SNMPv2-SMI, SNMPv2-TC, SNMPv2-CONF, RFC1155-SMI,
//!   RFC-1212, RFC-1215
//!
//! [`MibLoader::new`](crate::MibLoader::new) loads them unless
//! [`LoaderOptions::builtin_modules`](crate::LoaderOptions) is off.

mod macros;
mod modules;
mod oid;
mod tc;
mod types;

pub use macros::BuiltinMacro;
pub use modules::{BaseModule, is_base_module};
pub use oid::{BUILTIN_OID_NODES, BuiltinOidNode, builtin_oid_arcs, lookup_builtin_oid};
pub use tc::{
    BUILTIN_TEXTUAL_CONVENTIONS, BuiltinTextualConvention, TcBaseSyntax, TcConstraint,
    TcSizeConstraint,
};
pub use types::BuiltinBaseType;

use crate::module::ModuleDecl;

/// Declarations of every base module, dependencies first.
#[must_use]
pub fn base_modules() -> Vec<ModuleDecl> {
    BaseModule::all().map(BaseModule::declaration).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid::Oid;
    use crate::resolver::MibLoader;
    use crate::types::{TypeKind, TypeTag};
    use crate::value::Value;

    #[test]
    fn test_base_modules_load_cleanly() {
        let loader = MibLoader::new();
        for m in BaseModule::all() {
            let module = loader.module(m.name()).unwrap();
            assert!(module.log().is_empty(), "{}: {}", m.name(), module.log());
            assert!(module.is_complete(), "{}", m.name());
        }
    }

    #[test]
    fn test_well_known_oids_are_placed() {
        let loader = MibLoader::new();
        for node in BUILTIN_OID_NODES {
            let id = loader.tree().lookup_oid(&Oid::new(builtin_oid_arcs(node.name))).unwrap();
            assert_eq!(loader.tree().node(id).unwrap().name(), Some(node.name));
            let symbol = loader.symbol_at(id).unwrap();
            assert_eq!(symbol.name(), node.name);
        }
    }

    #[test]
    fn test_smiv1_oids_share_nodes() {
        let loader = MibLoader::new();
        let v2 = loader.module("SNMPv2-SMI").unwrap().get_symbol("enterprises").unwrap();
        let v1 = loader.module("RFC1155-SMI").unwrap().get_symbol("enterprises").unwrap();
        assert_eq!(v1.node(), v2.node());
        assert_eq!(loader.symbol_at(v1.node().unwrap()).unwrap().id(), v2.id());
    }

    #[test]
    fn test_time_stamp_resolves_through_time_ticks() {
        let loader = MibLoader::new();
        let ts = loader.module("SNMPv2-TC").unwrap().get_symbol("TimeStamp").unwrap();
        let Some(TypeKind::TextualConvention(tc)) = ts.resolved_type().map(|t| &t.kind) else {
            panic!("expected a textual convention");
        };
        assert_eq!(tc.syntax.tag, Some(TypeTag::application(3)));
        assert_eq!(tc.syntax.reference_name.as_deref(), Some("TimeTicks"));
        assert!(tc.syntax.is_compatible(&Value::integer(100)));
    }

    #[test]
    fn test_network_address_is_a_choice_of_ip_address() {
        let loader = MibLoader::new();
        let na = loader.module("RFC1155-SMI").unwrap().get_symbol("NetworkAddress").unwrap();
        let Some(TypeKind::Choice(elements)) = na.resolved_type().map(|t| &t.kind) else {
            panic!("expected a CHOICE");
        };
        assert_eq!(elements[0].ty.tag, Some(TypeTag::application(0)));
    }
}
