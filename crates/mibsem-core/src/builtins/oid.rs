//! Well-known OID assignments of the SMI base modules.

use crate::diagnostics::FileLocation;
use crate::value::{OidArc, OidDeclaration, Value, ValueReference};

/// A well-known OID node.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinOidNode {
    /// Canonical name of the node.
    pub name: &'static str,
    /// The arc (subidentifier) at this position.
    pub arc: u32,
    /// Name of the parent node, or `None` for a root.
    pub parent: Option<&'static str>,
}

const fn node(name: &'static str, arc: u32, parent: Option<&'static str>) -> BuiltinOidNode {
    BuiltinOidNode { name, arc, parent }
}

/// Every well-known node, parents before children.
pub static BUILTIN_OID_NODES: &[BuiltinOidNode] = &[
    node("ccitt", 0, None),
    node("iso", 1, None),
    node("joint-iso-ccitt", 2, None),
    node("org", 3, Some("iso")),
    node("dod", 6, Some("org")),
    node("internet", 1, Some("dod")),
    node("directory", 1, Some("internet")),
    node("mgmt", 2, Some("internet")),
    node("mib-2", 1, Some("mgmt")),
    node("transmission", 10, Some("mib-2")),
    node("experimental", 3, Some("internet")),
    node("private", 4, Some("internet")),
    node("enterprises", 1, Some("private")),
    node("security", 5, Some("internet")),
    node("snmpV2", 6, Some("internet")),
    node("snmpDomains", 1, Some("snmpV2")),
    node("snmpProxys", 2, Some("snmpV2")),
    node("snmpModules", 3, Some("snmpV2")),
    node("zeroDotZero", 0, Some("ccitt")),
];

/// Nodes RFC1155-SMI declares.
pub const SMIV1_OID_NAMES: &[&str] = &[
    "internet",
    "directory",
    "mgmt",
    "experimental",
    "private",
    "enterprises",
];

/// Look up a well-known node by name.
#[must_use]
pub fn lookup_builtin_oid(name: &str) -> Option<&'static BuiltinOidNode> {
    BUILTIN_OID_NODES.iter().find(|n| n.name == name)
}

/// Numeric OID of a well-known node, `[1, 3, 6, 1]` for `internet`.
#[must_use]
pub fn builtin_oid_arcs(name: &str) -> Vec<u32> {
    let mut arcs = Vec::new();
    let mut current = lookup_builtin_oid(name);
    while let Some(n) = current {
        arcs.push(n.arc);
        current = n.parent.and_then(lookup_builtin_oid);
    }
    arcs.reverse();
    arcs
}

/// OID declaration for `node` as written in a module that declares the
/// names in `scope`.
///
/// A parent in scope is referenced by name, `{ internet 4 }`. Otherwise the
/// full path is spelled out, `{ iso org(3) dod(6) 1 }`.
pub(super) fn declaration(node: &BuiltinOidNode, scope: &[&str], location: &FileLocation) -> Value {
    let Some(parent) = node.parent else {
        return Value::OidDeclaration(OidDeclaration::rooted(
            vec![OidArc::number(node.arc)],
            location.clone(),
        ));
    };
    if scope.contains(&parent) {
        return Value::OidDeclaration(OidDeclaration::under(
            ValueReference::new(parent, location.clone()),
            vec![OidArc::number(node.arc)],
        ));
    }

    let mut arcs = vec![OidArc::number(node.arc)];
    let mut current = lookup_builtin_oid(parent);
    while let Some(n) = current {
        arcs.push(OidArc::named(n.name, n.arc));
        current = n.parent.and_then(lookup_builtin_oid);
    }
    arcs.reverse();
    Value::OidDeclaration(OidDeclaration::rooted(arcs, location.clone()))
}
