//! mibsem-core: semantic core of a MIB loader
//!
//! This crate takes parsed SNMP MIB modules ([`ModuleDecl`]), resolves every
//! reference across them, checks SMI constraints and the clauses of the SNMP
//! macros, and places every OID value in one shared [`OidTree`].
//!
//! It is IO-free: callers hand over declarations and get back resolved
//! modules plus a [`MibLog`] of warnings and errors.
//!
//! ```
//! use mibsem_core::value::{OidArc, OidDeclaration, ValueReference};
//! use mibsem_core::{FileLocation, MibLoader, ModuleDecl, Type, Value};
//!
//! let location = FileLocation::new("ACME-MIB", 3, 1);
//! let acme = OidDeclaration::under(
//!     ValueReference::new("enterprises", location.clone()),
//!     vec![OidArc::number(9999)],
//! );
//! let decl = ModuleDecl::new("ACME-MIB", location.clone())
//!     .import("SNMPv2-SMI", ["enterprises"])
//!     .with_value("acme", Type::object_identifier(), Value::OidDeclaration(acme), location);
//!
//! let mut loader = MibLoader::new();
//! assert!(loader.load(decl).is_empty());
//!
//! let node = loader.find_symbol("acme").and_then(|s| s.node()).unwrap();
//! assert_eq!(loader.tree().dotted(node), "1.3.6.1.4.1.9999");
//! ```

pub mod builtins;
pub mod constraint;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod module;
pub mod oid;
pub mod render;
pub mod resolver;
pub mod snmp;
pub mod types;
pub mod value;

pub use constraint::Constraint;
pub use diagnostics::{FileLocation, LogEntry, MibLog, Severity};
pub use error::{Result, SemanticError};
pub use ids::{ModuleId, NodeId, SymbolId};
pub use module::{Module, ModuleDecl, Symbol};
pub use oid::{Oid, OidTree};
pub use render::render_symbol;
pub use resolver::{LoaderOptions, MibLoader};
pub use types::Type;
pub use value::Value;
