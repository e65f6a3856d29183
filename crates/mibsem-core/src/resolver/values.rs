//! Value and object identifier resolution.

use super::MibLoader;
use crate::error::{Result, SemanticError};
use crate::ids::{ModuleId, NodeId};
use crate::oid::MergeLog;
use crate::types::Type;
use crate::value::{BitSetValue, OidDeclaration, OidParent, Value, ValueReference};

impl MibLoader {
    /// Resolve every reference inside a value.
    ///
    /// `expected` is the type the value must fit; its named values are
    /// consulted before the module scope, so `DEFVAL { enabled }` picks the
    /// enumeration label.
    pub(super) fn resolve_value(
        &mut self,
        module: ModuleId,
        value: &Value,
        expected: Option<&Type>,
    ) -> Result<Value> {
        match value {
            Value::Reference(reference) => self.resolve_value_reference(module, reference, expected),
            Value::OidDeclaration(decl) => Ok(Value::ObjectIdentifier(self.resolve_oid(module, decl, None)?)),
            Value::BitSet(bits) if !bits.pending.is_empty() => {
                Ok(Value::BitSet(resolve_bits(bits, expected)?))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_value_reference(
        &mut self,
        module: ModuleId,
        reference: &ValueReference,
        expected: Option<&Type>,
    ) -> Result<Value> {
        if reference.module.is_none()
            && let Some(named) = expected.and_then(|ty| ty.named_value(&reference.name))
        {
            return Ok(named.clone());
        }
        let location = &reference.location;
        let target = self.lookup(module, &reference.name, reference.module.as_deref(), location)?;
        let value = self.referenced_value(target, location)?;
        value.create_reference().map_err(|e| e.at(location))
    }

    /// Place an OID declaration in the tree and return its node.
    ///
    /// `leaf_name` names the last arc when the declaration leaves it
    /// unnamed; a value symbol passes its own name.
    pub(super) fn resolve_oid(
        &mut self,
        module: ModuleId,
        decl: &OidDeclaration,
        leaf_name: Option<&str>,
    ) -> Result<NodeId> {
        let mut current = match &decl.parent {
            OidParent::Root => None,
            OidParent::Reference(parent) => {
                let target = self.lookup(module, &parent.name, parent.module.as_deref(), &parent.location)?;
                let value = self.referenced_value(target, &parent.location)?;
                let node = value.as_oid().ok_or_else(|| {
                    SemanticError::kind_mismatch(
                        format!(
                            "'{}' is a {}, not an object identifier",
                            parent.display_name(),
                            value.kind_name()
                        ),
                        &parent.location,
                    )
                })?;
                Some(node)
            }
        };

        let last = decl.arcs.len().saturating_sub(1);
        for (i, arc) in decl.arcs.iter().enumerate() {
            let name = arc.name.as_deref().or(if i == last { leaf_name } else { None });
            let Self { modules, tree, .. } = self;
            let Some(Some(owner)) = modules.get_mut(module.to_index()) else {
                return Err(SemanticError::UnknownModule {
                    name: module.to_raw().to_string(),
                });
            };
            let mut sink = MergeLog::new(&mut owner.log, &decl.location);
            let node = tree
                .child(current, arc.number, name, Some(&mut sink))
                .map_err(|e| e.at(&decl.location))?;
            current = Some(node);
        }

        current.ok_or_else(|| SemanticError::kind_mismatch("empty object identifier", &decl.location))
    }
}

/// Resolve the named bits of a bit set against the expected type.
fn resolve_bits(bits: &BitSetValue, expected: Option<&Type>) -> Result<BitSetValue> {
    let mut resolved = BitSetValue::from_bits(bits.bits.iter().copied());
    for reference in &bits.pending {
        let bit = expected
            .and_then(Type::named_values)
            .and_then(|named| named.bit(&reference.name))
            .ok_or_else(|| SemanticError::UndefinedSymbol {
                name: reference.display_name(),
                location: reference.location.clone(),
            })?;
        resolved.bits.insert(bit);
    }
    Ok(resolved)
}
