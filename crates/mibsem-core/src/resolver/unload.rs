//! Module unloading.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::MibLoader;
use crate::diagnostics::MibLog;
use crate::error::{Result, SemanticError};
use crate::ids::{NodeId, SymbolId};
use crate::module::Symbol;
use crate::snmp::IndexItem;
use crate::types::TypeKind;
use crate::value::Value;

impl MibLoader {
    /// Unload a module and return its diagnostics.
    ///
    /// The module's symbols are unbound from the OID tree. A node another
    /// module also declared is rebound to that module's symbol; any other
    /// node is pruned together with the ancestors left empty by its removal.
    /// Values other modules copied from the unloaded one are kept as is;
    /// each one left pointing at a pruned node is reported as a warning,
    /// both in the holding module's log and in the returned one.
    pub fn unload(&mut self, name: &str) -> Result<MibLog> {
        let id = self.by_name.remove(name).ok_or_else(|| SemanticError::UnknownModule {
            name: name.to_string(),
        })?;
        let Some(module) = self.modules.get_mut(id.to_index()).and_then(Option::take) else {
            return Err(SemanticError::UnknownModule {
                name: name.to_string(),
            });
        };

        let nodes: Vec<(NodeId, SymbolId)> = module
            .symbols()
            .filter_map(|s| Some((s.node()?, s.id())))
            .collect();

        // First symbol in load order declaring each affected node.
        let mut successors: BTreeMap<NodeId, SymbolId> = BTreeMap::new();
        for other in self.modules() {
            for symbol in other.symbols().filter(|s| s.is_resolved()) {
                if let Some(node) = symbol.node()
                    && nodes.iter().any(|&(n, _)| n == node)
                {
                    successors.entry(node).or_insert(symbol.id());
                }
            }
        }

        // Nodes pruning may remove, and the handles other modules hold to them.
        let mut at_risk = BTreeSet::new();
        for &(node, _) in &nodes {
            let mut current = Some(node);
            while let Some(n) = current
                && at_risk.insert(n)
            {
                current = self.tree.parent(n);
            }
        }
        let mut held = Vec::new();
        for other in self.modules() {
            for symbol in other.symbols() {
                for node in referenced_nodes(symbol).intersection(&at_risk) {
                    held.push((symbol.id().module, symbol.name().to_string(), symbol.location().clone(), *node));
                }
            }
        }
        let held: Vec<_> = held
            .into_iter()
            .map(|(owner, symbol, location, node)| (owner, symbol, location, node, self.tree.dotted(node)))
            .collect();

        let mut rebound = 0usize;
        let mut pruned = 0usize;
        for (node, symbol) in nodes {
            if !self.tree.detach_symbol(node, symbol) {
                pruned += self.tree.prune(node);
                continue;
            }
            match successors.get(&node) {
                Some(&successor) if self.tree.attach_symbol(node, successor) => rebound += 1,
                _ => pruned += self.tree.prune(node),
            }
        }

        let mut log = module.log;
        let mut stale = 0usize;
        for (owner, symbol, location, node, dotted) in held {
            if self.tree.node(node).is_some() {
                continue;
            }
            let message = format!("'{symbol}' refers to OID {dotted}, removed with module {name}");
            self.warn(owner, &location, message.clone());
            log.add_warning(location, message);
            stale += 1;
        }

        debug!(module = %name, rebound, pruned, stale, "module unloaded");
        Ok(log)
    }
}

/// OID nodes a symbol's value and macro clauses refer to.
fn referenced_nodes(symbol: &Symbol) -> BTreeSet<NodeId> {
    let mut values: Vec<&Value> = symbol.value().into_iter().collect();
    match symbol.resolved_type().map(|t| &t.kind) {
        Some(TypeKind::ObjectType(obj)) => {
            values.extend(obj.index.iter().filter_map(|entry| match &entry.item {
                IndexItem::Value(v) => Some(v),
                IndexItem::Type(_) => None,
            }));
            values.extend(obj.augments.iter().chain(&obj.default_value));
        }
        Some(TypeKind::TrapType(trap)) => {
            values.push(&trap.enterprise);
            values.extend(&trap.variables);
        }
        Some(TypeKind::NotificationType(notification)) => values.extend(&notification.objects),
        Some(TypeKind::ModuleIdentity(identity)) => values.extend(identity.revisions.iter().map(|r| &r.value)),
        Some(TypeKind::ObjectGroup(group)) => values.extend(&group.objects),
        Some(TypeKind::NotificationGroup(group)) => values.extend(&group.notifications),
        Some(TypeKind::ModuleCompliance(compliance)) => {
            for module in &compliance.modules {
                values.extend(&module.mandatory_groups);
                values.extend(module.compliances.iter().map(|c| c.value()));
            }
        }
        Some(TypeKind::AgentCapabilities(caps)) => {
            for module in &caps.modules {
                values.extend(&module.includes);
                for variation in &module.variations {
                    values.push(&variation.value);
                    values.extend(&variation.creation_requires);
                    values.extend(&variation.default_value);
                }
            }
        }
        _ => {}
    }
    values.into_iter().filter_map(Value::as_oid).collect()
}
