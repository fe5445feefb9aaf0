// Call graph structures for gomap.
// Edges are stored as mutual arena indices on the declarations themselves.

use crate::domain::declaration::{Declaration, SymbolKey};
use crate::domain::registry::SymbolRegistry;
use crate::domain::resolver::ResolvedCall;

/// What `add_edge` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Added,
    AlreadyPresent,
    /// One of the keys is not registered.
    MissingEndpoint,
    /// One endpoint is a type, e.g. a conversion `T(x)`.
    NotCallable,
}

/// One caller → callee edge.
#[derive(Debug, Clone, Copy)]
pub struct CallEdge<'a> {
    pub caller: &'a Declaration,
    pub callee: &'a Declaration,
}

impl<'a> CallEdge<'a> {
    pub fn caller_key(&self) -> &'a SymbolKey {
        &self.caller.key
    }

    pub fn callee_key(&self) -> &'a SymbolKey {
        &self.callee.key
    }

    pub fn caller_label(&self) -> String {
        self.caller.label()
    }

    pub fn callee_label(&self) -> String {
        self.callee.label()
    }
}

/// The call graph over a populated registry.
#[derive(Debug, Default)]
pub struct CallGraph {
    registry: SymbolRegistry,
    edge_count: usize,
    call_sites: usize,
}

impl CallGraph {
    pub fn new(registry: SymbolRegistry) -> Self {
        Self {
            registry,
            edge_count: 0,
            call_sites: 0,
        }
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Add `caller → callee` unless either endpoint is missing or not callable,
    /// or the edge exists already. Keeps `calls` and `called_by` symmetric.
    pub fn add_edge(&mut self, caller: &SymbolKey, callee: &SymbolKey) -> EdgeOutcome {
        let (Some(from), Some(to)) = (self.registry.lookup_id(caller), self.registry.lookup_id(callee)) else {
            return EdgeOutcome::MissingEndpoint;
        };
        if !self.registry.declaration(from).kind.is_callable()
            || !self.registry.declaration(to).kind.is_callable()
        {
            return EdgeOutcome::NotCallable;
        }
        // Out-degree is small; a linear scan is enough.
        if self.registry.declaration(from).calls.contains(&to) {
            return EdgeOutcome::AlreadyPresent;
        }
        self.registry.declaration_mut(from).calls.push(to);
        self.registry.declaration_mut(to).called_by.push(from);
        self.edge_count += 1;
        EdgeOutcome::Added
    }

    /// Link one resolved call site, counting it against the callee when the
    /// edge is (or already was) materialized.
    pub fn link(&mut self, call: &ResolvedCall) -> EdgeOutcome {
        let outcome = self.add_edge(&call.caller, &call.callee);
        if matches!(outcome, EdgeOutcome::Added | EdgeOutcome::AlreadyPresent) {
            if let Some(id) = self.registry.lookup_id(&call.callee) {
                self.registry.declaration_mut(id).call_sites += 1;
                self.call_sites += 1;
            }
        }
        outcome
    }

    /// Number of distinct callers of `key`; zero when the key is unknown.
    pub fn incoming_count(&self, key: &SymbolKey) -> usize {
        self.registry
            .lookup(key)
            .map(|decl| decl.called_by.len())
            .unwrap_or(0)
    }

    pub fn callees_of(&self, key: &SymbolKey) -> Vec<&Declaration> {
        self.registry
            .lookup(key)
            .map(|decl| decl.calls.iter().map(|id| self.registry.declaration(*id)).collect())
            .unwrap_or_default()
    }

    pub fn callers_of(&self, key: &SymbolKey) -> Vec<&Declaration> {
        self.registry
            .lookup(key)
            .map(|decl| {
                decl.called_by
                    .iter()
                    .map(|id| self.registry.declaration(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Total call sites counted by `link`.
    pub fn call_site_count(&self) -> usize {
        self.call_sites
    }

    /// All edges: callers in registry order, callees in discovery order.
    /// Each call returns a fresh iterator.
    pub fn edges(&self) -> impl Iterator<Item = CallEdge<'_>> + '_ {
        self.registry.iter().flat_map(move |caller| {
            caller.calls.iter().map(move |id| CallEdge {
                caller,
                callee: self.registry.declaration(*id),
            })
        })
    }
}
