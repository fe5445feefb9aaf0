//! Queryable result of one analysis run.

use crate::domain::aggregate::{rank_by_incoming_calls, Statistics};
use crate::domain::callgraph::{CallEdge, CallGraph};
use crate::domain::declaration::{Declaration, Package, SymbolKey};
use crate::domain::entry_point::{detect_entry_points, EntryPoint};
use crate::domain::registry::SymbolRegistry;

/// Root → packages → declarations, in rendering order.
#[derive(Debug)]
pub struct PackageTree<'a> {
    pub root_name: &'a str,
    pub packages: Vec<PackageNode<'a>>,
}

#[derive(Debug)]
pub struct PackageNode<'a> {
    pub package: &'a Package,
    pub declarations: Vec<&'a Declaration>,
}

#[derive(Debug)]
pub struct CodeModel {
    root_name: String,
    module_path: Option<String>,
    graph: CallGraph,
    statistics: Statistics,
}

impl CodeModel {
    pub fn new(
        root_name: String,
        module_path: Option<String>,
        graph: CallGraph,
        statistics: Statistics,
    ) -> Self {
        Self {
            root_name,
            module_path,
            graph,
            statistics,
        }
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    pub fn registry(&self) -> &SymbolRegistry {
        self.graph.registry()
    }

    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    /// Packages sorted by (short name, path); declarations by (name, receiver).
    pub fn package_tree(&self) -> PackageTree<'_> {
        let registry = self.registry();
        let mut packages: Vec<PackageNode<'_>> = registry
            .packages()
            .iter()
            .map(|package| {
                let mut declarations: Vec<&Declaration> = package
                    .declarations
                    .iter()
                    .map(|id| registry.declaration(*id))
                    .collect();
                declarations.sort_by(|a, b| {
                    a.name()
                        .cmp(b.name())
                        .then_with(|| a.receiver().cmp(&b.receiver()))
                });
                PackageNode {
                    package,
                    declarations,
                }
            })
            .collect();
        packages.sort_by(|a, b| {
            a.package
                .identity
                .name
                .cmp(&b.package.identity.name)
                .then_with(|| a.package.identity.path.cmp(&b.package.identity.path))
        });
        PackageTree {
            root_name: &self.root_name,
            packages,
        }
    }

    /// Lazy, restartable sequence of call edges.
    pub fn call_graph_edges(&self) -> impl Iterator<Item = CallEdge<'_>> + '_ {
        self.graph.edges()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn ranked_by_incoming_calls(&self, limit: Option<usize>) -> Vec<(&Declaration, usize)> {
        rank_by_incoming_calls(&self.graph, limit)
    }

    pub fn incoming_count(&self, key: &SymbolKey) -> usize {
        self.graph.incoming_count(key)
    }

    pub fn entry_points(&self) -> Vec<EntryPoint> {
        detect_entry_points(self.registry())
    }
}
