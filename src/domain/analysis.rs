//! The analysis engine.
//!
//! Runs in two passes separated by a barrier: every unit is extracted into the
//! registry first, then every unit is resolved against the complete registry.
//! Call edges therefore do not depend on the order the units arrive in.
//! Resolution is read-only per unit and runs on the rayon pool; linking is
//! sequential in unit order so the graph is deterministic.

use crate::domain::aggregate::{aggregate, ParseTally};
use crate::domain::ast::SourceUnit;
use crate::domain::callgraph::CallGraph;
use crate::domain::declaration::PackageIdentity;
use crate::domain::error::ParseFailure;
use crate::domain::extractor::{extract, register};
use crate::domain::imports::ImportAliasMap;
use crate::domain::model::CodeModel;
use crate::domain::registry::SymbolRegistry;
use crate::domain::resolver::{CallResolver, ResolvedCall};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// One element of the unit stream.
#[derive(Debug, Clone)]
pub struct UnitInput {
    /// Path relative to the analysis root.
    pub path: String,
    pub parsed: Result<SourceUnit, ParseFailure>,
}

impl UnitInput {
    pub fn new(path: impl Into<String>, parsed: Result<SourceUnit, ParseFailure>) -> Self {
        Self {
            path: path.into(),
            parsed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Name shown at the root of the package tree.
    pub root_name: String,
    /// Module path from `go.mod`, used to canonicalize package paths.
    pub module_path: Option<String>,
}

pub struct Engine {
    options: AnalysisOptions,
}

impl Engine {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Analyze a stream of units. Never fails; broken units only drop out.
    pub fn analyze<I>(&self, units: I) -> CodeModel
    where
        I: IntoIterator<Item = UnitInput>,
    {
        let units: Vec<UnitInput> = units.into_iter().collect();
        let module = self.options.module_path.as_deref();
        let mut tally = ParseTally::default();
        let mut registry = SymbolRegistry::new();
        let mut resolvable: Vec<(PackageIdentity, &SourceUnit)> = Vec::new();

        // Pass 1: extraction.
        for input in &units {
            tally.units += 1;
            let unit = match &input.parsed {
                Ok(unit) => unit,
                Err(failure) => {
                    tally.parse_failures += 1;
                    warn!("skipping {}: {}", input.path, failure);
                    continue;
                }
            };
            let Some(extraction) = extract(&input.path, unit, module) else {
                tally.skipped_units += 1;
                warn!("skipping {}: no package clause", input.path);
                continue;
            };
            tally.record_unit(&extraction.stats);
            let summary = register(&mut registry, &extraction);
            tally.duplicate_declarations += summary.duplicates;
            debug!(
                "{}: package {}, {} declarations",
                input.path, extraction.package, summary.inserted
            );
            resolvable.push((extraction.package, unit));
        }
        info!(
            "extracted {} declarations from {} units ({} failed to parse)",
            registry.len(),
            tally.parsed_units,
            tally.parse_failures
        );

        // Pass 2: resolution against the complete registry.
        let resolved: Vec<Vec<ResolvedCall>> = resolvable
            .par_iter()
            .map(|(package, unit)| {
                let imports = ImportAliasMap::from_imports(&unit.imports);
                CallResolver::new(&registry, package, &imports).resolve_unit(unit)
            })
            .collect();

        let mut graph = CallGraph::new(registry);
        for call in resolved.iter().flatten() {
            graph.link(call);
        }
        info!(
            "linked {} call edges from {} call sites",
            graph.edge_count(),
            graph.call_site_count()
        );

        let statistics = aggregate(&graph, &tally);
        CodeModel::new(
            self.options.root_name.clone(),
            self.options.module_path.clone(),
            graph,
            statistics,
        )
    }
}
