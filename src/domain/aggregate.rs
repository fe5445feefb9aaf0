use crate::domain::callgraph::CallGraph;
use crate::domain::declaration::Declaration;
use serde::Serialize;

/// Parse-time tallies for one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitStats {
    pub functions: usize,
    pub methods: usize,
    pub structs: usize,
    pub interfaces: usize,
    pub other_types: usize,
    pub lines: usize,
    pub is_test: bool,
}

/// Running tallies collected while the engine consumes the unit stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseTally {
    pub units: usize,
    pub parsed_units: usize,
    pub parse_failures: usize,
    pub skipped_units: usize,
    pub test_units: usize,
    pub functions: usize,
    pub methods: usize,
    pub structs: usize,
    pub interfaces: usize,
    pub other_types: usize,
    pub lines_of_code: usize,
    pub duplicate_declarations: usize,
}

impl ParseTally {
    pub fn record_unit(&mut self, stats: &UnitStats) {
        self.parsed_units += 1;
        if stats.is_test {
            self.test_units += 1;
        }
        self.functions += stats.functions;
        self.methods += stats.methods;
        self.structs += stats.structs;
        self.interfaces += stats.interfaces;
        self.other_types += stats.other_types;
        self.lines_of_code += stats.lines;
    }
}

/// Aggregate statistics of one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub units: usize,
    pub parsed_units: usize,
    pub parse_failures: usize,
    pub skipped_units: usize,
    pub test_units: usize,
    pub packages: usize,
    pub functions: usize,
    pub methods: usize,
    pub structs: usize,
    pub interfaces: usize,
    pub other_types: usize,
    pub lines_of_code: usize,
    pub declarations: usize,
    pub duplicate_declarations: usize,
    pub call_edges: usize,
    pub call_sites: usize,
}

/// Combine the parse tallies with the final graph.
pub fn aggregate(graph: &CallGraph, tally: &ParseTally) -> Statistics {
    let registry = graph.registry();
    Statistics {
        units: tally.units,
        parsed_units: tally.parsed_units,
        parse_failures: tally.parse_failures,
        skipped_units: tally.skipped_units,
        test_units: tally.test_units,
        packages: registry.packages().len(),
        functions: tally.functions,
        methods: tally.methods,
        structs: tally.structs,
        interfaces: tally.interfaces,
        other_types: tally.other_types,
        lines_of_code: tally.lines_of_code,
        declarations: registry.len(),
        duplicate_declarations: tally.duplicate_declarations,
        call_edges: graph.edge_count(),
        call_sites: graph.call_site_count(),
    }
}

/// Functions and methods by descending number of distinct callers.
///
/// The sort is stable, so ties keep registry insertion order.
pub fn rank_by_incoming_calls(graph: &CallGraph, limit: Option<usize>) -> Vec<(&Declaration, usize)> {
    let mut ranked: Vec<(&Declaration, usize)> = graph
        .registry()
        .iter()
        .filter(|decl| decl.kind.is_callable())
        .map(|decl| (decl, decl.called_by().len()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
