//! Call Graph DOT Exporter
//!
//! Exports the call graph as Graphviz DOT, one node per callable declaration.

use crate::domain::declaration::{DeclKind, Declaration};
use crate::ports::{OutputExporter, Report};
use anyhow::Result;

pub struct DotExporter;

impl OutputExporter for DotExporter {
    fn render(&self, report: &Report) -> Result<String> {
        Ok(Self::to_dot(report))
    }
}

impl DotExporter {
    /// Convert the call graph to a DOT string.
    pub fn to_dot(report: &Report) -> String {
        let model = report.model;
        let mut lines = Vec::new();

        lines.push("digraph CallGraph {".to_string());
        lines.push("    rankdir=LR;".to_string());
        lines.push("    nodesep=0.6;".to_string());
        lines.push("    ranksep=1.0;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push("".to_string());

        let entry_files: Vec<(String, String)> = model
            .entry_points()
            .into_iter()
            .map(|e| (e.package_path, e.file))
            .collect();

        for decl in model.registry().iter().filter(|d| d.kind.is_callable()) {
            let is_entry = decl.receiver().is_none()
                && decl.name() == "main"
                && entry_files
                    .iter()
                    .any(|(path, file)| *path == decl.key.package.path && *file == decl.file);
            let (shape, fill, border) = Self::node_style(decl, is_entry);
            lines.push(format!(
                "    \"{}\" [label=\"{}\", tooltip=\"{}:{}\", shape={}, style=\"filled,rounded\", fillcolor=\"{}\", color=\"{}\"];",
                Self::escape_label(&decl.key.to_string()),
                Self::escape_label(&decl.label()),
                Self::escape_label(&decl.file),
                decl.line,
                shape,
                fill,
                border
            ));
        }

        lines.push("".to_string());

        for edge in model.call_graph_edges() {
            lines.push(format!(
                "    \"{}\" -> \"{}\";",
                Self::escape_label(&edge.caller_key().to_string()),
                Self::escape_label(&edge.callee_key().to_string())
            ));
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    fn node_style(decl: &Declaration, is_entry: bool) -> (&'static str, &'static str, &'static str) {
        if is_entry {
            return ("box", "#a6e3a1", "#40a02b"); // Green
        }
        match decl.kind {
            DeclKind::Method => ("ellipse", "#cba6f7", "#8839ef"), // Purple
            _ => ("box", "#89b4fa", "#1e66f5"),                    // Blue
        }
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}
