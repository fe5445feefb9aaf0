//! Markdown Report Exporter
//!
//! Statistics, module information, entry points, directory and code trees, a
//! Mermaid call graph and the most-called table.

use crate::domain::declaration::{DeclKind, Declaration};
use crate::domain::model::PackageTree;
use crate::ports::{node_id, OutputExporter, Report};
use anyhow::Result;
use std::fmt::Write;

pub struct MarkdownExporter;

impl OutputExporter for MarkdownExporter {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "## Code Structure Analysis\n")?;
        writeln!(out, "*Created at: {}*\n", report.generated_at)?;

        Self::write_statistics(&mut out, report)?;

        if let Some(module) = report.model.module_path() {
            writeln!(out, "### Module Information\n")?;
            writeln!(out, "```bash\nmodule {}\n```\n", module)?;
        }

        let entry_points = report.model.entry_points();
        if !entry_points.is_empty() {
            writeln!(out, "### Entry Points\n")?;
            for (i, entry) in entry_points.iter().enumerate() {
                writeln!(out, "{}. `{}` ({})", i + 1, entry.package_path, entry.file)?;
            }
            writeln!(out)?;
        }

        if let Some(tree) = report.directory_tree {
            writeln!(out, "<details>\n<summary>Directory Structure</summary>\n")?;
            writeln!(out, "```bash\n{}```\n</details>\n", tree.render())?;
        }

        writeln!(out, "<details>\n<summary>Code Structure</summary>\n")?;
        writeln!(out, "```bash\n{}```\n</details>\n", render_package_tree(&report.model.package_tree()))?;

        writeln!(out, "## Function Call Graph\n")?;
        writeln!(out, "<details>\n<summary>View Function Call Graph</summary>\n")?;
        writeln!(out, "```mermaid\ngraph TD")?;
        Self::write_mermaid(&mut out, report)?;
        writeln!(out, "```\n</details>\n")?;

        Self::write_most_called(&mut out, report)?;

        writeln!(out, "\n---\n*This document was automatically generated by gomap*")?;
        Ok(out)
    }
}

impl MarkdownExporter {
    fn write_statistics(out: &mut String, report: &Report) -> Result<()> {
        let stats = report.model.statistics();
        writeln!(out, "### Project Statistics\n")?;
        writeln!(out, "| Metric | Count |")?;
        writeln!(out, "|--------|------:|")?;
        let go_files = report.census.map(|c| c.go_files).unwrap_or(stats.units);
        let mut rows: Vec<(&str, usize)> = vec![
            ("Go Files", go_files),
            ("Packages", stats.packages),
            ("Functions", stats.functions),
            ("Methods", stats.methods),
            ("Structs", stats.structs),
            ("Interfaces", stats.interfaces),
            ("Other Types", stats.other_types),
            ("Test Files", report.census.map(|c| c.test_files).unwrap_or(stats.test_units)),
        ];
        if let Some(census) = report.census {
            rows.push(("Directories", census.directories));
        }
        rows.push(("Total Lines of Code", stats.lines_of_code));
        rows.push(("Call Edges", stats.call_edges));
        rows.push(("Parse Failures", stats.parse_failures));
        if let Some(census) = report.census {
            rows.push(("Non-Go Files", census.non_go_files));
            rows.push(("Total Files", census.total_files));
        }
        for (metric, count) in rows {
            writeln!(out, "| {} | {} |", metric, count)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_mermaid(out: &mut String, report: &Report) -> Result<()> {
        let registry = report.model.registry();
        for decl in registry.iter().filter(|d| d.kind.is_callable()) {
            writeln!(
                out,
                "    {}[\"{}\"]",
                node_id(decl),
                decl.label().replace('"', "'")
            )?;
        }
        for edge in report.model.call_graph_edges() {
            writeln!(
                out,
                "    {} --> {}",
                node_id(edge.caller),
                node_id(edge.callee)
            )?;
        }
        Ok(())
    }

    fn write_most_called(out: &mut String, report: &Report) -> Result<()> {
        writeln!(out, "## Most Called Functions\n")?;
        writeln!(out, "| Function | Type | File | Callers | Call Sites |")?;
        writeln!(out, "|----------|------|------|--------:|-----------:|")?;
        let ranked = report.model.ranked_by_incoming_calls(None);
        let called = ranked.into_iter().filter(|(_, count)| *count > 0);
        let rows: Vec<(&Declaration, usize)> = match report.most_called_limit {
            Some(limit) => called.take(limit).collect(),
            None => called.collect(),
        };
        for (decl, count) in rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                display_name(decl),
                decl.kind,
                decl.file,
                count,
                decl.call_sites()
            )?;
        }
        Ok(())
    }
}

fn display_name(decl: &Declaration) -> String {
    match decl.receiver() {
        Some(recv) => format!("({}) {}", recv, decl.name()),
        None => decl.name().to_string(),
    }
}

fn tree_line(decl: &Declaration) -> String {
    match decl.kind {
        DeclKind::Function => format!("func {}()", decl.name()),
        DeclKind::Method => format!("func ({}) {}()", decl.receiver().unwrap_or("?"), decl.name()),
        DeclKind::Struct => format!("struct {}", decl.name()),
        DeclKind::Interface => format!("interface {}", decl.name()),
        DeclKind::Type => format!("{} (type)", decl.name()),
    }
}

/// Render the package tree with box-drawing connectors.
pub fn render_package_tree(tree: &PackageTree) -> String {
    let mut out = format!("{}/\n", tree.root_name);
    for (i, node) in tree.packages.iter().enumerate() {
        let last_pkg = i == tree.packages.len() - 1;
        let (connector, child_prefix) = if last_pkg { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(&format!(
            "{}{} ({})\n",
            connector, node.package.identity.name, node.package.identity.path
        ));
        for (j, decl) in node.declarations.iter().enumerate() {
            let last = j == node.declarations.len() - 1;
            let connector = if last { "└── " } else { "├── " };
            out.push_str(&format!("{}{}{}\n", child_prefix, connector, tree_line(decl)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{AnalysisOptions, Engine, UnitInput};
    use crate::infrastructure::go_parser::parse_go;

    fn render(sources: &[(&str, &str)]) -> String {
        let units = sources
            .iter()
            .map(|(path, src)| UnitInput::new(*path, parse_go(src)));
        let model = Engine::new(AnalysisOptions {
            root_name: "repo".to_string(),
            module_path: Some("example.com/repo".to_string()),
        })
        .analyze(units);
        let report = Report {
            model: &model,
            census: None,
            directory_tree: None,
            generated_at: "Jan 01, 2026 00:00:00".to_string(),
            most_called_limit: None,
        };
        MarkdownExporter.render(&report).unwrap()
    }

    #[test]
    fn test_render_sections() {
        let md = render(&[
            ("main.go", "package main\n\nfunc main() { helper() }\n\nfunc helper() {}\n"),
            ("lib/util.go", "package lib\n\ntype Box struct{}\n\nfunc (b *Box) Open() {}\n"),
        ]);
        assert!(md.contains("## Code Structure Analysis"));
        assert!(md.contains("*Created at: Jan 01, 2026 00:00:00*"));
        assert!(md.contains("| Functions | 2 |"));
        assert!(md.contains("| Methods | 1 |"));
        assert!(md.contains("module example.com/repo"));
        assert!(md.contains("1. `example.com/repo` (main.go)"));
        assert!(md.contains("├── lib (example.com/repo/lib)"));
        assert!(md.contains("func (Box) Open()"));
        assert!(md.contains("struct Box"));
        assert!(md.contains("```mermaid\ngraph TD"));
        assert!(md.contains("example_com_repo_main_main_0 --> example_com_repo_main_helper_1"));
        assert!(md.contains("| helper | function | main.go | 1 | 1 |"));
    }

    #[test]
    fn test_package_tree_layout() {
        let md = render(&[("a/a.go", "package a\n\nfunc Z() {}\n\nfunc A() {}\n")]);
        assert!(md.contains("repo/\n└── a (example.com/repo/a)\n    ├── func A()\n    └── func Z()\n"));
    }
}
