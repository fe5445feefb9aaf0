// Machine-readable output.

pub mod dto;

use crate::ports::{OutputExporter, Report};
use anyhow::{Context, Result};
use dto::GraphDto;

pub struct JsonExporter;

impl OutputExporter for JsonExporter {
    fn render(&self, report: &Report) -> Result<String> {
        let dto = GraphDto::from_model(report.model, report.census);
        serde_json::to_string_pretty(&dto).context("Failed to serialize graph")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{AnalysisOptions, Engine, UnitInput};
    use crate::infrastructure::go_parser::parse_go;
    use serde_json::Value;

    #[test]
    fn test_json_export() {
        let src = "package main\n\nfunc main() {\n\thelper()\n\thelper()\n}\n\nfunc helper() {}\n";
        let model = Engine::new(AnalysisOptions {
            root_name: "demo".to_string(),
            module_path: None,
        })
        .analyze(vec![UnitInput::new("main.go", parse_go(src))]);
        let report = Report {
            model: &model,
            census: None,
            directory_tree: None,
            generated_at: String::new(),
            most_called_limit: None,
        };

        let json: Value = serde_json::from_str(&JsonExporter.render(&report).unwrap()).unwrap();
        assert_eq!(json["root"], "demo");
        assert!(json.get("module").is_none());
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"][0]["from"], ".:main:main");
        assert_eq!(json["edges"][0]["to"], ".:main:helper");
        assert_eq!(json["nodes"][1]["kind"], "function");
        assert_eq!(json["nodes"][1]["callers"], 1);
        assert_eq!(json["nodes"][1]["call_sites"], 2);
        assert_eq!(json["statistics"]["call_edges"], 1);
        assert_eq!(json["entry_points"][0]["file"], "main.go");
    }
}
