use crate::domain::analysis::{AnalysisOptions, Engine};
use crate::domain::model::CodeModel;
use crate::infrastructure::config::AnalysisConfig;
use crate::infrastructure::project_loader::{ProjectLoader, ProjectScan};
use crate::ports::{OutputExporter, Report, UnitParser};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Result of a run, kept for callers that want more than the written file.
pub struct AnalysisRun {
    pub scan: ProjectScan,
    pub model: CodeModel,
}

pub struct AnalyzeUsecase<'a> {
    pub parser: &'a dyn UnitParser,
    pub exporter: &'a dyn OutputExporter,
}

impl<'a> AnalyzeUsecase<'a> {
    /// Scan and analyze `root` without rendering anything.
    pub fn analyze(&self, root: &Path, config: &AnalysisConfig) -> Result<AnalysisRun> {
        let scan = ProjectLoader::scan(root, config)?;
        let units = ProjectLoader::parse_sources(&scan.sources, self.parser);
        let engine = Engine::new(AnalysisOptions {
            root_name: scan.root_name.clone(),
            module_path: scan.module_path.clone(),
        });
        let model = engine.analyze(units);
        Ok(AnalysisRun { scan, model })
    }

    /// Analyze `root` and write the rendered report to `export_path`.
    pub fn run(&self, root: &Path, config: &AnalysisConfig, export_path: &str) -> Result<AnalysisRun> {
        let run = self.analyze(root, config)?;
        let report = Report {
            model: &run.model,
            census: Some(&run.scan.census),
            directory_tree: Some(&run.scan.tree),
            generated_at: chrono::Local::now().format("%b %d, %Y %H:%M:%S").to_string(),
            most_called_limit: config.most_called_limit,
        };
        self.exporter.export(&report, export_path)?;
        info!("wrote {}", export_path);
        Ok(run)
    }
}
