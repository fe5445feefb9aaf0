use crate::domain::ast::SourceUnit;
use crate::domain::declaration::Declaration;
use crate::domain::dir_tree::DirNode;
use crate::domain::error::ParseFailure;
use crate::domain::model::CodeModel;
use crate::infrastructure::project_loader::FileCensus;
use anyhow::{Context, Result};

pub mod dot_exporter;
pub mod markdown_exporter;

/// Turns source text into a `SourceUnit`. Called from the rayon pool.
pub trait UnitParser: Send + Sync {
    fn parse(&self, path: &str, source: &str) -> Result<SourceUnit, ParseFailure>;
}

/// Everything a renderer may show.
pub struct Report<'a> {
    pub model: &'a CodeModel,
    pub census: Option<&'a FileCensus>,
    pub directory_tree: Option<&'a DirNode>,
    /// Preformatted creation timestamp.
    pub generated_at: String,
    /// Row limit for the most-called table; `None` shows every called function.
    pub most_called_limit: Option<usize>,
}

/// Stateless formatter for a finished analysis.
pub trait OutputExporter {
    fn render(&self, report: &Report) -> Result<String>;

    fn export(&self, report: &Report, path: &str) -> Result<()> {
        let content = self.render(report)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))
    }
}

/// Mermaid node id for a declaration: its key with every non-alphanumeric
/// character turned into `_`, suffixed with `_<DeclId>`. The suffix holds no
/// `_`, so two declarations never share an id.
pub fn node_id(decl: &Declaration) -> String {
    let mut id: String = decl
        .key
        .to_string()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    id.push('_');
    id.push_str(&decl.id.0.to_string());
    id
}
