use crate::domain::aggregate::Statistics;
use crate::domain::declaration::DeclKind;
use crate::domain::entry_point::EntryPoint;
use crate::domain::model::CodeModel;
use crate::infrastructure::project_loader::FileCensus;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GraphDto<'a> {
    pub root: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<&'a str>,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
    pub entry_points: Vec<EntryPoint>,
    pub statistics: &'a Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub census: Option<&'a FileCensus>,
}

#[derive(Debug, Serialize)]
pub struct NodeDto {
    pub id: String,
    pub label: String,
    pub kind: DeclKind,
    pub package: String,
    pub package_path: String,
    pub file: String,
    pub line: usize,
    pub callers: usize,
    pub call_sites: usize,
}

#[derive(Debug, Serialize)]
pub struct EdgeDto {
    pub from: String,
    pub to: String,
}

impl<'a> GraphDto<'a> {
    /// Every registered declaration becomes a node; edges follow discovery order.
    pub fn from_model(model: &'a CodeModel, census: Option<&'a FileCensus>) -> Self {
        let nodes = model
            .registry()
            .iter()
            .map(|d| NodeDto {
                id: d.key.to_string(),
                label: d.label(),
                kind: d.kind,
                package: d.key.package.name.clone(),
                package_path: d.key.package.path.clone(),
                file: d.file.clone(),
                line: d.line,
                callers: d.called_by().len(),
                call_sites: d.call_sites(),
            })
            .collect();

        let edges = model
            .call_graph_edges()
            .map(|e| EdgeDto {
                from: e.caller_key().to_string(),
                to: e.callee_key().to_string(),
            })
            .collect();

        GraphDto {
            root: model.root_name(),
            module: model.module_path(),
            nodes,
            edges,
            entry_points: model.entry_points(),
            statistics: model.statistics(),
            census,
        }
    }
}
