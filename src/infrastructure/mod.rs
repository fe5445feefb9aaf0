// Infrastructure implementations for gomap.

pub mod concurrency;
pub mod config;
pub mod go_parser;
pub mod project_loader;

pub use config::{AnalysisConfig, OutputFormat};
pub use go_parser::GoParser;
pub use project_loader::{FileCensus, ProjectLoader, ProjectScan};
