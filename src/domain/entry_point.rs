//! Entry Point Detection Module
//!
//! Detects `main` packages: packages named `main` that declare `func main()`.

use crate::domain::declaration::{DeclKind, SymbolKey};
use crate::domain::registry::SymbolRegistry;
use serde::Serialize;

/// A detected entry point in the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    /// Canonical package path
    pub package_path: String,
    /// Package directory relative to the analysis root
    pub dir: String,
    /// File declaring `main`
    pub file: String,
    /// Line of `func main()`
    pub line: usize,
}

/// Entry points in package registration order.
pub fn detect_entry_points(registry: &SymbolRegistry) -> Vec<EntryPoint> {
    registry
        .packages()
        .iter()
        .filter(|pkg| pkg.identity.name == "main")
        .filter_map(|pkg| {
            let decl = registry.lookup(&SymbolKey::function(&pkg.identity, "main"))?;
            (decl.kind == DeclKind::Function).then(|| EntryPoint {
                package_path: pkg.identity.path.clone(),
                dir: pkg.dir.clone(),
                file: decl.file.clone(),
                line: decl.line,
            })
        })
        .collect()
}
