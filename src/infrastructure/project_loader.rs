use crate::domain::analysis::UnitInput;
use crate::domain::dir_tree::DirNode;
use crate::domain::error::ParseFailure;
use crate::infrastructure::config::AnalysisConfig;
use crate::ports::UnitParser;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File counts gathered while walking the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileCensus {
    pub total_files: usize,
    pub go_files: usize,
    pub test_files: usize,
    pub directories: usize,
    pub non_go_files: usize,
}

/// A Go source file, relative to the project root.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub rel_path: String,
    /// File contents, or the read error message.
    pub contents: Result<String, String>,
}

#[derive(Debug)]
pub struct ProjectScan {
    pub root_name: String,
    pub census: FileCensus,
    pub sources: Vec<SourceFile>,
    pub tree: DirNode,
    pub module_path: Option<String>,
}

pub struct ProjectLoader;

impl ProjectLoader {
    /// Walk `root` in file-name order and collect every Go source.
    pub fn scan(root: &Path, config: &AnalysisConfig) -> Result<ProjectScan> {
        if !root.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }
        let root_name = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| root.display().to_string());

        let mut census = FileCensus::default();
        let mut sources = Vec::new();
        let mut tree = DirNode::root(&root_name);

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !(e.file_type().is_dir()
                        && config.skip_dirs.iter().any(|s| e.file_name().to_str() == Some(s.as_str())))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("walk error under {}: {}", root.display(), err);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let rel_path = relative_path(root, entry.path());
            if entry.file_type().is_dir() {
                census.directories += 1;
                tree.insert(&rel_path, true);
                continue;
            }

            census.total_files += 1;
            tree.insert(&rel_path, false);
            if !rel_path.ends_with(".go") {
                census.non_go_files += 1;
                continue;
            }
            census.go_files += 1;
            let is_test = rel_path.ends_with("_test.go");
            if is_test {
                census.test_files += 1;
                if !config.include_tests {
                    debug!("skipping test file {}", rel_path);
                    continue;
                }
            }
            let contents = fs::read_to_string(entry.path()).map_err(|e| e.to_string());
            sources.push(SourceFile { rel_path, contents });
        }
        tree.sort();

        let module_path = read_module_path(root)?;
        info!(
            "found {} Go files ({} tests) in {} directories",
            census.go_files, census.test_files, census.directories
        );

        Ok(ProjectScan {
            root_name,
            census,
            sources,
            tree,
            module_path,
        })
    }

    /// Parse every source on the rayon pool, keeping walk order.
    pub fn parse_sources(sources: &[SourceFile], parser: &dyn UnitParser) -> Vec<UnitInput> {
        sources
            .par_iter()
            .map(|source| {
                let parsed = match &source.contents {
                    Ok(text) => parser.parse(&source.rel_path, text),
                    Err(reason) => Err(ParseFailure::Unreadable(reason.clone())),
                };
                UnitInput::new(source.rel_path.clone(), parsed)
            })
            .collect()
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Module path from `<root>/go.mod`, if the file exists and declares one.
pub fn read_module_path(root: &Path) -> Result<Option<String>> {
    let path = root.join("go.mod");
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_module_line(&contents))
}

pub fn parse_module_line(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.split("//").next()?.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::go_parser::GoParser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_module_line() {
        assert_eq!(
            parse_module_line("// comment\nmodule example.com/m\n\ngo 1.22\n"),
            Some("example.com/m".to_string())
        );
        assert_eq!(parse_module_line("module \"quoted/m\" // trailing"), Some("quoted/m".to_string()));
        assert_eq!(parse_module_line("modulename x\n"), None);
        assert_eq!(parse_module_line("go 1.22\n"), None);
    }

    #[test]
    fn test_scan_census_and_skip_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::create_dir_all(root.join("vendor/x")).unwrap();
        fs::write(root.join("go.mod"), "module example.com/m\n").unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();
        fs::write(root.join("lib/lib.go"), "package lib\n").unwrap();
        fs::write(root.join("lib/lib_test.go"), "package lib\n").unwrap();
        fs::write(root.join("vendor/x/x.go"), "package x\n").unwrap();

        let scan = ProjectLoader::scan(root, &AnalysisConfig::default()).unwrap();
        assert_eq!(scan.module_path.as_deref(), Some("example.com/m"));
        assert_eq!(scan.census.go_files, 3);
        assert_eq!(scan.census.test_files, 1);
        assert_eq!(scan.census.non_go_files, 1);
        assert_eq!(scan.census.total_files, 4);
        assert_eq!(scan.census.directories, 1);
        let paths: Vec<&str> = scan.sources.iter().map(|s| s.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["lib/lib.go", "lib/lib_test.go", "main.go"]);
    }

    #[test]
    fn test_scan_without_tests() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package a\n").unwrap();
        fs::write(dir.path().join("a_test.go"), "package a\n").unwrap();
        let config = AnalysisConfig {
            include_tests: false,
            ..AnalysisConfig::default()
        };
        let scan = ProjectLoader::scan(dir.path(), &config).unwrap();
        assert_eq!(scan.sources.len(), 1);
        assert_eq!(scan.census.test_files, 1);
    }

    #[test]
    fn test_parse_sources_keeps_order_and_failures() {
        let sources = vec![
            SourceFile {
                rel_path: "a.go".to_string(),
                contents: Ok("package a\n\nfunc A() {}\n".to_string()),
            },
            SourceFile {
                rel_path: "b.go".to_string(),
                contents: Err("permission denied".to_string()),
            },
        ];
        let units = ProjectLoader::parse_sources(&sources, &GoParser);
        assert_eq!(units[0].path, "a.go");
        assert!(units[0].parsed.is_ok());
        assert!(matches!(
            &units[1].parsed,
            Err(ParseFailure::Unreadable(reason)) if reason == "permission denied"
        ));
    }
}
