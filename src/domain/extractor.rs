//! Declaration extraction.
//!
//! Turns one parsed unit into its package identity plus the declarations it
//! defines, and registers them. Package paths are canonicalized against the
//! `go.mod` module path when one is known, so that import paths and package
//! paths share a namespace.

use crate::domain::aggregate::UnitStats;
use crate::domain::ast::{SourceUnit, TopLevelItem, TypeShape};
use crate::domain::declaration::{DeclKind, PackageIdentity};
use crate::domain::registry::{InsertOutcome, NewDeclaration, SymbolRegistry};
use tracing::debug;

/// Everything one unit contributes to the registry.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub package: PackageIdentity,
    /// Unit directory relative to the analysis root (`.` for the root).
    pub dir: String,
    pub declarations: Vec<NewDeclaration>,
    pub stats: UnitStats,
}

/// Counts of what `register` did with an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Directory part of a unit path, `/`-separated, `.` when the unit is at the root.
pub fn unit_dir(rel_path: &str) -> String {
    let normalized = rel_path.replace('\\', "/");
    match normalized.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir.trim_start_matches("./").to_string(),
        _ => ".".to_string(),
    }
}

/// Canonical package path for a directory.
pub fn canonical_package_path(dir: &str, module: Option<&str>) -> String {
    match module {
        Some(module) if dir == "." => module.to_string(),
        Some(module) => format!("{}/{}", module, dir),
        None => dir.to_string(),
    }
}

/// Extract the declarations of a unit. Returns `None` when the unit has no
/// package clause; such a unit contributes nothing.
pub fn extract(rel_path: &str, unit: &SourceUnit, module: Option<&str>) -> Option<Extraction> {
    let package_name = unit.package.as_deref().filter(|name| !name.is_empty())?;
    let dir = unit_dir(rel_path);
    let package = PackageIdentity::new(canonical_package_path(&dir, module), package_name);

    let mut stats = UnitStats {
        lines: unit.line_count,
        is_test: rel_path.ends_with("_test.go"),
        ..UnitStats::default()
    };
    let mut declarations = Vec::new();

    for item in &unit.items {
        match item {
            TopLevelItem::Func(func) => match &func.receiver {
                Some(receiver) => {
                    stats.methods += 1;
                    // A receiver without a base type name cannot be keyed.
                    let Some(type_name) = &receiver.type_name else {
                        debug!("{}: skipping method {} with unnamed receiver", rel_path, func.name);
                        continue;
                    };
                    declarations.push(NewDeclaration {
                        name: func.name.clone(),
                        receiver: Some(type_name.clone()),
                        kind: DeclKind::Method,
                        file: rel_path.to_string(),
                        line: func.line,
                    });
                }
                None => {
                    stats.functions += 1;
                    declarations.push(NewDeclaration {
                        name: func.name.clone(),
                        receiver: None,
                        kind: DeclKind::Function,
                        file: rel_path.to_string(),
                        line: func.line,
                    });
                }
            },
            TopLevelItem::Type(ty) => {
                let kind = match ty.shape {
                    TypeShape::Struct => {
                        stats.structs += 1;
                        DeclKind::Struct
                    }
                    TypeShape::Interface => {
                        stats.interfaces += 1;
                        DeclKind::Interface
                    }
                    TypeShape::Other => {
                        stats.other_types += 1;
                        DeclKind::Type
                    }
                };
                declarations.push(NewDeclaration {
                    name: ty.name.clone(),
                    receiver: None,
                    kind,
                    file: rel_path.to_string(),
                    line: ty.line,
                });
            }
            TopLevelItem::Value(_) => {}
        }
    }

    Some(Extraction {
        package,
        dir,
        declarations,
        stats,
    })
}

/// Insert an extraction's declarations, first-seen-wins.
pub fn register(registry: &mut SymbolRegistry, extraction: &Extraction) -> RegisterSummary {
    let package = registry.register_package(extraction.package.clone(), &extraction.dir);
    let mut summary = RegisterSummary::default();
    for decl in &extraction.declarations {
        match registry.insert(package, decl.clone()) {
            InsertOutcome::Inserted(_) => summary.inserted += 1,
            InsertOutcome::Duplicate(existing) => {
                summary.duplicates += 1;
                debug!(
                    "duplicate declaration {} in {} (kept {})",
                    decl.name,
                    decl.file,
                    registry.declaration(existing).file
                );
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::{FuncDecl, Receiver, TypeDecl};
    use crate::domain::declaration::SymbolKey;

    fn func(name: &str, receiver: Option<&str>) -> TopLevelItem {
        TopLevelItem::Func(FuncDecl {
            name: name.to_string(),
            receiver: receiver.map(|r| Receiver {
                type_name: Some(r.to_string()),
            }),
            line: 1,
            body: vec![],
        })
    }

    fn ty(name: &str, shape: TypeShape) -> TopLevelItem {
        TopLevelItem::Type(TypeDecl {
            name: name.to_string(),
            shape,
            line: 1,
        })
    }

    #[test]
    fn test_unit_dir() {
        assert_eq!(unit_dir("main.go"), ".");
        assert_eq!(unit_dir("lib/util/util.go"), "lib/util");
        assert_eq!(unit_dir("lib\\util\\util.go"), "lib/util");
        assert_eq!(unit_dir("./cmd/x.go"), "cmd");
    }

    #[test]
    fn test_canonical_package_path() {
        assert_eq!(canonical_package_path("lib/util", None), "lib/util");
        assert_eq!(canonical_package_path(".", Some("example.com/m")), "example.com/m");
        assert_eq!(
            canonical_package_path("lib/util", Some("example.com/m")),
            "example.com/m/lib/util"
        );
    }

    #[test]
    fn test_extract_classifies_declarations() {
        let unit = SourceUnit {
            package: Some("p".to_string()),
            items: vec![
                func("A", None),
                func("Serve", Some("Server")),
                ty("Server", TypeShape::Struct),
                ty("Handler", TypeShape::Interface),
                ty("ID", TypeShape::Other),
            ],
            line_count: 10,
            ..SourceUnit::default()
        };
        let extraction = extract("p/a.go", &unit, None).unwrap();
        assert_eq!(extraction.package, PackageIdentity::new("p", "p"));
        let kinds: Vec<DeclKind> = extraction.declarations.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeclKind::Function,
                DeclKind::Method,
                DeclKind::Struct,
                DeclKind::Interface,
                DeclKind::Type
            ]
        );
        assert_eq!(extraction.declarations[1].receiver.as_deref(), Some("Server"));
        assert_eq!(extraction.stats.functions, 1);
        assert_eq!(extraction.stats.methods, 1);
        assert_eq!(extraction.stats.lines, 10);
    }

    #[test]
    fn test_extract_without_package_clause() {
        let unit = SourceUnit {
            package: None,
            items: vec![func("A", None)],
            ..SourceUnit::default()
        };
        assert!(extract("p/a.go", &unit, None).is_none());
    }

    #[test]
    fn test_method_with_unnamed_receiver_is_omitted() {
        let unit = SourceUnit {
            package: Some("p".to_string()),
            items: vec![TopLevelItem::Func(FuncDecl {
                name: "M".to_string(),
                receiver: Some(Receiver { type_name: None }),
                line: 3,
                body: vec![],
            })],
            ..SourceUnit::default()
        };
        let extraction = extract("p/a.go", &unit, None).unwrap();
        assert!(extraction.declarations.is_empty());
        assert_eq!(extraction.stats.methods, 1);
    }

    #[test]
    fn test_register_counts_duplicates() {
        let unit = SourceUnit {
            package: Some("p".to_string()),
            items: vec![func("init", None)],
            ..SourceUnit::default()
        };
        let mut registry = SymbolRegistry::new();
        let first = register(&mut registry, &extract("p/a.go", &unit, None).unwrap());
        let second = register(&mut registry, &extract("p/b.go", &unit, None).unwrap());
        assert_eq!(first, RegisterSummary { inserted: 1, duplicates: 0 });
        assert_eq!(second, RegisterSummary { inserted: 0, duplicates: 1 });

        let key = SymbolKey::function(&PackageIdentity::new("p", "p"), "init");
        assert_eq!(registry.lookup(&key).unwrap().file, "p/a.go");
    }
}
