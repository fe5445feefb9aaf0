//! Best-effort static call resolution.
//!
//! Each call expression is classified by the shape of its callee and mapped to
//! a candidate `SymbolKey`:
//!
//! 1. `f(...)` resolves to `f` in the current package.
//! 2. `pkg.F(...)` where `pkg` is an import alias resolves to `F` in the imported package.
//! 3. `x.M(...)` where `x` is not an alias resolves to method `x.M` in the
//!    current package, taking the identifier text of `x` as the receiver type.
//!    The variable's real type is unknown, so this often misses.
//!
//! Every other callee shape resolves to nothing. No type inference, interface
//! dispatch or function-value tracking is attempted.

use crate::domain::ast::{Expr, FuncDecl, SourceUnit, TopLevelItem};
use crate::domain::declaration::{PackageIdentity, SymbolKey};
use crate::domain::imports::{last_segment, ImportAliasMap};
use crate::domain::registry::SymbolRegistry;

/// Closed set of callee shapes the resolver distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallShape<'a> {
    BareIdentifier(&'a str),
    AliasedSelector { import_path: &'a str, member: &'a str },
    UnknownSelector { base: &'a str, member: &'a str },
    Other,
}

/// Classify a callee expression.
pub fn classify<'a>(callee: &'a Expr, imports: &'a ImportAliasMap) -> CallShape<'a> {
    match callee {
        Expr::Ident(name) => CallShape::BareIdentifier(name),
        Expr::Selector { operand, field } => match operand.as_ref() {
            Expr::Ident(base) => match imports.resolve(base) {
                Some(import_path) => CallShape::AliasedSelector {
                    import_path,
                    member: field,
                },
                None => CallShape::UnknownSelector { base, member: field },
            },
            _ => CallShape::Other,
        },
        Expr::Call { .. } | Expr::Opaque(_) => CallShape::Other,
    }
}

/// One call site mapped to a candidate callee. The callee key may be absent
/// from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCall {
    pub caller: SymbolKey,
    pub callee: SymbolKey,
}

/// Resolver for the calls of one unit.
pub struct CallResolver<'a> {
    registry: &'a SymbolRegistry,
    package: &'a PackageIdentity,
    imports: &'a ImportAliasMap,
}

impl<'a> CallResolver<'a> {
    pub fn new(
        registry: &'a SymbolRegistry,
        package: &'a PackageIdentity,
        imports: &'a ImportAliasMap,
    ) -> Self {
        Self {
            registry,
            package,
            imports,
        }
    }

    /// Map a callee expression to a candidate key.
    pub fn resolve_callee(&self, callee: &Expr) -> Option<SymbolKey> {
        match classify(callee, self.imports) {
            CallShape::BareIdentifier(name) => Some(SymbolKey::function(self.package, name)),
            CallShape::AliasedSelector {
                import_path,
                member,
            } => {
                let target = self.imported_package(import_path);
                Some(SymbolKey::function(&target, member))
            }
            CallShape::UnknownSelector { base, member } => {
                Some(SymbolKey::method(self.package, base, member))
            }
            CallShape::Other => None,
        }
    }

    /// Resolve every call site inside the callable bodies of `unit`, in
    /// source order. Repeated call sites produce repeated entries.
    pub fn resolve_unit(&self, unit: &SourceUnit) -> Vec<ResolvedCall> {
        let mut out = Vec::new();
        for item in &unit.items {
            match item {
                TopLevelItem::Func(func) => {
                    if let Some(caller) = self.caller_key(func) {
                        for expr in &func.body {
                            self.visit(expr, &caller, &mut out);
                        }
                    }
                }
                // Package-level initializers are not call sites.
                TopLevelItem::Value(_) | TopLevelItem::Type(_) => {}
            }
        }
        out
    }

    fn caller_key(&self, func: &FuncDecl) -> Option<SymbolKey> {
        match &func.receiver {
            Some(receiver) => receiver
                .type_name
                .as_deref()
                .map(|recv| SymbolKey::method(self.package, recv, &func.name)),
            None => Some(SymbolKey::function(self.package, &func.name)),
        }
    }

    fn visit(&self, expr: &Expr, caller: &SymbolKey, out: &mut Vec<ResolvedCall>) {
        match expr {
            Expr::Call { callee, args } => {
                if let Some(target) = self.resolve_callee(callee) {
                    out.push(ResolvedCall {
                        caller: caller.clone(),
                        callee: target,
                    });
                }
                self.visit(callee, caller, out);
                for arg in args {
                    self.visit(arg, caller, out);
                }
            }
            Expr::Selector { operand, .. } => self.visit(operand, caller, out),
            Expr::Opaque(children) => {
                for child in children {
                    self.visit(child, caller, out);
                }
            }
            Expr::Ident(_) => {}
        }
    }

    // The package registered at `path`, or a guess using the last path segment
    // as the short name.
    fn imported_package(&self, path: &str) -> PackageIdentity {
        match self.registry.package_at_path(path) {
            Some(pkg) => pkg.identity.clone(),
            None => PackageIdentity::new(path, last_segment(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::{ImportName, ImportSpec, Receiver, ValueDecl};

    fn package() -> PackageIdentity {
        PackageIdentity::new("p", "p")
    }

    fn func(name: &str, body: Vec<Expr>) -> TopLevelItem {
        TopLevelItem::Func(FuncDecl {
            name: name.to_string(),
            receiver: None,
            line: 1,
            body,
        })
    }

    fn unit(imports: Vec<ImportSpec>, items: Vec<TopLevelItem>) -> SourceUnit {
        SourceUnit {
            package: Some("p".to_string()),
            imports,
            items,
            line_count: 1,
        }
    }

    fn callees(calls: &[ResolvedCall]) -> Vec<String> {
        calls.iter().map(|c| c.callee.to_string()).collect()
    }

    #[test]
    fn test_classify_shapes() {
        let imports = ImportAliasMap::from_imports(&[ImportSpec {
            name: None,
            path: "lib/util".to_string(),
        }]);
        let bare = Expr::ident("f");
        let aliased = Expr::selector(Expr::ident("util"), "Do");
        let unknown = Expr::selector(Expr::ident("x"), "M");
        let chained = Expr::selector(Expr::call(Expr::ident("f"), vec![]), "M");

        assert_eq!(classify(&bare, &imports), CallShape::BareIdentifier("f"));
        assert_eq!(
            classify(&aliased, &imports),
            CallShape::AliasedSelector {
                import_path: "lib/util",
                member: "Do"
            }
        );
        assert_eq!(
            classify(&unknown, &imports),
            CallShape::UnknownSelector { base: "x", member: "M" }
        );
        assert_eq!(classify(&chained, &imports), CallShape::Other);
        assert_eq!(classify(&Expr::Opaque(vec![]), &imports), CallShape::Other);
    }

    #[test]
    fn test_bare_call_resolves_same_package() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::default();
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);
        let unit = unit(vec![], vec![func("A", vec![Expr::call(Expr::ident("B"), vec![])])]);

        let calls = resolver.resolve_unit(&unit);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].caller.to_string(), "p:p:A");
        assert_eq!(calls[0].callee.to_string(), "p:p:B");
    }

    #[test]
    fn test_aliased_selector_targets_import_path() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::from_imports(&[ImportSpec {
            name: Some(ImportName::Alias("u".to_string())),
            path: "lib/util".to_string(),
        }]);
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);
        let callee = Expr::selector(Expr::ident("u"), "Do");

        let key = resolver.resolve_callee(&callee).unwrap();
        assert_eq!(key.package.path, "lib/util");
        assert_eq!(key.to_string(), "lib/util:util:Do");
    }

    #[test]
    fn test_aliased_selector_uses_registered_short_name() {
        let mut registry = SymbolRegistry::new();
        registry.register_package(PackageIdentity::new("lib/v2", "lib"), "lib/v2");
        let imports = ImportAliasMap::from_imports(&[ImportSpec {
            name: None,
            path: "lib/v2".to_string(),
        }]);
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);

        let key = resolver.resolve_callee(&Expr::selector(Expr::ident("v2"), "Open")).unwrap();
        assert_eq!(key.to_string(), "lib/v2:lib:Open");
    }

    #[test]
    fn test_unknown_selector_uses_identifier_text() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::default();
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);

        let key = resolver.resolve_callee(&Expr::selector(Expr::ident("x"), "M")).unwrap();
        assert_eq!(key.to_string(), "p:p:x.M");
    }

    #[test]
    fn test_nested_calls_are_visited() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::default();
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);
        // f(g()).h() and a closure body calling k()
        let body = vec![
            Expr::call(
                Expr::selector(
                    Expr::call(Expr::ident("f"), vec![Expr::call(Expr::ident("g"), vec![])]),
                    "h",
                ),
                vec![],
            ),
            Expr::Opaque(vec![Expr::call(Expr::ident("k"), vec![])]),
        ];
        let unit = unit(vec![], vec![func("A", body)]);

        assert_eq!(
            callees(&resolver.resolve_unit(&unit)),
            vec!["p:p:f", "p:p:g", "p:p:k"]
        );
    }

    #[test]
    fn test_package_level_initializers_are_ignored() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::default();
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);
        let unit = unit(
            vec![],
            vec![
                func("A", vec![]),
                TopLevelItem::Value(ValueDecl {
                    initializers: vec![Expr::call(Expr::ident("setup"), vec![])],
                }),
            ],
        );

        assert!(resolver.resolve_unit(&unit).is_empty());
    }

    #[test]
    fn test_method_caller_key() {
        let registry = SymbolRegistry::new();
        let imports = ImportAliasMap::default();
        let pkg = package();
        let resolver = CallResolver::new(&registry, &pkg, &imports);
        let unit = unit(
            vec![],
            vec![TopLevelItem::Func(FuncDecl {
                name: "Run".to_string(),
                receiver: Some(Receiver {
                    type_name: Some("Server".to_string()),
                }),
                line: 1,
                body: vec![Expr::call(Expr::selector(Expr::ident("s"), "stop"), vec![])],
            })],
        );

        let calls = resolver.resolve_unit(&unit);
        assert_eq!(calls[0].caller.to_string(), "p:p:Server.Run");
        // The receiver variable name is used, not its type.
        assert_eq!(calls[0].callee.to_string(), "p:p:s.stop");
    }
}
