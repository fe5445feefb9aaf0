use crate::domain::ast::{ImportName, ImportSpec};
use std::collections::HashMap;

/// Local alias → canonical import path, for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAliasMap {
    aliases: HashMap<String, String>,
}

impl ImportAliasMap {
    /// Build the map from a unit's import specs.
    ///
    /// An explicit alias wins over the last path segment. When two specs bind
    /// the same alias, the later one overwrites the earlier one. Blank and dot
    /// imports bind no alias.
    pub fn from_imports(imports: &[ImportSpec]) -> Self {
        let mut aliases = HashMap::new();
        for spec in imports {
            let alias = match &spec.name {
                Some(ImportName::Alias(alias)) => alias.clone(),
                Some(ImportName::Dot) | Some(ImportName::Blank) => continue,
                None => last_segment(&spec.path).to_string(),
            };
            if alias.is_empty() {
                continue;
            }
            aliases.insert(alias, spec.path.clone());
        }
        Self { aliases }
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Last `/`-separated segment of an import path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: Option<ImportName>, path: &str) -> ImportSpec {
        ImportSpec {
            name,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_default_alias_is_last_segment() {
        let map = ImportAliasMap::from_imports(&[spec(None, "lib/util"), spec(None, "fmt")]);
        assert_eq!(map.resolve("util"), Some("lib/util"));
        assert_eq!(map.resolve("fmt"), Some("fmt"));
        assert_eq!(map.resolve("lib"), None);
    }

    #[test]
    fn test_explicit_alias() {
        let map = ImportAliasMap::from_imports(&[spec(Some(ImportName::Alias("u".into())), "lib/util")]);
        assert_eq!(map.resolve("u"), Some("lib/util"));
        assert_eq!(map.resolve("util"), None);
    }

    #[test]
    fn test_later_duplicate_alias_wins() {
        let map = ImportAliasMap::from_imports(&[
            spec(None, "a/log"),
            spec(Some(ImportName::Alias("log".into())), "b/logging"),
        ]);
        assert_eq!(map.resolve("log"), Some("b/logging"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_blank_and_dot_imports_bind_nothing() {
        let map = ImportAliasMap::from_imports(&[
            spec(Some(ImportName::Blank), "embed"),
            spec(Some(ImportName::Dot), "lib/dsl"),
        ]);
        assert!(map.is_empty());
    }
}
