use serde::Serialize;
use std::fmt;

/// Stable arena index of a declaration inside a `SymbolRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub usize);

/// Stable arena index of a package inside a `SymbolRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Function,
    Method,
    Struct,
    Interface,
    /// Named type that is neither a struct nor an interface.
    Type,
}

impl DeclKind {
    pub fn is_callable(&self) -> bool {
        matches!(self, DeclKind::Function | DeclKind::Method)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::Method => "method",
            DeclKind::Struct => "struct",
            DeclKind::Interface => "interface",
            DeclKind::Type => "type",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Package identity: canonical path plus the short name from the `package` clause.
///
/// A directory may hold more than one package (`foo` and `foo_test`), so both
/// parts are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageIdentity {
    pub path: String,
    pub name: String,
}

impl PackageIdentity {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.name)
    }
}

/// Qualified symbol key, rendered as `path:pkg:Name` or `path:pkg:Recv.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolKey {
    pub package: PackageIdentity,
    pub receiver: Option<String>,
    pub name: String,
}

impl SymbolKey {
    pub fn function(package: &PackageIdentity, name: &str) -> Self {
        Self {
            package: package.clone(),
            receiver: None,
            name: name.to_string(),
        }
    }

    pub fn method(package: &PackageIdentity, receiver: &str, name: &str) -> Self {
        Self {
            package: package.clone(),
            receiver: Some(receiver.to_string()),
            name: name.to_string(),
        }
    }

    /// `Name` or `Recv.Name`.
    pub fn local_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{}.{}", recv, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver {
            Some(recv) => write!(f, "{}:{}.{}", self.package, recv, self.name),
            None => write!(f, "{}:{}", self.package, self.name),
        }
    }
}

/// A package known to the registry.
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub id: PackageId,
    pub identity: PackageIdentity,
    /// Directory relative to the analysis root.
    pub dir: String,
    /// Declarations registered for this package, in insertion order.
    pub declarations: Vec<DeclId>,
}

/// One named program element, together with its call edges.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub key: SymbolKey,
    pub kind: DeclKind,
    pub package: PackageId,
    /// Path of the unit that declares it.
    pub file: String,
    pub line: usize,
    pub(crate) calls: Vec<DeclId>,
    pub(crate) called_by: Vec<DeclId>,
    pub(crate) call_sites: usize,
}

impl Declaration {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn receiver(&self) -> Option<&str> {
        self.key.receiver.as_deref()
    }

    /// Callees in discovery order.
    pub fn calls(&self) -> &[DeclId] {
        &self.calls
    }

    /// Callers in discovery order.
    pub fn called_by(&self) -> &[DeclId] {
        &self.called_by
    }

    /// Resolved call expressions targeting this declaration, repeats included.
    pub fn call_sites(&self) -> usize {
        self.call_sites
    }

    /// Display label used by the graph renderers.
    pub fn label(&self) -> String {
        self.key.local_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let pkg = PackageIdentity::new("lib/util", "util");
        assert_eq!(SymbolKey::function(&pkg, "Do").to_string(), "lib/util:util:Do");
        assert_eq!(SymbolKey::method(&pkg, "T", "Do").to_string(), "lib/util:util:T.Do");
    }

    #[test]
    fn test_method_and_function_keys_differ() {
        let pkg = PackageIdentity::new("p", "p");
        assert_ne!(SymbolKey::function(&pkg, "Name"), SymbolKey::method(&pkg, "T", "Name"));
    }

    #[test]
    fn test_same_short_name_different_path() {
        let a = PackageIdentity::new("a/util", "util");
        let b = PackageIdentity::new("b/util", "util");
        assert_ne!(SymbolKey::function(&a, "Do"), SymbolKey::function(&b, "Do"));
    }
}
