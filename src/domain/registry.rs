use crate::domain::declaration::{
    DeclId, DeclKind, Declaration, Package, PackageId, PackageIdentity, SymbolKey,
};
use std::collections::HashMap;

/// A declaration as produced by the extractor, before it gets an arena slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeclaration {
    pub name: String,
    pub receiver: Option<String>,
    pub kind: DeclKind,
    pub file: String,
    pub line: usize,
}

/// Result of a registry insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(DeclId),
    /// The key was already taken; carries the id of the declaration that keeps it.
    Duplicate(DeclId),
}

impl InsertOutcome {
    pub fn id(&self) -> DeclId {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::Duplicate(id) => *id,
        }
    }
}

/// Symbol table for one analysis run.
///
/// Declarations live in an arena and are addressed by `DeclId`; keys map into
/// the arena. Insertion is first-seen-wins.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    packages: Vec<Package>,
    package_index: HashMap<PackageIdentity, PackageId>,
    // First package registered under each path.
    packages_by_path: HashMap<String, PackageId>,
    declarations: Vec<Declaration>,
    index: HashMap<SymbolKey, DeclId>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the package with this identity, creating it on first sight.
    pub fn register_package(&mut self, identity: PackageIdentity, dir: &str) -> PackageId {
        if let Some(id) = self.package_index.get(&identity) {
            return *id;
        }
        let id = PackageId(self.packages.len());
        // An external test package (`foo_test`) never owns its directory's path
        // while a regular package shares it.
        let claims_path = match self.packages_by_path.get(&identity.path) {
            None => true,
            Some(owner) => {
                is_external_test(&self.packages[owner.0].identity)
                    && !is_external_test(&identity)
            }
        };
        if claims_path {
            self.packages_by_path.insert(identity.path.clone(), id);
        }
        self.package_index.insert(identity.clone(), id);
        self.packages.push(Package {
            id,
            identity,
            dir: dir.to_string(),
            declarations: Vec::new(),
        });
        id
    }

    /// Insert a declaration into `package` unless its key is already taken.
    pub fn insert(&mut self, package: PackageId, decl: NewDeclaration) -> InsertOutcome {
        let identity = &self.packages[package.0].identity;
        let key = SymbolKey {
            package: identity.clone(),
            receiver: decl.receiver,
            name: decl.name,
        };
        if let Some(existing) = self.index.get(&key) {
            return InsertOutcome::Duplicate(*existing);
        }

        let id = DeclId(self.declarations.len());
        self.index.insert(key.clone(), id);
        self.declarations.push(Declaration {
            id,
            key,
            kind: decl.kind,
            package,
            file: decl.file,
            line: decl.line,
            calls: Vec::new(),
            called_by: Vec::new(),
            call_sites: 0,
        });
        self.packages[package.0].declarations.push(id);
        InsertOutcome::Inserted(id)
    }

    /// Arena access. Ids are only ever handed out by this registry.
    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.0]
    }

    pub(crate) fn declaration_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.declarations[id.0]
    }

    pub fn lookup(&self, key: &SymbolKey) -> Option<&Declaration> {
        self.lookup_id(key).map(|id| self.declaration(id))
    }

    pub fn lookup_id(&self, key: &SymbolKey) -> Option<DeclId> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &SymbolKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    /// Package owning a canonical path: the first regular package registered
    /// there, else the first external test package.
    pub fn package_at_path(&self, path: &str) -> Option<&Package> {
        self.packages_by_path.get(path).map(|id| self.package(*id))
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn is_external_test(identity: &PackageIdentity) -> bool {
    identity.name.ends_with("_test")
}
