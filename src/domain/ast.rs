// Syntax model for gomap.
// These types represent a parsed Go compilation unit in a form suitable for static analysis.
// Only the parts the extractor and the call resolver look at are kept.

/// One parsed `.go` file.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    /// Short package name from the `package` clause. `None` when the clause is missing.
    pub package: Option<String>,
    pub imports: Vec<ImportSpec>,
    pub items: Vec<TopLevelItem>,
    /// Number of `\n`-separated segments in the source text.
    pub line_count: usize,
}

/// A single import spec: `import u "lib/util"` or `import "fmt"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    /// Import path with the quotes stripped.
    pub path: String,
}

/// The explicit local name on an import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    Alias(String),
    /// `import . "pkg"`
    Dot,
    /// `import _ "pkg"`
    Blank,
}

/// Top-level declarations of a unit.
#[derive(Debug, Clone)]
pub enum TopLevelItem {
    Func(FuncDecl),
    Type(TypeDecl),
    /// Package-level `var`/`const`; only the calls in its initializers are kept.
    Value(ValueDecl),
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Call-bearing expressions of the body, in source order.
    pub body: Vec<Expr>,
}

/// A method receiver, e.g. `(s *Server)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Base type name with pointer, parenthesis and type arguments stripped.
    /// `None` when the receiver type has no recognizable base name.
    pub type_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub shape: TypeShape,
    pub line: usize,
}

/// What a named type is defined as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Struct,
    Interface,
    /// Any other definition, including `type A = B` aliases.
    Other,
}

#[derive(Debug, Clone, Default)]
pub struct ValueDecl {
    pub initializers: Vec<Expr>,
}

/// Expression tree reduced to what call resolution needs.
///
/// Everything that is not an identifier, a selector or a call collapses into
/// `Opaque`, which only remembers the calls nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Selector { operand: Box<Expr>, field: String },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Opaque(Vec<Expr>),
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    pub fn selector(operand: Expr, field: &str) -> Self {
        Expr::Selector {
            operand: Box::new(operand),
            field: field.to_string(),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

impl SourceUnit {
    /// Iterate over the function and method declarations of this unit.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.items.iter().filter_map(|item| match item {
            TopLevelItem::Func(f) => Some(f),
            _ => None,
        })
    }
}
