//! Go parsing on top of tree-sitter.
//!
//! The concrete syntax tree is lowered into the owned `SourceUnit` model right
//! away, so nothing downstream borrows from the tree.

use crate::domain::ast::{
    Expr, FuncDecl, ImportName, ImportSpec, Receiver, SourceUnit, TopLevelItem, TypeDecl,
    TypeShape, ValueDecl,
};
use crate::domain::error::ParseFailure;
use crate::ports::UnitParser;
use tree_sitter::{Language, Node, Parser};

pub struct GoParser;

impl UnitParser for GoParser {
    fn parse(&self, _path: &str, source: &str) -> Result<SourceUnit, ParseFailure> {
        parse_go(source)
    }
}

/// Parse one Go source file. Any syntax error rejects the whole unit.
pub fn parse_go(source: &str) -> Result<SourceUnit, ParseFailure> {
    let language: Language = tree_sitter_go::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseFailure::Parser(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseFailure::Parser("parse did not complete".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error(root).unwrap_or((1, 1));
        return Err(ParseFailure::Syntax { line, column });
    }

    let mut unit = SourceUnit {
        line_count: source.split('\n').count(),
        ..SourceUnit::default()
    };
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_clause" => unit.package = package_name(child, source),
            "import_declaration" => collect_imports(child, source, &mut unit.imports),
            "function_declaration" => {
                if let Some(func) = lower_function(child, source, None) {
                    unit.items.push(TopLevelItem::Func(func));
                }
            }
            "method_declaration" => {
                let receiver = child
                    .child_by_field_name("receiver")
                    .map(|recv| lower_receiver(recv, source));
                if let Some(func) = lower_function(child, source, receiver) {
                    unit.items.push(TopLevelItem::Func(func));
                }
            }
            "type_declaration" => lower_type_declaration(child, source, &mut unit.items),
            "var_declaration" | "const_declaration" => {
                unit.items.push(TopLevelItem::Value(ValueDecl {
                    initializers: collect_calls(child, source),
                }));
            }
            _ => {}
        }
    }
    Ok(unit)
}

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn first_error(node: Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn package_name(clause: Node, source: &str) -> Option<String> {
    let mut cursor = clause.walk();
    let found = clause
        .named_children(&mut cursor)
        .find(|child| child.kind() == "package_identifier")
        .map(|ident| text(ident, source).to_string());
    found
}

fn collect_imports(node: Node, source: &str, out: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(spec) = lower_import_spec(child, source) {
                    out.push(spec);
                }
            }
            "import_spec_list" => collect_imports(child, source, out),
            _ => {}
        }
    }
}

fn lower_import_spec(node: Node, source: &str) -> Option<ImportSpec> {
    let path = node.child_by_field_name("path")?;
    let path = text(path, source).trim_matches(|c| c == '"' || c == '`').to_string();
    if path.is_empty() {
        return None;
    }
    let name = node.child_by_field_name("name").map(|name| match name.kind() {
        "dot" => ImportName::Dot,
        "blank_identifier" => ImportName::Blank,
        _ => ImportName::Alias(text(name, source).to_string()),
    });
    Some(ImportSpec { name, path })
}

fn lower_function(node: Node, source: &str, receiver: Option<Receiver>) -> Option<FuncDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let body = node
        .child_by_field_name("body")
        .map(|body| collect_calls(body, source))
        .unwrap_or_default();
    Some(FuncDecl {
        name,
        receiver,
        line: line_of(node),
        body,
    })
}

// `(s *Server)`, `(Server)`, `(s *Set[T])`
fn lower_receiver(params: Node, source: &str) -> Receiver {
    let mut cursor = params.walk();
    let ty = params
        .named_children(&mut cursor)
        .find(|child| child.kind() == "parameter_declaration")
        .and_then(|param| param.child_by_field_name("type"));
    Receiver {
        type_name: ty.and_then(|ty| base_type_name(ty, source)),
    }
}

fn base_type_name(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(text(node, source).to_string()),
        "pointer_type" | "parenthesized_type" => base_type_name(node.named_child(0)?, source),
        "generic_type" => base_type_name(node.child_by_field_name("type")?, source),
        _ => None,
    }
}

fn lower_type_declaration(node: Node, source: &str, out: &mut Vec<TopLevelItem>) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
            continue;
        }
        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };
        let shape = match spec.child_by_field_name("type").map(|ty| ty.kind()) {
            _ if spec.kind() == "type_alias" => TypeShape::Other,
            Some("struct_type") => TypeShape::Struct,
            Some("interface_type") => TypeShape::Interface,
            _ => TypeShape::Other,
        };
        out.push(TopLevelItem::Type(TypeDecl {
            name: text(name, source).to_string(),
            shape,
            line: line_of(spec),
        }));
    }
}

/// Outermost call expressions below `node`, each lowered with its nested calls.
fn collect_calls(node: Node, source: &str) -> Vec<Expr> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "call_expression" {
            out.push(lower_expr(child, source));
        } else {
            out.extend(collect_calls(child, source));
        }
    }
    out
}

fn lower_expr(node: Node, source: &str) -> Expr {
    match node.kind() {
        "identifier" => Expr::Ident(text(node, source).to_string()),
        "selector_expression" => {
            match (node.child_by_field_name("operand"), node.child_by_field_name("field")) {
                (Some(operand), Some(field)) => Expr::Selector {
                    operand: Box::new(lower_expr(operand, source)),
                    field: text(field, source).to_string(),
                },
                _ => Expr::Opaque(collect_calls(node, source)),
            }
        }
        "call_expression" => match node.child_by_field_name("function") {
            Some(function) => {
                let mut args = Vec::new();
                if let Some(type_args) = node.child_by_field_name("type_arguments") {
                    args.extend(collect_calls(type_args, source));
                }
                if let Some(arguments) = node.child_by_field_name("arguments") {
                    args.extend(collect_calls(arguments, source));
                }
                Expr::Call {
                    callee: Box::new(lower_expr(function, source)),
                    args,
                }
            }
            None => Expr::Opaque(collect_calls(node, source)),
        },
        // Parenthesized callees, index expressions, literals, func literals...
        _ => Expr::Opaque(collect_calls(node, source)),
    }
}
