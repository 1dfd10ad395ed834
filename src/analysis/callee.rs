//! Callee dependency resolution.
//!
//! Before a call statement may move, the planner needs the transitive set of
//! free names the invoked code depends on. Resolution is deliberately
//! fail-closed: `None` means "cannot prove what this call touches", and the
//! caller must treat the statement as unmovable. A `visited` set breaks
//! self- and mutually-recursive callee chains; a revisited name contributes
//! no further dependencies.

use std::collections::BTreeSet;

use crate::parser::ast::*;
use crate::span::Spanned;
use super::names::{function_captures, function_literal, mutated_names, pattern_bound_names};
use super::walker::{FnBody, FunctionParts};

/// Resolve the free names the callee of a call at `call_index` depends on.
pub fn resolve_callee_dependencies(
    stmts: &[Spanned<Stmt>],
    callee: &Spanned<Expr>,
    call_index: usize,
    visited: &mut BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    match callee.node.unwrapped() {
        // Immediately-invoked literal: the body is right there.
        Expr::Function(_) | Expr::Arrow(_) => {
            let parts = function_literal(callee)?;
            function_dependencies(stmts, &parts, call_index, visited)
        }
        Expr::Ident(name) => resolve_ident_callee(stmts, name, call_index, visited),
        Expr::Member { .. } => resolve_member_callee(stmts, callee, call_index, visited),
        _ => None,
    }
}

fn resolve_ident_callee(
    stmts: &[Spanned<Stmt>],
    name: &str,
    call_index: usize,
    visited: &mut BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    if mutated_before(stmts, name, call_index) {
        return None;
    }
    if !visited.insert(name.to_string()) {
        return Some(BTreeSet::new());
    }
    match find_function_binding(stmts, name, call_index)? {
        Binding::Function(parts) => function_dependencies(stmts, &parts, call_index, visited),
        Binding::Other => None,
    }
}

/// Captures of a resolved function, expanded through the local functions it
/// calls in turn.
fn function_dependencies(
    stmts: &[Spanned<Stmt>],
    parts: &FunctionParts<'_>,
    call_index: usize,
    visited: &mut BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    let captures = function_captures(parts);
    let mut deps = captures.clone();
    for name in &captures {
        match find_function_binding(stmts, name, call_index) {
            Some(Binding::Function(inner)) => {
                if mutated_before(stmts, name, call_index) {
                    return None;
                }
                if visited.insert(name.clone()) {
                    deps.extend(function_dependencies(stmts, &inner, call_index, visited)?);
                }
            }
            // A plain data dependency, or a name from an enclosing scope.
            Some(Binding::Other) | None => {}
        }
    }
    Some(deps)
}

enum Binding<'a> {
    Function(FunctionParts<'a>),
    Other,
}

/// Backward scan for the declaration a name resolves to at `before`. The
/// last non-empty declaration wins, so redeclarations behave like the source
/// would at run time; an uninitialized `let f;` keeps scanning.
fn find_function_binding<'a>(
    stmts: &'a [Spanned<Stmt>],
    name: &str,
    before: usize,
) -> Option<Binding<'a>> {
    let limit = before.min(stmts.len());
    for stmt in stmts[..limit].iter().rev() {
        match &stmt.node {
            Stmt::FnDecl(decl) if decl.name.node == name => {
                return Some(Binding::Function(FunctionParts {
                    name: Some(&decl.name.node),
                    params: &decl.params,
                    body: FnBody::Block(&decl.body),
                    is_arrow: false,
                }));
            }
            Stmt::ClassDecl(class) if class.name.node == name => {
                return Some(Binding::Other);
            }
            Stmt::VarDecl { declarators, .. } => {
                for declarator in declarators {
                    if let Pattern::Ident(bound) = &declarator.pattern.node {
                        if bound != name {
                            continue;
                        }
                        let Some(init) = &declarator.init else {
                            // Empty declaration: the value comes from
                            // somewhere later, keep scanning backward.
                            continue;
                        };
                        return match function_literal(init) {
                            Some(parts) => Some(Binding::Function(parts)),
                            None => Some(Binding::Other),
                        };
                    }
                    let mut bound = BTreeSet::new();
                    pattern_bound_names(&declarator.pattern.node, &mut bound);
                    if bound.contains(name) {
                        // Destructured binding: no resolvable literal.
                        return Some(Binding::Other);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn mutated_before(stmts: &[Spanned<Stmt>], name: &str, before: usize) -> bool {
    let limit = before.min(stmts.len());
    stmts[..limit]
        .iter()
        .any(|stmt| mutated_names(stmt).contains(name))
}

/// What a member-callee root resolved to.
enum ResolvedValue<'a> {
    Object(&'a [ObjectProp]),
    Class(&'a ClassDecl),
}

fn resolve_member_callee(
    stmts: &[Spanned<Stmt>],
    callee: &Spanned<Expr>,
    call_index: usize,
    visited: &mut BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    let (root, path) = member_path(callee)?;
    if mutated_before(stmts, root, call_index) {
        return None;
    }
    let mut value = resolve_root_value(stmts, root, call_index)?;
    let (method, prefix) = path.split_last()?;
    for step in prefix {
        value = match value {
            ResolvedValue::Object(props) => {
                let inner = object_property(props, step)?;
                match inner.node.unwrapped() {
                    Expr::Object(props) => ResolvedValue::Object(props),
                    _ => return None,
                }
            }
            // Nested paths through classes are not modeled.
            ResolvedValue::Class(_) => return None,
        };
    }
    let parts = match value {
        ResolvedValue::Object(props) => function_literal(object_property(props, method)?)?,
        ResolvedValue::Class(class) => {
            let found = class.methods.iter().find(|m| m.key.node == *method)?;
            function_literal(&found.value)?
        }
    };
    function_dependencies(stmts, &parts, call_index, visited)
}

/// Flatten `a.b.c` into a root identifier and its property path. Computed
/// properties and non-identifier roots fail.
fn member_path<'a>(callee: &'a Spanned<Expr>) -> Option<(&'a str, Vec<&'a str>)> {
    let mut path = Vec::new();
    let mut current = callee.node.unwrapped();
    loop {
        match current {
            Expr::Member { object, property, .. } => {
                let MemberProp::Ident(name) = property else {
                    return None;
                };
                path.push(name.as_str());
                current = object.node.unwrapped();
            }
            Expr::Ident(root) => {
                path.reverse();
                return Some((root.as_str(), path));
            }
            _ => return None,
        }
    }
}

/// Resolve the literal value behind a root identifier, following simple
/// alias chains and `new` of an in-scope class. A root that is declared
/// without a resolvable literal — or never declared locally — fails closed.
fn resolve_root_value<'a>(
    stmts: &'a [Spanned<Stmt>],
    name: &str,
    before: usize,
) -> Option<ResolvedValue<'a>> {
    let limit = before.min(stmts.len());
    for (index, stmt) in stmts[..limit].iter().enumerate().rev() {
        match &stmt.node {
            Stmt::ClassDecl(class) if class.name.node == name => {
                return Some(ResolvedValue::Class(class));
            }
            Stmt::FnDecl(decl) if decl.name.node == name => {
                return None;
            }
            Stmt::VarDecl { declarators, .. } => {
                for declarator in declarators {
                    if let Pattern::Ident(bound) = &declarator.pattern.node {
                        if bound != name {
                            continue;
                        }
                        let Some(init) = &declarator.init else {
                            continue;
                        };
                        return match init.node.unwrapped() {
                            Expr::Object(props) => Some(ResolvedValue::Object(props)),
                            Expr::Ident(alias) => {
                                if mutated_before(stmts, alias, index) {
                                    None
                                } else {
                                    resolve_root_value(stmts, alias, index)
                                }
                            }
                            Expr::New { callee, .. } => match callee.node.unwrapped() {
                                Expr::Ident(class_name) => {
                                    match resolve_root_value(stmts, class_name, index)? {
                                        class @ ResolvedValue::Class(_) => Some(class),
                                        ResolvedValue::Object(_) => None,
                                    }
                                }
                                _ => None,
                            },
                            _ => None,
                        };
                    }
                    let mut bound = BTreeSet::new();
                    pattern_bound_names(&declarator.pattern.node, &mut bound);
                    if bound.contains(name) {
                        return None;
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn object_property<'a>(props: &'a [ObjectProp], name: &str) -> Option<&'a Spanned<Expr>> {
    props.iter().find_map(|prop| match prop {
        ObjectProp::Entry { key, value } if key.static_name() == Some(name) => Some(value),
        _ => None,
    })
}
