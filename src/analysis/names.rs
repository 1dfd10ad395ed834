//! Free-name, declared-name and mutated-name collection.
//!
//! All three collectors are flow-insensitive and purely syntactic. Name sets
//! are `BTreeSet`s so iteration order (and therefore diagnostic text) is
//! deterministic.

use std::collections::BTreeSet;

use crate::parser::ast::*;
use crate::span::Spanned;
use super::walker::{traverse, Flow, FnBody, FunctionParts, NodeRef, NodeVisitor};

/// Pseudo-name recorded when an expression reads `this`. No local binding can
/// ever declare it, and the planners treat it as an unmovable external
/// dependency.
pub const THIS_NAME: &str = "this";
/// Pseudo-name recorded for `super`, same treatment as [`THIS_NAME`].
pub const SUPER_NAME: &str = "super";

/// Names read by `node` that are not bound inside it.
///
/// With `cross_function_boundaries`, nested function and arrow literals
/// contribute their captured names (reads not bound by their own params or
/// locals), so the result covers everything an inline callback will
/// eventually close over. Without it, nested functions are skipped — except
/// immediately-invoked literals, whose bodies run right away and are treated
/// as inlined.
pub fn free_names(node: NodeRef<'_>, cross_function_boundaries: bool) -> BTreeSet<String> {
    // A function literal itself contributes exactly its captures.
    if let Some(parts) = node.as_function() {
        if cross_function_boundaries {
            return function_captures(&parts);
        }
        return BTreeSet::new();
    }
    let mut collector = FreeNames { cross: cross_function_boundaries, out: BTreeSet::new() };
    traverse(node, &mut collector);
    collector.out
}

struct FreeNames {
    cross: bool,
    out: BTreeSet<String>,
}

impl<'a> NodeVisitor<'a> for FreeNames {
    fn veto_descent(&mut self, child: NodeRef<'a>) -> bool {
        // Never walk into nested functions; `on_skip` harvests what they
        // close over when the caller asked for it.
        child.as_function().is_some()
    }

    fn on_skip(&mut self, child: NodeRef<'a>) {
        if self.cross {
            if let Some(parts) = child.as_function() {
                self.out.extend(function_captures(&parts));
            }
        }
    }

    fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
        if let NodeRef::Expr(expr) = node {
            match &expr.node {
                Expr::Ident(name) => {
                    self.out.insert(name.clone());
                }
                Expr::This => {
                    self.out.insert(THIS_NAME.to_string());
                }
                Expr::Super => {
                    self.out.insert(SUPER_NAME.to_string());
                }
                Expr::Call { callee, .. } if !self.cross => {
                    // An IIFE body runs as part of this statement even though
                    // closures are otherwise skipped in this mode.
                    if let Some(parts) = function_literal(callee) {
                        self.out.extend(function_captures(&parts));
                    }
                }
                _ => {}
            }
        }
        Flow::Continue
    }
}

/// The callee as a function literal, looking through transparent wrappers.
pub fn function_literal<'a>(callee: &'a Spanned<Expr>) -> Option<FunctionParts<'a>> {
    match callee.node.unwrapped() {
        Expr::Function(func) => Some(FunctionParts {
            name: func.name.as_ref().map(|n| n.node.as_str()),
            params: &func.params,
            body: FnBody::Block(&func.body),
            is_arrow: false,
        }),
        Expr::Arrow(arrow) => Some(FunctionParts {
            name: None,
            params: &arrow.params,
            body: match &arrow.body {
                ArrowBody::Block(block) => FnBody::Block(block),
                ArrowBody::Expr(expr) => FnBody::Expr(expr),
            },
            is_arrow: true,
        }),
        _ => None,
    }
}

/// Captured variables of a function: reads not bound by its own parameters,
/// its own name, or any declaration in its body. Locals are tracked at
/// function granularity; a name declared in any nested non-function block
/// counts as local. Arrows keep `this`/`super` captures, plain functions
/// rebind them.
pub fn function_captures(parts: &FunctionParts<'_>) -> BTreeSet<String> {
    let mut reads = BTreeSet::new();
    for param in parts.params {
        // Parameter default values are evaluated on call.
        reads.extend(free_names(NodeRef::Pat(param), true));
    }
    match parts.body {
        FnBody::Block(block) => {
            for stmt in &block.node.stmts {
                reads.extend(free_names(NodeRef::Stmt(stmt), true));
            }
        }
        FnBody::Expr(expr) => reads.extend(free_names(NodeRef::Expr(expr), true)),
    }

    let mut bound = BTreeSet::new();
    for param in parts.params {
        pattern_bound_names(&param.node, &mut bound);
    }
    if let Some(name) = parts.name {
        bound.insert(name.to_string());
    }
    if let FnBody::Block(block) = parts.body {
        hoisted_locals(&block.node.stmts, &mut bound);
    }
    if !parts.is_arrow {
        bound.insert(THIS_NAME.to_string());
        bound.insert(SUPER_NAME.to_string());
    }

    reads.retain(|name| !bound.contains(name));
    reads
}

/// Names bound by a pattern (declaration targets only, no defaults).
pub fn pattern_bound_names(pattern: &Pattern, out: &mut BTreeSet<String>) {
    match pattern {
        Pattern::Ident(name) => {
            out.insert(name.clone());
        }
        Pattern::Array(elements) => {
            for element in elements.iter().flatten() {
                pattern_bound_names(&element.node, out);
            }
        }
        Pattern::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatternProp::KeyValue { value, .. } => {
                        pattern_bound_names(&value.node, out);
                    }
                    ObjectPatternProp::Rest(inner) => pattern_bound_names(&inner.node, out),
                }
            }
        }
        Pattern::Default { inner, .. } => pattern_bound_names(&inner.node, out),
        Pattern::Rest(inner) => pattern_bound_names(&inner.node, out),
    }
}

/// Bindings introduced directly by this statement: variable, function and
/// class declarations, plus catch parameters.
pub fn declared_names(stmt: &Spanned<Stmt>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    match &stmt.node {
        Stmt::VarDecl { declarators, .. } => {
            for declarator in declarators {
                pattern_bound_names(&declarator.pattern.node, &mut out);
            }
        }
        Stmt::FnDecl(decl) => {
            out.insert(decl.name.node.clone());
        }
        Stmt::ClassDecl(class) => {
            out.insert(class.name.node.clone());
        }
        Stmt::Try { handler, .. } => {
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    pattern_bound_names(&param.node, &mut out);
                }
            }
        }
        _ => {}
    }
    out
}

/// All names a function body declares anywhere outside nested functions.
pub fn hoisted_locals(stmts: &[Spanned<Stmt>], out: &mut BTreeSet<String>) {
    for stmt in stmts {
        hoisted_locals_stmt(stmt, out);
    }
}

fn hoisted_locals_stmt(stmt: &Spanned<Stmt>, out: &mut BTreeSet<String>) {
    out.extend(declared_names(stmt));
    match &stmt.node {
        Stmt::Block(block) => hoisted_locals(&block.stmts, out),
        Stmt::If { consequent, alternate, .. } => {
            hoisted_locals_stmt(consequent, out);
            if let Some(alternate) = alternate {
                hoisted_locals_stmt(alternate, out);
            }
        }
        Stmt::While { body, .. } => hoisted_locals_stmt(body, out),
        Stmt::ForOf { pattern, body, .. } => {
            pattern_bound_names(&pattern.node, out);
            hoisted_locals_stmt(body, out);
        }
        Stmt::Try { block, handler, finalizer } => {
            hoisted_locals(&block.node.stmts, out);
            if let Some(handler) = handler {
                hoisted_locals(&handler.body.node.stmts, out);
            }
            if let Some(finalizer) = finalizer {
                hoisted_locals(&finalizer.node.stmts, out);
            }
        }
        _ => {}
    }
}

/// Root identifiers a statement assigns to or updates, resolved through
/// member chains (`a.b.c = 1` mutates `a`; `this.x = 1` mutates the `this`
/// pseudo-name). Nested closures are skipped, immediately-invoked ones are
/// not.
pub fn mutated_names(stmt: &Spanned<Stmt>) -> BTreeSet<String> {
    // Declaring a function mutates nothing; its body runs later.
    if NodeRef::Stmt(stmt).as_function().is_some() {
        return BTreeSet::new();
    }
    let mut collector = MutatedNames { out: BTreeSet::new() };
    traverse(NodeRef::Stmt(stmt), &mut collector);
    collector.out
}

struct MutatedNames {
    out: BTreeSet<String>,
}

impl<'a> NodeVisitor<'a> for MutatedNames {
    fn veto_descent(&mut self, child: NodeRef<'a>) -> bool {
        child.as_function().is_some()
    }

    fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
        if let NodeRef::Expr(expr) = node {
            match &expr.node {
                Expr::Assign { target, .. } | Expr::Update { target, .. } => {
                    assignment_roots(&target.node, &mut self.out);
                }
                Expr::Call { callee, .. } => {
                    if let Some(parts) = function_literal(callee) {
                        let mut detour = Vec::new();
                        match parts.body {
                            FnBody::Block(block) => {
                                for inner in &block.node.stmts {
                                    detour.push(NodeRef::Stmt(inner));
                                }
                            }
                            FnBody::Expr(inner) => detour.push(NodeRef::Expr(inner)),
                        }
                        return Flow::Detour(detour);
                    }
                }
                _ => {}
            }
        }
        Flow::Continue
    }
}

fn assignment_roots(target: &Expr, out: &mut BTreeSet<String>) {
    match target.unwrapped() {
        Expr::Ident(name) => {
            out.insert(name.clone());
        }
        Expr::Member { object, .. } => assignment_roots(&object.node, out),
        Expr::This => {
            out.insert(THIS_NAME.to_string());
        }
        Expr::Super => {
            out.insert(SUPER_NAME.to_string());
        }
        // Destructuring assignment targets.
        Expr::Array(elements) => {
            for element in elements {
                match element {
                    ArrayElem::Item(inner) | ArrayElem::Spread(inner) => {
                        assignment_roots(&inner.node, out);
                    }
                    ArrayElem::Hole => {}
                }
            }
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    ObjectProp::Entry { value, .. } => assignment_roots(&value.node, out),
                    ObjectProp::Spread(inner) => assignment_roots(&inner.node, out),
                }
            }
        }
        Expr::Assign { target, .. } => assignment_roots(&target.node, out),
        _ => {}
    }
}

pub fn references_any(stmt: &Spanned<Stmt>, names: &BTreeSet<String>) -> bool {
    if names.is_empty() {
        return false;
    }
    !free_names(NodeRef::Stmt(stmt), true).is_disjoint(names)
}

pub fn declares_any(stmt: &Spanned<Stmt>, names: &BTreeSet<String>) -> bool {
    if names.is_empty() {
        return false;
    }
    !declared_names(stmt).is_disjoint(names)
}

pub fn mutates_any(stmt: &Spanned<Stmt>, names: &BTreeSet<String>) -> bool {
    if names.is_empty() {
        return false;
    }
    !mutated_names(stmt).is_disjoint(names)
}
