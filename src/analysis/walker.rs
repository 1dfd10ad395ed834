//! Iterative syntax-tree traversal.
//!
//! The analysis never recurses over the tree directly: `traverse` drives an
//! explicit work stack so arbitrarily deep fixtures cannot overflow the call
//! stack. Callers hook into the walk with a visitor:
//!
//! - `visit` runs for every reached node and can prune its children
//!   (`Flow::Skip`) or push extra nodes that take priority over the normal
//!   children (`Flow::Detour`);
//! - `veto_descent` is consulted before a child is pushed, and `on_skip`
//!   receives every vetoed child so callers can still harvest information
//!   from subtrees they refuse to enter (nested closures, typically).
//!
//! `push_children` enumerates only the *evaluated* parts of a node: binding
//! identifiers in patterns and non-computed member/property keys are not
//! reads, so they are simply not children.

use crate::parser::ast::*;
use crate::span::Spanned;

/// Borrowed reference to any tree node the analysis walks.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Stmt(&'a Spanned<Stmt>),
    Expr(&'a Spanned<Expr>),
    Pat(&'a Spanned<Pattern>),
}

/// A function-like node, viewed uniformly.
#[derive(Debug, Clone, Copy)]
pub struct FunctionParts<'a> {
    pub name: Option<&'a str>,
    pub params: &'a [Spanned<Pattern>],
    pub body: FnBody<'a>,
    pub is_arrow: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum FnBody<'a> {
    Block(&'a Spanned<Block>),
    Expr(&'a Spanned<Expr>),
}

impl<'a> NodeRef<'a> {
    /// View this node as a function boundary, if it is one.
    pub fn as_function(&self) -> Option<FunctionParts<'a>> {
        match self {
            NodeRef::Stmt(stmt) => match &stmt.node {
                Stmt::FnDecl(decl) => Some(FunctionParts {
                    name: Some(&decl.name.node),
                    params: &decl.params,
                    body: FnBody::Block(&decl.body),
                    is_arrow: false,
                }),
                _ => None,
            },
            NodeRef::Expr(expr) => match &expr.node {
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
            },
            NodeRef::Pat(_) => None,
        }
    }
}

/// What the visitor wants done after seeing a node.
pub enum Flow<'a> {
    Continue,
    /// Do not descend into this node's children.
    Skip,
    /// Descend, but examine these nodes first.
    Detour(Vec<NodeRef<'a>>),
}

pub trait NodeVisitor<'a> {
    fn visit(&mut self, _node: NodeRef<'a>) -> Flow<'a> {
        Flow::Continue
    }

    /// Return true to refuse descending into `child`.
    fn veto_descent(&mut self, _child: NodeRef<'a>) -> bool {
        false
    }

    /// Called with every child refused by `veto_descent`.
    fn on_skip(&mut self, _child: NodeRef<'a>) {}
}

/// Depth-first walk from `root`, visiting each node exactly once.
pub fn traverse<'a, V: NodeVisitor<'a>>(root: NodeRef<'a>, visitor: &mut V) {
    let mut stack = vec![root];
    let mut children = Vec::new();
    while let Some(node) = stack.pop() {
        let flow = visitor.visit(node);
        if matches!(flow, Flow::Skip) {
            continue;
        }
        children.clear();
        push_children(node, &mut children);
        for child in children.drain(..).rev() {
            if visitor.veto_descent(child) {
                visitor.on_skip(child);
            } else {
                stack.push(child);
            }
        }
        if let Flow::Detour(extra) = flow {
            for node in extra.into_iter().rev() {
                stack.push(node);
            }
        }
    }
}

/// Append the evaluated children of `node`, in source order.
pub fn push_children<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    match node {
        NodeRef::Stmt(stmt) => push_stmt_children(stmt, out),
        NodeRef::Expr(expr) => push_expr_children(expr, out),
        NodeRef::Pat(pattern) => push_pattern_children(pattern, out),
    }
}

fn push_stmt_children<'a>(stmt: &'a Spanned<Stmt>, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.node {
        Stmt::VarDecl { declarators, .. } => {
            for declarator in declarators {
                out.push(NodeRef::Pat(&declarator.pattern));
                if let Some(init) = &declarator.init {
                    out.push(NodeRef::Expr(init));
                }
            }
        }
        Stmt::FnDecl(decl) => {
            for param in &decl.params {
                out.push(NodeRef::Pat(param));
            }
            for inner in &decl.body.node.stmts {
                out.push(NodeRef::Stmt(inner));
            }
        }
        Stmt::ClassDecl(class) => {
            if let Some(parent) = &class.parent {
                out.push(NodeRef::Expr(parent));
            }
            for method in &class.methods {
                out.push(NodeRef::Expr(&method.value));
            }
        }
        Stmt::If { test, consequent, alternate } => {
            out.push(NodeRef::Expr(test));
            out.push(NodeRef::Stmt(consequent));
            if let Some(alternate) = alternate {
                out.push(NodeRef::Stmt(alternate));
            }
        }
        Stmt::Block(block) => {
            for inner in &block.stmts {
                out.push(NodeRef::Stmt(inner));
            }
        }
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                out.push(NodeRef::Expr(arg));
            }
        }
        Stmt::Throw(arg) => out.push(NodeRef::Expr(arg)),
        Stmt::While { test, body } => {
            out.push(NodeRef::Expr(test));
            out.push(NodeRef::Stmt(body));
        }
        Stmt::ForOf { pattern, iterable, body, .. } => {
            out.push(NodeRef::Pat(pattern));
            out.push(NodeRef::Expr(iterable));
            out.push(NodeRef::Stmt(body));
        }
        Stmt::Try { block, handler, finalizer } => {
            for inner in &block.node.stmts {
                out.push(NodeRef::Stmt(inner));
            }
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    out.push(NodeRef::Pat(param));
                }
                for inner in &handler.body.node.stmts {
                    out.push(NodeRef::Stmt(inner));
                }
            }
            if let Some(finalizer) = finalizer {
                for inner in &finalizer.node.stmts {
                    out.push(NodeRef::Stmt(inner));
                }
            }
        }
        Stmt::Expr(expr) => out.push(NodeRef::Expr(expr)),
        Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

fn push_expr_children<'a>(expr: &'a Spanned<Expr>, out: &mut Vec<NodeRef<'a>>) {
    match &expr.node {
        Expr::Number(_)
        | Expr::Str(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::Ident(_)
        | Expr::This
        | Expr::Super => {}
        Expr::Template(parts) => {
            for part in parts {
                if let TemplatePart::Expr(inner) = part {
                    out.push(NodeRef::Expr(inner));
                }
            }
        }
        Expr::Array(elements) => {
            for element in elements {
                match element {
                    ArrayElem::Item(inner) | ArrayElem::Spread(inner) => {
                        out.push(NodeRef::Expr(inner));
                    }
                    ArrayElem::Hole => {}
                }
            }
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    ObjectProp::Entry { key, value } => {
                        if let PropKey::Computed(key) = key {
                            out.push(NodeRef::Expr(key));
                        }
                        out.push(NodeRef::Expr(value));
                    }
                    ObjectProp::Spread(inner) => out.push(NodeRef::Expr(inner)),
                }
            }
        }
        Expr::Unary { operand, .. } => out.push(NodeRef::Expr(operand)),
        Expr::Update { target, .. } => out.push(NodeRef::Expr(target)),
        Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
            out.push(NodeRef::Expr(lhs));
            out.push(NodeRef::Expr(rhs));
        }
        Expr::Conditional { test, consequent, alternate } => {
            out.push(NodeRef::Expr(test));
            out.push(NodeRef::Expr(consequent));
            out.push(NodeRef::Expr(alternate));
        }
        Expr::Assign { target, value, .. } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(value));
        }
        Expr::Member { object, property, .. } => {
            out.push(NodeRef::Expr(object));
            if let MemberProp::Computed(index) = property {
                out.push(NodeRef::Expr(index));
            }
        }
        Expr::Call { callee, args, .. } => {
            out.push(NodeRef::Expr(callee));
            for arg in args {
                match arg {
                    Arg::Expr(inner) | Arg::Spread(inner) => out.push(NodeRef::Expr(inner)),
                }
            }
        }
        Expr::New { callee, args } => {
            out.push(NodeRef::Expr(callee));
            for arg in args {
                match arg {
                    Arg::Expr(inner) | Arg::Spread(inner) => out.push(NodeRef::Expr(inner)),
                }
            }
        }
        Expr::Function(func) => {
            for param in &func.params {
                out.push(NodeRef::Pat(param));
            }
            for inner in &func.body.node.stmts {
                out.push(NodeRef::Stmt(inner));
            }
        }
        Expr::Arrow(arrow) => {
            for param in &arrow.params {
                out.push(NodeRef::Pat(param));
            }
            match &arrow.body {
                ArrowBody::Block(block) => {
                    for inner in &block.node.stmts {
                        out.push(NodeRef::Stmt(inner));
                    }
                }
                ArrowBody::Expr(inner) => out.push(NodeRef::Expr(inner)),
            }
        }
        Expr::Paren(inner) | Expr::NonNull(inner) => out.push(NodeRef::Expr(inner)),
        Expr::Cast { expr: inner, .. } => out.push(NodeRef::Expr(inner)),
    }
}

fn push_pattern_children<'a>(pattern: &'a Spanned<Pattern>, out: &mut Vec<NodeRef<'a>>) {
    match &pattern.node {
        // A bound identifier is a target, not a read.
        Pattern::Ident(_) => {}
        Pattern::Array(elements) => {
            for element in elements.iter().flatten() {
                out.push(NodeRef::Pat(element));
            }
        }
        Pattern::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatternProp::KeyValue { key, value } => {
                        if let PropKey::Computed(key) = key {
                            out.push(NodeRef::Expr(key));
                        }
                        out.push(NodeRef::Pat(value));
                    }
                    ObjectPatternProp::Rest(inner) => out.push(NodeRef::Pat(inner)),
                }
            }
        }
        Pattern::Default { inner, value } => {
            out.push(NodeRef::Pat(inner));
            out.push(NodeRef::Expr(value));
        }
        Pattern::Rest(inner) => out.push(NodeRef::Pat(inner)),
    }
}
