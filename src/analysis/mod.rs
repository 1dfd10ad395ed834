//! Statement-ordering analysis.
//!
//! One analysis pass runs over one lexical block (a function body, braced
//! block, or the top-level program). Four independent planners scan the
//! block's statements and flag at most one violation per statement; the
//! reported set is an accumulator scoped to a single `analyze_block` call.
//! The tree itself is never mutated — fixes are plain text splices computed
//! on demand.

pub mod walker;
pub mod names;
pub mod purity;
pub mod callee;
pub mod planners;
pub mod moves;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::RuleConfig;
use crate::lexer::Comment;
use crate::parser::ast::{Block, Program, Stmt};
use crate::span::{Span, Spanned};
use walker::{traverse, Flow, FnBody, NodeRef, NodeVisitor};
pub use moves::{apply_edit, TextEdit};

/// One block under analysis, with everything the planners and the move
/// executor need from the host: the ordered statements, the container span,
/// the comment list and the raw source.
pub struct BlockContext<'a> {
    pub source: &'a str,
    pub stmts: &'a [Spanned<Stmt>],
    pub comments: &'a [Comment],
    /// Span of the container (including braces for braced blocks).
    pub span: Span,
    pub braced: bool,
    pub config: &'a RuleConfig,
}

/// A proposed relocation over the block, in original statement indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViolationKind {
    GuardHoist { guard: String },
    DerivedGrouping { name: String, dependency: String },
    DeclareNearUse { name: String },
    SideEffectForward { effect: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub stmt_index: usize,
    pub span: Span,
    pub kind: ViolationKind,
    pub mv: Option<Move>,
}

impl Violation {
    pub fn rule_name(&self) -> &'static str {
        match self.kind {
            ViolationKind::GuardHoist { .. } => "guard-hoist",
            ViolationKind::DerivedGrouping { .. } => "derived-grouping",
            ViolationKind::DeclareNearUse { .. } => "declare-near-use",
            ViolationKind::SideEffectForward { .. } => "side-effect-forward",
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ViolationKind::GuardHoist { guard } => format!(
                "early exit \"{guard}\" should appear before the setup it skips; \
                 hoist guard clauses so readers see the exit path first"
            ),
            ViolationKind::DerivedGrouping { name, dependency } => format!(
                "declaration \"{name}\" depends on \"{dependency}\" but is separated \
                 from it by unrelated statements; keep derived values next to their source"
            ),
            ViolationKind::DeclareNearUse { name } => format!(
                "move declaration \"{name}\" next to its first use; placeholders far \
                 above their usage scatter the reading order"
            ),
            ViolationKind::SideEffectForward { effect } => format!(
                "side effect \"{effect}\" is buried after unrelated setup; emit \
                 observable effects before pure initialization"
            ),
        }
    }
}

/// Run all planners over one block. Each statement is reported at most once;
/// the first planner to claim it wins.
pub fn analyze_block(ctx: &BlockContext<'_>) -> Vec<Violation> {
    let mut reported: BTreeSet<usize> = BTreeSet::new();
    let mut out = Vec::new();
    planners::guard::plan(ctx, &mut reported, &mut out);
    planners::derived::plan(ctx, &mut reported, &mut out);
    planners::near_use::plan(ctx, &mut reported, &mut out);
    planners::side_effect::plan(ctx, &mut reported, &mut out);
    out.sort_by_key(|v| v.stmt_index);
    out
}

/// Turn a violation into a concrete text edit, if a safe one exists.
pub fn materialize_fix(ctx: &BlockContext<'_>, violation: &Violation) -> Option<TextEdit> {
    let mv = violation.mv?;
    if mv.from == mv.to || mv.from >= ctx.stmts.len() || mv.to >= ctx.stmts.len() {
        return None;
    }
    Some(moves::plan_move(ctx, mv.from, mv.to))
}

/// A lexical block found in a program: the top level, every braced statement
/// block, and every function body.
pub struct BlockRef<'a> {
    pub stmts: &'a [Spanned<Stmt>],
    pub span: Span,
    pub braced: bool,
}

/// Enumerate every analyzable block in the program, outermost first. Blocks
/// are analyzed independently; nesting is the host's concern, not the
/// planners'.
pub fn collect_blocks<'a>(program: &'a Program) -> Vec<BlockRef<'a>> {
    struct Collector<'a> {
        out: Vec<BlockRef<'a>>,
    }

    impl<'a> Collector<'a> {
        fn record(&mut self, block: &'a Spanned<Block>) {
            self.out.push(BlockRef {
                stmts: &block.node.stmts,
                span: block.span,
                braced: true,
            });
        }
    }

    impl<'a> NodeVisitor<'a> for Collector<'a> {
        fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
            if let Some(parts) = node.as_function() {
                if let FnBody::Block(body) = parts.body {
                    self.record(body);
                }
            }
            if let NodeRef::Stmt(stmt) = node {
                match &stmt.node {
                    Stmt::Block(block) => {
                        self.out.push(BlockRef {
                            stmts: &block.stmts,
                            span: stmt.span,
                            braced: true,
                        });
                    }
                    Stmt::Try { block, handler, finalizer } => {
                        self.record(block);
                        if let Some(handler) = handler {
                            self.record(&handler.body);
                        }
                        if let Some(finalizer) = finalizer {
                            self.record(finalizer);
                        }
                    }
                    _ => {}
                }
            }
            Flow::Continue
        }
    }

    let mut collector = Collector { out: Vec::new() };
    collector.out.push(BlockRef {
        stmts: &program.body,
        span: program.span,
        braced: false,
    });
    for stmt in &program.body {
        traverse(NodeRef::Stmt(stmt), &mut collector);
    }
    collector.out
}
