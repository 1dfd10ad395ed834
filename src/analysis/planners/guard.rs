//! Guard hoisting: early exits belong directly before the work they skip.

use std::collections::BTreeSet;

use crate::analysis::names::free_names;
use crate::analysis::walker::NodeRef;
use crate::analysis::{BlockContext, Move, Violation, ViolationKind};
use crate::parser::ast::Stmt;
use crate::span::Spanned;
use super::{depends_on_receiver, earliest_safe_index, report_once, truncate_with_ellipsis};

pub fn plan(
    ctx: &BlockContext<'_>,
    reported: &mut BTreeSet<usize>,
    out: &mut Vec<Violation>,
) {
    for (index, stmt) in ctx.stmts.iter().enumerate() {
        let Stmt::If { test, consequent, alternate } = &stmt.node else {
            continue;
        };
        if alternate.is_some() || !is_exit_path(consequent) {
            continue;
        }

        let mut deps = free_names(NodeRef::Expr(test), true);
        deps.extend(free_names(NodeRef::Stmt(consequent), true));
        if depends_on_receiver(&deps) {
            continue;
        }

        let target = earliest_safe_index(ctx, index, &deps, &BTreeSet::new());
        if target == index {
            continue;
        }

        report_once(
            reported,
            out,
            index,
            stmt.span,
            ViolationKind::GuardHoist {
                guard: truncate_with_ellipsis(test.span.text(ctx.source)),
            },
            Move { from: index, to: target },
        );
    }
}

/// A guard consequent: return/throw/break/continue, bare or as the only
/// statement of a braced block.
fn is_exit_path(stmt: &Spanned<Stmt>) -> bool {
    fn is_exit(stmt: &Stmt) -> bool {
        matches!(
            stmt,
            Stmt::Return(_) | Stmt::Throw(_) | Stmt::Break | Stmt::Continue
        )
    }
    match &stmt.node {
        Stmt::Block(block) => block.stmts.len() == 1 && is_exit(&block.stmts[0].node),
        other => is_exit(other),
    }
}
