//! Side-effect forwarding: observable effects should not hide behind
//! unrelated pure setup.

use std::collections::BTreeSet;

use crate::analysis::callee::resolve_callee_dependencies;
use crate::analysis::names::free_names;
use crate::analysis::purity::accessor_callee_name;
use crate::analysis::walker::NodeRef;
use crate::analysis::{BlockContext, Move, Violation, ViolationKind};
use crate::parser::ast::{Expr, Stmt};
use crate::span::Spanned;
use super::{depends_on_receiver, earliest_safe_index, report_once, truncate_with_ellipsis};

pub fn plan(
    ctx: &BlockContext<'_>,
    reported: &mut BTreeSet<usize>,
    out: &mut Vec<Violation>,
) {
    for (index, stmt) in ctx.stmts.iter().enumerate() {
        let Stmt::Expr(expr) = &stmt.node else {
            continue;
        };
        let Some(callee) = bare_call_callee(expr) else {
            continue;
        };
        // Designated accessors are assumed referentially stable; moving them
        // is some other rule's business.
        if accessor_callee_name(&callee.node, ctx.config).is_some() {
            continue;
        }

        let mut deps = free_names(NodeRef::Expr(expr), true);
        let mut visited = BTreeSet::new();
        let Some(callee_deps) =
            resolve_callee_dependencies(ctx.stmts, callee, index, &mut visited)
        else {
            // Unknown body: safety cannot be proven, so no violation.
            continue;
        };
        deps.extend(callee_deps);
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
            ViolationKind::SideEffectForward {
                effect: truncate_with_ellipsis(stmt.span.text(ctx.source).trim()),
            },
            Move { from: index, to: target },
        );
    }
}

/// The callee of an expression statement that is a bare call, looking
/// through parens, casts and non-null wrappers.
fn bare_call_callee<'a>(expr: &'a Spanned<Expr>) -> Option<&'a Spanned<Expr>> {
    match expr.node.unwrapped() {
        Expr::Call { callee, .. } => Some(callee),
        _ => None,
    }
}
