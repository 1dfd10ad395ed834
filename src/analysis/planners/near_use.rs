//! Declare-near-use: trivial placeholder declarations move down to the
//! statement that first reads them.

use std::collections::BTreeSet;

use crate::analysis::names::{declares_any, mutates_any, references_any};
use crate::analysis::purity::stmt_is_pure;
use crate::analysis::{BlockContext, Move, Violation, ViolationKind};
use crate::parser::ast::{Expr, Pattern, Stmt};
use super::report_once;

pub fn plan(
    ctx: &BlockContext<'_>,
    reported: &mut BTreeSet<usize>,
    out: &mut Vec<Violation>,
) {
    for (index, stmt) in ctx.stmts.iter().enumerate() {
        let Stmt::VarDecl { declarators, .. } = &stmt.node else {
            continue;
        };
        // Only single, identifier-bound declarations with a trivial
        // initializer: moving computed initializers would shift evaluation.
        if declarators.len() != 1 {
            continue;
        }
        let declarator = &declarators[0];
        let Pattern::Ident(name) = &declarator.pattern.node else {
            continue;
        };
        let mut deps: BTreeSet<String> = BTreeSet::new();
        match declarator.init.as_ref().map(|init| &init.node) {
            None
            | Some(Expr::Number(_))
            | Some(Expr::Str(_))
            | Some(Expr::Bool(_))
            | Some(Expr::Null) => {}
            Some(Expr::Ident(dep)) => {
                deps.insert(dep.clone());
            }
            Some(_) => continue,
        }

        let name_set: BTreeSet<String> = [name.clone()].into();
        let Some(offset) = ctx.stmts[index + 1..]
            .iter()
            .position(|later| references_any(later, &name_set))
        else {
            continue;
        };
        let usage_index = index + 1 + offset;
        if usage_index <= index + 1 {
            continue;
        }

        let blocked = ctx.stmts[index + 1..usage_index].iter().any(|between| {
            !stmt_is_pure(between, ctx.config, ctx.config.accessors_are_pure)
                || declares_any(between, &name_set)
                || mutates_any(between, &name_set)
                || (!deps.is_empty()
                    && (declares_any(between, &deps)
                        || references_any(between, &deps)
                        || mutates_any(between, &deps)))
        });
        if blocked {
            continue;
        }

        report_once(
            reported,
            out,
            index,
            stmt.span,
            ViolationKind::DeclareNearUse { name: name.clone() },
            Move { from: index, to: usage_index },
        );
    }
}
