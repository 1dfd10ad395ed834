//! The four movement planners.
//!
//! Every planner follows the same template: compute the dependency-name set
//! of a candidate statement, then scan backward for the earliest position it
//! could occupy without crossing a barrier. Barriers are impure statements,
//! statements that declare or mutate a dependency, and statements that
//! declare or mutate a name the moving statement itself declares (the
//! shadowing/TDZ rule).

pub mod guard;
pub mod derived;
pub mod near_use;
pub mod side_effect;

use std::collections::BTreeSet;

use super::names::{self, SUPER_NAME, THIS_NAME};
use super::purity;
use super::{BlockContext, Move, Violation, ViolationKind};
use crate::span::Span;

/// Earliest index the statement at `index` could move to, given its
/// dependency set. Equal to `index` when no earlier position is safe.
pub(crate) fn earliest_safe_index(
    ctx: &BlockContext<'_>,
    index: usize,
    deps: &BTreeSet<String>,
    moving_declared: &BTreeSet<String>,
) -> usize {
    let mut target = index;
    for cursor in (0..index).rev() {
        let candidate = &ctx.stmts[cursor];
        if !purity::stmt_is_pure(candidate, ctx.config, ctx.config.accessors_are_pure) {
            break;
        }
        if names::declares_any(candidate, deps) || names::mutates_any(candidate, deps) {
            break;
        }
        if names::declares_any(candidate, moving_declared)
            || names::mutates_any(candidate, moving_declared)
        {
            break;
        }
        target = cursor;
    }
    target
}

/// `this`/`super` in a dependency set: the statement reads receiver state no
/// local reasoning can prove stable, so it never moves.
pub(crate) fn depends_on_receiver(deps: &BTreeSet<String>) -> bool {
    deps.contains(THIS_NAME) || deps.contains(SUPER_NAME)
}

pub(crate) fn truncate_with_ellipsis(text: &str) -> String {
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX).collect();
        cut.push('\u{2026}');
        cut
    }
}

/// Record a violation unless another planner already claimed the statement.
pub(crate) fn report_once(
    reported: &mut BTreeSet<usize>,
    out: &mut Vec<Violation>,
    stmt_index: usize,
    span: Span,
    kind: ViolationKind,
    mv: Move,
) {
    if reported.insert(stmt_index) {
        out.push(Violation { stmt_index, span, kind, mv: Some(mv) });
    }
}
