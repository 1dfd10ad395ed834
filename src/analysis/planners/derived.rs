//! Derived grouping: keep a declaration adjacent to the block-local values
//! it is computed from.

use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::names::{declared_names, declares_any, free_names, references_any};
use crate::analysis::purity::stmt_is_pure;
use crate::analysis::walker::NodeRef;
use crate::analysis::{BlockContext, Move, Violation, ViolationKind};
use crate::parser::ast::Stmt;
use super::{depends_on_receiver, report_once};

pub fn plan(
    ctx: &BlockContext<'_>,
    reported: &mut BTreeSet<usize>,
    out: &mut Vec<Violation>,
) {
    let mut declared_at: BTreeMap<String, usize> = BTreeMap::new();

    for (index, stmt) in ctx.stmts.iter().enumerate() {
        if let Stmt::VarDecl { declarators, .. } = &stmt.node {
            let mut deps = BTreeSet::new();
            for declarator in declarators {
                // Pattern defaults and computed keys read values; the bound
                // names themselves do not.
                deps.extend(free_names(NodeRef::Pat(&declarator.pattern), true));
                if let Some(init) = &declarator.init {
                    deps.extend(free_names(NodeRef::Expr(init), true));
                }
            }

            if !depends_on_receiver(&deps) && !reported.contains(&index) {
                let prior: Vec<(&String, usize)> = deps
                    .iter()
                    .filter_map(|name| declared_at.get(name).map(|&at| (name, at)))
                    .collect();
                if let Some(&last_dependency_index) =
                    prior.iter().map(|(_, at)| at).max()
                {
                    if last_dependency_index + 1 < index {
                        let own_names = declared_names(stmt);
                        let prior_names: BTreeSet<String> =
                            prior.iter().map(|(name, _)| (*name).clone()).collect();
                        let blocked = ctx.stmts[last_dependency_index + 1..index]
                            .iter()
                            .any(|between| {
                                !stmt_is_pure(between, ctx.config, ctx.config.accessors_are_pure)
                                    || declares_any(between, &prior_names)
                                    || references_any(between, &prior_names)
                                    || declares_any(between, &own_names)
                                    || references_any(between, &own_names)
                            });
                        if !blocked {
                            let dependency = prior
                                .iter()
                                .find(|(_, at)| *at == last_dependency_index)
                                .map(|(name, _)| (*name).clone())
                                .unwrap_or_default();
                            let name = own_names
                                .iter()
                                .next()
                                .cloned()
                                .unwrap_or_else(|| "value".to_string());
                            report_once(
                                reported,
                                out,
                                index,
                                stmt.span,
                                ViolationKind::DerivedGrouping { name, dependency },
                                Move { from: index, to: last_dependency_index + 1 },
                            );
                        }
                    }
                }
            }
        }

        for name in declared_names(stmt) {
            declared_at.insert(name, index);
        }
    }
}
