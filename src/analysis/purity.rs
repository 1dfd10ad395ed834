//! Purity classification: which declarations may be crossed during a move.
//!
//! "Pure" is a syntactic guarantee that evaluating the statement has no
//! observable effect, so reordering pure code relative to other pure code
//! cannot change behavior. Anything the classifier does not recognize is
//! impure and acts as a movement barrier.

use crate::config::RuleConfig;
use crate::parser::ast::*;
use crate::span::Spanned;

/// Is this statement a variable declaration whose patterns and initializers
/// are all side-effect free?
///
/// With `allow_designated_calls`, calls matching the configured accessor
/// naming convention are accepted when their arguments are themselves pure.
pub fn is_pure_declaration(stmt: &Stmt, config: &RuleConfig, allow_designated_calls: bool) -> bool {
    let Stmt::VarDecl { declarators, .. } = stmt else {
        return false;
    };
    declarators.iter().all(|declarator| {
        pattern_is_safe(&declarator.pattern.node, config, allow_designated_calls)
            && declarator.init.as_ref().is_none_or(|init| {
                expr_is_movable(&init.node, config, allow_designated_calls)
            })
    })
}

fn pattern_is_safe(pattern: &Pattern, config: &RuleConfig, allow: bool) -> bool {
    match pattern {
        Pattern::Ident(_) => true,
        Pattern::Array(elements) => elements
            .iter()
            .flatten()
            .all(|element| pattern_is_safe(&element.node, config, allow)),
        Pattern::Object(props) => props.iter().all(|prop| match prop {
            ObjectPatternProp::KeyValue { key, value } => {
                let key_ok = match key {
                    PropKey::Computed(expr) => expr_is_movable(&expr.node, config, allow),
                    _ => true,
                };
                key_ok && pattern_is_safe(&value.node, config, allow)
            }
            ObjectPatternProp::Rest(inner) => pattern_is_safe(&inner.node, config, allow),
        }),
        Pattern::Default { inner, value } => {
            pattern_is_safe(&inner.node, config, allow)
                && expr_is_movable(&value.node, config, allow)
        }
        Pattern::Rest(inner) => pattern_is_safe(&inner.node, config, allow),
    }
}

/// Can this expression be evaluated at a different point without observable
/// effect? Calls are rejected unless designated accessors are allowed; any
/// `delete`, spread, assignment, update, `new`, or function literal is
/// rejected outright.
pub fn expr_is_movable(expr: &Expr, config: &RuleConfig, allow: bool) -> bool {
    match expr {
        Expr::Number(_)
        | Expr::Str(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::Ident(_)
        | Expr::This
        | Expr::Super => true,
        Expr::Template(parts) => parts.iter().all(|part| match part {
            TemplatePart::Chunk(_) => true,
            TemplatePart::Expr(inner) => expr_is_movable(&inner.node, config, allow),
        }),
        Expr::Member { object, property, .. } => {
            let prop_ok = match property {
                MemberProp::Computed(index) => expr_is_movable(&index.node, config, allow),
                MemberProp::Ident(_) => true,
            };
            prop_ok && expr_is_movable(&object.node, config, allow)
        }
        Expr::Array(elements) => elements.iter().all(|element| match element {
            ArrayElem::Item(inner) => expr_is_movable(&inner.node, config, allow),
            ArrayElem::Spread(_) => false,
            ArrayElem::Hole => true,
        }),
        Expr::Object(props) => props.iter().all(|prop| match prop {
            ObjectProp::Entry { key, value } => {
                let key_ok = match key {
                    PropKey::Computed(inner) => expr_is_movable(&inner.node, config, allow),
                    _ => true,
                };
                key_ok && expr_is_movable(&value.node, config, allow)
            }
            ObjectProp::Spread(_) => false,
        }),
        Expr::Unary { op, operand } => {
            *op != UnaryOp::Delete && expr_is_movable(&operand.node, config, allow)
        }
        Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
            expr_is_movable(&lhs.node, config, allow)
                && expr_is_movable(&rhs.node, config, allow)
        }
        Expr::Conditional { test, consequent, alternate } => {
            expr_is_movable(&test.node, config, allow)
                && expr_is_movable(&consequent.node, config, allow)
                && expr_is_movable(&alternate.node, config, allow)
        }
        Expr::Call { callee, args, .. } => {
            allow
                && accessor_callee_name(&callee.node, config).is_some()
                && args.iter().all(|arg| match arg {
                    Arg::Expr(inner) => expr_is_movable(&inner.node, config, allow),
                    Arg::Spread(_) => false,
                })
        }
        Expr::Paren(inner) | Expr::NonNull(inner) => {
            expr_is_movable(&inner.node, config, allow)
        }
        Expr::Cast { expr: inner, .. } => expr_is_movable(&inner.node, config, allow),
        Expr::Update { .. }
        | Expr::Assign { .. }
        | Expr::New { .. }
        | Expr::Function(_)
        | Expr::Arrow(_) => false,
    }
}

/// If the callee names a designated accessor (`useX()` or `obj.useX()` by
/// default), return that name.
pub fn accessor_callee_name<'e>(callee: &'e Expr, config: &RuleConfig) -> Option<&'e str> {
    match callee.unwrapped() {
        Expr::Ident(name) if config.is_accessor_name(name) => Some(name),
        Expr::Member { property: MemberProp::Ident(name), .. }
            if config.is_accessor_name(name) =>
        {
            Some(name)
        }
        _ => None,
    }
}

/// Convenience for spanned statements.
pub fn stmt_is_pure(stmt: &Spanned<Stmt>, config: &RuleConfig, allow: bool) -> bool {
    is_pure_declaration(&stmt.node, config, allow)
}
