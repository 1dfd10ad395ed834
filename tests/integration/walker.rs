//! Tests for the iterative tree walker: hook behavior, visit-once, and
//! resilience on deep trees.

use flowlint::analysis::walker::{traverse, Flow, NodeRef, NodeVisitor};
use flowlint::parser::ast::*;
use flowlint::parser::parse_source;
use flowlint::span::{Span, Spanned};

fn parse(source: &str) -> Program {
    parse_source(source).unwrap().0
}

struct Counter {
    exprs: usize,
    idents: Vec<String>,
}

impl<'a> NodeVisitor<'a> for Counter {
    fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
        if let NodeRef::Expr(expr) = node {
            self.exprs += 1;
            if let Expr::Ident(name) = &expr.node {
                self.idents.push(name.clone());
            }
        }
        Flow::Continue
    }
}

#[test]
fn visits_expressions_in_source_order() {
    let program = parse("const v = first + second * third;");
    let mut counter = Counter { exprs: 0, idents: Vec::new() };
    traverse(NodeRef::Stmt(&program.body[0]), &mut counter);
    assert_eq!(counter.idents, vec!["first", "second", "third"]);
    // first + second * third = 3 idents + 2 binary nodes
    assert_eq!(counter.exprs, 5);
}

#[test]
fn skip_prunes_children() {
    struct SkipConditional {
        idents: Vec<String>,
    }
    impl<'a> NodeVisitor<'a> for SkipConditional {
        fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
            if let NodeRef::Expr(expr) = node {
                if matches!(expr.node, Expr::Conditional { .. }) {
                    return Flow::Skip;
                }
                if let Expr::Ident(name) = &expr.node {
                    self.idents.push(name.clone());
                }
            }
            Flow::Continue
        }
    }

    let program = parse("const v = outside + (flag ? hidden : alsoHidden);");
    let mut visitor = SkipConditional { idents: Vec::new() };
    traverse(NodeRef::Stmt(&program.body[0]), &mut visitor);
    assert_eq!(visitor.idents, vec!["outside"]);
}

#[test]
fn veto_stops_descent_and_reports_skipped_node() {
    struct VetoFunctions {
        idents: Vec<String>,
        skipped: usize,
    }
    impl<'a> NodeVisitor<'a> for VetoFunctions {
        fn veto_descent(&mut self, child: NodeRef<'a>) -> bool {
            child.as_function().is_some()
        }
        fn on_skip(&mut self, child: NodeRef<'a>) {
            assert!(child.as_function().is_some());
            self.skipped += 1;
        }
        fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
            if let NodeRef::Expr(expr) = node {
                if let Expr::Ident(name) = &expr.node {
                    self.idents.push(name.clone());
                }
            }
            Flow::Continue
        }
    }

    let program = parse("const v = seen + ((x) => x + insideClosure);");
    let mut visitor = VetoFunctions { idents: Vec::new(), skipped: 0 };
    traverse(NodeRef::Stmt(&program.body[0]), &mut visitor);
    assert_eq!(visitor.idents, vec!["seen"]);
    assert_eq!(visitor.skipped, 1);
}

#[test]
fn detour_nodes_take_priority_over_children() {
    struct Detourer<'a> {
        extra: Option<&'a Spanned<Expr>>,
        order: Vec<String>,
    }
    impl<'a> NodeVisitor<'a> for Detourer<'a> {
        fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
            if let NodeRef::Expr(expr) = node {
                if let Expr::Ident(name) = &expr.node {
                    self.order.push(name.clone());
                }
                if matches!(expr.node, Expr::Binary { .. }) {
                    if let Some(extra) = self.extra.take() {
                        return Flow::Detour(vec![NodeRef::Expr(extra)]);
                    }
                }
            }
            Flow::Continue
        }
    }

    let program = parse("const v = left + right; const w = detoured;");
    let Stmt::VarDecl { declarators, .. } = &program.body[1].node else { panic!() };
    let detoured = declarators[0].init.as_ref().unwrap();

    let mut visitor = Detourer { extra: Some(detoured), order: Vec::new() };
    traverse(NodeRef::Stmt(&program.body[0]), &mut visitor);
    assert_eq!(visitor.order, vec!["detoured", "left", "right"]);
}

#[test]
fn each_node_visited_once() {
    struct SpanLog {
        seen: Vec<(usize, usize)>,
    }
    impl<'a> NodeVisitor<'a> for SpanLog {
        fn visit(&mut self, node: NodeRef<'a>) -> Flow<'a> {
            let span = match node {
                NodeRef::Stmt(s) => s.span,
                NodeRef::Expr(e) => e.span,
                NodeRef::Pat(p) => p.span,
            };
            self.seen.push((span.start, span.end));
            Flow::Continue
        }
    }

    let program = parse("if (ready) { emit(signal); } else { emit(fallback); }");
    let mut visitor = SpanLog { seen: Vec::new() };
    traverse(NodeRef::Stmt(&program.body[0]), &mut visitor);
    let mut deduped = visitor.seen.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), visitor.seen.len(), "a node was visited twice");
}

#[test]
fn deep_trees_do_not_recurse() {
    // Built by hand: parsing this deep would recurse in the parser.
    let mut expr = Spanned::new(Expr::Ident("x".to_string()), Span::new(0, 1));
    for _ in 0..10_000 {
        expr = Spanned::new(Expr::Paren(Box::new(expr)), Span::new(0, 1));
    }
    let stmt = Spanned::new(Stmt::Expr(expr), Span::new(0, 1));

    let mut counter = Counter { exprs: 0, idents: Vec::new() };
    traverse(NodeRef::Stmt(&stmt), &mut counter);
    assert_eq!(counter.exprs, 10_001);
    assert_eq!(counter.idents, vec!["x"]);
}
