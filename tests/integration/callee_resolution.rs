//! Callee dependency resolution: local functions, aliases, method chains,
//! recursion guards, and fail-closed behavior.

use std::collections::BTreeSet;

use flowlint::analysis::callee::resolve_callee_dependencies;
use flowlint::parser::ast::{Expr, Program, Stmt};
use flowlint::parser::parse_source;
use flowlint::span::Spanned;

fn parse(source: &str) -> Program {
    parse_source(source).unwrap().0
}

/// Resolve the callee of the expression-statement call at `index`.
fn resolve(program: &Program, index: usize) -> Option<BTreeSet<String>> {
    let Stmt::Expr(expr) = &program.body[index].node else {
        panic!("statement {index} is not an expression");
    };
    let Expr::Call { callee, .. } = expr.node.unwrapped() else {
        panic!("statement {index} is not a call");
    };
    let callee: &Spanned<Expr> = callee;
    let mut visited = BTreeSet::new();
    resolve_callee_dependencies(&program.body, callee, index, &mut visited)
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn function_declaration_resolves_to_captures() {
    let program = parse("function emit() { return channel.send(payload); }\nemit();");
    assert_eq!(resolve(&program, 1), Some(set(&["channel", "payload"])));
}

#[test]
fn const_bound_function_literal_resolves() {
    let program = parse("const emit = () => sink.push(value);\nemit();");
    assert_eq!(resolve(&program, 1), Some(set(&["sink", "value"])));
}

#[test]
fn unknown_callee_fails_closed() {
    let program = parse("const a = 1;\nimportedElsewhere();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn callee_declared_after_the_call_fails_closed() {
    let program = parse("emit();\nfunction emit() { return 1; }");
    assert_eq!(resolve(&program, 0), None);
}

#[test]
fn mutation_before_the_call_fails_closed() {
    let program = parse(
        "let emit = () => 1;\nemit = somethingElse;\nemit();",
    );
    assert_eq!(resolve(&program, 2), None);
}

#[test]
fn empty_declarations_keep_scanning_backward() {
    let program = parse("const emit = () => target;\nlet emit;\nemit();");
    assert_eq!(resolve(&program, 2), Some(set(&["target"])));
}

#[test]
fn redeclaration_prefers_the_latest_binding() {
    let program = parse(
        "let emit = () => first;\nlet emit = () => second;\nemit();",
    );
    assert_eq!(resolve(&program, 2), Some(set(&["second"])));
}

#[test]
fn non_function_binding_fails_closed() {
    let program = parse("const emit = 42;\nemit();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn destructured_binding_fails_closed() {
    let program = parse("const { emit } = bus;\nemit();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn iife_callee_resolves_to_its_captures() {
    let program = parse("(function () { return state + extra; })();");
    assert_eq!(resolve(&program, 0), Some(set(&["state", "extra"])));
}

#[test]
fn transitive_local_calls_are_expanded() {
    let program = parse(
        "function inner() { return deep; }\n\
         function outer() { return inner(); }\n\
         outer();",
    );
    assert_eq!(resolve(&program, 2), Some(set(&["inner", "deep"])));
}

#[test]
fn self_recursion_terminates() {
    let program = parse("function loop() { return loop(); }\nloop();");
    assert_eq!(resolve(&program, 1), Some(set(&[])));
}

#[test]
fn mutual_recursion_terminates() {
    let program = parse(
        "const ping = () => pong();\n\
         const pong = () => ping();\n\
         ping();",
    );
    assert_eq!(resolve(&program, 2), Some(set(&["ping", "pong"])));
}

#[test]
fn object_literal_method_resolves() {
    let program = parse(
        "const api = { send: function () { return payload; } };\napi.send();",
    );
    assert_eq!(resolve(&program, 1), Some(set(&["payload"])));
}

#[test]
fn nested_object_path_resolves() {
    let program = parse(
        "const api = { net: { send: () => wire } };\napi.net.send();",
    );
    assert_eq!(resolve(&program, 1), Some(set(&["wire"])));
}

#[test]
fn alias_chain_resolves() {
    let program = parse(
        "const real = { run: () => work };\nconst alias = real;\nalias.run();",
    );
    assert_eq!(resolve(&program, 2), Some(set(&["work"])));
}

#[test]
fn new_of_local_class_resolves_methods() {
    let program = parse(
        "class Worker { run() { return jobs; } }\n\
         const w = new Worker();\n\
         w.run();",
    );
    assert_eq!(resolve(&program, 2), Some(set(&["jobs"])));
}

#[test]
fn class_root_resolves_static_style_lookup() {
    let program = parse(
        "class Registry { list() { return entries; } }\nRegistry.list();",
    );
    assert_eq!(resolve(&program, 1), Some(set(&["entries"])));
}

#[test]
fn unresolvable_member_root_fails_closed() {
    let program = parse("const a = 1;\nwindow.init();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn member_root_without_literal_fails_closed() {
    let program = parse("const client = makeClient();\nclient.send();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn mutated_member_root_fails_closed() {
    let program = parse(
        "let api = { send: () => 1 };\napi = other;\napi.send();",
    );
    assert_eq!(resolve(&program, 2), None);
}

#[test]
fn computed_member_access_fails_closed() {
    let program = parse("const api = { send: () => 1 };\napi['send']();");
    assert_eq!(resolve(&program, 1), None);
}

#[test]
fn this_rooted_callee_fails_closed() {
    let program = parse("this.refresh();");
    assert_eq!(resolve(&program, 0), None);
}
