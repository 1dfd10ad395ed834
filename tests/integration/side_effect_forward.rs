//! Side-effect forwarding: bare calls move above unrelated pure setup when
//! their full dependency set can be proven.

use flowlint::analysis::{Move, ViolationKind};

mod common;
use common::{analyze_top, apply_first_fix, parse};

#[test]
fn resolvable_call_moves_above_unrelated_setup() {
    let source = "function boot() { return flags.on; }\nconst a = 1;\nconst b = 2;\nboot();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert!(matches!(&v.kind, ViolationKind::SideEffectForward { effect } if effect == "boot();"));
    // Stops at the function declaration, not block start.
    assert_eq!(v.mv, Some(Move { from: 3, to: 1 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "function boot() { return flags.on; }\nboot();\nconst a = 1;\nconst b = 2;\n"
    );
    assert!(parse(&fixed).analyze().is_empty());
}

#[test]
fn call_depending_on_a_crossed_declaration_stays_put() {
    // `helper` reads `x`, so the call cannot cross the declaration of `x`.
    let source = "function helper() { x = x + 1; }\nlet x = 1;\nhelper();\nx = 2;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn unresolvable_callee_is_never_flagged() {
    let source = "const a = 1;\ndoWork();\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn accessor_calls_are_exempt() {
    let source = "function useTracker() { return metrics.count; }\nconst a = 1;\nuseTracker();\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn iife_moves_like_any_other_call() {
    let source = "const ready = true;\nconst config = { mode: 1 };\n(function boot() { start(); })();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 0 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "(function boot() { start(); })();\nconst ready = true;\nconst config = { mode: 1 };\n"
    );
}

#[test]
fn method_call_moves_up_to_its_receiver() {
    let source = "const api = { send: function () { return payload; } };\nconst a = 1;\napi.send();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}

#[test]
fn method_call_with_unresolvable_root_stays_put() {
    let source = "const a = 1;\nwindow.init();\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn call_argument_dependencies_are_barriers() {
    // The call's own arguments read `payload`; it cannot cross that
    // declaration, and no earlier slot exists, so nothing is reported.
    let source = "function emit() { return 1; }\nconst payload = input.body;\nemit(payload);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn mutated_callee_is_never_flagged() {
    let source = "let emit = () => 1;\nemit = other;\nconst pad = 1;\nemit();\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn transitive_dependencies_act_as_barriers() {
    // `outer` calls `inner`, which reads `data`: the call cannot cross the
    // declaration of `data`.
    let source = "function inner() { return data; }\n\
                  function outer() { return inner(); }\n\
                  const data = load.cache;\n\
                  outer();\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn optional_call_chains_count() {
    let source = "function ping() { return 1; }\nconst pad = 1;\nping?.();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        &violations[0].kind,
        ViolationKind::SideEffectForward { .. }
    ));
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}
