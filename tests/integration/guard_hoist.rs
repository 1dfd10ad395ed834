//! Guard hoisting: early exits move up past unrelated pure setup.

use flowlint::analysis::{Move, ViolationKind};

mod common;
use common::{analyze_top, apply_first_fix, parse};

#[test]
fn guard_hoists_past_unrelated_pure_declarations() {
    let source = "const flag = input.enabled;\nconst extra = 1;\nif (!flag) return;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert!(matches!(&v.kind, ViolationKind::GuardHoist { guard } if guard == "!flag"));
    assert_eq!(v.mv, Some(Move { from: 2, to: 1 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "const flag = input.enabled;\nif (!flag) return;\nconst extra = 1;\n"
    );
}

#[test]
fn guard_stops_at_its_dependency_not_block_start() {
    // The guard lands immediately after the declaration it reads, even when
    // more pure statements sit above it.
    let source = "const x = readFlag(source);\nconst other = 1;\nconst more = 2;\nif (!x) return;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].mv, Some(Move { from: 3, to: 1 }));
}

#[test]
fn guard_does_not_cross_impure_statements() {
    let source = "const flag = input.enabled;\ndoSetup();\nif (!flag) return;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn guard_does_not_cross_declarations_it_reads() {
    let source = "const flag = other.value;\nif (!flag) return;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn block_wrapped_exits_count_as_guards() {
    let source = "const flag = input.on;\nconst pad = 1;\nif (flag) { throw reason; }\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert!(matches!(&violations[0].kind, ViolationKind::GuardHoist { .. }));
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}

#[test]
fn guards_with_else_or_extra_work_are_ignored() {
    let with_else = "const a = 1;\nif (x) return; else done = 1;\n";
    assert!(analyze_top(with_else).is_empty());

    let two_statements = "const a = 1;\nif (x) { log = 1; return; }\n";
    assert!(analyze_top(two_statements).is_empty());
}

#[test]
fn guard_reading_consequent_dependency_stops_at_it() {
    // The consequent's names count as dependencies too.
    let source = "const err = reasons.missing;\nconst pad = 1;\nif (!ok) { throw err; }\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}

#[test]
fn receiver_dependent_guards_never_move() {
    let source = "const pad = 1;\nif (this.done) return;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn guard_dependencies_include_closure_captures() {
    // The guard's test contains a callback; what it closes over is a
    // dependency even though the callback body is a nested function.
    let source = "const items = list.entries;\nconst pad = 1;\nif (items.some((x) => x > limit)) return;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    // Stops below `items`, crossing only `pad`.
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}

#[test]
fn hoisted_guard_is_idempotent() {
    let source = "const flag = input.enabled;\nconst extra = 1;\nif (!flag) return;\n";
    let fixed = apply_first_fix(source);
    let parsed = parse(&fixed);
    assert!(parsed.analyze().is_empty(), "re-analysis found {:?}", parsed.analyze());
}

#[test]
fn guard_message_truncates_long_tests() {
    let long_name = "veryLongCondition".repeat(8);
    let source = format!("const pad = 1;\nif ({long_name}) return;\n");
    let violations = analyze_top(&source);
    assert_eq!(violations.len(), 1);
    let ViolationKind::GuardHoist { guard } = &violations[0].kind else { panic!() };
    assert_eq!(guard.chars().count(), 61);
    assert!(guard.ends_with('\u{2026}'));
}
