//! Declare-near-use: trivial placeholder declarations sink to their first
//! use.

use flowlint::analysis::{Move, ViolationKind};

mod common;
use common::{analyze_top, apply_first_fix, parse};

#[test]
fn placeholder_moves_down_to_its_first_use() {
    let source = "const big = source;\nconst a = 1;\nconst b = 2;\nconst c = 3;\nuse(big);\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert!(matches!(&v.kind, ViolationKind::DeclareNearUse { name } if name == "big"));
    assert_eq!(v.mv, Some(Move { from: 0, to: 4 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "const a = 1;\nconst b = 2;\nconst c = 3;\nconst big = source;\nuse(big);\n"
    );
    assert!(parse(&fixed).analyze().is_empty());
}

#[test]
fn adjacent_use_is_fine() {
    let source = "const big = source;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn unused_declarations_are_not_flagged() {
    let source = "const lonely = 1;\nconst pad = 2;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn uninitialized_declarations_move_too() {
    let source = "let x;\nconst a = 1;\nx = compute();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert!(matches!(&violations[0].kind, ViolationKind::DeclareNearUse { name } if name == "x"));
    assert_eq!(violations[0].mv, Some(Move { from: 0, to: 2 }));
}

#[test]
fn computed_initializers_stay_put() {
    let source = "const big = compute();\nconst a = 1;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn destructured_declarations_stay_put() {
    let source = "const [big] = source;\nconst a = 1;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn impure_intervening_statements_block_the_move() {
    let source = "const big = source;\nlog();\nconst a = 1;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn intervening_mutation_of_the_name_blocks_the_move() {
    let source = "let big = source;\nbig = other;\nconst a = 1;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn redeclaration_of_the_name_blocks_the_move() {
    let source = "let big = 1;\nconst a = 2;\nlet big = 3;\nuse(big);\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn initializer_dependency_must_stay_untouched() {
    // `base` is read between declaration and use; moving `alias = base` past
    // that read would not change behavior, but a *mutation* of `base` would,
    // and a reference is already treated as a barrier.
    let reference = "const alias = base;\nconst mid = base + 1;\nuse(alias);\n";
    assert!(analyze_top(reference).is_empty());

    let mutation = "const alias = base;\nbase = base + 1;\nuse(alias);\n";
    assert!(analyze_top(mutation).is_empty());
}

#[test]
fn closure_uses_count_as_uses() {
    // The first use is inside a callback: still a use.
    let source = "const big = source;\nconst a = 1;\nschedule(() => use(big));\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    assert!(matches!(&violations[0].kind, ViolationKind::DeclareNearUse { .. }));
    assert_eq!(violations[0].mv, Some(Move { from: 0, to: 2 }));
}
