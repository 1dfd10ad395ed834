//! Derived grouping: declarations move up next to the values they derive
//! from.

use flowlint::analysis::{Move, ViolationKind};

mod common;
use common::{analyze_top, apply_first_fix, parse};

#[test]
fn derived_declaration_moves_next_to_its_dependency() {
    let source = "const a = getA();\nconst b = user.name;\nconst c = a + 1;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    let ViolationKind::DerivedGrouping { name, dependency } = &v.kind else {
        panic!("expected derived grouping, got {:?}", v.kind);
    };
    assert_eq!(name, "c");
    assert_eq!(dependency, "a");
    assert_eq!(v.mv, Some(Move { from: 2, to: 1 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "const a = getA();\nconst c = a + 1;\nconst b = user.name;\n"
    );
    assert!(parse(&fixed).analyze().is_empty());
}

#[test]
fn adjacent_derivations_are_fine() {
    let source = "const a = getA();\nconst c = a + 1;\nconst b = user.name;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn intervening_reference_to_the_dependency_blocks_the_move() {
    let source = "const a = getA();\nconst mid = a + 1;\nconst c = a + 2;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn intervening_impure_statement_blocks_the_move() {
    let source = "const a = getA();\nsetup();\nconst c = a + 2;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn intervening_reference_to_the_moving_name_blocks_the_move() {
    // `mid` reads `c` before its declaration; moving `c` above it would
    // change TDZ behavior, so the statement stays put.
    let source = "const a = getA();\nconst mid = c;\nconst c = a + 2;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn latest_dependency_wins() {
    let source = "const a = getA();\nconst b = getB();\nconst c = 1;\nconst d = a + b;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let ViolationKind::DerivedGrouping { name, dependency } = &violations[0].kind else {
        panic!();
    };
    assert_eq!(name, "d");
    assert_eq!(dependency, "b");
    assert_eq!(violations[0].mv, Some(Move { from: 3, to: 2 }));

    let fixed = apply_first_fix(source);
    assert_eq!(
        fixed,
        "const a = getA();\nconst b = getB();\nconst d = a + b;\nconst c = 1;\n"
    );
}

#[test]
fn pattern_defaults_count_as_dependencies() {
    let source =
        "const limit = getLimit();\nconst pad = 1;\nconst { size = limit } = options;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let ViolationKind::DerivedGrouping { name, dependency } = &violations[0].kind else {
        panic!();
    };
    assert_eq!(name, "size");
    assert_eq!(dependency, "limit");
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}

#[test]
fn closure_captures_count_as_dependencies() {
    let source = "const seed = getSeed();\nconst pad = 1;\nconst next = () => seed + 1;\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let ViolationKind::DerivedGrouping { dependency, .. } = &violations[0].kind else {
        panic!();
    };
    assert_eq!(dependency, "seed");
}

#[test]
fn dependencies_on_outer_names_do_not_trigger() {
    let source = "const a = getA();\nconst pad = 1;\nconst c = outerThing + 1;\n";
    assert!(analyze_top(source).is_empty());
}

#[test]
fn function_dependency_groups_below_the_function() {
    let source =
        "function build() { return parts; }\nconst pad = other.bits;\nconst made = build();\n";
    let violations = analyze_top(source);
    assert_eq!(violations.len(), 1);
    let ViolationKind::DerivedGrouping { name, dependency } = &violations[0].kind else {
        panic!();
    };
    assert_eq!(name, "made");
    assert_eq!(dependency, "build");
    assert_eq!(violations[0].mv, Some(Move { from: 2, to: 1 }));
}
