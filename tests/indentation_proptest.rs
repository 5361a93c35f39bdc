//! Property-based tests for the indentation state machine and the checker driving it.

use plumb::plumb::testing::replay_indentation;
use plumb::plumb::{Checker, ProblemDetail, StyleConfig};
use proptest::prelude::*;

fn wrap(open: &str, close: &str, body: String, multiline: bool) -> String {
    if multiline {
        format!("foo{}\n{}\n{}", open, body, close)
    } else {
        format!("foo{}{}{}", open, body, close)
    }
}

/// Expressions built from arbitrarily nested, always balanced paren, bracket and brace groups.
fn nested_groups_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("x".to_string()),
        Just("42".to_string()),
        Just("y.z".to_string()),
        Just(":sym".to_string()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), any::<bool>()).prop_map(|(body, nl)| wrap("(", ")", body, nl)),
            (inner.clone(), any::<bool>()).prop_map(|(body, nl)| wrap("[", "]", body, nl)),
            (inner.clone(), any::<bool>()).prop_map(|(body, nl)| wrap(" { ", " }", body, nl)),
            prop::collection::vec(inner, 1..4).prop_map(|items| items.join(", ")),
        ]
    })
}

/// Lines that open and close groups and blocks in no particular order.
fn unbalanced_lines_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "end", ")", "]", "}", "x", "if a", "foo(", "bar [", "  y", "", "else",
        ]),
        0..24,
    )
    .prop_map(|lines| lines.join("\n"))
}

fn single_line_statement_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "if a then b end",
        "unless a then b end",
        "while a do b end",
        "until a do b end",
        "begin b end",
        "foo { b }",
        "foo do b end",
        "foo(a, [b, c])",
        "x = if a then b else c end",
    ])
}

proptest! {
    #[test]
    fn test_balanced_groups_leave_empty_stacks(
        body in nested_groups_strategy(),
        alignment in any::<bool>(),
    ) {
        let source = format!("{}\n", body);
        let (machine, _) = replay_indentation(&source, 2, alignment);
        prop_assert!(machine.state().is_balanced(), "open groups left after {:?}", source);
    }

    #[test]
    fn test_missing_closer_leaves_a_group_open(body in nested_groups_strategy()) {
        let source = format!("foo(\n{}\n", body);
        let (machine, _) = replay_indentation(&source, 2, false);
        prop_assert!(!machine.state().paren_lines.is_empty());
    }

    #[test]
    fn test_unbalanced_input_never_panics(source in unbalanced_lines_strategy()) {
        let checker = Checker::new(StyleConfig::default()).unwrap();
        for problem in checker.check_source(&source) {
            if let ProblemDetail::Indentation { should_be_at, .. } = problem.detail() {
                prop_assert_eq!(should_be_at % 2, 0);
            }
        }
    }

    #[test]
    fn test_checking_is_idempotent(body in nested_groups_strategy()) {
        let checker = Checker::new(StyleConfig::default()).unwrap();
        let source = format!("def foo\n{}\nend\n", body);
        prop_assert_eq!(checker.check_source(&source), checker.check_source(&source));
    }

    #[test]
    fn test_single_line_statements_keep_siblings_in_place(
        statement in single_line_statement_strategy(),
        count in 1usize..4,
    ) {
        let mut source = String::from("def foo\n");
        for _ in 0..count {
            source.push_str("  ");
            source.push_str(statement);
            source.push('\n');
        }
        source.push_str("  bar\nend\n");
        let (machine, measurements) = replay_indentation(&source, 2, false);
        prop_assert!(measurements.is_empty(), "{:?} in {:?}", measurements, source);
        prop_assert!(machine.state().is_balanced());
    }
}
