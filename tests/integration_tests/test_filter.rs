// library-level behaviour of compiled filters

use lfilter::filter::{Instruction, Operator};
use lfilter::{Entity, FilterError, LabelFilter};

use crate::common::labels;

fn matches(expression: &str, pairs: &[(&str, &str)]) -> bool {
    LabelFilter::new(expression)
        .unwrap()
        .matches(&labels(pairs))
        .unwrap()
}

#[test]
fn test_empty_filter_matches_any_context() {
    for pairs in [
        vec![],
        vec![("a", "1")],
        vec![("role", "controller"), ("rack", "1")],
    ] {
        assert!(matches("", &pairs));
    }
}

#[test]
fn test_present_key_matches_and_negation_does_not() {
    for value in ["", "x", "with space"] {
        let ctx = [("k", value)];
        assert!(matches("k", &ctx));
        assert!(!matches("not k", &ctx));
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert!(matches("a or a and false", &[("a", "1")]));
}

#[test]
fn test_quoting_keeps_embedded_space() {
    let ctx = [("a b", "x")];
    assert!(matches("'a b'", &ctx));
    assert!(matches("\"a b\"", &ctx));
    assert!(!matches("a b", &ctx));
}

#[test]
fn test_equality_semantics() {
    let ctx = [("role", "controller")];
    assert!(matches("role=controller", &ctx));
    assert!(!matches("role=compute", &ctx));
    assert!(!matches("missing=anything", &ctx));
}

#[test]
fn test_parenthesization_changes_results() {
    let ctx = [("true", "exists")];
    assert!(!matches("(true or true) and false", &ctx));
    assert!(matches("true or (true and false)", &ctx));
}

#[test]
fn test_node_selection_scenario() {
    let expression = "(role=controller and rack=1) or not decommissioned";
    assert!(matches(expression, &[("role", "controller"), ("rack", "1")]));
    assert!(!matches(
        expression,
        &[("role", "compute"), ("decommissioned", "yes")]
    ));
}

#[test]
fn test_keywords_are_case_insensitive_values_are_not() {
    assert!(matches("A AND NOT b", &[("A", "")]));
    assert!(!matches("a AND NOT b", &[("A", "")]));
}

#[test]
fn test_unterminated_quote_is_lenient() {
    // the stray quote becomes part of a bare word
    assert!(matches("'abc", &[("'abc", "")]));
    assert!(!matches("'abc", &[("abc", "")]));
}

#[test]
fn test_compilation_is_referentially_transparent() {
    let expressions = ["", "a", "a b", "x=1 or not y", "(a or b) and c=d"];
    let contexts = [
        labels(&[]),
        labels(&[("a", "")]),
        labels(&[("x", "1"), ("y", "")]),
        labels(&[("b", ""), ("c", "d")]),
    ];

    for expression in expressions {
        let first = LabelFilter::new(expression).unwrap();
        let second = LabelFilter::new(expression).unwrap();
        assert_eq!(first.program(), second.program());
        for ctx in &contexts {
            assert_eq!(first.matches(ctx).unwrap(), second.matches(ctx).unwrap());
        }
    }
}

#[test]
fn test_program_always_ends_with_fin() {
    for expression in ["", "a", "a ;", "(a)", "a = b and c"] {
        let filter = LabelFilter::new(expression).unwrap();
        let last = filter.program().instructions().last().unwrap();
        assert!(matches!(
            last,
            Instruction::Operator {
                op: Operator::Fin,
                ..
            }
        ));
    }
}

#[test]
fn test_structural_errors_share_one_type() {
    let compile_errors = ["a)", "(a", "((a) or b"];
    for expression in compile_errors {
        let err = LabelFilter::new(expression).unwrap_err();
        assert!(err.to_string().starts_with("invalid filter expression"));
    }

    let filter = LabelFilter::new("role=").unwrap();
    let err = filter.matches(&labels(&[])).unwrap_err();
    assert_eq!(
        err,
        FilterError::MissingOperands {
            operator: Operator::Equal,
            position: 4
        }
    );
}

#[test]
fn test_entities_are_label_sources() {
    let entity = Entity::new("node-1")
        .with_label("role", "controller")
        .with_label("rack", "1");
    let filter: LabelFilter = "role=controller and rack".parse().unwrap();
    assert!(filter.matches(&entity).unwrap());
}
