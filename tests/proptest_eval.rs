use proptest::prelude::*;
use quitgate::{
    all, any, ArithOp, CompareOp, Condition, FactSet, FactValue, Formula, Literal, Rhs, Rule,
};

/// Field names drawn from the schema plus arbitrary strangers, so lookups
/// hit and miss in the same run.
fn arb_field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("progress".to_owned()),
        Just("craving_level_avg".to_owned()),
        Just("avg_cigarettes".to_owned()),
        Just("fm_cigarettes_total".to_owned()),
        Just("use_nrt".to_owned()),
        "[a-z]{1,8}",
    ]
}

fn arb_op() -> impl Strategy<Value = CompareOp> {
    prop::sample::select(
        &[
            CompareOp::Gte,
            CompareOp::Lte,
            CompareOp::Gt,
            CompareOp::Lt,
            CompareOp::Eq,
            CompareOp::Neq,
        ][..],
    )
}

/// Any literal at all, including NaN, infinities, and junk text.
fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        prop::num::f64::ANY.prop_map(Literal::Number),
        prop::bool::ANY.prop_map(Literal::Bool),
        "[a-z0-9. ]{0,8}".prop_map(Literal::Text),
    ]
}

fn arb_rhs() -> impl Strategy<Value = Rhs> {
    prop_oneof![
        arb_literal().prop_map(Rhs::Literal),
        (
            arb_field_name(),
            prop::sample::select(
                &[ArithOp::Mul, ArithOp::Div, ArithOp::Add, ArithOp::Sub][..]
            ),
            prop::num::f64::ANY,
        )
            .prop_map(|(base, op, percent)| Rhs::Formula(Formula::new(base, op, percent))),
    ]
}

fn arb_rule() -> impl Strategy<Value = Condition> {
    (arb_field_name(), arb_op(), arb_rhs()).prop_map(|(field, op, rhs)| {
        Condition::Rule(Rule { field, op, rhs })
    })
}

fn arb_hostile_tree() -> impl Strategy<Value = Condition> {
    arb_rule().prop_recursive(4, 20, 3, |inner| {
        (prop::bool::ANY, prop::collection::vec(inner, 1..=3)).prop_map(|(is_and, rules)| {
            if is_and {
                all(rules)
            } else {
                any(rules)
            }
        })
    })
}

fn arb_fact_value() -> impl Strategy<Value = FactValue> {
    prop_oneof![
        prop::num::f64::ANY.prop_map(FactValue::from),
        prop::bool::ANY.prop_map(FactValue::from),
    ]
}

fn arb_facts() -> impl Strategy<Value = FactSet> {
    prop::collection::vec((arb_field_name(), arb_fact_value()), 0..10)
        .prop_map(FactSet::from_iter)
}

proptest! {
    /// No tree and no fact set panics any of the three evaluation modes.
    #[test]
    fn eval_never_panics(tree in arb_hostile_tree(), facts in arb_facts()) {
        let _ = tree.evaluate(&facts);
        let _ = tree.try_evaluate(&facts);
        let _ = tree.evaluate_detailed(&facts);
    }

    /// The detailed report's verdict is exactly the plain verdict.
    #[test]
    fn detailed_agrees_with_plain(tree in arb_hostile_tree(), facts in arb_facts()) {
        let report = tree.evaluate_detailed(&facts);
        prop_assert_eq!(report.passed(), tree.evaluate(&facts));
    }

    /// Strict evaluation either agrees with lenient or names the first
    /// fault the lenient pass folded away.
    #[test]
    fn strict_and_lenient_are_coherent(tree in arb_hostile_tree(), facts in arb_facts()) {
        let report = tree.evaluate_detailed(&facts);
        match tree.try_evaluate(&facts) {
            Ok(passed) => {
                prop_assert_eq!(passed, report.passed());
                prop_assert_eq!(report.fault_count(), 0);
            }
            Err(error) => {
                let first = report.faults().next().map(|(_, e)| e.clone());
                prop_assert_eq!(first, Some(error));
            }
        }
    }

    /// Wrapping a condition in a single-child group changes nothing.
    #[test]
    fn single_child_groups_are_transparent(tree in arb_hostile_tree(), facts in arb_facts()) {
        let expected = tree.evaluate(&facts);
        prop_assert_eq!(all([tree.clone()]).evaluate(&facts), expected);
        prop_assert_eq!(any([tree]).evaluate(&facts), expected);
    }

    /// Numeric text behaves exactly like the number it spells.
    #[test]
    fn text_numbers_behave_like_numbers(
        field in arb_field_name(),
        op in arb_op(),
        n in prop::num::f64::ANY,
        facts in arb_facts(),
    ) {
        let as_number = Condition::Rule(Rule {
            field: field.clone(),
            op,
            rhs: Rhs::Literal(Literal::Number(n)),
        });
        let as_text = Condition::Rule(Rule {
            field,
            op,
            rhs: Rhs::Literal(Literal::Text(n.to_string())),
        });
        prop_assert_eq!(as_number.evaluate(&facts), as_text.evaluate(&facts));
        prop_assert_eq!(as_number.try_evaluate(&facts), as_text.try_evaluate(&facts));
    }

    /// Lenient evaluation is monotone under OR: adding a passing branch
    /// can only turn the verdict true, never false.
    #[test]
    fn or_with_a_passing_branch_passes(tree in arb_hostile_tree(), facts in arb_facts()) {
        let facts = facts.set("progress", 50);
        let rescued = any([tree, quitgate::field("progress").gte(0)]);
        prop_assert!(rescued.evaluate(&facts));
    }
}
