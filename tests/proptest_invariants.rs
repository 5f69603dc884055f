
use proptest::prelude::*;
use quitgate::{all, any, Condition, FieldTable};
use strategies::{arb_condition, arb_facts, arb_sparse_facts, arb_tree};

// ---------------------------------------------------------------------------
// Invariant 1: Wire round-trip
//
// Encoding a tree and decoding it back yields a structurally equal tree,
// and the canonical text form is stable across a round trip.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn round_trip_value(tree in arb_tree()) {
        let reparsed = Condition::from_value(&tree.to_value()).unwrap();
        prop_assert_eq!(reparsed, tree);
    }

    #[test]
    fn round_trip_text(tree in arb_tree()) {
        let text = tree.to_json();
        let reparsed = Condition::from_json(&text).unwrap();
        prop_assert_eq!(&reparsed, &tree);
        prop_assert_eq!(reparsed.to_json(), text, "canonical text must be stable");
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Determinism
//
// The same tree + facts always produce the same verdict, across repeated
// runs and across clones.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn determinism_repeated(tree in arb_tree(), facts in arb_sparse_facts()) {
        let first = tree.evaluate(&facts);
        for _ in 0..5 {
            prop_assert_eq!(tree.evaluate(&facts), first, "determinism violated on repeated evaluation");
        }
    }

    #[test]
    fn determinism_across_clones(tree in arb_tree(), facts in arb_sparse_facts()) {
        let cloned = tree.clone();
        prop_assert_eq!(cloned.evaluate(&facts), tree.evaluate(&facts));
        prop_assert_eq!(cloned.try_evaluate(&facts), tree.try_evaluate(&facts));
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Schema-aligned trees are clean
//
// Anything the generators build passes validation against the standard
// vocabulary, and with a full fact set strict evaluation cannot fault.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn generated_trees_validate(tree in arb_tree()) {
        let result = tree.validate(&FieldTable::standard());
        prop_assert!(result.is_ok(), "validation failed: {}", result.unwrap_err());
    }

    #[test]
    fn full_facts_never_fault(tree in arb_tree(), facts in arb_facts()) {
        let strict = tree.try_evaluate(&facts);
        prop_assert!(strict.is_ok(), "unexpected fault: {}", strict.unwrap_err());
        prop_assert_eq!(strict.unwrap(), tree.evaluate(&facts));
        prop_assert_eq!(tree.evaluate_detailed(&facts).fault_count(), 0);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Group folds
//
// A group's verdict is exactly the boolean fold of its children's verdicts:
// AND over all of them, OR over any of them.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn groups_fold_their_children(
        children in prop::collection::vec(arb_condition(), 1..=5),
        facts in arb_sparse_facts(),
    ) {
        let child_verdicts: Vec<bool> =
            children.iter().map(|child| child.evaluate(&facts)).collect();

        let conjunction = all(children.clone());
        prop_assert_eq!(
            conjunction.evaluate(&facts),
            child_verdicts.iter().all(|&v| v)
        );

        let disjunction = any(children);
        prop_assert_eq!(
            disjunction.evaluate(&facts),
            child_verdicts.iter().any(|&v| v)
        );
    }

    /// Missing facts fold the affected rules to false without poisoning
    /// siblings: the detailed verdict still matches the plain one and every
    /// fault is a missing fact (the schema rules out the other kinds).
    #[test]
    fn sparse_facts_fault_only_on_missing(tree in arb_tree(), facts in arb_sparse_facts()) {
        let report = tree.evaluate_detailed(&facts);
        prop_assert_eq!(report.passed(), tree.evaluate(&facts));
        for (_, error) in report.faults() {
            prop_assert!(
                matches!(error, quitgate::EvalError::MissingFact(_)),
                "unexpected fault kind: {}",
                error,
            );
        }
    }
}
