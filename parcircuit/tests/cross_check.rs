//! Property tests comparing the parallel solver with the sequential one.
//!
//! Run with: `cargo test --test cross_check`

use std::sync::OnceLock;
use std::time::Duration;

use proptest::prelude::*;

use parcircuit::circuit::{Circuit, CircuitNode, SequentialSolver};
use parcircuit::solver::{ParallelSolver, SolverConfig};

/// One solver shared by every generated case.
fn shared_solver() -> &'static ParallelSolver {
    static SOLVER: OnceLock<ParallelSolver> = OnceLock::new();
    SOLVER.get_or_init(|| {
        ParallelSolver::new(SolverConfig::default().with_worker_threads(4)).unwrap()
    })
}

fn arb_node() -> impl Strategy<Value = CircuitNode> {
    let leaf = (any::<bool>(), 0u64..3)
        .prop_map(|(value, ms)| CircuitNode::delayed_leaf(value, Duration::from_millis(ms)));

    leaf.prop_recursive(4, 64, 4, |inner| {
        let args = prop::collection::vec(inner.clone(), 1..5);
        prop_oneof![
            inner.clone().prop_map(CircuitNode::not),
            args.clone().prop_map(|args| CircuitNode::and(args)),
            args.clone().prop_map(|args| CircuitNode::or(args)),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(c, a, b)| CircuitNode::if_then_else(c, a, b)),
            (0usize..6, args.clone()).prop_map(|(t, args)| CircuitNode::gt(t, args)),
            (0usize..6, args).prop_map(|(t, args)| CircuitNode::lt(t, args)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn parallel_matches_sequential(node in arb_node()) {
        let circuit = Circuit::new(node).unwrap();
        let expected = SequentialSolver::new().solve(&circuit).unwrap();
        prop_assert_eq!(shared_solver().solve(&circuit).get_value(), Ok(expected));
    }

    #[test]
    fn text_format_round_trips(node in arb_node()) {
        let circuit = Circuit::new(node).unwrap();
        let reparsed: Circuit = circuit.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, circuit);
    }
}
