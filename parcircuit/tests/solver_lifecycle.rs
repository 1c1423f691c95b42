//! Integration tests for solver lifecycle: stop, cancellation and cleanup.
//!
//! These tests verify that:
//! - `stop()` is idempotent and never hangs
//! - values published before `stop()` are kept, pending ones end cancelled
//! - submissions after `stop()` are cancelled immediately
//! - internal faults surface as cancellation of the whole ancestry
//! - no worker threads or tasks outlive `stop()`
//!
//! Run with: `cargo test --test solver_lifecycle`

use std::time::{Duration, Instant};

use parcircuit::circuit::{Circuit, CircuitNode, NodeKind};
use parcircuit::solver::{
    CircuitValue, EvaluationStatus, ParallelSolver, SolveError, SolverConfig,
};

// ============================================================================
// Test Helpers
// ============================================================================

const FAST_BOUND: Duration = Duration::from_secs(5);

fn create_solver() -> ParallelSolver {
    ParallelSolver::new(SolverConfig::default().with_worker_threads(4)).unwrap()
}

fn parse(text: &str) -> Circuit {
    text.parse().unwrap()
}

// ============================================================================
// Stop
// ============================================================================

#[test]
fn test_stop_twice() {
    let solver = create_solver();
    let pending = solver.solve(&parse("AND(true@60s, true@60s)"));

    let started = Instant::now();
    solver.stop();
    solver.stop();
    assert!(started.elapsed() < FAST_BOUND);

    assert!(!solver.is_accepting());
    assert_eq!(pending.get_value(), Err(SolveError::Cancelled));
}

#[test]
fn test_resolved_values_survive_stop() {
    let solver = create_solver();
    let early = solver.solve(&parse("OR(false, true)"));
    assert_eq!(early.get_value(), Ok(true));

    let late = solver.solve(&parse("NOT(false@60s)"));
    solver.stop();

    assert_eq!(early.get_value(), Ok(true));
    assert_eq!(early.status(), EvaluationStatus::Resolved(true));
    assert_eq!(late.status(), EvaluationStatus::Cancelled);
    assert_eq!(late.get_value(), Err(SolveError::Cancelled));

    // Re-reading never changes the answer.
    for _ in 0..3 {
        assert_eq!(early.get_value(), Ok(true));
        assert_eq!(late.get_value(), Err(SolveError::Cancelled));
    }
}

#[test]
fn test_solve_after_stop_is_cancelled_immediately() {
    let solver = create_solver();
    solver.stop();

    let started = Instant::now();
    let value = solver.solve(&parse("true@60s"));
    assert_eq!(value.status(), EvaluationStatus::Cancelled);
    assert_eq!(value.get_value(), Err(SolveError::Cancelled));
    assert!(started.elapsed() < FAST_BOUND);
    assert_eq!(solver.active_evaluations(), 0);
}

#[test]
fn test_stop_from_another_thread_wakes_waiters() {
    let solver = create_solver();
    let value = solver.solve(&parse("GT(0, false@60s)"));

    std::thread::scope(|scope| {
        let waiter = scope.spawn(|| value.get_value());
        std::thread::sleep(Duration::from_millis(20));
        solver.stop();
        assert_eq!(waiter.join().unwrap(), Err(SolveError::Cancelled));
    });
}

#[test]
fn test_cancel_one_of_many() {
    let solver = create_solver();
    let values: Vec<CircuitValue> = (0..8)
        .map(|i| {
            if i == 3 {
                solver.solve(&parse("OR(false@60s, false@60s)"))
            } else {
                solver.solve(&parse("AND(true@10ms, NOT(false))"))
            }
        })
        .collect();

    values[3].cancel();
    for (i, value) in values.iter().enumerate() {
        let expected = if i == 3 { Err(SolveError::Cancelled) } else { Ok(true) };
        assert_eq!(value.get_value(), expected, "evaluation {i}");
    }
    assert!(solver.is_accepting());
    solver.stop();
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_malformed_node_cancels_ancestors() {
    let solver = create_solver();
    // NOT with no argument deep inside an otherwise slow OR.
    let circuit = Circuit::new_unchecked(CircuitNode::or([
        CircuitNode::delayed_leaf(false, Duration::from_secs(60)),
        CircuitNode::and([
            CircuitNode::leaf(true),
            CircuitNode::with_args(NodeKind::Not, Vec::new()),
        ]),
    ]));

    let started = Instant::now();
    assert_eq!(solver.solve(&circuit).get_value(), Err(SolveError::Cancelled));
    assert!(started.elapsed() < FAST_BOUND);

    // Other evaluations are unaffected.
    assert_eq!(solver.solve(&parse("true")).get_value(), Ok(true));
    solver.stop();
}

#[test]
fn test_malformed_node_in_unused_branch_is_harmless() {
    let solver = create_solver();
    // The faulty branch is started but never selected, so its cancellation
    // does not reach the IF.
    let circuit = Circuit::new_unchecked(CircuitNode::if_then_else(
        CircuitNode::delayed_leaf(true, Duration::from_millis(5)),
        CircuitNode::leaf(false),
        CircuitNode::with_args(NodeKind::Not, Vec::new()),
    ));
    assert_eq!(solver.solve(&circuit).get_value(), Ok(false));
    solver.stop();
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn test_no_tasks_remain_after_stop() {
    let solver = create_solver();
    let values: Vec<_> = (0..50)
        .map(|i| solver.solve(&parse(&format!("AND(true@{}ms, OR(false, true@60s))", i % 7))))
        .collect();

    solver.stop();
    assert_eq!(solver.active_evaluations(), 0);
    assert!(values.iter().all(|v| v.status().is_terminal()));
}

#[test]
fn test_no_tasks_remain_after_completion() {
    let solver = create_solver();
    let values: Vec<_> = (0..20)
        .map(|_| solver.solve(&parse("IF(true, GT(1, true, true, false), false@60s)")))
        .collect();
    for value in &values {
        assert_eq!(value.get_value(), Ok(true));
    }

    // Root tasks finish right after publishing.
    let deadline = Instant::now() + FAST_BOUND;
    while solver.active_evaluations() > 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(solver.active_evaluations(), 0);
    solver.stop();
}

/// Counts live threads of this process whose name starts with `prefix`.
#[cfg(target_os = "linux")]
fn count_threads(prefix: &str) -> usize {
    let Ok(entries) = std::fs::read_dir("/proc/self/task") else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| std::fs::read_to_string(entry.path().join("comm")).ok())
        .filter(|name| name.trim_end().starts_with(prefix))
        .count()
}

#[cfg(target_os = "linux")]
#[test]
fn test_no_worker_threads_leak() {
    // Thread names are truncated to 15 bytes by the kernel.
    const THREAD_NAME: &str = "pc-leak-check";

    let config = SolverConfig::default()
        .with_worker_threads(4)
        .with_thread_name(THREAD_NAME);
    let solver = ParallelSolver::new(config).unwrap();

    let values: Vec<_> = (0..100)
        .map(|i| {
            let text = match i % 3 {
                0 => "AND(true@5ms, GT(1, true, true@60s, true))".to_string(),
                1 => format!("OR(false@{}ms, NOT(true))", i % 11),
                _ => "IF(LT(2, true, false@3ms), true@60s, false)".to_string(),
            };
            solver.solve(&parse(&text))
        })
        .collect();
    assert!(count_threads(THREAD_NAME) > 0);

    solver.stop();
    assert!(values.iter().all(|v| v.status().is_terminal()));
    assert_eq!(settled_thread_count(THREAD_NAME), 0);
    assert_eq!(solver.active_evaluations(), 0);
}

/// Thread count for `prefix` once exited threads have left /proc.
///
/// A joined thread can stay listed for a moment after `pthread_join`.
#[cfg(target_os = "linux")]
fn settled_thread_count(prefix: &str) -> usize {
    let deadline = Instant::now() + Duration::from_millis(500);
    while count_threads(prefix) > 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    count_threads(prefix)
}

#[cfg(target_os = "linux")]
fn threaded_solver(thread_name: &str) -> ParallelSolver {
    let config = SolverConfig::default()
        .with_worker_threads(2)
        .with_thread_name(thread_name);
    ParallelSolver::new(config).unwrap()
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_in_async_context_joins_workers() {
    const THREAD_NAME: &str = "pc-async-stop";

    let solver = threaded_solver(THREAD_NAME);
    let pending = solver.solve(&parse("AND(true@60s, true)"));
    assert!(count_threads(THREAD_NAME) > 0);

    solver.stop();
    assert_eq!(pending.status(), EvaluationStatus::Cancelled);
    assert_eq!(settled_thread_count(THREAD_NAME), 0);
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_shutdown_joins_workers() {
    const THREAD_NAME: &str = "pc-async-down";

    let solver = threaded_solver(THREAD_NAME);
    let pending = solver.solve(&parse("OR(false@60s, false)"));

    solver.shutdown().await;
    assert_eq!(pending.value().await, Err(SolveError::Cancelled));
    assert_eq!(settled_thread_count(THREAD_NAME), 0);
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_drop_in_async_context_joins_workers() {
    const THREAD_NAME: &str = "pc-async-drop";

    let pending = {
        let solver = threaded_solver(THREAD_NAME);
        solver.solve(&parse("NOT(true@60s)"))
    };
    assert_eq!(pending.value().await, Err(SolveError::Cancelled));
    assert_eq!(settled_thread_count(THREAD_NAME), 0);
}

// ============================================================================
// Borrowed Runtime
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_borrowed_runtime_shutdown() {
    let handle = tokio::runtime::Handle::current();
    let solver = ParallelSolver::with_handle(handle, SolverConfig::default());

    let done = solver.solve(&parse("LT(2, true, false@5ms)"));
    assert_eq!(done.value().await, Ok(true));

    let pending = solver.solve(&parse("AND(true, true@60s)"));
    solver.shutdown().await;
    solver.shutdown().await;

    assert_eq!(pending.value().await, Err(SolveError::Cancelled));
    assert_eq!(done.value().await, Ok(true));
    assert_eq!(solver.solve(&parse("true")).value().await, Err(SolveError::Cancelled));
}
