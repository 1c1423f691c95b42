//! The `eval` command: evaluate one circuit expression.

use std::io::Read;
use std::time::{Duration, Instant};

use clap::Args;
use parcircuit::circuit::{Circuit, SequentialSolver};
use parcircuit::solver::{CircuitValue, SolveError};
use tracing::warn;

use super::common::{GlobalOptions, SolverSession};
use crate::error::CliError;

/// Arguments for `parcircuit eval`.
#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Circuit expression, or `-` to read it from stdin
    pub expression: String,

    /// Also run the sequential solver and require both to agree
    #[arg(long)]
    pub check: bool,

    /// Cancel the evaluation if it has not finished after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Print circuit size, depth and evaluation time to stderr
    #[arg(long)]
    pub stats: bool,
}

/// Run the eval command.
pub fn run(args: EvalArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let text = read_expression(&args.expression)?;
    let circuit: Circuit = text.parse()?;

    let session = SolverSession::start(options)?;
    let started = Instant::now();
    let handle = session.solver.solve(&circuit);

    let result = match args.timeout_ms {
        Some(ms) => wait_with_timeout(&handle, Duration::from_millis(ms))?,
        None => handle.get_value(),
    };
    let elapsed = started.elapsed();
    session.solver.stop();

    let value = result.map_err(|_| CliError::Cancelled)?;
    println!("{}", value);

    if args.stats {
        eprintln!(
            "nodes: {}, depth: {}, elapsed: {:.1}ms",
            circuit.size(),
            circuit.depth(),
            elapsed.as_secs_f64() * 1000.0
        );
    }

    if args.check {
        let sequential = SequentialSolver::new().solve(&circuit)?;
        if sequential != value {
            return Err(CliError::Mismatch {
                parallel: value,
                sequential,
            });
        }
        println!("check: ok");
    }

    Ok(())
}

fn read_expression(arg: &str) -> Result<String, CliError> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| CliError::Input(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// Blocks on `handle`, cancelling it once `timeout` has passed.
fn wait_with_timeout(
    handle: &CircuitValue,
    timeout: Duration,
) -> Result<Result<bool, SolveError>, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(CliError::Runtime)?;

    Ok(runtime.block_on(async {
        match tokio::time::timeout(timeout, handle.value()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(evaluation = %handle.id(), ?timeout, "Evaluation timed out");
                handle.cancel();
                handle.value().await
            }
        }
    }))
}
