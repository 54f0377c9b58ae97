//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod sinks;

use crossbeam_channel::bounded;
use flowpipe::pipeline::{PipelineRunner, RunReport};
use flowpipe::RunnerConfig;
use std::time::Duration;

/// How long a small pipeline may take before the test calls it a deadlock
pub fn test_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Runner config with small buffers so back-pressure actually kicks in
pub fn small_runner(buffer_size: usize) -> PipelineRunner {
    PipelineRunner::new(
        RunnerConfig::default()
            .with_parallelism(2)
            .with_buffer_size(buffer_size),
    )
}

/// Run on a separate thread and panic if `run` does not return in time.
pub fn run_with_timeout(runner: PipelineRunner) -> RunReport {
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let _ = tx.send(runner.run());
    });
    rx.recv_timeout(test_timeout())
        .expect("pipeline did not terminate (deadlock?)")
        .expect("pipeline failed validation")
}
