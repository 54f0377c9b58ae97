//! Pipeline runner: validates the wiring, then runs one thread per stage.
//!
//! `run` is a pure barrier. It starts every registered stage concurrently and
//! returns once all of them have returned from `Stage::run`. Termination is
//! driven entirely by channel closing: the source closes its output when done,
//! and every stage closes its outputs after its inputs are exhausted.

use crate::config::RunnerConfig;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::graph::{StageView, TopologyPlan};
use crate::pipeline::id::StageId;
use crate::pipeline::stage::Stage;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Outcome of a single stage's thread.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub id: StageId,
    pub name: String,
    /// Time spent inside `Stage::run`. `None` when the stage panicked.
    pub elapsed: Option<Duration>,
    pub panicked: bool,
}

/// Summary returned by [`PipelineRunner::run`].
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Reports in registration order.
    pub stages: Vec<StageReport>,
    /// Dataflow order the graph was validated in.
    pub order: Vec<StageId>,
    pub elapsed: Duration,
}

impl RunReport {
    /// True when no stage panicked.
    pub fn all_completed(&self) -> bool {
        self.stages.iter().all(|s| !s.panicked)
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// Owns the registered stages and runs them to completion.
pub struct PipelineRunner {
    config: RunnerConfig,
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            stages: Vec::new(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Channel capacity stages built for this runner should use.
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    // ── Registration ──

    /// Add a stage. Wire its ports before registering it.
    pub fn register(&mut self, stage: impl Stage + 'static) -> StageId {
        self.register_boxed(Box::new(stage))
    }

    pub fn register_boxed(&mut self, stage: Box<dyn Stage>) -> StageId {
        let id = StageId(self.stages.len() as u32);
        tracing::trace!("Registered stage '{}' as {}", stage.name(), id);
        self.stages.push(stage);
        id
    }

    pub fn register_all(
        &mut self,
        stages: impl IntoIterator<Item = Box<dyn Stage>>,
    ) -> Vec<StageId> {
        stages
            .into_iter()
            .map(|stage| self.register_boxed(stage))
            .collect()
    }

    // ── Validation ──

    fn views(&self) -> Vec<StageView> {
        self.stages
            .iter()
            .enumerate()
            .map(|(idx, stage)| StageView {
                id: StageId(idx as u32),
                name: stage.name().to_string(),
                ports: stage.ports(),
            })
            .collect()
    }

    /// Check the wiring without starting anything.
    pub fn validate(&self) -> PipelineResult<TopologyPlan> {
        TopologyPlan::compile(&self.views())
    }

    // ── Execution ──

    /// Validate, start every stage on its own thread, and wait for all of them.
    pub fn run(self) -> PipelineResult<RunReport> {
        let plan = self.validate()?;

        tracing::info!(
            "Starting pipeline: {} stages, {} channels (capacity {}), parallelism {}",
            plan.stats.total_stages,
            plan.stats.channels,
            self.config.buffer_size,
            self.config.parallelism,
        );
        if plan.stats.total_stages > self.config.parallelism {
            tracing::warn!(
                "{} stages exceed configured parallelism {}; stages will share cores",
                plan.stats.total_stages,
                self.config.parallelism
            );
        }

        let started = Instant::now();
        let mut handles: Vec<(StageId, String, JoinHandle<Duration>)> =
            Vec::with_capacity(self.stages.len());
        let mut spawn_error = None;

        // Stages left in the iterator after a failed spawn are dropped, which
        // closes their outputs and releases their inputs.
        for (idx, stage) in self.stages.into_iter().enumerate() {
            let id = StageId(idx as u32);
            let name = stage.name().to_string();
            let spawned = std::thread::Builder::new()
                .name(format!("stage-{}-{}", idx, name))
                .spawn(move || {
                    let stage_start = Instant::now();
                    stage.run();
                    stage_start.elapsed()
                });

            match spawned {
                Ok(handle) => {
                    tracing::debug!("Stage '{}' ({}) started", name, id);
                    handles.push((id, name, handle));
                }
                Err(e) => {
                    tracing::error!("Failed to spawn stage '{}': {}", name, e);
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        let mut stages = Vec::with_capacity(handles.len());
        for (id, name, handle) in handles {
            let report = match handle.join() {
                Ok(elapsed) => {
                    tracing::debug!("Stage '{}' ({}) finished in {:?}", name, id, elapsed);
                    StageReport {
                        id,
                        name,
                        elapsed: Some(elapsed),
                        panicked: false,
                    }
                }
                Err(_) => {
                    tracing::error!("Stage '{}' ({}) panicked", name, id);
                    StageReport {
                        id,
                        name,
                        elapsed: None,
                        panicked: true,
                    }
                }
            };
            stages.push(report);
        }

        if let Some(e) = spawn_error {
            return Err(e.into());
        }

        let elapsed = started.elapsed();
        tracing::info!("Pipeline finished in {:?}", elapsed);

        Ok(RunReport {
            stages,
            order: plan.order,
            elapsed,
        })
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}
