//! The reference greeting network.
//!
//! ```text
//! greetings ─► split ─┬─► lower ─┐
//!                     └─► upper ─┴─► zip ─► to_bytes ─► sink
//! ```
//!
//! Every greeting is cut in half by character count, the left half
//! lower-cased, the right half upper-cased, the halves glued back together
//! and written out as raw bytes.

use crate::config::{PipelineConfig, SinkKind, SourceConfig};
use crate::error::{ResultExt, Result};
use crate::pipeline::stages::{FileSink, Map, Merge, Sink, SinkStats, Source, Split};
use crate::pipeline::{Inport, PipelineResult, PipelineRunner, RunReport, StageId};
use crate::text;
use std::sync::Arc;

/// Ids of the stages `assemble` registered, in dataflow order.
#[derive(Debug, Clone, Copy)]
pub struct GreetingStageIds {
    pub source: StageId,
    pub split: StageId,
    pub lower: StageId,
    pub upper: StageId,
    pub zip: StageId,
    pub to_bytes: StageId,
}

/// Build and register everything up to and including `to_bytes`, feeding
/// `sink_input`. The caller registers the stage owning `sink_input`.
pub fn assemble(
    source: &SourceConfig,
    runner: &mut PipelineRunner,
    sink_input: &mut Inport<Vec<u8>>,
) -> PipelineResult<GreetingStageIds> {
    let capacity = runner.buffer_size();

    let mut hi = Source::with_capacity(capacity, text::greetings(&source.template, source.count))
        .named("greetings");
    let mut split = Split::with_capacity(capacity, text::halve).named("split");
    let mut lower = Map::with_capacity(capacity, text::to_lower).named("lower");
    let mut upper = Map::with_capacity(capacity, text::to_upper).named("upper");
    let mut zip = Merge::with_capacity(capacity, text::concat).named("zip");
    let mut to_bytes = Map::with_capacity(capacity, text::to_bytes).named("to_bytes");

    hi.output.connect(&mut split.input)?;
    split.left.connect(&mut lower.input)?;
    split.right.connect(&mut upper.input)?;
    lower.output.connect(&mut zip.left)?;
    upper.output.connect(&mut zip.right)?;
    zip.output.connect(&mut to_bytes.input)?;
    to_bytes.output.connect(sink_input)?;

    Ok(GreetingStageIds {
        source: runner.register(hi),
        split: runner.register(split),
        lower: runner.register(lower),
        upper: runner.register(upper),
        zip: runner.register(zip),
        to_bytes: runner.register(to_bytes),
    })
}

/// A fully wired greeting network, ready to run.
pub struct GreetingNetwork {
    runner: PipelineRunner,
    ids: GreetingStageIds,
    sink: StageId,
    sink_stats: Option<Arc<SinkStats>>,
}

impl GreetingNetwork {
    pub fn ids(&self) -> GreetingStageIds {
        self.ids
    }

    pub fn sink_id(&self) -> StageId {
        self.sink
    }

    /// Counters of the file sink. `None` for the stdout sink.
    pub fn sink_stats(&self) -> Option<Arc<SinkStats>> {
        self.sink_stats.clone()
    }

    pub fn run(self) -> Result<RunReport> {
        self.runner
            .run()
            .context("Failed to run greeting network")
    }
}

/// Wire the greeting network described by `config`.
pub fn build(config: &PipelineConfig) -> Result<GreetingNetwork> {
    let mut runner = PipelineRunner::new(config.runner.clone());

    let (ids, sink, sink_stats) = match config.sink.kind {
        SinkKind::File => {
            let mut sink = FileSink::create(&config.sink.path)
                .with_context(|| format!("Failed to open sink {:?}", config.sink.path))?;
            let ids = assemble(&config.source, &mut runner, &mut sink.input)
                .context("Failed to wire greeting network")?;
            let stats = sink.stats();
            (ids, runner.register(sink), Some(stats))
        }
        SinkKind::Stdout => {
            let mut sink = Sink::new(|bytes: Vec<u8>| {
                println!("{}", String::from_utf8_lossy(&bytes));
            })
            .named("printer");
            let ids = assemble(&config.source, &mut runner, &mut sink.input)
                .context("Failed to wire greeting network")?;
            (ids, runner.register(sink), None)
        }
    };

    tracing::info!(
        "Greeting network wired: {} items, {} stages, sink {}",
        config.source.count,
        runner.len(),
        config.sink.kind
    );

    Ok(GreetingNetwork {
        runner,
        ids,
        sink,
        sink_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::pipeline::stages::test_util::collecting_sink;

    #[test]
    fn test_assemble_registers_six_stages() {
        let mut runner = PipelineRunner::new(RunnerConfig::default().with_buffer_size(2));
        let (mut sink, _rx) = collecting_sink::<Vec<u8>>();
        let source = SourceConfig {
            count: 1,
            ..SourceConfig::default()
        };

        let ids = assemble(&source, &mut runner, &mut sink.input).unwrap();
        assert_eq!(runner.len(), 6);
        assert_eq!(ids.source, StageId(0));
        assert_eq!(ids.to_bytes, StageId(5));

        // Without the sink the last channel has no registered reader.
        assert!(runner.validate().is_err());
        let sink_id = runner.register(sink);
        let plan = runner.validate().unwrap();
        assert_eq!(plan.order.first(), Some(&ids.source));
        assert_eq!(plan.order.last(), Some(&sink_id));
        assert_eq!(plan.stats.channels, 7);
    }

    #[test]
    fn test_assemble_rejects_bound_sink_input() {
        let mut runner = PipelineRunner::new(RunnerConfig::default().with_buffer_size(2));
        let (mut sink, _rx) = collecting_sink::<Vec<u8>>();
        let mut other = crate::pipeline::Outport::<Vec<u8>>::new("other", 1);
        other.connect(&mut sink.input).unwrap();

        assert!(assemble(&SourceConfig::default(), &mut runner, &mut sink.input).is_err());
    }
}
