//! Wiring validation and dataflow ordering.
//!
//! Before any thread starts, the runner takes a snapshot of every registered
//! stage's ports and compiles it into a [`TopologyPlan`]. Compilation fails on
//! anything that would make the concurrent phase hang: an unbound input, an
//! output nobody reads, a channel whose other end belongs to a stage that was
//! never registered, or a cycle.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::id::{ChannelId, StageId};
use crate::pipeline::port::{PortDescriptor, PortDirection};
use std::collections::{BTreeMap, VecDeque};

/// Port snapshot of one registered stage.
#[derive(Debug, Clone)]
pub struct StageView {
    pub id: StageId,
    pub name: String,
    pub ports: Vec<PortDescriptor>,
}

/// A channel between two registered stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub channel: ChannelId,
    pub from: StageId,
    pub to: StageId,
}

/// Validated graph, ready to run.
#[derive(Debug, Clone, Default)]
pub struct TopologyPlan {
    /// Stages in dataflow order: every producer before its consumers.
    pub order: Vec<StageId>,
    pub links: Vec<Link>,
    pub stats: PlanStats,
}

/// Statistics about the compiled plan
#[derive(Debug, Clone, Default)]
pub struct PlanStats {
    pub total_stages: usize,

    /// Stages with no input ports
    pub source_stages: usize,

    /// Stages with no output ports
    pub sink_stages: usize,

    pub channels: usize,

    /// Compilation time in microseconds
    pub compile_time_us: u64,
}

#[derive(Default)]
struct Endpoints<'a> {
    writer: Option<(usize, &'a str, &'static str)>,
    reader: Option<(usize, &'a str, &'static str)>,
}

impl TopologyPlan {
    pub fn compile(stages: &[StageView]) -> PipelineResult<Self> {
        let start_time = std::time::Instant::now();

        Self::check_ports(stages)?;
        let links = Self::resolve_links(stages)?;
        let order = Self::topological_order(stages, &links)?;

        let stats = PlanStats {
            total_stages: stages.len(),
            source_stages: stages
                .iter()
                .filter(|s| !Self::has_port(s, PortDirection::Input))
                .count(),
            sink_stages: stages
                .iter()
                .filter(|s| !Self::has_port(s, PortDirection::Output))
                .count(),
            channels: links.len(),
            compile_time_us: start_time.elapsed().as_micros() as u64,
        };

        Ok(Self {
            order,
            links,
            stats,
        })
    }

    fn has_port(stage: &StageView, direction: PortDirection) -> bool {
        stage.ports.iter().any(|p| p.direction == direction)
    }

    /// Every port must be wired.
    fn check_ports(stages: &[StageView]) -> PipelineResult<()> {
        for stage in stages {
            if let Some(port) = stage.ports.iter().find(|p| !p.is_wired()) {
                return Err(match port.direction {
                    PortDirection::Input => PipelineError::UnboundInput {
                        stage_id: stage.id,
                        stage: stage.name.clone(),
                        port: port.name,
                    },
                    PortDirection::Output => PipelineError::UnconnectedOutput {
                        stage_id: stage.id,
                        stage: stage.name.clone(),
                        port: port.name,
                    },
                });
            }
        }
        Ok(())
    }

    /// Pair every channel's writer with its reader.
    fn resolve_links(stages: &[StageView]) -> PipelineResult<Vec<Link>> {
        let mut channels: BTreeMap<ChannelId, Endpoints> = BTreeMap::new();

        for (idx, stage) in stages.iter().enumerate() {
            for port in &stage.ports {
                let Some(channel) = port.channel else {
                    continue;
                };
                let ends = channels.entry(channel).or_default();
                let end = Some((idx, stage.name.as_str(), port.name));
                match port.direction {
                    PortDirection::Output => ends.writer = end,
                    PortDirection::Input => ends.reader = end,
                }
            }
        }

        let mut links = Vec::with_capacity(channels.len());
        for (channel, ends) in channels {
            match (ends.writer, ends.reader) {
                (Some((from, _, _)), Some((to, _, _))) => links.push(Link {
                    channel,
                    from: stages[from].id,
                    to: stages[to].id,
                }),
                (Some((_, stage, port)), None) | (None, Some((_, stage, port))) => {
                    return Err(PipelineError::UnregisteredPeer {
                        stage: stage.to_string(),
                        port,
                        channel,
                    });
                }
                (None, None) => {}
            }
        }
        Ok(links)
    }

    /// Kahn's algorithm over the resolved links.
    fn topological_order(stages: &[StageView], links: &[Link]) -> PipelineResult<Vec<StageId>> {
        let n = stages.len();
        let position = |id: StageId| stages.iter().position(|s| s.id == id);

        let mut adj = vec![Vec::new(); n];
        let mut in_degree = vec![0u32; n];
        for link in links {
            if let (Some(from), Some(to)) = (position(link.from), position(link.to)) {
                adj[from].push(to);
                in_degree[to] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(stages[idx].id);
            for &next in &adj[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != n {
            tracing::warn!(
                "Pipeline graph has a cycle! Only {} of {} stages ordered.",
                order.len(),
                n
            );
            return Err(PipelineError::CycleDetected);
        }

        Ok(order)
    }
}
