//! Stage-based flow pipeline.
//!
//! Stages run concurrently, one thread each, and talk only through bounded
//! typed channels. Each channel has exactly one writer and one reader.
//!
//! # Architecture
//!
//! ```text
//! [Source] ──► [Map] ──► [Split] ──┬──► [Map] ──┐
//!                                  └──► [Map] ──┴──► [Merge] ──► [Sink]
//! ```
//!
//! # Lifecycle
//!
//! 1. Construct stages. Each stage creates the channels of its outputs.
//! 2. Wire with `Outport::connect`; each input is bound exactly once.
//! 3. Register the stages with a `PipelineRunner`.
//! 4. `run` validates the graph, starts every stage, and joins them.
//!
//! Termination flows downstream: the source closes its output when done, and
//! every other stage closes its outputs once its inputs report
//! `ChannelState::ClosedEmpty`.

pub mod channel;
pub mod error;
pub mod graph;
pub mod id;
pub mod port;
pub mod runner;
pub mod stage;
pub mod stages;

pub use channel::{ChannelState, Inport, Outport};
pub use error::{PipelineError, PipelineResult};
pub use graph::{Link, PlanStats, StageView, TopologyPlan};
pub use id::{ChannelId, StageId};
pub use port::{PortDescriptor, PortDirection};
pub use runner::{PipelineRunner, RunReport, StageReport};
pub use stage::Stage;
