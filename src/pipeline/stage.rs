//! Stage abstraction for the pipeline.
//!
//! A stage is a unit of work that owns its ports and runs on its own thread.
//! The runner only needs three things from it: a name for logs and errors,
//! a port snapshot for wiring validation, and an entry point that consumes it.

use crate::pipeline::port::{PortDescriptor, PortDirection};

/// A pipeline stage, runnable on its own thread.
///
/// `run` must return once every input is exhausted, and must close (drop)
/// every output before returning.
pub trait Stage: Send {
    /// Human-readable name of this stage.
    fn name(&self) -> &str;

    /// Current wiring of this stage's ports.
    fn ports(&self) -> Vec<PortDescriptor>;

    /// Execute until the inputs are exhausted.
    fn run(self: Box<Self>);

    /// True when every port is wired.
    fn is_connected(&self) -> bool {
        self.ports().iter().all(PortDescriptor::is_wired)
    }

    /// Number of input ports. A stage with none is a source.
    fn input_count(&self) -> usize {
        self.ports()
            .iter()
            .filter(|p| p.direction == PortDirection::Input)
            .count()
    }

    /// Number of output ports. A stage with none is a sink.
    fn output_count(&self) -> usize {
        self.ports()
            .iter()
            .filter(|p| p.direction == PortDirection::Output)
            .count()
    }
}
