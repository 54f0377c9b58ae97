//! # flowpipe: Flow-Based Processing Pipeline
//!
//! A fixed network of stages, each on its own thread, exchanging typed values
//! over bounded channels. Closing a channel is the only way a stage learns it
//! is done, so a finite source shuts the whole network down cleanly.
//!
//! ## Architecture
//!
//! - **Pipeline**: channels, ports, stages, wiring validation and the runner
//! - **Text**: pure string helpers for the greeting network
//! - **Greeting**: the reference network, source to file
//! - **Communication**: Crossbeam bounded channels between stage threads
//!
//! ## Example
//!
//! ```ignore
//! use flowpipe::pipeline::stages::{Map, Sink, Source};
//! use flowpipe::pipeline::PipelineRunner;
//! use flowpipe::RunnerConfig;
//!
//! let mut source = Source::new(1..=3);
//! let mut double = Map::new(|x: i32| x * 2);
//! let mut print = Sink::new(|x: i32| println!("{}", x));
//!
//! source.output.connect(&mut double.input)?;
//! double.output.connect(&mut print.input)?;
//!
//! let mut runner = PipelineRunner::new(RunnerConfig::default());
//! runner.register(source);
//! runner.register(double);
//! runner.register(print);
//! runner.run()?;
//! ```

pub mod config;
pub mod error;
pub mod greeting;
pub mod pipeline;
pub mod text;

// Re-export commonly used types
pub use config::{PipelineConfig, RunnerConfig};
pub use error::{FlowError, Result};
pub use pipeline::{PipelineError, PipelineRunner, RunReport, Stage};
