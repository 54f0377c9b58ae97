//! Map stage: one in, one out, one function call per element.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::pipeline::channel::{Inport, Outport};
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;
use std::marker::PhantomData;

/// Applies `func` to every value read from `input` and writes the result to
/// `output`. Strictly 1:1 and order preserving.
pub struct Map<I, O, F> {
    name: String,
    func: F,
    pub input: Inport<I>,
    pub output: Outport<O>,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O, F> Map<I, O, F>
where
    F: FnMut(I) -> O,
{
    pub fn new(func: F) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, func)
    }

    pub fn with_capacity(capacity: usize, func: F) -> Self {
        Self {
            name: "map".to_string(),
            func,
            input: Inport::new("in"),
            output: Outport::new("out", capacity),
            _marker: PhantomData,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<I, O, F> Stage for Map<I, O, F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: FnMut(I) -> O + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![self.input.descriptor(), self.output.descriptor()]
    }

    fn run(self: Box<Self>) {
        let Map {
            name,
            mut func,
            input,
            output,
            ..
        } = *self;

        let mut processed = 0u64;
        while let Some(value) = input.recv() {
            if output.send(func(value)).is_err() {
                tracing::debug!("Stage '{}': reader gone, stopping early", name);
                break;
            }
            processed += 1;
        }
        output.close();
        tracing::debug!("Stage '{}' mapped {} items", name, processed);
    }
}
