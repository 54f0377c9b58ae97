//! Split stage: one in, two out.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::pipeline::channel::{Inport, Outport};
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;
use std::marker::PhantomData;

/// Partitions every input value into a left and a right part.
///
/// The left part of value *i* is written to `left` before its right part is
/// written to `right`. Each output preserves input order on its own; nothing
/// orders the two outputs relative to each other downstream.
pub struct Split<I, L, R, F> {
    name: String,
    func: F,
    pub input: Inport<I>,
    pub left: Outport<L>,
    pub right: Outport<R>,
    _marker: PhantomData<fn(I) -> (L, R)>,
}

impl<I, L, R, F> Split<I, L, R, F>
where
    F: FnMut(I) -> (L, R),
{
    pub fn new(func: F) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, func)
    }

    pub fn with_capacity(capacity: usize, func: F) -> Self {
        Self {
            name: "split".to_string(),
            func,
            input: Inport::new("in"),
            left: Outport::new("left", capacity),
            right: Outport::new("right", capacity),
            _marker: PhantomData,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<I, L, R, F> Stage for Split<I, L, R, F>
where
    I: Send + 'static,
    L: Send + 'static,
    R: Send + 'static,
    F: FnMut(I) -> (L, R) + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![
            self.input.descriptor(),
            self.left.descriptor(),
            self.right.descriptor(),
        ]
    }

    fn run(self: Box<Self>) {
        let Split {
            name,
            mut func,
            input,
            left,
            right,
            ..
        } = *self;

        let mut processed = 0u64;
        while let Some(value) = input.recv() {
            let (l, r) = func(value);
            if left.send(l).is_err() || right.send(r).is_err() {
                tracing::debug!("Stage '{}': reader gone, stopping early", name);
                break;
            }
            processed += 1;
        }
        left.close();
        right.close();
        tracing::debug!("Stage '{}' split {} items", name, processed);
    }
}
