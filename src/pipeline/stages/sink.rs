//! Sink stage: drains its input into a callback.

use crate::pipeline::channel::Inport;
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;
use std::fmt::Display;
use std::marker::PhantomData;

/// Calls `func` for every value until the input is exhausted.
pub struct Sink<T, F> {
    name: String,
    func: F,
    pub input: Inport<T>,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> Sink<T, F>
where
    F: FnMut(T),
{
    pub fn new(func: F) -> Self {
        Self {
            name: "sink".to_string(),
            func,
            input: Inport::new("in"),
            _marker: PhantomData,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<T: Display> Sink<T, fn(T)> {
    /// Print every value on its own line to stdout.
    pub fn printer() -> Self {
        Sink::new(print_line::<T> as fn(T)).named("printer")
    }
}

fn print_line<T: Display>(value: T) {
    println!("{}", value);
}

impl<T, F> Stage for Sink<T, F>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![self.input.descriptor()]
    }

    fn run(self: Box<Self>) {
        let Sink {
            name,
            mut func,
            input,
            ..
        } = *self;

        let mut consumed = 0u64;
        for value in input.iter() {
            func(value);
            consumed += 1;
        }
        tracing::debug!("Stage '{}' consumed {} items", name, consumed);
    }
}
