//! Collecting sinks for inspecting what reached the end of a pipeline

use crossbeam_channel::{unbounded, Receiver};
use flowpipe::pipeline::stages::Sink;

/// A sink that forwards every value into an unbounded channel.
pub fn collecting_sink<T: Send + 'static>() -> (Sink<T, impl FnMut(T) + Send + 'static>, Receiver<T>)
{
    let (tx, rx) = unbounded();
    let sink = Sink::new(move |v: T| {
        let _ = tx.send(v);
    })
    .named("collector");
    (sink, rx)
}

/// Everything the collector received, once the pipeline has finished.
pub fn drain<T>(rx: &Receiver<T>) -> Vec<T> {
    rx.try_iter().collect()
}
