//! Source stage: emits a finite sequence, then closes its output.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::pipeline::channel::Outport;
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;

/// Emits every item of an iterator on `output`, in order.
///
/// Closing `output` at the end is the only termination signal the rest of
/// the network ever gets.
pub struct Source<I: Iterator> {
    name: String,
    items: I,
    pub output: Outport<I::Item>,
}

impl<I: Iterator> Source<I> {
    pub fn new(items: impl IntoIterator<IntoIter = I>) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, items)
    }

    pub fn with_capacity(capacity: usize, items: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            name: "source".to_string(),
            items: items.into_iter(),
            output: Outport::new("out", capacity),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<I> Stage for Source<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![self.output.descriptor()]
    }

    fn run(self: Box<Self>) {
        let Source {
            name,
            items,
            output,
        } = *self;

        let mut sent = 0u64;
        for item in items {
            if output.send(item).is_err() {
                tracing::debug!("Stage '{}': reader gone, stopping early", name);
                break;
            }
            sent += 1;
        }
        output.close();
        tracing::debug!("Stage '{}' emitted {} items", name, sent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::channel::{ChannelState, Inport};
    use crate::pipeline::stages::test_util::run_to_completion;

    #[test]
    fn test_emits_in_order_then_closes() {
        let mut source = Source::with_capacity(16, vec!["a", "b", "c"]);
        let mut input = Inport::new("in");
        source.output.connect(&mut input).unwrap();

        run_to_completion(source);

        assert_eq!(input.state(), ChannelState::ClosedNonEmpty);
        assert_eq!(input.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(input.state(), ChannelState::ClosedEmpty);
    }

    #[test]
    fn test_empty_source_closes() {
        let mut source = Source::with_capacity(1, Vec::<u8>::new());
        let mut input = Inport::new("in");
        source.output.connect(&mut input).unwrap();

        run_to_completion(source);
        assert_eq!(input.recv(), None);
    }

    #[test]
    fn test_stops_when_reader_gone() {
        // An effectively unbounded source must not hang once nobody reads.
        let mut source = Source::with_capacity(1, 0u64..);
        let mut input = Inport::new("in");
        source.output.connect(&mut input).unwrap();
        drop(input);

        run_to_completion(source);
    }

    #[test]
    fn test_ports() {
        let source = Source::new(0..3).named("numbers");
        assert_eq!(source.name(), "numbers");
        assert_eq!(source.input_count(), 0);
        assert_eq!(source.output_count(), 1);
        assert!(!source.is_connected());
    }
}
