//! Merge stage: two in, one out, paired by index.
//!
//! Each iteration reads once from `left`, then once from `right`, blocking on
//! each. The stage stops only when **both** reads report closed. If just one
//! side is closed, its value is replaced by `Default::default()` and the pair
//! is still combined, so unequal inputs yield `max(N, M)` outputs with the
//! shorter side zero-padded.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::pipeline::channel::{Inport, Outport};
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;
use std::marker::PhantomData;

/// Combines the i-th value of `left` with the i-th value of `right`.
pub struct Merge<A, B, O, F> {
    name: String,
    func: F,
    pub left: Inport<A>,
    pub right: Inport<B>,
    pub output: Outport<O>,
    _marker: PhantomData<fn(A, B) -> O>,
}

impl<A, B, O, F> Merge<A, B, O, F>
where
    A: Default,
    B: Default,
    F: FnMut(A, B) -> O,
{
    pub fn new(func: F) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, func)
    }

    pub fn with_capacity(capacity: usize, func: F) -> Self {
        Self {
            name: "merge".to_string(),
            func,
            left: Inport::new("left"),
            right: Inport::new("right"),
            output: Outport::new("out", capacity),
            _marker: PhantomData,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<A, B, O, F> Stage for Merge<A, B, O, F>
where
    A: Default + Send + 'static,
    B: Default + Send + 'static,
    O: Send + 'static,
    F: FnMut(A, B) -> O + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![
            self.left.descriptor(),
            self.right.descriptor(),
            self.output.descriptor(),
        ]
    }

    fn run(self: Box<Self>) {
        let Merge {
            name,
            mut func,
            left,
            right,
            output,
            ..
        } = *self;

        let mut merged = 0u64;
        let mut padded = 0u64;
        loop {
            let a = left.recv();
            let b = right.recv();
            if a.is_none() && b.is_none() {
                break;
            }
            if a.is_none() || b.is_none() {
                if padded == 0 {
                    tracing::warn!(
                        "Stage '{}': inputs ended at different lengths after {} pairs, zero-padding",
                        name,
                        merged
                    );
                }
                padded += 1;
            }
            let combined = func(a.unwrap_or_default(), b.unwrap_or_default());
            if output.send(combined).is_err() {
                tracing::debug!("Stage '{}': reader gone, stopping early", name);
                break;
            }
            merged += 1;
        }
        output.close();
        tracing::debug!(
            "Stage '{}' merged {} items ({} zero-padded)",
            name,
            merged,
            padded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::test_util::run_to_completion;
    use crate::text::concat;
    use crossbeam_channel::unbounded;
    use proptest::prelude::*;
    use std::time::Duration;

    fn merge_all(a: Vec<u32>, b: Vec<u32>) -> Vec<(u32, u32)> {
        let cap = a.len().max(b.len()).max(1);
        let mut feed_a = Outport::new("a", cap);
        let mut feed_b = Outport::new("b", cap);
        let mut merge = Merge::with_capacity(cap, |x: u32, y: u32| (x, y));
        let mut drain = Inport::new("drain");
        feed_a.connect(&mut merge.left).unwrap();
        feed_b.connect(&mut merge.right).unwrap();
        merge.output.connect(&mut drain).unwrap();

        for v in a {
            feed_a.send(v).unwrap();
        }
        for v in b {
            feed_b.send(v).unwrap();
        }
        feed_a.close();
        feed_b.close();
        run_to_completion(merge);

        drain.iter().collect()
    }

    #[test]
    fn test_equal_lengths() {
        assert_eq!(
            merge_all(vec![1, 2, 3], vec![10, 20, 30]),
            vec![(1, 10), (2, 20), (3, 30)]
        );
    }

    #[test]
    fn test_shorter_right_is_zero_padded() {
        assert_eq!(
            merge_all(vec![1, 2, 3], vec![10]),
            vec![(1, 10), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn test_shorter_left_is_zero_padded() {
        assert_eq!(
            merge_all(vec![], vec![10, 20]),
            vec![(0, 10), (0, 20)]
        );
    }

    #[test]
    fn test_both_empty() {
        assert!(merge_all(vec![], vec![]).is_empty());
    }

    #[test]
    fn test_empty_strings_combine() {
        let mut feed_a = Outport::new("a", 1);
        let mut feed_b = Outport::new("b", 1);
        let mut merge = Merge::with_capacity(1, concat);
        let mut drain = Inport::new("drain");
        feed_a.connect(&mut merge.left).unwrap();
        feed_b.connect(&mut merge.right).unwrap();
        merge.output.connect(&mut drain).unwrap();

        feed_a.send(String::new()).unwrap();
        feed_b.send(String::new()).unwrap();
        feed_a.close();
        feed_b.close();
        run_to_completion(merge);

        assert_eq!(drain.iter().collect::<Vec<_>>(), vec![String::new()]);
    }

    #[test]
    fn test_unbound_input_blocks_forever() {
        // Without validation, a merge with one input never wired hangs on
        // that input even after the other side closes.
        let mut feed = Outport::new("a", 1);
        let mut merge = Merge::with_capacity(1, |x: u8, y: u8| x + y);
        let mut drain = Inport::new("drain");
        feed.connect(&mut merge.left).unwrap();
        merge.output.connect(&mut drain).unwrap();
        feed.close();

        let (done_tx, done_rx) = unbounded();
        std::thread::spawn(move || {
            Box::new(merge).run();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert_eq!(drain.state(), crate::pipeline::ChannelState::Open);
    }

    proptest! {
        #[test]
        fn test_pairing_property(
            a in prop::collection::vec(1u32..1000, 0..50),
            b in prop::collection::vec(1u32..1000, 0..50),
        ) {
            let got = merge_all(a.clone(), b.clone());

            // Property: max(N, M) outputs
            prop_assert_eq!(got.len(), a.len().max(b.len()));

            for (i, &(x, y)) in got.iter().enumerate() {
                // Property: i-th pairs with i-th, zero beyond the shorter side
                prop_assert_eq!(x, a.get(i).copied().unwrap_or(0));
                prop_assert_eq!(y, b.get(i).copied().unwrap_or(0));
            }
        }
    }
}
