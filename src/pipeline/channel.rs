//! Typed channel endpoints.
//!
//! A channel is created by its producing [`Outport`] and handed to exactly one
//! [`Inport`] by [`Outport::connect`]. The producer is the only party that can
//! close it, either explicitly with [`Outport::close`] or by being dropped.
//!
//! ```text
//!   Outport ──(bounded FIFO, capacity C)──► Inport
//!      │ close / drop                          │ recv() == None
//!      └──────────── Open → ClosedNonEmpty → ClosedEmpty
//! ```

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::id::ChannelId;
use crate::pipeline::port::PortDescriptor;
use crossbeam_channel::{bounded, never, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of a channel as observed by its reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// The producer may still write.
    Open,
    /// The producer has closed the channel but buffered values remain.
    ClosedNonEmpty,
    /// Closed and drained. Reads return `None` without blocking.
    ClosedEmpty,
}

impl ChannelState {
    #[inline]
    pub fn is_closed(self) -> bool {
        !matches!(self, ChannelState::Open)
    }

    /// The exit predicate shared by every stage: nothing left to read, ever.
    #[inline]
    pub fn is_exhausted(self) -> bool {
        matches!(self, ChannelState::ClosedEmpty)
    }
}

#[derive(Debug)]
struct ChannelShared {
    id: ChannelId,
    capacity: usize,
    closed: AtomicBool,
}

/// Producing end of a channel. Not `Clone`: one writer per channel.
pub struct Outport<T> {
    name: &'static str,
    shared: Arc<ChannelShared>,
    tx: Option<Sender<T>>,
    /// Reading end, held until a consumer connects.
    pending_rx: Option<Receiver<T>>,
}

impl<T> Outport<T> {
    /// Create the port together with its empty channel.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self {
            name,
            shared: Arc::new(ChannelShared {
                id: ChannelId::next(),
                capacity,
                closed: AtomicBool::new(false),
            }),
            tx: Some(tx),
            pending_rx: Some(rx),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn channel_id(&self) -> ChannelId {
        self.shared.id
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// True once a reader holds the other end.
    pub fn is_connected(&self) -> bool {
        self.pending_rx.is_none()
    }

    /// Hand the reading end of this channel to `input`.
    ///
    /// Fails if this output already has a reader or `input` is already bound.
    pub fn connect(&mut self, input: &mut Inport<T>) -> PipelineResult<()> {
        if let Some(bound) = &input.shared {
            return Err(PipelineError::PortAlreadyConnected {
                port: input.name,
                channel: bound.id,
            });
        }
        let rx = self
            .pending_rx
            .take()
            .ok_or(PipelineError::PortAlreadyConnected {
                port: self.name,
                channel: self.shared.id,
            })?;
        input.rx = rx;
        input.shared = Some(Arc::clone(&self.shared));
        tracing::trace!(
            "Connected '{}' -> '{}' via {}",
            self.name,
            input.name,
            self.shared.id
        );
        Ok(())
    }

    /// Write one value, blocking while the channel is full.
    ///
    /// Fails only when the reader has gone away.
    pub fn send(&self, value: T) -> PipelineResult<()> {
        match &self.tx {
            Some(tx) => tx.send(value).map_err(|_| PipelineError::ChannelSend),
            None => Err(PipelineError::ChannelSend),
        }
    }

    /// Close the channel. Equivalent to dropping the port.
    pub fn close(self) {}

    pub fn descriptor(&self) -> PortDescriptor {
        PortDescriptor::output(self.name, self.is_connected().then_some(self.shared.id))
    }
}

impl<T> Drop for Outport<T> {
    fn drop(&mut self) {
        // Mark closed before the sender goes, so a reader that sees the
        // disconnect never observes `Open`.
        self.shared.closed.store(true, Ordering::Release);
        self.tx.take();
    }
}

/// Consuming end of a channel.
///
/// An unbound input reads from a channel that never delivers, so reading it
/// blocks forever. `PipelineRunner::validate` rejects such stages.
pub struct Inport<T> {
    name: &'static str,
    rx: Receiver<T>,
    shared: Option<Arc<ChannelShared>>,
}

impl<T> Inport<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rx: never(),
            shared: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_bound(&self) -> bool {
        self.shared.is_some()
    }

    pub fn channel_id(&self) -> Option<ChannelId> {
        self.shared.as_ref().map(|s| s.id)
    }

    /// Read the next value. `None` means closed and drained.
    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Number of values currently buffered.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn state(&self) -> ChannelState {
        let Some(shared) = &self.shared else {
            return ChannelState::Open;
        };
        if !shared.closed.load(Ordering::Acquire) {
            ChannelState::Open
        } else if self.rx.is_empty() {
            ChannelState::ClosedEmpty
        } else {
            ChannelState::ClosedNonEmpty
        }
    }

    /// Blocking iterator over the remaining values, ending on close.
    pub fn iter(&self) -> crossbeam_channel::Iter<'_, T> {
        self.rx.iter()
    }

    pub fn descriptor(&self) -> PortDescriptor {
        PortDescriptor::input(self.name, self.channel_id())
    }
}
