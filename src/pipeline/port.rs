//! Port descriptors for the stage system.
//!
//! Each stage reports its ports (inputs/outputs) as `PortDescriptor`s. The
//! runner uses these to validate the wiring before any stage starts.

use crate::pipeline::id::ChannelId;

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Snapshot of one port of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    /// The channel this port is wired to. `None` means unbound (input) or
    /// not yet connected to a reader (output).
    pub channel: Option<ChannelId>,
}

impl PortDescriptor {
    pub const fn input(name: &'static str, channel: Option<ChannelId>) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            channel,
        }
    }

    pub const fn output(name: &'static str, channel: Option<ChannelId>) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            channel,
        }
    }

    #[inline]
    pub fn is_wired(&self) -> bool {
        self.channel.is_some()
    }
}
