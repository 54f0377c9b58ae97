//! Pipeline-specific error types.

use crate::pipeline::id::{ChannelId, StageId};
use thiserror::Error;

/// Errors that can occur while wiring or starting a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Port '{port}' is already connected to {channel}")]
    PortAlreadyConnected {
        port: &'static str,
        channel: ChannelId,
    },

    #[error("Stage '{stage}' ({stage_id}) has unbound input port '{port}'")]
    UnboundInput {
        stage_id: StageId,
        stage: String,
        port: &'static str,
    },

    #[error("Stage '{stage}' ({stage_id}) has unconnected output port '{port}'")]
    UnconnectedOutput {
        stage_id: StageId,
        stage: String,
        port: &'static str,
    },

    #[error("Stage '{stage}' port '{port}' is wired to {channel}, whose peer is not registered")]
    UnregisteredPeer {
        stage: String,
        port: &'static str,
        channel: ChannelId,
    },

    #[error("Cycle detected in pipeline graph")]
    CycleDetected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel send error")]
    ChannelSend,
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
