//! FileSink stage: concatenates every received byte buffer into a file.
//!
//! No framing and no delimiters: the file ends up as the exact concatenation
//! of the buffers in arrival order. The file is created up front so a bad path
//! fails at wiring time; write failures during the run are logged and counted,
//! and the sink keeps draining so nothing upstream blocks on a full channel.

use crate::pipeline::channel::Inport;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::stage::Stage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters shared between a running `FileSink` and whoever built it.
#[derive(Debug, Default)]
pub struct SinkStats {
    items: AtomicU64,
    bytes: AtomicU64,
    write_errors: AtomicU64,
}

impl SinkStats {
    pub fn items(&self) -> u64 {
        self.items.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }
}

/// Writes `Vec<u8>` values to a file through a `BufWriter`.
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    stats: Arc<SinkStats>,
    pub input: Inport<Vec<u8>>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            tracing::error!("FileSink failed to open file {:?}: {}", path, e);
            e
        })?;
        tracing::info!("FileSink opened file: {:?}", path);

        Ok(Self {
            name: "file_sink".to_string(),
            path,
            writer: BufWriter::new(file),
            stats: Arc::new(SinkStats::default()),
            input: Inport::new("in"),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle to the sink's counters, readable while and after it runs.
    pub fn stats(&self) -> Arc<SinkStats> {
        Arc::clone(&self.stats)
    }
}

impl Stage for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<PortDescriptor> {
        vec![self.input.descriptor()]
    }

    fn run(self: Box<Self>) {
        let FileSink {
            name,
            path,
            mut writer,
            stats,
            input,
        } = *self;

        for bytes in input.iter() {
            match writer.write_all(&bytes) {
                Ok(()) => {
                    stats.items.fetch_add(1, Ordering::Relaxed);
                    stats.bytes.fetch_add(bytes.len() as u64, Ordering::Relaxed);
                }
                Err(e) => {
                    if stats.write_errors.fetch_add(1, Ordering::Relaxed) == 0 {
                        tracing::error!("Stage '{}' failed to write {:?}: {}", name, path, e);
                    }
                }
            }
        }

        if let Err(e) = writer.flush() {
            stats.write_errors.fetch_add(1, Ordering::Relaxed);
            tracing::error!("Stage '{}' failed to flush {:?}: {}", name, path, e);
        }

        tracing::info!(
            "FileSink closed file {:?} after {} items ({} bytes)",
            path,
            stats.items(),
            stats.bytes()
        );
    }
}
