//! Record sink implementations

use super::types::{RecordContext, RecordEnvelope, RecordSink};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter, Stdout};
use tokio::sync::Mutex;
use tracing::debug;

fn to_line(record: &JsonValue, ctx: &RecordContext) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(&RecordEnvelope::new(record, ctx))
        .map_err(|e| Error::sink(format!("Failed to serialize record: {e}")))?;
    line.push(b'\n');
    Ok(line)
}

// ============================================================================
// JSON Lines Sink
// ============================================================================

/// Writes one `{record_type}.jsonl` file per record type into a directory.
///
/// Files are opened in append mode so repeated runs accumulate records.
#[derive(Debug)]
pub struct JsonLinesSink {
    directory: PathBuf,
    files: Mutex<HashMap<String, BufWriter<File>>>,
}

impl JsonLinesSink {
    /// Create a sink writing into `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Output directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `record_type`
    pub fn file_path(&self, record_type: &str) -> PathBuf {
        self.directory.join(format!("{record_type}.jsonl"))
    }

    async fn open(&self, record_type: &str) -> Result<BufWriter<File>> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| Error::sink(format!("Failed to create output directory: {e}")))?;

        let path = self.file_path(record_type);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::sink(format!("Failed to open {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Opened output file");
        Ok(BufWriter::new(file))
    }
}

#[async_trait]
impl RecordSink for JsonLinesSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn new_output(&self, record_type: &str) -> Result<()> {
        let mut files = self.files.lock().await;
        if !files.contains_key(record_type) {
            let writer = self.open(record_type).await?;
            files.insert(record_type.to_string(), writer);
        }
        Ok(())
    }

    async fn write_record(&self, record: &JsonValue, ctx: &RecordContext) -> Result<()> {
        let line = to_line(record, ctx)?;
        let mut files = self.files.lock().await;
        if !files.contains_key(&ctx.record_type) {
            let writer = self.open(&ctx.record_type).await?;
            files.insert(ctx.record_type.clone(), writer);
        }
        let Some(writer) = files.get_mut(&ctx.record_type) else {
            return Err(Error::sink(format!("No output open for {}", ctx.record_type)));
        };
        writer
            .write_all(&line)
            .await
            .map_err(|e| Error::sink(format!("Failed to write record: {e}")))
    }

    async fn flush_output(&self, record_type: &str) -> Result<()> {
        let mut files = self.files.lock().await;
        let Some(writer) = files.get_mut(record_type) else {
            return Ok(());
        };
        writer
            .flush()
            .await
            .map_err(|e| Error::sink(format!("Failed to flush {record_type}: {e}")))
    }

    async fn finish(&self) -> Result<()> {
        let mut files = self.files.lock().await;
        for (record_type, writer) in files.iter_mut() {
            writer
                .flush()
                .await
                .map_err(|e| Error::sink(format!("Failed to flush {record_type}: {e}")))?;
        }
        Ok(())
    }
}

// ============================================================================
// Stdout Sink
// ============================================================================

/// Writes JSON lines to standard output
#[derive(Debug)]
pub struct StdoutSink {
    out: Mutex<BufWriter<Stdout>>,
}

impl StdoutSink {
    /// Create a stdout sink
    pub fn new() -> Self {
        Self {
            out: Mutex::new(BufWriter::new(tokio::io::stdout())),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn new_output(&self, _record_type: &str) -> Result<()> {
        Ok(())
    }

    async fn write_record(&self, record: &JsonValue, ctx: &RecordContext) -> Result<()> {
        let line = to_line(record, ctx)?;
        self.out
            .lock()
            .await
            .write_all(&line)
            .await
            .map_err(|e| Error::sink(format!("Failed to write to stdout: {e}")))
    }

    async fn flush_output(&self, _record_type: &str) -> Result<()> {
        self.finish().await
    }

    async fn finish(&self) -> Result<()> {
        self.out
            .lock()
            .await
            .flush()
            .await
            .map_err(|e| Error::sink(format!("Failed to flush stdout: {e}")))
    }
}
