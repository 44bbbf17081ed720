//! Recording sink for unit tests

use super::types::{RecordContext, RecordSink};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Something a sink was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    NewOutput(String),
    Record(JsonValue, RecordContext),
    Flush(String),
    Finish,
}

/// Sink that remembers every call
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    fail_writes: AtomicBool,
    fail_flushes: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `write_record` returns an error
    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Every `flush_output` returns an error, writes still succeed
    pub fn failing_flushes(self) -> Self {
        self.fail_flushes.store(true, Ordering::SeqCst);
        self
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Records written so far, in order
    pub fn records(&self) -> Vec<JsonValue> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Record(record, _) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Contexts of records written so far, in order
    pub fn contexts(&self) -> Vec<RecordContext> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Record(_, ctx) => Some(ctx),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn new_output(&self, record_type: &str) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::NewOutput(record_type.to_string()));
        Ok(())
    }

    async fn write_record(&self, record: &JsonValue, ctx: &RecordContext) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::sink("disk full"));
        }
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Record(record.clone(), ctx.clone()));
        Ok(())
    }

    async fn flush_output(&self, record_type: &str) -> Result<()> {
        if self.fail_flushes.load(Ordering::SeqCst) {
            return Err(Error::sink("flush failed"));
        }
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Flush(record_type.to_string()));
        Ok(())
    }

    async fn finish(&self) -> Result<()> {
        self.events.lock().unwrap().push(SinkEvent::Finish);
        Ok(())
    }
}
