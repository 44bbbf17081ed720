//! Output module
//!
//! Record sinks receive every collected record together with its context.
//!
//! # Overview
//!
//! - `RecordSink` - the sink capability (`new_output`, `write_record`, `finish`)
//! - `JsonLinesSink` - one `.jsonl` file per record type
//! - `StdoutSink` - JSON lines on standard output

mod sinks;
mod types;

pub use sinks::{JsonLinesSink, StdoutSink};
pub use types::{RecordContext, RecordEnvelope, RecordSink};

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
