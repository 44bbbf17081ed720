//! Response decoder module
//!
//! Turns a page body into the records written to sinks. GitHub list
//! endpoints return a top-level array, single-object endpoints (an
//! organization, a repository) return one object.

mod decoders;
mod types;

pub use decoders::{extract_path, JsonDecoder};
pub use types::RecordDecoder;

#[cfg(test)]
mod tests;
