//! Pagination module
//!
//! Supports: Link Header, Next URL, Single request
//!
//! # Overview
//!
//! A cursor (`BatchingRequest`) walks one paginated endpoint page by page.
//! Each call to `advance` performs at most one fetch. The first page is
//! always fetched; after that the strategy decides whether another page
//! exists. Once a cursor reports no next page it never fetches again.

mod strategies;
mod types;

pub use strategies::{
    parse_link_header, Endpoint, LinkHeaderCursor, NextUrlCursor, SingleRequest,
};
pub use types::{BatchingRequest, CursorState, CursorStrategy};
