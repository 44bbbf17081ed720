//! Authentication module
//!
//! Supports: anonymous access, GitHub personal/app tokens, Basic auth.
//!
//! The core only sees the `Authentication` trait: an opaque identity used
//! for cursor bookkeeping plus a hook that decorates outgoing requests.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Authentication};
