//! Estate Core - shared foundation for Estate Vision
//!
//! Provides the common error type and payload fingerprinting used by the
//! generation pipeline, the session archive, and the CLI.

mod error;
mod hash;

pub use error::{EstateError, Result};
pub use hash::ContentHash;
