//! Normalization of scores that come from outside the engine.
//!
//! - JSON scoring responses from an LLM reviewer (`normalize`)
//! - ratings embedded in reviewer prose (`reviews`)

pub mod normalize;
pub mod reviews;

pub use normalize::*;
pub use reviews::*;
