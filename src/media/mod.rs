//! News comparison and audience resonance.
//!
//! Responsibilities:
//!
//! - derive topic keywords and a search query from the message (`topics`)
//! - filter and rank the articles returned by the news search (`ranker`)
//! - score how well the message lands with each target audience (`resonance`)

pub mod ranker;
pub mod resonance;
pub mod topics;

pub use ranker::*;
pub use resonance::*;
pub use topics::*;
