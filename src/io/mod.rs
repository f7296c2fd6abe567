//! Input/output helpers.
//!
//! - completion payload decoding (`completion`)
//! - operator input files (`ingest`)
//! - JSON exports (`export`)

pub mod completion;
pub mod export;
pub mod ingest;

pub use completion::*;
pub use export::*;
pub use ingest::*;
