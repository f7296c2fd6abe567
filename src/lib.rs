//! `resonance-panel` library crate.
//!
//! The binary (`panel`) is a thin wrapper around this library so that:
//!
//! - the scoring core is testable without spawning processes
//! - a web front end or worker can call the pipelines directly
//! - the core stays free of transport, storage and rendering concerns

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod media;
pub mod panel;
pub mod report;
pub mod verdict;
