//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - rating distributions and simulated samples (`RatingDistribution`, `SimulatedSample`)
//! - article inputs and ranked outputs (`RawArticle`, `ArticleRecord`)
//! - resonance outputs (`MediaSnapshot`, `Decision`, `ResonanceAssessment`, `Verdict`)
//! - the per-run context object (`PanelConfig`)

pub mod types;

pub use types::*;
