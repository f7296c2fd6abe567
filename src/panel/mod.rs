//! Synthetic panel scoring.
//!
//! Data flows strictly leaf-first:
//!
//! - normalize each respondent's token log-probabilities (`logprob`)
//! - merge respondents into a population distribution (`aggregate`)
//! - turn the population distribution into survey counts (`survey`)
//! - roll the counts up into a Net Promoter Score (`nps`)

pub mod aggregate;
pub mod logprob;
pub mod nps;
pub mod survey;

pub use aggregate::*;
pub use logprob::*;
pub use nps::*;
pub use survey::*;
