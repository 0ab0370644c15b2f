pub mod error;
pub mod generator;

pub use error::{Result, SeederError};
pub use generator::{ScoreGenerator, SeedSummary, Submission, seed};
