//! One-shot pipelines from raw logs to appended tables
//!
//! Each pipeline takes a configuration object, reads the next run number from
//! the target table, parses its inputs and appends the resulting rows. Nothing
//! here prompts or prints; the CLI layer owns console interaction.

mod assess;
mod config;
mod extract;

pub use assess::{AssessmentReport, assess_system};
pub use config::{AssessConfig, ExtractConfig};
pub use extract::{ExtractionReport, extract_max_q};
