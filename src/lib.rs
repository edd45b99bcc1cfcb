//! Analysis toolkit for client/server Q-learning simulation logs
//!
//! This crate provides:
//! - Parsers for the client's Q-value traces and the end-of-episode summary
//!   blocks printed by client and server
//! - Append-only CSV tables with monotonically increasing run numbers
//! - Reconciliation of client and server views of the same run
//! - Rolling statistics, termination PMFs and chart rendering for exploration

pub mod analysis;
pub mod cli;
pub mod compare;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use types::{EpisodeNumber, EpisodeSummary, RunNumber};
