//! Command implementations for the qlog CLI

pub mod assess;
pub mod max_q;
pub mod plot;
pub mod pmf;
