//! Export New Relic alerting configuration to CSV for review.

pub mod config;
pub mod error;
pub mod export;
pub mod ids;
pub mod join;
pub mod nerdgraph;
pub mod rest;
