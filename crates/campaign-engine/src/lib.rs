//! Application lifecycle, points ledger and withdrawal settlement for experience campaigns.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
