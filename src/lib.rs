//! In-memory analytics core for a sales transaction dataset: load once,
//! filter per interaction, recompute every aggregate from scratch.

pub mod abc;
pub mod aggregate;
pub mod dataset;
pub mod filters;
pub mod metrics;
pub mod models;

#[cfg(test)]
pub(crate) mod testutil;
