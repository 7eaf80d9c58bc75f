//! Data models: the intake record and pipeline configuration.

pub mod config;
pub mod record;
