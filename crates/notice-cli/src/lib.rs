//! CLI library components for the notice pipeline.

pub mod logging;
pub mod pipeline;
