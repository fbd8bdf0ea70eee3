//! Boundary traits for external collaborators

pub mod metrics;
pub mod speech;

pub use metrics::{MetricValue, MetricsSink};
pub use speech::SynthesisSink;
