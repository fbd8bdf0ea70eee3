//! Core types for the clinic voice receptionist
//!
//! Shared data model (intents, slot-filling context, prompts, call events)
//! and the traits that mark the boundary to external collaborators
//! (speech synthesis, metrics sinks). Everything here is plain data or a
//! trait object seam; no I/O, no runtime dependencies.

pub mod call;
pub mod events;
pub mod traits;

pub use call::{CallerContext, InsuranceSlot, Intent, Prompt, PromptExpectation, SlotField};
pub use events::CallEvent;
pub use traits::{MetricValue, MetricsSink, SynthesisSink};
