//! Call-turn orchestration for the clinic voice receptionist
//!
//! Coordinates a stream of recognition events against a conversation state
//! machine, a barge-in controller that cuts synthesis the instant the
//! caller speaks, a latency tracker keyed to conversation milestones, and
//! validated tool dispatch for side-effecting actions.
//!
//! The core is single-threaded and event-driven: one [`CallSession`] owns
//! all per-call state and mutates it from a single event loop. Tool
//! dispatch is the only suspension point.

pub mod barge_in;
pub mod fsm;
pub mod intent;
pub mod metrics;
pub mod session;

pub use barge_in::BargeInController;
pub use fsm::ClinicFsm;
pub use intent::{classify_intent, is_emergency};
pub use metrics::{MetricsEvent, MetricsTracker, RecordingSink, TelemetrySink};
pub use session::{CallSession, CallSessionConfig};

// Re-export the shared data model for convenience
pub use clinic_voice_core::{
    CallEvent, CallerContext, InsuranceSlot, Intent, MetricValue, MetricsSink, Prompt,
    PromptExpectation, SlotField, SynthesisSink,
};

use thiserror::Error;

/// Orchestration errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool dispatch failure, surfaced to the caller of the utterance
    /// handler unchanged. No retry here.
    #[error("Tool error: {0}")]
    Tool(#[from] clinic_voice_tools::ToolError),

    #[error("Session error: {0}")]
    Session(String),
}
