//! Typed call events
//!
//! Recognition and synthesis engines expose callback-shaped subscription
//! points ("on partial", "on final", ...). Each callback becomes a typed
//! message delivered over a channel to the orchestrator's single event
//! loop, so all per-call mutation happens on one logical sequence of
//! invocations without relying on host re-entrancy guarantees.

use serde::{Deserialize, Serialize};

/// One event on a call's inbound or outbound speech boundary.
///
/// Within one call, events are processed in the order the transport
/// delivers them. Timestamps are epoch milliseconds stamped by the
/// adapter that produced the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    /// Voice activity detected in the inbound audio, before any transcript.
    VadStart { at_ms: i64 },
    /// Unconfirmed, in-progress recognition result. May still change.
    PartialTranscript { text: String, at_ms: i64 },
    /// Confirmed recognition result for one utterance.
    FinalTranscript { text: String },
    /// The synthesis sink started producing audio.
    SpeechStarted { at_ms: i64 },
    /// Transport closed the call; ends the event loop.
    CallEnded { reason: String },
}
