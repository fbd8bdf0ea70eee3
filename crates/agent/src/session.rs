//! Call session orchestrator
//!
//! The only component touching both the recognition/synthesis boundary
//! and the FSM/router, and the only one allowed to classify utterance
//! text into an intent.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  CallEvent   ┌─────────────┐  prompt   ┌───────────┐
//! │  ASR/TTS  │─────────────▶│ CallSession │──────────▶│    TTS    │
//! │  adapter  │   (mpsc)     │ (one loop)  │  speak()  │   sink    │
//! └───────────┘              └──────┬──────┘           └───────────┘
//!                                   │ dispatch
//!                                   ▼
//!                             ┌───────────┐
//!                             │ ToolRouter│
//!                             └───────────┘
//! ```
//!
//! All per-call mutation happens inside one event loop, so ordering is
//! the transport's delivery order and a barge-in stop always lands before
//! any later speak command from the same sequence. Tool dispatch is the
//! only suspension point.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

use clinic_voice_core::{CallEvent, CallerContext, MetricsSink, SlotField, SynthesisSink};
use clinic_voice_tools::{ToolName, ToolRouter};

use crate::barge_in::BargeInController;
use crate::fsm::ClinicFsm;
use crate::intent::{classify_intent, is_emergency};
use crate::metrics::{MetricsEvent, MetricsTracker};
use crate::AgentError;

/// Spoken when an utterance mentions an emergency symptom.
const SAFETY_REDIRECT: &str = "This sounds urgent. Please hang up and dial emergency services \
                               now. I can also connect you to a staff member.";

/// Call session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSessionConfig {
    /// Enable barge-in (cut synthesis on any sign of caller speech)
    pub barge_in_enabled: bool,
    /// Capacity of the inbound call-event channel
    pub event_buffer: usize,
}

impl Default for CallSessionConfig {
    fn default() -> Self {
        Self {
            barge_in_enabled: true,
            event_buffer: 64,
        }
    }
}

/// Orchestration state for a single call.
///
/// Created at call start, discarded at call end; nothing persists across
/// calls. Owned by one event loop — never shared between calls or tasks.
pub struct CallSession {
    call_id: String,
    config: CallSessionConfig,
    fsm: ClinicFsm,
    barge_in: BargeInController,
    metrics: MetricsTracker,
    router: Arc<ToolRouter>,
    tts: Arc<dyn SynthesisSink>,
}

impl CallSession {
    pub fn new(
        call_id: impl Into<String>,
        config: CallSessionConfig,
        router: Arc<ToolRouter>,
        tts: Arc<dyn SynthesisSink>,
    ) -> Self {
        let mut barge_in = BargeInController::new();
        barge_in.attach_tts(tts.clone());

        Self {
            call_id: call_id.into(),
            config,
            fsm: ClinicFsm::new(),
            barge_in,
            metrics: MetricsTracker::started_now(),
            router,
            tts,
        }
    }

    /// Attach the metrics sink (builder-style, at most once, optional).
    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics.attach_sink(sink);
        self
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn context(&self) -> &CallerContext {
        self.fsm.context()
    }

    pub fn fsm(&self) -> &ClinicFsm {
        &self.fsm
    }

    pub fn router(&self) -> &Arc<ToolRouter> {
        &self.router
    }

    /// Fill (or decline) a slot on behalf of the slot-extraction layer.
    pub fn update_slot(&mut self, field: SlotField, value: Option<String>) {
        self.fsm.update(field, value);
    }

    /// Speak the opening prompt for the call.
    pub fn greet(&self) {
        self.speak(&self.fsm.next_prompt().text);
    }

    /// Process one call event.
    ///
    /// Tool dispatch errors propagate to the caller unchanged; there is no
    /// retry here. Everything else is synchronous and non-blocking.
    pub async fn handle_event(&mut self, event: CallEvent) -> Result<(), AgentError> {
        match event {
            CallEvent::VadStart { at_ms: _ } => {
                if self.config.barge_in_enabled {
                    self.barge_in.on_vad_start();
                }
            }
            CallEvent::PartialTranscript { text, at_ms } => {
                if self.config.barge_in_enabled {
                    self.barge_in.on_asr_partial(&text);
                }
                self.metrics.handle(MetricsEvent::AsrPartialReceived { at_ms });
            }
            CallEvent::SpeechStarted { at_ms } => {
                self.metrics.handle(MetricsEvent::TtsStarted { at_ms });
            }
            CallEvent::FinalTranscript { text } => {
                self.on_final_utterance(&text).await?;
            }
            CallEvent::CallEnded { reason } => {
                tracing::info!(call_id = %self.call_id, reason = %reason, "Call ended");
            }
        }
        Ok(())
    }

    /// Drain events until the channel closes or a `CallEnded` arrives.
    ///
    /// Errors from event handling propagate out and end the loop; surfacing
    /// a failed booking beats masking it from the caller.
    pub async fn run(mut self, mut events: mpsc::Receiver<CallEvent>) -> Result<(), AgentError> {
        while let Some(event) = events.recv().await {
            let ended = matches!(event, CallEvent::CallEnded { .. });
            self.handle_event(event).await?;
            if ended {
                break;
            }
        }
        Ok(())
    }

    async fn on_final_utterance(&mut self, text: &str) -> Result<(), AgentError> {
        // Emergency handling always short-circuits normal flow.
        if is_emergency(text) {
            tracing::warn!(call_id = %self.call_id, "Emergency keywords in utterance");
            self.speak(SAFETY_REDIRECT);
            self.router
                .dispatch(
                    ToolName::EscalateToHuman.as_str(),
                    &json!({"reason": "urgent_symptoms", "callback_number": null}),
                )
                .await?;
            self.metrics.handle(MetricsEvent::EscalationTriggered);
            return Ok(());
        }

        if let Some(intent) = classify_intent(text) {
            tracing::debug!(call_id = %self.call_id, intent = %intent, "Classified utterance");
            self.fsm.set_intent(intent);
        }

        let prompt = self.fsm.next_prompt();
        self.speak(&prompt.text);
        Ok(())
    }

    fn speak(&self, text: &str) {
        tracing::trace!(call_id = %self.call_id, text = %text, "Speaking");
        self.tts.speak(text);
    }
}
