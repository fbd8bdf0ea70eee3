//! Call metrics tracking
//!
//! Turns a live event stream into a small set of derived, one-shot
//! measurements anchored to call start. Latency metrics fire on the first
//! occurrence only; milestone counters fire every time. Emission goes to
//! an injectable sink; with no sink attached, measurements are computed
//! and dropped — never buffered, never panicking.

use clinic_voice_core::{MetricValue, MetricsSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Instantaneous conversation facts consumed by the tracker.
///
/// Consumed exactly once each; nothing is stored beyond the derived
/// aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsEvent {
    /// First or subsequent partial transcript, with its arrival time.
    AsrPartialReceived { at_ms: i64 },
    /// Synthesis started producing audio.
    TtsStarted { at_ms: i64 },
    BookingSucceeded,
    EscalationTriggered,
    LowConfidenceReask,
}

/// Derives latency and milestone metrics for one call.
pub struct MetricsTracker {
    start_ms: i64,
    first_partial_ms: Option<i64>,
    first_audio_ms: Option<i64>,
    sink: Option<Arc<dyn MetricsSink>>,
}

impl MetricsTracker {
    /// Anchor derived latencies to `start_ms` (epoch milliseconds).
    pub fn new(start_ms: i64) -> Self {
        Self {
            start_ms,
            first_partial_ms: None,
            first_audio_ms: None,
            sink: None,
        }
    }

    /// Anchor to the current time.
    pub fn started_now() -> Self {
        Self::new(chrono::Utc::now().timestamp_millis())
    }

    /// Attach the one sink this tracker forwards to.
    pub fn attach_sink(&mut self, sink: Arc<dyn MetricsSink>) {
        self.sink = Some(sink);
    }

    pub fn handle(&mut self, event: MetricsEvent) {
        match event {
            MetricsEvent::AsrPartialReceived { at_ms } => {
                if self.first_partial_ms.is_none() {
                    self.first_partial_ms = Some(at_ms);
                    self.emit("time_to_first_partial_ms", (at_ms - self.start_ms).into());
                }
            }
            MetricsEvent::TtsStarted { at_ms } => {
                if self.first_audio_ms.is_none() {
                    self.first_audio_ms = Some(at_ms);
                    self.emit("time_to_first_audio_ms", (at_ms - self.start_ms).into());
                }
            }
            MetricsEvent::BookingSucceeded => self.emit("booking_success", true.into()),
            MetricsEvent::EscalationTriggered => self.emit("escalation", true.into()),
            MetricsEvent::LowConfidenceReask => self.emit("low_confidence_reask", true.into()),
        }
    }

    fn emit(&self, name: &str, value: MetricValue) {
        if let Some(ref sink) = self.sink {
            sink.emit(name, value);
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::started_now()
    }
}

/// Sink that forwards to the `metrics` facade, for hosts that run a
/// recorder/exporter.
pub struct TelemetrySink;

impl MetricsSink for TelemetrySink {
    fn emit(&self, name: &str, value: MetricValue) {
        match (name, value) {
            ("time_to_first_partial_ms", MetricValue::Number(ms)) => {
                metrics::histogram!("call_time_to_first_partial_ms").record(ms);
            }
            ("time_to_first_audio_ms", MetricValue::Number(ms)) => {
                metrics::histogram!("call_time_to_first_audio_ms").record(ms);
            }
            ("booking_success", _) => {
                metrics::counter!("call_bookings_total").increment(1);
            }
            ("escalation", _) => {
                metrics::counter!("call_escalations_total").increment(1);
            }
            ("low_confidence_reask", _) => {
                metrics::counter!("call_low_confidence_reasks_total").increment(1);
            }
            (other, _) => {
                tracing::debug!(metric = other, "Unmapped metric dropped");
            }
        }
    }
}

/// Sink that records every emission, for tests.
#[derive(Default)]
pub struct RecordingSink {
    emitted: Mutex<Vec<(String, MetricValue)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<(String, MetricValue)> {
        self.emitted.lock().clone()
    }

    /// Values emitted under `name`, in order.
    pub fn values_for(&self, name: &str) -> Vec<MetricValue> {
        self.emitted
            .lock()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl MetricsSink for RecordingSink {
    fn emit(&self, name: &str, value: MetricValue) {
        self.emitted.lock().push((name.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_sink(start_ms: i64) -> (MetricsTracker, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut tracker = MetricsTracker::new(start_ms);
        tracker.attach_sink(sink.clone());
        (tracker, sink)
    }

    #[test]
    fn first_partial_emits_latency_exactly_once() {
        let (mut tracker, sink) = tracker_with_sink(1000);

        tracker.handle(MetricsEvent::AsrPartialReceived { at_ms: 1350 });
        tracker.handle(MetricsEvent::AsrPartialReceived { at_ms: 1500 });
        tracker.handle(MetricsEvent::AsrPartialReceived { at_ms: 9000 });

        let values = sink.values_for("time_to_first_partial_ms");
        assert_eq!(values, vec![MetricValue::Number(350.0)]);
    }

    #[test]
    fn first_audio_emits_latency_exactly_once() {
        let (mut tracker, sink) = tracker_with_sink(1000);

        tracker.handle(MetricsEvent::TtsStarted { at_ms: 1800 });
        tracker.handle(MetricsEvent::TtsStarted { at_ms: 2600 });

        let values = sink.values_for("time_to_first_audio_ms");
        assert_eq!(values, vec![MetricValue::Number(800.0)]);
    }

    #[test]
    fn milestone_counters_fire_every_time() {
        let (mut tracker, sink) = tracker_with_sink(0);

        tracker.handle(MetricsEvent::EscalationTriggered);
        tracker.handle(MetricsEvent::EscalationTriggered);
        tracker.handle(MetricsEvent::BookingSucceeded);
        tracker.handle(MetricsEvent::LowConfidenceReask);

        assert_eq!(sink.values_for("escalation").len(), 2);
        assert_eq!(sink.values_for("booking_success").len(), 1);
        assert_eq!(sink.values_for("low_confidence_reask").len(), 1);
    }

    #[test]
    fn no_sink_means_computed_and_dropped() {
        let mut tracker = MetricsTracker::new(0);
        tracker.handle(MetricsEvent::AsrPartialReceived { at_ms: 100 });
        tracker.handle(MetricsEvent::BookingSucceeded);
        // no panic, nothing buffered; a late sink sees nothing old
        let sink = Arc::new(RecordingSink::new());
        tracker.attach_sink(sink.clone());
        assert!(sink.emitted().is_empty());
        // and the first-partial latch already fired
        tracker.handle(MetricsEvent::AsrPartialReceived { at_ms: 200 });
        assert!(sink.values_for("time_to_first_partial_ms").is_empty());
    }
}
