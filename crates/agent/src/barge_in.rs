//! Barge-in controller
//!
//! Guarantees the machine never keeps talking over the caller. A pure,
//! stateless relay from "caller is speaking" to "synthesis stops": any
//! sign of inbound speech — voice activity or a partial transcript, before
//! any words are confirmed — commands the attached sink to stop, exactly
//! once, synchronously. Stopping an idle sink is a harmless no-op.

use std::sync::Arc;

use clinic_voice_core::SynthesisSink;

/// Holds the one speech-output sink its call will ever use.
#[derive(Default)]
pub struct BargeInController {
    tts: Option<Arc<dyn SynthesisSink>>,
}

impl BargeInController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the sink. One sink per call, one call per controller.
    pub fn attach_tts(&mut self, tts: Arc<dyn SynthesisSink>) {
        self.tts = Some(tts);
    }

    /// Voice activity detected in the inbound audio; cut synthesis now,
    /// regardless of recognized text.
    pub fn on_vad_start(&self) {
        self.stop();
    }

    /// Partial (unconfirmed) transcript arrived; cut synthesis now. The
    /// content is irrelevant — any sign of speech is enough.
    pub fn on_asr_partial(&self, _text: &str) {
        self.stop();
    }

    fn stop(&self) {
        if let Some(ref tts) = self.tts {
            tracing::trace!("Barge-in: stopping synthesis");
            tts.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CountingSink {
        stops: Mutex<u32>,
    }

    impl SynthesisSink for CountingSink {
        fn speak(&self, _text: &str) {}

        fn stop(&self) {
            *self.stops.lock() += 1;
        }
    }

    #[test]
    fn vad_start_stops_the_sink_exactly_once() {
        let sink = Arc::new(CountingSink::default());
        let mut barge = BargeInController::new();
        barge.attach_tts(sink.clone());

        barge.on_vad_start();
        assert_eq!(*sink.stops.lock(), 1);
    }

    #[test]
    fn partial_transcript_stops_without_waiting_for_content() {
        let sink = Arc::new(CountingSink::default());
        let mut barge = BargeInController::new();
        barge.attach_tts(sink.clone());

        barge.on_asr_partial("uh");
        barge.on_asr_partial("");
        assert_eq!(*sink.stops.lock(), 2);
    }

    #[test]
    fn stopping_an_already_stopped_sink_is_harmless() {
        let sink = Arc::new(CountingSink::default());
        let mut barge = BargeInController::new();
        barge.attach_tts(sink.clone());

        barge.on_vad_start();
        barge.on_vad_start();
        assert_eq!(*sink.stops.lock(), 2);
    }

    #[test]
    fn unattached_controller_does_nothing() {
        let barge = BargeInController::new();
        barge.on_vad_start();
        barge.on_asr_partial("hello");
    }
}
