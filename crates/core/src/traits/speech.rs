//! Speech synthesis boundary
//!
//! The synthesis engine itself is an external collaborator; the core only
//! consumes this command surface. "Speech started" notifications travel the
//! other way, as [`CallEvent::SpeechStarted`](crate::CallEvent) messages.

/// Interruptible speech output for one call.
///
/// Owned by exactly one call and exactly one barge-in controller; no two
/// calls share a sink instance.
///
/// # Example
///
/// ```ignore
/// let tts: Arc<dyn SynthesisSink> = Arc::new(PiperAdapter::new(config));
/// tts.speak("What's your full name?");
/// tts.stop();
/// ```
pub trait SynthesisSink: Send + Sync {
    /// Start speaking the given text. Fire-and-forget; audio delivery and
    /// completion are the adapter's concern.
    fn speak(&self, text: &str);

    /// Cut off synthesis immediately. Must be safe to call when idle:
    /// stopping an already-stopped sink is a no-op, never an error.
    fn stop(&self);
}
