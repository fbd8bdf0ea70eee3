//! Keyword intent classification
//!
//! Deliberately shallow: a fixed keyword table behind a pure function
//! returning `Option<Intent>`, so it can be swapped for a real NLU
//! component without touching the FSM or the session loop. Classification
//! is best-effort and never fails; no match leaves the current intent
//! unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use clinic_voice_core::Intent;

// Rescheduling is tested before booking: "reschedule" contains
// "schedule" and must not fall into the booking bucket.
static RESCHEDULING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)resched|move").unwrap());
static BOOKING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)book|schedul").unwrap());
static CANCELLATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cancel").unwrap());
static GENERAL_INFO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)hours|location|address|insurance").unwrap());
static ESCALATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)human|staff|nurse|doctor|representative").unwrap());

/// Emergency phrases that override all normal classification.
static EMERGENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)chest pain|trouble breathing|stroke|unconscious").unwrap());

/// Classify a finalized utterance into an intent, if any keyword matches.
pub fn classify_intent(text: &str) -> Option<Intent> {
    if RESCHEDULING.is_match(text) {
        return Some(Intent::AppointmentRescheduling);
    }
    if BOOKING.is_match(text) {
        return Some(Intent::AppointmentBooking);
    }
    if CANCELLATION.is_match(text) {
        return Some(Intent::AppointmentCancellation);
    }
    if GENERAL_INFO.is_match(text) {
        return Some(Intent::GeneralInfo);
    }
    if ESCALATION.is_match(text) {
        return Some(Intent::EscalateToHuman);
    }
    None
}

/// Whether the utterance mentions an emergency symptom.
///
/// A match always short-circuits normal intent flow: the session speaks a
/// safety redirect and escalates immediately.
pub fn is_emergency(text: &str) -> bool {
    EMERGENCY.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_keywords() {
        assert_eq!(
            classify_intent("I'd like to book an appointment"),
            Some(Intent::AppointmentBooking)
        );
        assert_eq!(
            classify_intent("can I schedule a visit"),
            Some(Intent::AppointmentBooking)
        );
    }

    #[test]
    fn cancellation_keyword() {
        assert_eq!(
            classify_intent("please cancel my appointment"),
            Some(Intent::AppointmentCancellation)
        );
    }

    #[test]
    fn rescheduling_wins_over_its_schedule_substring() {
        assert_eq!(
            classify_intent("I need to reschedule my appointment"),
            Some(Intent::AppointmentRescheduling)
        );
        assert_eq!(
            classify_intent("can we move my visit to Friday"),
            Some(Intent::AppointmentRescheduling)
        );
    }

    #[test]
    fn info_keywords() {
        for utterance in [
            "what are your hours",
            "where is your location",
            "what's the address",
            "do you take my insurance",
        ] {
            assert_eq!(classify_intent(utterance), Some(Intent::GeneralInfo));
        }
    }

    #[test]
    fn escalation_keywords() {
        assert_eq!(
            classify_intent("let me talk to a human"),
            Some(Intent::EscalateToHuman)
        );
        assert_eq!(
            classify_intent("I want a nurse"),
            Some(Intent::EscalateToHuman)
        );
    }

    #[test]
    fn no_keyword_leaves_intent_unchanged() {
        assert_eq!(classify_intent("hello there"), None);
        assert_eq!(classify_intent(""), None);
    }

    #[test]
    fn emergency_phrases_are_detected() {
        assert!(is_emergency("I have chest pain"));
        assert!(is_emergency("my father is having TROUBLE BREATHING"));
        assert!(is_emergency("she might be having a stroke"));
        assert!(is_emergency("he's unconscious"));
        assert!(!is_emergency("I want to book a checkup"));
    }
}
