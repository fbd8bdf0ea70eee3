//! Call-scoped conversation data model
//!
//! One `CallerContext` lives for exactly one call: created at call start,
//! mutated only through the FSM as slots are filled, discarded at call end.
//! Nothing here persists across calls.

use serde::{Deserialize, Serialize};

/// Caller intent, classified from a finalized utterance.
///
/// Exactly one intent is active per call at a time (or none before the
/// first classifiable utterance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    AppointmentBooking,
    AppointmentCancellation,
    AppointmentRescheduling,
    GeneralInfo,
    EscalateToHuman,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AppointmentBooking => "APPOINTMENT_BOOKING",
            Intent::AppointmentCancellation => "APPOINTMENT_CANCELLATION",
            Intent::AppointmentRescheduling => "APPOINTMENT_RESCHEDULING",
            Intent::GeneralInfo => "GENERAL_INFO",
            Intent::EscalateToHuman => "ESCALATE_TO_HUMAN",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insurance slot with an explicit three-state lifecycle.
///
/// "Not yet asked" and "asked and declined" must stay distinguishable:
/// a declined slot is never re-prompted, an unasked one is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceSlot {
    #[default]
    Unasked,
    Declined,
    Provided(String),
}

impl InsuranceSlot {
    /// Whether the prompt generator still needs to ask for this slot.
    pub fn is_unasked(&self) -> bool {
        matches!(self, InsuranceSlot::Unasked)
    }

    /// Provider name, if the caller gave one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            InsuranceSlot::Provided(p) => Some(p.as_str()),
            _ => None,
        }
    }
}

/// Slot-filling record for one call.
///
/// Slots are intent-agnostic: switching intents mid-call discards nothing,
/// it only changes which fields the prompt generator consults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallerContext {
    pub name: Option<String>,
    pub reason: Option<String>,
    pub preferred_from: Option<String>,
    pub preferred_to: Option<String>,
    pub insurance: InsuranceSlot,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub current_slot_start: Option<String>,
    pub cancel_slot_start: Option<String>,
}

/// Addressable slot fields for `ClinicFsm::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    Name,
    Reason,
    PreferredFrom,
    PreferredTo,
    Insurance,
    Phone,
    Email,
    CurrentSlotStart,
    CancelSlotStart,
}

/// What kind of answer the prompt expects from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptExpectation {
    Freeform,
    YesNo,
}

/// An utterance for the synthesis sink, produced fresh on every FSM query.
///
/// Text is kept short for streaming TTS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub expect: Option<PromptExpectation>,
}

impl Prompt {
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expect: None,
        }
    }

    pub fn expecting(text: impl Into<String>, expect: PromptExpectation) -> Self {
        Self {
            text: text.into(),
            expect: Some(expect),
        }
    }
}
