//! Conversation state machine
//!
//! State is not an explicit enum: it is derived from the active intent and
//! which `CallerContext` fields are set. `next_prompt` walks a fixed,
//! ordered checklist of required slots per intent and asks for the first
//! missing one; once the checklist is complete it returns a yes/no
//! confirmation. Re-querying with unchanged context yields the identical
//! prompt.

use clinic_voice_core::{
    CallerContext, InsuranceSlot, Intent, Prompt, PromptExpectation, SlotField,
};

/// Per-call conversation FSM: active intent plus slot-filling context.
///
/// The only mutators are [`set_intent`](Self::set_intent) and
/// [`update`](Self::update); [`next_prompt`](Self::next_prompt) is a pure
/// function of the current state.
#[derive(Debug, Default)]
pub struct ClinicFsm {
    intent: Option<Intent>,
    ctx: CallerContext,
}

impl ClinicFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &CallerContext {
        &self.ctx
    }

    pub fn intent(&self) -> Option<Intent> {
        self.intent
    }

    /// Set the active intent.
    ///
    /// Slots are intent-agnostic: switching intents mid-call discards no
    /// collected data, it only changes which slots the prompt consults.
    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = Some(intent);
    }

    /// The single mutator of the slot context.
    ///
    /// `Some(value)` fills the field. `None` marks it declined: for the
    /// insurance slot that is a distinct, remembered state that stops the
    /// prompt from re-asking; any other field simply becomes unset again
    /// and will be re-asked.
    pub fn update(&mut self, field: SlotField, value: Option<String>) {
        match field {
            SlotField::Name => self.ctx.name = value,
            SlotField::Reason => self.ctx.reason = value,
            SlotField::PreferredFrom => self.ctx.preferred_from = value,
            SlotField::PreferredTo => self.ctx.preferred_to = value,
            SlotField::Insurance => {
                self.ctx.insurance = match value {
                    Some(provider) => InsuranceSlot::Provided(provider),
                    None => InsuranceSlot::Declined,
                };
            }
            SlotField::Phone => self.ctx.phone = value,
            SlotField::Email => self.ctx.email = value,
            SlotField::CurrentSlotStart => self.ctx.current_slot_start = value,
            SlotField::CancelSlotStart => self.ctx.cancel_slot_start = value,
        }
    }

    /// Compute the next prompt to speak given the active intent and what
    /// has been collected so far.
    pub fn next_prompt(&self) -> Prompt {
        let ctx = &self.ctx;
        match self.intent {
            Some(Intent::AppointmentBooking) => {
                if ctx.name.is_none() {
                    return Prompt::say("Got it. What's your full name?");
                }
                if ctx.reason.is_none() {
                    return Prompt::say("Thanks. What's the reason for the visit?");
                }
                if ctx.preferred_from.is_none() || ctx.preferred_to.is_none() {
                    return Prompt::say("What day and time works?");
                }
                if ctx.insurance.is_unasked() {
                    return Prompt::expecting(
                        "Do you have insurance to add? You can say skip.",
                        PromptExpectation::Freeform,
                    );
                }
                if ctx.phone.is_none() {
                    return Prompt::say("What's the best phone number?");
                }
                if ctx.email.is_none() {
                    return Prompt::say("And your email?");
                }
                Prompt::expecting("I can check availability now. Ready?", PromptExpectation::YesNo)
            }
            Some(Intent::AppointmentCancellation) => {
                if ctx.name.is_none() {
                    return Prompt::say("Sure. Your full name?");
                }
                if ctx.cancel_slot_start.is_none() {
                    return Prompt::say("What is the appointment date and time?");
                }
                Prompt::expecting("Confirm cancel this appointment?", PromptExpectation::YesNo)
            }
            Some(Intent::AppointmentRescheduling) => {
                if ctx.name.is_none() {
                    return Prompt::say("Okay. What's your full name?");
                }
                if ctx.current_slot_start.is_none() {
                    return Prompt::say("What date and time is your current appointment?");
                }
                if ctx.preferred_from.is_none() || ctx.preferred_to.is_none() {
                    return Prompt::say("What new day and time works?");
                }
                Prompt::expecting(
                    "I'll search for the nearest options. Continue?",
                    PromptExpectation::YesNo,
                )
            }
            Some(Intent::GeneralInfo) => {
                Prompt::say("What would you like to know? Hours, location, or insurance?")
            }
            Some(Intent::EscalateToHuman) => {
                Prompt::expecting("I can connect you now. Should I proceed?", PromptExpectation::YesNo)
            }
            None => Prompt::say("Hi. I can help with appointments and quick info. How can I help?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_intent_yields_the_greeting() {
        let fsm = ClinicFsm::new();
        let prompt = fsm.next_prompt();
        assert!(prompt.text.contains("appointments"));
        assert!(prompt.expect.is_none());
    }

    #[test]
    fn next_prompt_is_pure() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentBooking);
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));
        assert_eq!(fsm.next_prompt(), fsm.next_prompt());
    }

    #[test]
    fn booking_walks_the_required_slots_in_order() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentBooking);

        assert!(fsm.next_prompt().text.contains("full name"));
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));

        assert!(fsm.next_prompt().text.contains("reason"));
        fsm.update(SlotField::Reason, Some("annual checkup".into()));

        assert!(fsm.next_prompt().text.contains("day and time"));
        fsm.update(SlotField::PreferredFrom, Some("2026-09-01T09:00:00Z".into()));
        // still missing the window end
        assert!(fsm.next_prompt().text.contains("day and time"));
        fsm.update(SlotField::PreferredTo, Some("2026-09-01T17:00:00Z".into()));

        let insurance = fsm.next_prompt();
        assert!(insurance.text.contains("insurance"));
        assert_eq!(insurance.expect, Some(PromptExpectation::Freeform));
        fsm.update(SlotField::Insurance, Some("aetna".into()));

        assert!(fsm.next_prompt().text.contains("phone"));
        fsm.update(SlotField::Phone, Some("+14155550100".into()));

        assert!(fsm.next_prompt().text.contains("email"));
        fsm.update(SlotField::Email, Some("ahmed@example.com".into()));

        let confirm = fsm.next_prompt();
        assert_eq!(confirm.expect, Some(PromptExpectation::YesNo));
        assert!(confirm.text.contains("availability"));
    }

    #[test]
    fn declined_insurance_is_not_reasked() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentBooking);
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));
        fsm.update(SlotField::Reason, Some("checkup".into()));
        fsm.update(SlotField::PreferredFrom, Some("2026-09-01T09:00:00Z".into()));
        fsm.update(SlotField::PreferredTo, Some("2026-09-01T17:00:00Z".into()));

        // caller said "skip"
        fsm.update(SlotField::Insurance, None);

        let prompt = fsm.next_prompt();
        assert!(prompt.text.contains("phone"), "asked: {}", prompt.text);
        assert_eq!(fsm.context().insurance, InsuranceSlot::Declined);
    }

    #[test]
    fn cancellation_checklist() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentCancellation);

        assert!(fsm.next_prompt().text.contains("full name"));
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));

        assert!(fsm.next_prompt().text.contains("date and time"));
        fsm.update(SlotField::CancelSlotStart, Some("2026-09-01T10:00:00Z".into()));

        let confirm = fsm.next_prompt();
        assert!(confirm.text.contains("Confirm cancel"));
        assert_eq!(confirm.expect, Some(PromptExpectation::YesNo));
    }

    #[test]
    fn rescheduling_checklist() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentRescheduling);
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));

        assert!(fsm.next_prompt().text.contains("current appointment"));
        fsm.update(SlotField::CurrentSlotStart, Some("2026-09-01T10:00:00Z".into()));

        assert!(fsm.next_prompt().text.contains("new day and time"));
        fsm.update(SlotField::PreferredFrom, Some("2026-09-02T09:00:00Z".into()));
        fsm.update(SlotField::PreferredTo, Some("2026-09-02T17:00:00Z".into()));

        assert_eq!(fsm.next_prompt().expect, Some(PromptExpectation::YesNo));
    }

    #[test]
    fn switching_intents_keeps_collected_slots() {
        let mut fsm = ClinicFsm::new();
        fsm.set_intent(Intent::AppointmentBooking);
        fsm.update(SlotField::Name, Some("Ahmed Khan".into()));

        fsm.set_intent(Intent::AppointmentCancellation);
        assert_eq!(fsm.context().name.as_deref(), Some("Ahmed Khan"));
        // name already filled, so cancellation asks for the slot next
        assert!(fsm.next_prompt().text.contains("date and time"));
    }

    #[test]
    fn info_and_escalation_have_no_required_slots() {
        let mut fsm = ClinicFsm::new();

        fsm.set_intent(Intent::GeneralInfo);
        let info = fsm.next_prompt();
        assert!(info.text.contains("Hours, location, or insurance"));
        assert!(info.expect.is_none());

        fsm.set_intent(Intent::EscalateToHuman);
        let escalate = fsm.next_prompt();
        assert_eq!(escalate.expect, Some(PromptExpectation::YesNo));
    }
}
