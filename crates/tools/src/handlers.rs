//! Stub tool handlers
//!
//! Development and test doubles for the pluggable business backends. Each
//! one returns the documented output shape for its tool; real scheduling
//! and notification services replace these behind the same
//! [`ToolHandler`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{HandlerError, ToolError};
use crate::router::{ToolHandler, ToolRouter};
use crate::schema::{ToolInput, ToolName};

/// Providers the stub insurance check accepts.
const ACCEPTED_PROVIDERS: [&str; 4] = ["aetna", "blue cross", "cigna", "united"];

fn confirmation_id() -> String {
    format!(
        "CNF-{}",
        uuid::Uuid::new_v4().to_string()[..8].to_uppercase()
    )
}

fn unexpected_input(expected: ToolName) -> HandlerError {
    HandlerError::new(format!("handler expects {expected} input"))
}

/// Offers one slot starting at the requested window's opening.
pub struct StubAvailabilityHandler;

#[async_trait]
impl ToolHandler for StubAvailabilityHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::CheckAvailability(input) = input else {
            return Err(unexpected_input(ToolName::CheckAvailability));
        };
        let from = DateTime::parse_from_rfc3339(&input.preferred_time_window.from)
            .map_err(|e| HandlerError::new(format!("window start: {e}")))?;
        let end = from + ChronoDuration::minutes(30);
        Ok(json!({
            "slots": [{
                "start": input.preferred_time_window.from,
                "end": end.to_rfc3339(),
            }],
        }))
    }
}

pub struct StubBookingHandler;

#[async_trait]
impl ToolHandler for StubBookingHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::BookAppointment(input) = input else {
            return Err(unexpected_input(ToolName::BookAppointment));
        };
        let id = confirmation_id();
        tracing::info!(
            confirmation_id = %id,
            name = %input.name,
            slot_start = %input.slot_start,
            "Stub booking: appointment booked"
        );
        Ok(json!({"confirmation_id": id}))
    }
}

pub struct StubCancellationHandler;

#[async_trait]
impl ToolHandler for StubCancellationHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::CancelAppointment(input) = input else {
            return Err(unexpected_input(ToolName::CancelAppointment));
        };
        tracing::info!(
            name = %input.name,
            slot_start = %input.slot_start,
            "Stub booking: appointment cancelled"
        );
        Ok(json!({"status": "cancelled"}))
    }
}

pub struct StubRescheduleHandler;

#[async_trait]
impl ToolHandler for StubRescheduleHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::RescheduleAppointment(input) = input else {
            return Err(unexpected_input(ToolName::RescheduleAppointment));
        };
        let id = confirmation_id();
        tracing::info!(
            new_confirmation_id = %id,
            name = %input.name,
            new_slot_start = %input.new_slot_start,
            "Stub booking: appointment rescheduled"
        );
        Ok(json!({"status": "rescheduled", "new_confirmation_id": id}))
    }
}

pub struct StubHoursHandler;

#[async_trait]
impl ToolHandler for StubHoursHandler {
    async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
        Ok(json!({
            "hours_text": "Mon-Fri 8am-6pm; Sat 9am-1pm; Sun closed",
        }))
    }
}

pub struct StubLocationHandler;

#[async_trait]
impl ToolHandler for StubLocationHandler {
    async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
        Ok(json!({
            "address_text": "123 Clinic Way, Suite 200, Springfield, ST",
        }))
    }
}

pub struct StubInsuranceHandler;

#[async_trait]
impl ToolHandler for StubInsuranceHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::GetInsuranceSupported(input) = input else {
            return Err(unexpected_input(ToolName::GetInsuranceSupported));
        };
        let accepted = ACCEPTED_PROVIDERS.contains(&input.provider.to_lowercase().as_str());
        Ok(json!({"accepted": accepted}))
    }
}

pub struct StubEscalationHandler;

#[async_trait]
impl ToolHandler for StubEscalationHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::EscalateToHuman(input) = input else {
            return Err(unexpected_input(ToolName::EscalateToHuman));
        };
        tracing::info!(
            reason = %input.reason,
            callback_number = input.callback_number.as_deref().unwrap_or("none"),
            "Stub escalation: queued for staff"
        );
        Ok(json!({"status": "queued"}))
    }
}

pub struct StubConfirmationHandler;

#[async_trait]
impl ToolHandler for StubConfirmationHandler {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError> {
        let ToolInput::SendConfirmation(input) = input else {
            return Err(unexpected_input(ToolName::SendConfirmation));
        };
        tracing::info!(
            channel = ?input.channel,
            address = %input.address,
            "Stub notification: confirmation sent"
        );
        Ok(json!({"status": "sent"}))
    }
}

/// Register a stub handler for every tool name.
pub fn register_stub_handlers(router: &mut ToolRouter) -> Result<(), ToolError> {
    router.register(ToolName::CheckAvailability, Arc::new(StubAvailabilityHandler))?;
    router.register(ToolName::BookAppointment, Arc::new(StubBookingHandler))?;
    router.register(ToolName::CancelAppointment, Arc::new(StubCancellationHandler))?;
    router.register(
        ToolName::RescheduleAppointment,
        Arc::new(StubRescheduleHandler),
    )?;
    router.register(ToolName::GetHours, Arc::new(StubHoursHandler))?;
    router.register(ToolName::GetLocation, Arc::new(StubLocationHandler))?;
    router.register(
        ToolName::GetInsuranceSupported,
        Arc::new(StubInsuranceHandler),
    )?;
    router.register(ToolName::EscalateToHuman, Arc::new(StubEscalationHandler))?;
    router.register(ToolName::SendConfirmation, Arc::new(StubConfirmationHandler))?;
    Ok(())
}
