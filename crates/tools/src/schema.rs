//! Tool contracts
//!
//! Single source of truth for "is this data a valid request/response for
//! tool X". Validation is pure and side-effect-free: the same raw value
//! always yields the same pass/fail, and a failure names the first
//! offending field.
//!
//! Format checks are intentionally loose syntactic gates, not full RFC
//! compliance: datetimes must parse as ISO-8601 (RFC 3339 or a naive
//! `YYYY-MM-DDTHH:MM:SS` stamp), phone numbers must match the E.164 shape
//! `^\+?[1-9]\d{1,14}$`, and email is a permissive `local@domain.tld`
//! pattern. Known limitation, kept deliberately.

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Closed set of dispatchable tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    CheckAvailability,
    BookAppointment,
    CancelAppointment,
    RescheduleAppointment,
    GetHours,
    GetLocation,
    GetInsuranceSupported,
    EscalateToHuman,
    SendConfirmation,
}

impl ToolName {
    /// Every tool name, in contract order.
    pub const ALL: [ToolName; 9] = [
        ToolName::CheckAvailability,
        ToolName::BookAppointment,
        ToolName::CancelAppointment,
        ToolName::RescheduleAppointment,
        ToolName::GetHours,
        ToolName::GetLocation,
        ToolName::GetInsuranceSupported,
        ToolName::EscalateToHuman,
        ToolName::SendConfirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::CheckAvailability => "check_availability",
            ToolName::BookAppointment => "book_appointment",
            ToolName::CancelAppointment => "cancel_appointment",
            ToolName::RescheduleAppointment => "reschedule_appointment",
            ToolName::GetHours => "get_hours",
            ToolName::GetLocation => "get_location",
            ToolName::GetInsuranceSupported => "get_insurance_supported",
            ToolName::EscalateToHuman => "escalate_to_human",
            ToolName::SendConfirmation => "send_confirmation",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// Half-open preference window for availability search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

/// One bookable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAvailabilityInput {
    pub reason: String,
    pub preferred_time_window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAvailabilityOutput {
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentInput {
    pub name: String,
    pub reason: String,
    pub slot_start: String,
    pub slot_end: String,
    /// Provider name, or `None` when the caller declined to add insurance.
    pub insurance: Option<String>,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentOutput {
    pub confirmation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAppointmentInput {
    pub name: String,
    pub slot_start: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationStatus {
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAppointmentOutput {
    pub status: CancellationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleAppointmentInput {
    pub name: String,
    pub current_slot_start: String,
    pub new_slot_start: String,
    pub new_slot_end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescheduleStatus {
    Rescheduled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleAppointmentOutput {
    pub status: RescheduleStatus,
    pub new_confirmation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetHoursInput {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetHoursOutput {
    pub hours_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLocationInput {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLocationOutput {
    pub address_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInsuranceSupportedInput {
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInsuranceSupportedOutput {
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalateToHumanInput {
    pub reason: String,
    /// E.164 number for a staff callback, or `None` when unavailable.
    pub callback_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    Connected,
    Queued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalateToHumanOutput {
    pub status: EscalationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationChannel {
    Sms,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendConfirmationInput {
    pub channel: ConfirmationChannel,
    pub address: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendConfirmationOutput {
    pub status: SendStatus,
}

/// Validated request payload, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    CheckAvailability(CheckAvailabilityInput),
    BookAppointment(BookAppointmentInput),
    CancelAppointment(CancelAppointmentInput),
    RescheduleAppointment(RescheduleAppointmentInput),
    GetHours(GetHoursInput),
    GetLocation(GetLocationInput),
    GetInsuranceSupported(GetInsuranceSupportedInput),
    EscalateToHuman(EscalateToHumanInput),
    SendConfirmation(SendConfirmationInput),
}

impl ToolInput {
    pub fn tool(&self) -> ToolName {
        match self {
            ToolInput::CheckAvailability(_) => ToolName::CheckAvailability,
            ToolInput::BookAppointment(_) => ToolName::BookAppointment,
            ToolInput::CancelAppointment(_) => ToolName::CancelAppointment,
            ToolInput::RescheduleAppointment(_) => ToolName::RescheduleAppointment,
            ToolInput::GetHours(_) => ToolName::GetHours,
            ToolInput::GetLocation(_) => ToolName::GetLocation,
            ToolInput::GetInsuranceSupported(_) => ToolName::GetInsuranceSupported,
            ToolInput::EscalateToHuman(_) => ToolName::EscalateToHuman,
            ToolInput::SendConfirmation(_) => ToolName::SendConfirmation,
        }
    }
}

/// Validated response payload, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    CheckAvailability(CheckAvailabilityOutput),
    BookAppointment(BookAppointmentOutput),
    CancelAppointment(CancelAppointmentOutput),
    RescheduleAppointment(RescheduleAppointmentOutput),
    GetHours(GetHoursOutput),
    GetLocation(GetLocationOutput),
    GetInsuranceSupported(GetInsuranceSupportedOutput),
    EscalateToHuman(EscalateToHumanOutput),
    SendConfirmation(SendConfirmationOutput),
}

static E164: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn is_iso_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

#[derive(Clone, Copy)]
enum Side {
    Input,
    Output,
}

fn fail(tool: ToolName, side: Side, field: &str) -> ToolError {
    match side {
        Side::Input => ToolError::InvalidInput {
            tool,
            field: field.to_string(),
        },
        Side::Output => ToolError::InvalidOutput {
            tool,
            field: field.to_string(),
        },
    }
}

fn as_object(tool: ToolName, side: Side, raw: &Value) -> Result<&Map<String, Value>, ToolError> {
    let field = match side {
        Side::Input => "input",
        Side::Output => "output",
    };
    raw.as_object().ok_or_else(|| fail(tool, side, field))
}

fn require_str<'a>(
    tool: ToolName,
    side: Side,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, ToolError> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| fail(tool, side, field))
}

fn require_datetime<'a>(
    tool: ToolName,
    side: Side,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, ToolError> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| is_iso_datetime(s))
        .ok_or_else(|| fail(tool, side, field))
}

/// Present and either a non-null string or an explicit null.
fn nullable_str<'a>(
    tool: ToolName,
    side: Side,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, ToolError> {
    match obj.get(field) {
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        _ => Err(fail(tool, side, field)),
    }
}

/// Validate raw data against tool `name`'s input contract.
///
/// Fails with the first offending field if `raw` is not an object, or any
/// required field is missing, wrong-typed, or fails a domain check.
pub fn validate_input(name: ToolName, raw: &Value) -> Result<ToolInput, ToolError> {
    let side = Side::Input;
    let obj = as_object(name, side, raw)?;

    match name {
        ToolName::CheckAvailability => {
            let reason = require_str(name, side, obj, "reason")?.to_string();
            let window = obj
                .get("preferred_time_window")
                .and_then(Value::as_object)
                .ok_or_else(|| fail(name, side, "preferred_time_window"))?;
            let from = require_datetime(name, side, window, "from")
                .map_err(|_| fail(name, side, "preferred_time_window.from"))?
                .to_string();
            let to = require_datetime(name, side, window, "to")
                .map_err(|_| fail(name, side, "preferred_time_window.to"))?
                .to_string();
            Ok(ToolInput::CheckAvailability(CheckAvailabilityInput {
                reason,
                preferred_time_window: TimeWindow { from, to },
            }))
        }
        ToolName::BookAppointment => {
            let caller = require_str(name, side, obj, "name")?.to_string();
            let reason = require_str(name, side, obj, "reason")?.to_string();
            let slot_start = require_datetime(name, side, obj, "slot_start")?.to_string();
            let slot_end = require_datetime(name, side, obj, "slot_end")?.to_string();
            let insurance = nullable_str(name, side, obj, "insurance")?.map(str::to_string);
            let phone = require_str(name, side, obj, "phone")?;
            if !E164.is_match(phone) {
                return Err(fail(name, side, "phone"));
            }
            let email = require_str(name, side, obj, "email")?;
            if !EMAIL.is_match(email) {
                return Err(fail(name, side, "email"));
            }
            Ok(ToolInput::BookAppointment(BookAppointmentInput {
                name: caller,
                reason,
                slot_start,
                slot_end,
                insurance,
                phone: phone.to_string(),
                email: email.to_string(),
            }))
        }
        ToolName::CancelAppointment => {
            let caller = require_str(name, side, obj, "name")?.to_string();
            let slot_start = require_datetime(name, side, obj, "slot_start")?.to_string();
            let reason = nullable_str(name, side, obj, "reason")?.map(str::to_string);
            Ok(ToolInput::CancelAppointment(CancelAppointmentInput {
                name: caller,
                slot_start,
                reason,
            }))
        }
        ToolName::RescheduleAppointment => {
            let caller = require_str(name, side, obj, "name")?.to_string();
            let current_slot_start =
                require_datetime(name, side, obj, "current_slot_start")?.to_string();
            let new_slot_start = require_datetime(name, side, obj, "new_slot_start")?.to_string();
            let new_slot_end = require_datetime(name, side, obj, "new_slot_end")?.to_string();
            Ok(ToolInput::RescheduleAppointment(
                RescheduleAppointmentInput {
                    name: caller,
                    current_slot_start,
                    new_slot_start,
                    new_slot_end,
                },
            ))
        }
        ToolName::GetHours => Ok(ToolInput::GetHours(GetHoursInput {})),
        ToolName::GetLocation => Ok(ToolInput::GetLocation(GetLocationInput {})),
        ToolName::GetInsuranceSupported => {
            let provider = require_str(name, side, obj, "provider")?.to_string();
            Ok(ToolInput::GetInsuranceSupported(
                GetInsuranceSupportedInput { provider },
            ))
        }
        ToolName::EscalateToHuman => {
            let reason = require_str(name, side, obj, "reason")?.to_string();
            let callback_number = nullable_str(name, side, obj, "callback_number")?
                .map(|n| {
                    if E164.is_match(n) {
                        Ok(n.to_string())
                    } else {
                        Err(fail(name, side, "callback_number"))
                    }
                })
                .transpose()?;
            Ok(ToolInput::EscalateToHuman(EscalateToHumanInput {
                reason,
                callback_number,
            }))
        }
        ToolName::SendConfirmation => {
            let channel = match obj.get("channel").and_then(Value::as_str) {
                Some("sms") => ConfirmationChannel::Sms,
                Some("email") => ConfirmationChannel::Email,
                _ => return Err(fail(name, side, "channel")),
            };
            let address = require_str(name, side, obj, "address")?.to_string();
            let message = require_str(name, side, obj, "message")?.to_string();
            Ok(ToolInput::SendConfirmation(SendConfirmationInput {
                channel,
                address,
                message,
            }))
        }
    }
}

/// Validate a handler result against tool `name`'s output contract.
///
/// Same discipline as [`validate_input`], applied on the way out.
pub fn validate_output(name: ToolName, raw: &Value) -> Result<ToolOutput, ToolError> {
    let side = Side::Output;
    let obj = as_object(name, side, raw)?;

    match name {
        ToolName::CheckAvailability => {
            let raw_slots = obj
                .get("slots")
                .and_then(Value::as_array)
                .ok_or_else(|| fail(name, side, "slots"))?;
            let mut slots = Vec::with_capacity(raw_slots.len());
            for slot in raw_slots {
                let slot_obj = slot
                    .as_object()
                    .ok_or_else(|| fail(name, side, "slots[]"))?;
                let start = require_datetime(name, side, slot_obj, "start")
                    .map_err(|_| fail(name, side, "slots[].start"))?
                    .to_string();
                let end = require_datetime(name, side, slot_obj, "end")
                    .map_err(|_| fail(name, side, "slots[].end"))?
                    .to_string();
                slots.push(AvailabilitySlot { start, end });
            }
            Ok(ToolOutput::CheckAvailability(CheckAvailabilityOutput {
                slots,
            }))
        }
        ToolName::BookAppointment => {
            let confirmation_id = require_str(name, side, obj, "confirmation_id")?.to_string();
            Ok(ToolOutput::BookAppointment(BookAppointmentOutput {
                confirmation_id,
            }))
        }
        ToolName::CancelAppointment => match obj.get("status").and_then(Value::as_str) {
            Some("cancelled") => Ok(ToolOutput::CancelAppointment(CancelAppointmentOutput {
                status: CancellationStatus::Cancelled,
            })),
            _ => Err(fail(name, side, "status")),
        },
        ToolName::RescheduleAppointment => {
            if obj.get("status").and_then(Value::as_str) != Some("rescheduled") {
                return Err(fail(name, side, "status"));
            }
            let new_confirmation_id =
                require_str(name, side, obj, "new_confirmation_id")?.to_string();
            Ok(ToolOutput::RescheduleAppointment(
                RescheduleAppointmentOutput {
                    status: RescheduleStatus::Rescheduled,
                    new_confirmation_id,
                },
            ))
        }
        ToolName::GetHours => {
            let hours_text = require_str(name, side, obj, "hours_text")?.to_string();
            Ok(ToolOutput::GetHours(GetHoursOutput { hours_text }))
        }
        ToolName::GetLocation => {
            let address_text = require_str(name, side, obj, "address_text")?.to_string();
            Ok(ToolOutput::GetLocation(GetLocationOutput { address_text }))
        }
        ToolName::GetInsuranceSupported => {
            let accepted = obj
                .get("accepted")
                .and_then(Value::as_bool)
                .ok_or_else(|| fail(name, side, "accepted"))?;
            Ok(ToolOutput::GetInsuranceSupported(
                GetInsuranceSupportedOutput { accepted },
            ))
        }
        ToolName::EscalateToHuman => match obj.get("status").and_then(Value::as_str) {
            Some("connected") => Ok(ToolOutput::EscalateToHuman(EscalateToHumanOutput {
                status: EscalationStatus::Connected,
            })),
            Some("queued") => Ok(ToolOutput::EscalateToHuman(EscalateToHumanOutput {
                status: EscalationStatus::Queued,
            })),
            _ => Err(fail(name, side, "status")),
        },
        ToolName::SendConfirmation => match obj.get("status").and_then(Value::as_str) {
            Some("sent") => Ok(ToolOutput::SendConfirmation(SendConfirmationOutput {
                status: SendStatus::Sent,
            })),
            _ => Err(fail(name, side, "status")),
        },
    }
}
