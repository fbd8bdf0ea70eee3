//! Tool contracts and dispatch for the clinic voice receptionist
//!
//! Three layers:
//! - [`schema`] — single source of truth for "is this data a valid
//!   request/response for tool X". Pure validation, typed payloads.
//! - [`router`] — name → handler registry that validates input before a
//!   handler runs and validates its output before the caller sees it.
//! - [`handlers`] — stub handler set returning documented output shapes,
//!   for development and tests. Real scheduling/notification backends plug
//!   in behind the same [`ToolHandler`] trait.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;

pub use error::{HandlerError, ToolError};
pub use handlers::register_stub_handlers;
pub use router::{ToolHandler, ToolRouter};
pub use schema::{validate_input, validate_output, ToolInput, ToolName, ToolOutput};
