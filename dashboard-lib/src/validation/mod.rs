//! Declarative form validation.
//!
//! Fields carry their rules in markup (`data-validate="required|email"`).
//! Within one field the rules run in order and stop at the first failure;
//! across a form every field is validated.
//!
//! # Example
//!
//! ```ignore
//! use dashboard_lib::validation::{EventResponse, FieldValidator, FormController, FormEvent, FormOptions};
//!
//! let controller = FormController::new(FieldValidator::new(dom.clone()));
//! controller.init("signup", FormOptions::new().on_success(|data| submit(data)))?;
//!
//! match controller.handle(&FormEvent::submit("signup")) {
//!     EventResponse::Submitted { prevent_default: false, .. } => { /* let the host submit */ }
//!     _ => {}
//! }
//! ```

mod engine;
mod field;
mod form;
mod messages;
mod result;
mod rule;

pub use engine::*;
pub use field::*;
pub use form::*;
pub use messages::*;
pub use result::*;
pub use rule::*;
