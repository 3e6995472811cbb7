//! Error types

mod action;
mod api;
mod dom;
mod preference;

pub use action::*;
pub use api::*;
pub use dom::*;
pub use preference::*;
