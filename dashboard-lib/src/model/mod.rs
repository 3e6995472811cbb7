//! Typed models

mod appearance;
mod notification;
mod state;
mod user;

pub use appearance::*;
pub use notification::*;
pub use state::*;
pub use user::*;
