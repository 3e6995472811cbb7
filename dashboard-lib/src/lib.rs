//! Dashboard client core
//!
//! An observable application store (state, mutations, actions, cached
//! getters) with explicit lifecycle, a state manager reflecting appearance on
//! the document root, and a declarative form validation engine. Hosts plug in
//! through the [`dom::Dom`], [`prefs::PreferenceStore`], [`api::UserApi`] and
//! [`toast::Toaster`] traits.

pub mod api;
pub mod dom;
pub mod error;
pub mod model;
pub mod prefs;
pub mod state_manager;
pub mod store;
pub mod toast;
pub mod validation;

pub use state_manager::StateManager;
pub use store::Store;
