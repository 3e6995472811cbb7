//! Document abstraction.
//!
//! The store and the form controller never touch a real browser document;
//! they talk to a [`Dom`] which a host implements over its own element tree.
//! [`MemoryDom`] is a complete in-process implementation used by the CLI and
//! the tests.

mod memory;

pub use memory::*;

use crate::error::DomError;

/// Id of the document root element (`<html>`).
pub const ROOT_ID: &str = ":root";

/// Class toggled on the root element while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

/// Attribute on the root element holding the text direction.
pub const DIR_ATTRIBUTE: &str = "dir";

/// Class that hides an element.
pub const HIDDEN_CLASS: &str = "hidden";

/// Returns the id of the element that displays `field_id`'s validation error.
pub fn error_element_id(field_id: &str) -> String {
    format!("{}-error", field_id)
}

/// Element-level operations on a document.
///
/// Elements are addressed by id. Mutating calls on a missing element return
/// [`DomError::NotFound`].
pub trait Dom: Send + Sync {
    fn contains(&self, id: &str) -> bool;

    /// Current value of a form control.
    fn value(&self, id: &str) -> Option<String>;

    fn set_value(&self, id: &str, value: &str) -> Result<(), DomError>;

    fn attribute(&self, id: &str, name: &str) -> Option<String>;

    fn set_attribute(&self, id: &str, name: &str, value: &str) -> Result<(), DomError>;

    fn has_class(&self, id: &str, class: &str) -> bool;

    fn add_classes(&self, id: &str, classes: &[&str]) -> Result<(), DomError>;

    fn remove_classes(&self, id: &str, classes: &[&str]) -> Result<(), DomError>;

    fn text(&self, id: &str) -> Option<String>;

    fn set_text(&self, id: &str, text: &str) -> Result<(), DomError>;

    /// Ids of the descendants of `ancestor` carrying `attribute`, in document
    /// order. `None` when `ancestor` does not exist.
    fn descendants_with_attribute(&self, ancestor: &str, attribute: &str) -> Option<Vec<String>>;

    /// Adds `class` when `on`, removes it otherwise.
    fn toggle_class(&self, id: &str, class: &str, on: bool) -> Result<(), DomError> {
        if on {
            self.add_classes(id, &[class])
        } else {
            self.remove_classes(id, &[class])
        }
    }
}
