//! Single-field validation against the document.

use std::sync::Arc;

use chrono::Local;
use chrono::NaiveDate;

use super::CustomRule;
use super::CustomRules;
use super::DomFields;
use super::FieldReport;
use super::MessageCatalog;
use super::RuleContext;
use super::RuleSet;
use super::validate_value;
use crate::dom::Dom;
use crate::dom::HIDDEN_CLASS;
use crate::dom::error_element_id;
use crate::error::DomError;

/// Classes marking a field as invalid.
pub const INVALID_CLASSES: [&str; 2] = ["border-red-500", "focus:ring-red-500"];

/// Classes marking a non-empty field as valid.
pub const VALID_CLASSES: [&str; 2] = ["border-green-500", "focus:ring-green-500"];

/// Attribute holding a field's display label.
pub const LABEL_ATTRIBUTE: &str = "data-label";

/// Attribute holding a field's form key.
pub const NAME_ATTRIBUTE: &str = "name";

/// Validates fields in place and reflects the outcome on the document.
#[derive(Clone)]
pub struct FieldValidator {
    dom: Arc<dyn Dom>,
    messages: MessageCatalog,
    custom: CustomRules,
    today: Option<NaiveDate>,
}

impl FieldValidator {
    pub fn new(dom: Arc<dyn Dom>) -> Self {
        Self {
            dom,
            messages: MessageCatalog::default(),
            custom: CustomRules::new(),
            today: None,
        }
    }

    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Registers a predicate referenced from markup as `custom:<name>`.
    pub fn with_custom_rule(mut self, name: impl Into<String>, rule: CustomRule) -> Self {
        self.custom.insert(name.into(), rule);
        self
    }

    /// Fixes the reference date used by `age`. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn dom(&self) -> &Arc<dyn Dom> {
        &self.dom
    }

    pub fn messages(&self) -> MessageCatalog {
        self.messages
    }

    /// Checks a bare value without touching the document.
    ///
    /// `confirm` rules still read their peer field from the document.
    pub fn check(&self, value: &str, label: &str, rules: &RuleSet) -> Result<(), String> {
        let fields = DomFields(self.dom.as_ref());
        let cx = RuleContext {
            messages: self.messages,
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
            fields: &fields,
            custom: &self.custom,
        };
        validate_value(value, label, rules, &cx)
    }

    /// Validates a field and updates its visual state. Returns validity.
    pub fn validate_field(&self, field_id: &str, rules: &RuleSet) -> Result<bool, DomError> {
        self.validate_field_report(field_id, rules)
            .map(|report| report.is_valid())
    }

    pub(crate) fn validate_field_report(
        &self,
        field_id: &str,
        rules: &RuleSet,
    ) -> Result<FieldReport, DomError> {
        if !self.dom.contains(field_id) {
            return Err(DomError::not_found(field_id));
        }

        let value = self.dom.value(field_id).unwrap_or_default();
        let name = self.dom.attribute(field_id, NAME_ATTRIBUTE);
        let label = self
            .dom
            .attribute(field_id, LABEL_ATTRIBUTE)
            .or_else(|| name.clone())
            .unwrap_or_else(|| self.messages.default_label().to_string());

        let error = self.check(&value, &label, rules).err();
        self.show_result(field_id, &value, error.as_deref())?;

        Ok(FieldReport {
            field_id: field_id.to_string(),
            name,
            value,
            error,
        })
    }

    /// Removes every validation mark from a field and hides its error.
    pub fn clear_field(&self, field_id: &str) -> Result<(), DomError> {
        self.dom.remove_classes(field_id, &INVALID_CLASSES)?;
        self.dom.remove_classes(field_id, &VALID_CLASSES)?;
        self.hide_error(field_id);
        Ok(())
    }

    fn show_result(&self, field_id: &str, value: &str, error: Option<&str>) -> Result<(), DomError> {
        let error_id = error_element_id(field_id);
        match error {
            Some(message) => {
                self.dom.add_classes(field_id, &INVALID_CLASSES)?;
                self.dom.remove_classes(field_id, &VALID_CLASSES)?;
                if self.dom.contains(&error_id) {
                    self.dom.set_text(&error_id, message)?;
                    self.dom.remove_classes(&error_id, &[HIDDEN_CLASS])?;
                }
            }
            None => {
                self.dom.remove_classes(field_id, &INVALID_CLASSES)?;
                if !value.is_empty() {
                    self.dom.add_classes(field_id, &VALID_CLASSES)?;
                }
                self.hide_error(field_id);
            }
        }
        Ok(())
    }

    fn hide_error(&self, field_id: &str) {
        let error_id = error_element_id(field_id);
        if self.dom.contains(&error_id)
            && let Err(e) = self.dom.add_classes(&error_id, &[HIDDEN_CLASS])
        {
            log::warn!("FieldValidator: cannot hide '{}': {}", error_id, e);
        }
    }
}
