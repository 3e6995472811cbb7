//! Form-level validation driven by `data-validate` markup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;

use super::FieldValidator;
use super::FormData;
use super::FormReport;
use super::RuleSet;
use crate::dom::HIDDEN_CLASS;
use crate::dom::error_element_id;
use crate::error::DomError;

/// Attribute holding a field's rule string.
pub const VALIDATE_ATTRIBUTE: &str = "data-validate";

/// Callback receiving the collected form data.
pub type FormCallback = Arc<dyn Fn(&FormData) + Send + Sync>;

/// Handlers invoked after a whole-form validation.
#[derive(Clone, Default)]
pub struct FormOptions {
    on_success: Option<FormCallback>,
    on_error: Option<FormCallback>,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FormData) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FormData) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn has_success_handler(&self) -> bool {
        self.on_success.is_some()
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// A user interaction routed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Blur { field_id: String },
    Input { field_id: String },
    Submit { form_id: String },
}

impl FormEvent {
    pub fn blur(field_id: impl Into<String>) -> Self {
        Self::Blur {
            field_id: field_id.into(),
        }
    }

    pub fn input(field_id: impl Into<String>) -> Self {
        Self::Input {
            field_id: field_id.into(),
        }
    }

    pub fn submit(form_id: impl Into<String>) -> Self {
        Self::Submit {
            form_id: form_id.into(),
        }
    }
}

/// What the controller did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The event targets nothing the controller manages, or needs no work.
    Ignored,
    Validated { valid: bool },
    /// `prevent_default` tells the host to suppress native submission.
    Submitted { valid: bool, prevent_default: bool },
}

#[derive(Debug)]
struct RegisteredForm {
    options: FormOptions,
    fields: Vec<String>,
}

#[derive(Debug, Default)]
struct Registry {
    forms: HashMap<String, RegisteredForm>,
    /// Rules parsed at registration, by field id.
    rules: HashMap<String, RuleSet>,
}

/// Wires forms to a [`FieldValidator`].
pub struct FormController {
    validator: FieldValidator,
    registry: RwLock<Registry>,
}

impl FormController {
    pub fn new(validator: FieldValidator) -> Self {
        Self {
            validator,
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// Parses a field's `data-validate` attribute. Missing attribute yields no rules.
    pub fn parse_rules(&self, field_id: &str) -> RuleSet {
        self.validator
            .dom()
            .attribute(field_id, VALIDATE_ATTRIBUTE)
            .map(|rules| RuleSet::parse(&rules))
            .unwrap_or_default()
    }

    /// Validates every `[data-validate]` field of a form.
    ///
    /// All fields are validated; none short-circuits the others. Returns
    /// `None` when the form does not exist.
    pub fn validate_form(&self, form_id: &str, options: &FormOptions) -> Option<FormReport> {
        let Some(fields) = self.fields_of(form_id) else {
            log::warn!("FormController: form '{}' not found", form_id);
            return None;
        };

        let mut report = FormReport::default();
        for field_id in &fields {
            let rules = self.parse_rules(field_id);
            match self.validator.validate_field_report(field_id, &rules) {
                Ok(field) => report.push(field),
                Err(e) => log::warn!("FormController: skipping field in '{}': {}", form_id, e),
            }
        }

        log::debug!(
            "FormController: form '{}' validated, {} error(s)",
            form_id,
            report.error_count()
        );

        let callback = if report.is_valid() {
            &options.on_success
        } else {
            &options.on_error
        };
        if let Some(callback) = callback {
            callback(&report.data());
        }

        Some(report)
    }

    /// Registers a form: its fields' rules are parsed once and reused for
    /// blur and input events.
    pub fn init(&self, form_id: &str, options: FormOptions) -> Result<(), DomError> {
        let Some(fields) = self.fields_of(form_id) else {
            log::warn!("FormController: cannot init missing form '{}'", form_id);
            return Err(DomError::not_found(form_id));
        };

        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for field_id in &fields {
            let rules = self.parse_rules(field_id);
            registry.rules.insert(field_id.clone(), rules);
        }
        log::debug!(
            "FormController: registered form '{}' with {} field(s)",
            form_id,
            fields.len()
        );
        registry
            .forms
            .insert(form_id.to_string(), RegisteredForm { options, fields });
        Ok(())
    }

    /// Reacts to a user interaction on a registered form.
    pub fn handle(&self, event: &FormEvent) -> EventResponse {
        match event {
            FormEvent::Blur { field_id } => self.revalidate(field_id),
            FormEvent::Input { field_id } => {
                let error_id = error_element_id(field_id);
                let dom = self.validator.dom();
                if dom.contains(&error_id) && !dom.has_class(&error_id, HIDDEN_CLASS) {
                    self.revalidate(field_id)
                } else {
                    EventResponse::Ignored
                }
            }
            FormEvent::Submit { form_id } => {
                let Some(options) = self.options_of(form_id) else {
                    return EventResponse::Ignored;
                };
                let valid = self
                    .validate_form(form_id, &options)
                    .is_some_and(|report| report.is_valid());
                EventResponse::Submitted {
                    valid,
                    prevent_default: !valid || options.has_success_handler(),
                }
            }
        }
    }

    /// Clears values and validation marks of a form's fields.
    pub fn reset(&self, form_id: &str) -> Result<(), DomError> {
        let fields = self
            .fields_of(form_id)
            .ok_or_else(|| DomError::not_found(form_id))?;

        for field_id in &fields {
            self.validator.dom().set_value(field_id, "")?;
            self.validator.clear_field(field_id)?;
        }
        Ok(())
    }

    fn revalidate(&self, field_id: &str) -> EventResponse {
        let rules = self
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .rules
            .get(field_id)
            .cloned();
        let Some(rules) = rules else {
            return EventResponse::Ignored;
        };

        match self.validator.validate_field(field_id, &rules) {
            Ok(valid) => EventResponse::Validated { valid },
            Err(e) => {
                log::warn!("FormController: {}", e);
                EventResponse::Ignored
            }
        }
    }

    fn options_of(&self, form_id: &str) -> Option<FormOptions> {
        self.registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .forms
            .get(form_id)
            .map(|form| form.options.clone())
    }

    /// Ids of the registered fields of `form_id`.
    pub fn registered_fields(&self, form_id: &str) -> Option<Vec<String>> {
        self.registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .forms
            .get(form_id)
            .map(|form| form.fields.clone())
    }

    fn fields_of(&self, form_id: &str) -> Option<Vec<String>> {
        self.validator
            .dom()
            .descendants_with_attribute(form_id, VALIDATE_ATTRIBUTE)
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f.debug_struct("FormController")
            .field("forms", &registry.forms.keys().collect::<Vec<_>>())
            .finish()
    }
}
