//! Outcomes of field and form validation.

use std::collections::BTreeMap;

/// Values of the validated fields, keyed by their `name` attribute.
pub type FormData = BTreeMap<String, String>;

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub field_id: String,
    /// The field's `name` attribute. Unnamed fields are left out of [`FormData`].
    pub name: Option<String>,
    pub value: String,
    /// First failing rule's message, `None` when valid.
    pub error: Option<String>,
}

impl FieldReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Reports of every field a form validation visited, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    fields: Vec<FieldReport>,
}

impl FormReport {
    pub(crate) fn push(&mut self, report: FieldReport) {
        self.fields.push(report);
    }

    /// Every visited field, passing or not.
    pub fn fields(&self) -> &[FieldReport] {
        &self.fields
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldReport::is_valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn invalid(&self) -> impl Iterator<Item = &FieldReport> {
        self.fields.iter().filter(|f| !f.is_valid())
    }

    pub fn error_count(&self) -> usize {
        self.invalid().count()
    }

    /// Id of the first invalid field (for focusing).
    pub fn first_invalid_field(&self) -> Option<&str> {
        self.invalid().next().map(|f| f.field_id.as_str())
    }

    /// Values of the named fields. A later field with the same name wins.
    pub fn data(&self) -> FormData {
        self.fields
            .iter()
            .filter_map(|f| Some((f.name.clone()?, f.value.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, name: Option<&str>, value: &str, error: Option<&str>) -> FieldReport {
        FieldReport {
            field_id: id.to_string(),
            name: name.map(str::to_string),
            value: value.to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_form_is_valid() {
        let form = FormReport::default();
        assert!(form.is_valid());
        assert_eq!(form.first_invalid_field(), None);
        assert!(form.data().is_empty());
    }

    #[test]
    fn test_invalid_fields_in_order() {
        let mut form = FormReport::default();
        form.push(report("a", Some("first"), "x", None));
        form.push(report("b", Some("second"), "", Some("second is required")));
        form.push(report("c", None, "loose", Some("Invalid")));

        assert!(form.is_invalid());
        assert_eq!(form.error_count(), 2);
        assert_eq!(form.first_invalid_field(), Some("b"));
        assert_eq!(form.fields().len(), 3);

        let data = form.data();
        assert_eq!(data.len(), 2);
        assert_eq!(data["first"], "x");
        assert_eq!(data["second"], "");
    }
}
