//! Rule evaluation.
//!
//! Every rule is a pure check of one value; a failure carries the
//! user-facing message.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use chrono::DateTime;
use chrono::NaiveDate;
use regex::Regex;

use super::MessageCatalog;
use super::Rule;
use super::RuleSet;
use crate::dom::Dom;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]{8,20}$").expect("valid phone regex"));

const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LENGTH: usize = 8;
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Source of other fields' live values, used by `confirm`.
pub trait FieldValues {
    fn field_value(&self, field_id: &str) -> Option<String>;
}

/// Reads field values straight from a document.
pub struct DomFields<'a>(pub &'a dyn Dom);

impl FieldValues for DomFields<'_> {
    fn field_value(&self, field_id: &str) -> Option<String> {
        self.0.value(field_id)
    }
}

impl FieldValues for HashMap<String, String> {
    fn field_value(&self, field_id: &str) -> Option<String> {
        self.get(field_id).cloned()
    }
}

/// A caller-supplied predicate referenced from markup as `custom:<name>`.
#[derive(Clone)]
pub struct CustomRule {
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    message: String,
}

impl CustomRule {
    pub fn new<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    pub fn check(&self, value: &str) -> Result<(), String> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("message", &self.message)
            .finish()
    }
}

/// Custom rules by name.
pub type CustomRules = HashMap<String, CustomRule>;

/// Everything a rule may consult besides the value itself.
pub struct RuleContext<'a> {
    pub messages: MessageCatalog,
    /// Reference date for `age`.
    pub today: NaiveDate,
    pub fields: &'a dyn FieldValues,
    pub custom: &'a CustomRules,
}

impl Rule {
    /// Checks `value` against this rule.
    pub fn check(&self, value: &str, label: &str, cx: &RuleContext<'_>) -> Result<(), String> {
        let messages = cx.messages;
        let ok = match self {
            Self::Required => !value.trim().is_empty(),
            Self::Email => EMAIL.is_match(value),
            Self::Phone => PHONE.is_match(value),
            Self::MinLength(min) => value.chars().count() >= *min,
            Self::MaxLength(max) => value.chars().count() <= *max,
            Self::Password => is_strong_password(value),
            Self::Confirm { field_id } => {
                value == cx.fields.field_value(field_id).unwrap_or_default()
            }
            Self::Url => url::Url::parse(value).is_ok(),
            Self::Number => value.trim().is_empty() || parse_number(value).is_some(),
            Self::Positive => {
                value.trim().is_empty() || parse_number(value).is_some_and(|n| n > 0.0)
            }
            Self::Date => parse_date(value).is_some(),
            Self::Age { min_age } => {
                age_on(value, cx.today).is_some_and(|age| age >= *min_age)
            }
            Self::Custom(name) => {
                return match cx.custom.get(name) {
                    Some(rule) => rule.check(value),
                    None => Ok(()),
                };
            }
            Self::Unknown(_) => true,
        };

        if ok {
            return Ok(());
        }

        Err(match self {
            Self::Required => messages.required(label),
            Self::Email => messages.email(),
            Self::Phone => messages.phone(),
            Self::MinLength(min) => messages.min_length(label, *min),
            Self::MaxLength(max) => messages.max_length(label, *max),
            Self::Password => messages.password(),
            Self::Confirm { .. } => messages.confirm(label),
            Self::Url => messages.url(),
            Self::Number => messages.number(),
            Self::Positive => messages.positive(),
            Self::Date => messages.date(),
            Self::Age { min_age } => messages.age(*min_age),
            Self::Custom(_) | Self::Unknown(_) => String::new(),
        })
    }
}

/// Runs `rules` in order and stops at the first failure.
pub fn validate_value(
    value: &str,
    label: &str,
    rules: &RuleSet,
    cx: &RuleContext<'_>,
) -> Result<(), String> {
    for rule in rules {
        rule.check(value, label, cx)?;
    }
    Ok(())
}

fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LENGTH
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
}

/// Parses the date formats produced by date inputs and common locales.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Completed years between a date of birth and `today`.
fn age_on(birth: &str, today: NaiveDate) -> Option<u32> {
    // `years_since` is None when the birth date is after `today`.
    today.years_since(parse_date(birth)?)
}
