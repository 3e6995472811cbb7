//! Typed validation rules parsed from markup.
//!
//! Grammar of a rule string: `rule(":" param ("," param)*)? ("|" rule)*`,
//! e.g. `required|minLength:8|confirm:password`.

use std::fmt;
use std::str::FromStr;

/// Minimum age used by `age` when no parameter is given.
pub const DEFAULT_MIN_AGE: u32 = 18;

/// A single validation check with its typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Phone,
    MinLength(usize),
    MaxLength(usize),
    Password,
    /// Must equal the live value of another field.
    Confirm { field_id: String },
    Url,
    Number,
    Positive,
    Date,
    Age { min_age: u32 },
    /// Predicate registered under this name on the validator.
    Custom(String),
    /// Unrecognized or malformed rule; always passes.
    Unknown(String),
}

impl Rule {
    /// Parses one `kind:param,param` segment.
    ///
    /// Unknown kinds and malformed parameters become [`Rule::Unknown`].
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        let (kind, params) = match segment.split_once(':') {
            Some((kind, rest)) => {
                // Only the first colon-separated group carries parameters.
                let group = rest.split(':').next().unwrap_or_default();
                (kind.trim(), group.split(',').map(str::trim).collect::<Vec<_>>())
            }
            None => (segment, Vec::new()),
        };
        let first = params.first().copied().filter(|p| !p.is_empty());

        let rule = match kind {
            "required" => Some(Self::Required),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "password" => Some(Self::Password),
            "url" => Some(Self::Url),
            "number" => Some(Self::Number),
            "positive" => Some(Self::Positive),
            "date" => Some(Self::Date),
            "minLength" => first.and_then(|p| p.parse().ok()).map(Self::MinLength),
            "maxLength" => first.and_then(|p| p.parse().ok()).map(Self::MaxLength),
            "confirm" => first.map(|id| Self::Confirm {
                field_id: id.to_string(),
            }),
            "age" => match first {
                None => Some(Self::Age {
                    min_age: DEFAULT_MIN_AGE,
                }),
                Some(p) => p.parse().ok().map(|min_age| Self::Age { min_age }),
            },
            "custom" => Some(Self::Custom(first.unwrap_or_default().to_string())),
            _ => None,
        };

        rule.unwrap_or_else(|| {
            log::warn!("Unknown or malformed validation rule '{}', ignoring", segment);
            Self::Unknown(segment.to_string())
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Password => "password",
            Self::Confirm { .. } => "confirm",
            Self::Url => "url",
            Self::Number => "number",
            Self::Positive => "positive",
            Self::Date => "date",
            Self::Age { .. } => "age",
            Self::Custom(_) => "custom",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength(n) | Self::MaxLength(n) => write!(f, "{}:{}", self.kind(), n),
            Self::Confirm { field_id } => write!(f, "confirm:{}", field_id),
            Self::Age { min_age } => write!(f, "age:{}", min_age),
            Self::Custom(name) => write!(f, "custom:{}", name),
            _ => f.write_str(self.kind()),
        }
    }
}

/// Ordered rules of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    /// Parses a full rule string. Empty segments are skipped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('|')
                .filter(|segment| !segment.trim().is_empty())
                .map(Rule::parse)
                .collect(),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for RuleSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self(rules)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Rule::to_string).collect();
        f.write_str(&parts.join("|"))
    }
}
