//! Static user-facing validation messages

use std::str::FromStr;

/// Language of the validation messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageCatalog {
    #[default]
    English,
    Arabic,
}

impl MessageCatalog {
    pub fn english() -> Self {
        Self::English
    }

    pub fn arabic() -> Self {
        Self::Arabic
    }

    /// Label used when a field has neither `data-label` nor `name`.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::English => "This field",
            Self::Arabic => "هذا الحقل",
        }
    }

    pub fn required(self, label: &str) -> String {
        match self {
            Self::English => format!("{} is required", label),
            Self::Arabic => format!("{} مطلوب", label),
        }
    }

    pub fn email(self) -> String {
        match self {
            Self::English => "Invalid email address".to_string(),
            Self::Arabic => "البريد الإلكتروني غير صحيح".to_string(),
        }
    }

    pub fn phone(self) -> String {
        match self {
            Self::English => "Invalid phone number".to_string(),
            Self::Arabic => "رقم الهاتف غير صحيح".to_string(),
        }
    }

    pub fn min_length(self, label: &str, min: usize) -> String {
        match self {
            Self::English => format!("{} must be at least {} characters", label, min),
            Self::Arabic => format!("{} يجب أن يكون على الأقل {} أحرف", label, min),
        }
    }

    pub fn max_length(self, label: &str, max: usize) -> String {
        match self {
            Self::English => format!("{} must not exceed {} characters", label, max),
            Self::Arabic => format!("{} يجب أن لا يتجاوز {} أحرف", label, max),
        }
    }

    pub fn password(self) -> String {
        match self {
            Self::English => "Password must be at least 8 characters and include an uppercase letter, a lowercase letter and a digit".to_string(),
            Self::Arabic => "كلمة المرور يجب أن تحتوي على 8 أحرف على الأقل، حرف كبير، حرف صغير، ورقم".to_string(),
        }
    }

    pub fn confirm(self, label: &str) -> String {
        match self {
            Self::English => format!("{} does not match", label),
            Self::Arabic => format!("{} غير متطابق", label),
        }
    }

    pub fn url(self) -> String {
        match self {
            Self::English => "Invalid URL".to_string(),
            Self::Arabic => "الرابط غير صحيح".to_string(),
        }
    }

    pub fn number(self) -> String {
        match self {
            Self::English => "This field must be a number".to_string(),
            Self::Arabic => "هذا الحقل يجب أن يكون رقماً".to_string(),
        }
    }

    pub fn positive(self) -> String {
        match self {
            Self::English => "Must be a positive number".to_string(),
            Self::Arabic => "يجب أن يكون رقماً موجباً".to_string(),
        }
    }

    pub fn date(self) -> String {
        match self {
            Self::English => "Invalid date".to_string(),
            Self::Arabic => "التاريخ غير صحيح".to_string(),
        }
    }

    pub fn age(self, min_age: u32) -> String {
        match self {
            Self::English => format!("Age must be {} or older", min_age),
            Self::Arabic => format!("العمر يجب أن يكون {} أو أكبر", min_age),
        }
    }
}

/// Returned when a locale name has no message catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for MessageCatalog {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" | "english" => Ok(Self::English),
            "ar" | "arabic" => Ok(Self::Arabic),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}
