//! Form validation rules
//!
//! Pure functions mapping raw form values to a [`ValidationResult`]. Each
//! form carries its own [`FormRules`], so differences between the login,
//! registration and reset forms are data rather than separate code paths.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Simple `local@domain.tld` shape
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("Invalid email regex")
});

/// Minimum password length enforced by the login form
pub const LOGIN_MIN_PASSWORD_LEN: usize = 6;

/// Field of an authentication form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    DisplayName,
    Email,
    Password,
    ConfirmPassword,
}

impl FieldName {
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::DisplayName => "Name",
            FieldName::Email => "Email",
            FieldName::Password => "Password",
            FieldName::ConfirmPassword => "Confirm password",
        }
    }

    /// Whether the value should be masked on screen
    pub fn is_secret(&self) -> bool {
        matches!(self, FieldName::Password | FieldName::ConfirmPassword)
    }
}

/// Reason a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    EmptyField,
    MalformedEmail,
    TooShort { min: usize },
    Mismatch,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::EmptyField => write!(f, "This field is required"),
            FieldError::MalformedEmail => write!(f, "Enter a valid email address"),
            FieldError::TooShort { min } => {
                write!(f, "Password must be at least {} characters", min)
            }
            FieldError::Mismatch => write!(f, "Passwords do not match"),
        }
    }
}

/// Which authentication form a screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Login,
    Register,
    ResetPassword,
}

impl FormKind {
    /// Fields in display order
    pub fn fields(&self) -> &'static [FieldName] {
        match self {
            FormKind::Login => &[FieldName::Email, FieldName::Password],
            FormKind::Register => &[FieldName::DisplayName, FieldName::Email, FieldName::Password],
            FormKind::ResetPassword => &[
                FieldName::Email,
                FieldName::Password,
                FieldName::ConfirmPassword,
            ],
        }
    }

    /// Rules each form enforces out of the box
    pub fn default_rules(&self) -> FormRules {
        match self {
            FormKind::Login => FormRules {
                min_password_len: Some(LOGIN_MIN_PASSWORD_LEN),
                enforce_confirmation: false,
            },
            // Registration and reset accept any non-empty password.
            FormKind::Register => FormRules::default(),
            // The confirmation field is collected but not compared.
            FormKind::ResetPassword => FormRules::default(),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormKind::Login => "Log in",
            FormKind::Register => "Create account",
            FormKind::ResetPassword => "Reset password",
        }
    }
}

/// Per-form validation knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRules {
    /// Minimum password length in characters, if any
    #[serde(default)]
    pub min_password_len: Option<usize>,
    /// Whether the confirmation field must equal the password
    #[serde(default)]
    pub enforce_confirmation: bool,
}

/// Raw form values keyed by field
pub type FormFields = BTreeMap<FieldName, String>;

/// Outcome of validating a whole form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    field_errors: BTreeMap<FieldName, FieldError>,
}

impl ValidationResult {
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn error(&self, field: FieldName) -> Option<&FieldError> {
        self.field_errors.get(&field)
    }

    pub fn field_errors(&self) -> &BTreeMap<FieldName, FieldError> {
        &self.field_errors
    }
}

/// Validate every field present in `fields` against `rules`
///
/// Fields absent from the map are not checked; callers pass the full field
/// set of their form (see [`FormKind::fields`]).
pub fn validate(rules: &FormRules, fields: &FormFields) -> ValidationResult {
    let mut field_errors = BTreeMap::new();

    for (&name, value) in fields {
        let outcome = match name {
            FieldName::DisplayName => check_required(value),
            FieldName::Email => check_email(value),
            FieldName::Password => check_password(value, rules.min_password_len),
            FieldName::ConfirmPassword => {
                if rules.enforce_confirmation {
                    let password = fields.get(&FieldName::Password).map(String::as_str);
                    check_confirmation(value, password.unwrap_or_default())
                } else {
                    Ok(())
                }
            }
        };
        if let Err(err) = outcome {
            field_errors.insert(name, err);
        }
    }

    ValidationResult { field_errors }
}

fn check_required(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::EmptyField)
    } else {
        Ok(())
    }
}

fn check_email(value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmptyField);
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(FieldError::MalformedEmail);
    }
    Ok(())
}

fn check_password(value: &str, min_len: Option<usize>) -> Result<(), FieldError> {
    check_required(value)?;
    match min_len {
        Some(min) if value.chars().count() < min => Err(FieldError::TooShort { min }),
        _ => Ok(()),
    }
}

fn check_confirmation(value: &str, password: &str) -> Result<(), FieldError> {
    if value != password {
        Err(FieldError::Mismatch)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(FieldName, &str)]) -> FormFields {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_blank_email_is_empty_field() {
        let result = validate(
            &FormKind::Login.default_rules(),
            &fields(&[(FieldName::Email, "   "), (FieldName::Password, "secret1")]),
        );
        assert!(!result.valid());
        assert_eq!(result.error(FieldName::Email), Some(&FieldError::EmptyField));
    }

    #[test]
    fn test_malformed_emails() {
        let rules = FormKind::Login.default_rules();
        for email in ["plain", "a@b", "@b.com", "a@.com", "a b@c.com", "a@b.", "a@@b.com"] {
            let result = validate(
                &rules,
                &fields(&[(FieldName::Email, email), (FieldName::Password, "secret1")]),
            );
            assert_eq!(
                result.error(FieldName::Email),
                Some(&FieldError::MalformedEmail),
                "{} should be rejected",
                email
            );
            assert!(!result.valid());
        }
    }

    #[test]
    fn test_well_formed_emails() {
        let rules = FormKind::Login.default_rules();
        for email in ["a@b.com", " user.name+tag@mail.example.org ", "x@y.co"] {
            let result = validate(
                &rules,
                &fields(&[(FieldName::Email, email), (FieldName::Password, "secret1")]),
            );
            assert!(result.valid(), "{} should be accepted", email);
        }
    }

    #[test]
    fn test_login_password_minimum() {
        let rules = FormKind::Login.default_rules();
        for len in 1..LOGIN_MIN_PASSWORD_LEN {
            let password = "x".repeat(len);
            let result = validate(&rules, &fields(&[(FieldName::Password, password.as_str())]));
            assert_eq!(
                result.error(FieldName::Password),
                Some(&FieldError::TooShort { min: 6 })
            );
        }
        for len in LOGIN_MIN_PASSWORD_LEN..LOGIN_MIN_PASSWORD_LEN + 4 {
            let password = "x".repeat(len);
            let result = validate(&rules, &fields(&[(FieldName::Password, password.as_str())]));
            assert!(result.error(FieldName::Password).is_none());
        }
    }

    #[test]
    fn test_empty_password_reports_empty_not_short() {
        let result = validate(
            &FormKind::Login.default_rules(),
            &fields(&[(FieldName::Password, "")]),
        );
        assert_eq!(result.error(FieldName::Password), Some(&FieldError::EmptyField));
    }

    #[test]
    fn test_register_has_no_minimum() {
        let result = validate(
            &FormKind::Register.default_rules(),
            &fields(&[
                (FieldName::DisplayName, "Ana"),
                (FieldName::Email, "ana@example.com"),
                (FieldName::Password, "1"),
            ]),
        );
        assert!(result.valid());
    }

    #[test]
    fn test_reset_confirmation_not_compared_by_default() {
        let result = validate(
            &FormKind::ResetPassword.default_rules(),
            &fields(&[
                (FieldName::Email, "ana@example.com"),
                (FieldName::Password, "first"),
                (FieldName::ConfirmPassword, "second"),
            ]),
        );
        assert!(result.valid());
    }

    #[test]
    fn test_confirmation_mismatch_when_enforced() {
        let rules = FormRules {
            enforce_confirmation: true,
            ..FormKind::ResetPassword.default_rules()
        };
        let result = validate(
            &rules,
            &fields(&[
                (FieldName::Email, "ana@example.com"),
                (FieldName::Password, "first"),
                (FieldName::ConfirmPassword, "second"),
            ]),
        );
        assert!(!result.valid());
        assert_eq!(result.error(FieldName::ConfirmPassword), Some(&FieldError::Mismatch));
        assert_eq!(result.field_errors().len(), 1);
    }

    #[test]
    fn test_all_failing_fields_reported() {
        let result = validate(
            &FormKind::Register.default_rules(),
            &fields(&[
                (FieldName::DisplayName, ""),
                (FieldName::Email, "nope"),
                (FieldName::Password, " "),
            ]),
        );
        assert_eq!(result.field_errors().len(), 3);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FieldError::TooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters"
        );
        assert_eq!(FieldError::Mismatch.to_string(), "Passwords do not match");
    }
}
