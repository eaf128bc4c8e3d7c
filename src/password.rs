//! Password strength validation.
//!
//! Five rules, checked in a fixed order: minimum length, uppercase,
//! lowercase, digit, special character. The special set is a fixed literal
//! list, not a general punctuation class.

use serde::Serialize;

/// Characters accepted as "special" for rule five.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum accepted password length.
pub const MIN_LENGTH: usize = 8;

/// A strength rule the password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeaknessReason {
    /// Shorter than [`MIN_LENGTH`] characters.
    TooShort,
    /// No uppercase letter.
    MissingUppercase,
    /// No lowercase letter.
    MissingLowercase,
    /// No digit.
    MissingDigit,
    /// No character from [`SPECIAL_CHARS`].
    MissingSpecial,
}

impl WeaknessReason {
    /// Advice line shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TooShort => "Password must be at least 8 characters long",
            Self::MissingUppercase => "Password must contain at least one uppercase letter",
            Self::MissingLowercase => "Password must contain at least one lowercase letter",
            Self::MissingDigit => "Password must contain at least one digit",
            Self::MissingSpecial => "Password must contain at least one special character",
        }
    }
}

/// Result of checking one password.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthReport {
    /// Whether every rule passed.
    pub is_strong: bool,
    /// Failed rules, in rule-check order. Empty when strong.
    pub failures: Vec<WeaknessReason>,
}

impl StrengthReport {
    /// The first failing rule, for single-message output.
    #[must_use]
    pub fn first_failure(&self) -> Option<WeaknessReason> {
        self.failures.first().copied()
    }
}

/// Check a password against all five rules.
#[must_use]
pub fn check_strength(password: &str) -> StrengthReport {
    let mut failures = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        failures.push(WeaknessReason::TooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        failures.push(WeaknessReason::MissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        failures.push(WeaknessReason::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        failures.push(WeaknessReason::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        failures.push(WeaknessReason::MissingSpecial);
    }

    StrengthReport {
        is_strong: failures.is_empty(),
        failures,
    }
}
