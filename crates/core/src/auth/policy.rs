//! Password complexity and expiry rules.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

/// A single rule a candidate password broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum PolicyViolation {
    /// Fewer characters than the configured minimum.
    TooShort {
        /// Required minimum length.
        min: usize,
    },
    /// No uppercase letter.
    MissingUppercase,
    /// No lowercase letter.
    MissingLowercase,
    /// No ASCII digit.
    MissingDigit,
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min } => write!(f, "must be at least {min} characters"),
            Self::MissingUppercase => f.write_str("must contain an uppercase letter"),
            Self::MissingLowercase => f.write_str("must contain a lowercase letter"),
            Self::MissingDigit => f.write_str("must contain a digit"),
        }
    }
}

/// Rejected password, with every rule it violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password {}", join_violations(.violations))]
pub struct PasswordPolicyError {
    /// Violated rules in evaluation order.
    pub violations: Vec<PolicyViolation>,
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Password policy applied on account creation and password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters (not bytes).
    pub min_length: usize,
    /// Require at least one uppercase letter.
    pub require_uppercase: bool,
    /// Require at least one lowercase letter.
    pub require_lowercase: bool,
    /// Require at least one ASCII digit.
    pub require_digit: bool,
    /// Maximum password age in days; `0` disables expiry.
    pub max_age_days: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            max_age_days: 90,
        }
    }
}

impl PasswordPolicy {
    /// Checks a candidate password against every rule.
    ///
    /// # Errors
    ///
    /// Returns `PasswordPolicyError` listing all violated rules.
    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(PolicyViolation::TooShort {
                min: self.min_length,
            });
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PasswordPolicyError { violations })
        }
    }

    /// When a password set at `changed_at` stops being valid, if ever.
    #[must_use]
    pub fn expires_at(&self, changed_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self.max_age_days > 0).then(|| changed_at + Duration::days(i64::from(self.max_age_days)))
    }

    /// True once `now` has reached the expiry instant.
    #[must_use]
    pub fn is_expired(&self, changed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.expires_at(changed_at).is_some_and(|at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_compliant_password_accepted() {
        assert!(PasswordPolicy::default().validate("Budget2025").is_ok());
    }

    #[rstest]
    #[case("Ab1", vec![PolicyViolation::TooShort { min: 8 }])]
    #[case("budget2025", vec![PolicyViolation::MissingUppercase])]
    #[case("BUDGET2025", vec![PolicyViolation::MissingLowercase])]
    #[case("BudgetPlan", vec![PolicyViolation::MissingDigit])]
    #[case("", vec![
        PolicyViolation::TooShort { min: 8 },
        PolicyViolation::MissingUppercase,
        PolicyViolation::MissingLowercase,
        PolicyViolation::MissingDigit,
    ])]
    fn test_violations_collected(#[case] password: &str, #[case] expected: Vec<PolicyViolation>) {
        let err = PasswordPolicy::default().validate(password).unwrap_err();
        assert_eq!(err.violations, expected);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            max_age_days: 0,
        };
        // four characters, eight bytes
        assert!(policy.validate("éééé").is_ok());
    }

    #[test]
    fn test_error_message_lists_rules() {
        let err = PasswordPolicy::default().validate("short").unwrap_err();
        assert_eq!(
            err.to_string(),
            "password must be at least 8 characters; must contain an uppercase letter; must contain a digit"
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let policy = PasswordPolicy::default();
        let changed = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert!(!policy.is_expired(changed, changed + Duration::days(89)));
        assert!(policy.is_expired(changed, changed + Duration::days(90)));
        assert_eq!(policy.expires_at(changed), Some(changed + Duration::days(90)));
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let policy = PasswordPolicy {
            max_age_days: 0,
            ..PasswordPolicy::default()
        };
        let changed = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(policy.expires_at(changed), None);
        assert!(!policy.is_expired(changed, Utc::now()));
    }
}
