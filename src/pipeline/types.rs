use std::fmt;

/// Which stages run for a verification, and how wide a batch window is.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSettings {
    pub check_syntax: bool,
    pub check_domain: bool,
    pub check_mx: bool,
    pub check_smtp: bool,
    pub detect_disposable: bool,
    pub detect_role_based: bool,
    pub detect_free: bool,
    pub detect_typos: bool,
    pub suggest_corrections: bool,
    /// Batch window width, meant to be within 1..=10. Not validated here.
    pub concurrent_limit: usize,
}

pub const DEFAULT_CONCURRENT_LIMIT: usize = 5;
pub const MAX_CONCURRENT_LIMIT: usize = 10;

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            check_syntax: true,
            check_domain: true,
            check_mx: true,
            check_smtp: true,
            detect_disposable: true,
            detect_role_based: true,
            detect_free: true,
            detect_typos: true,
            suggest_corrections: true,
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
        }
    }
}

impl VerificationSettings {
    /// Every stage off; only the window width is kept at its default.
    pub fn all_disabled() -> Self {
        Self {
            check_syntax: false,
            check_domain: false,
            check_mx: false,
            check_smtp: false,
            detect_disposable: false,
            detect_role_based: false,
            detect_free: false,
            detect_typos: false,
            suggest_corrections: false,
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
        }
    }

    /// Window width used by the scheduler; a zero limit means the default.
    pub fn window_width(&self) -> usize {
        if self.concurrent_limit == 0 {
            DEFAULT_CONCURRENT_LIMIT
        } else {
            self.concurrent_limit
        }
    }

    /// Clamps the window width into the recognized 1..=10 range.
    pub fn clamped(mut self) -> Self {
        self.concurrent_limit = self.concurrent_limit.clamp(1, MAX_CONCURRENT_LIMIT);
        self
    }
}

/// The single human-readable reason attached to a result.
///
/// A typo found while suggestions are disabled reads
/// `Possible typo detected.` instead of naming an `undefined` correction.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize), serde(into = "String"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    InvalidSyntax,
    DomainNotFound,
    NoMxRecords,
    SmtpFailed,
    Disposable,
    RoleBased,
    PossibleTypo { suggestion: Option<String> },
    FreeProvider,
    Deliverable,
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax => f.write_str("Invalid email syntax"),
            Self::DomainNotFound => f.write_str("Domain does not exist"),
            Self::NoMxRecords => f.write_str("No MX records found for domain"),
            Self::SmtpFailed => f.write_str("SMTP verification failed"),
            Self::Disposable => f.write_str("Email is from a disposable domain"),
            Self::RoleBased => f.write_str("Email appears to be a role-based address"),
            Self::PossibleTypo {
                suggestion: Some(suggestion),
            } => write!(f, "Possible typo detected. Did you mean {suggestion}?"),
            Self::PossibleTypo { suggestion: None } => f.write_str("Possible typo detected."),
            Self::FreeProvider => f.write_str("Email is from a free provider"),
            Self::Deliverable => f.write_str("Email is valid and deliverable"),
        }
    }
}

impl From<Details> for String {
    fn from(details: Details) -> Self {
        details.to_string()
    }
}

/// Outcome of one pipeline run. Check fields of disabled stages are `true`.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub email: String,
    pub is_valid: bool,
    pub syntax_valid: bool,
    pub domain_valid: bool,
    pub mx_record_valid: bool,
    pub smtp_valid: bool,
    pub is_disposable: bool,
    pub is_role_based: bool,
    pub is_free: bool,
    pub is_typo: bool,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub suggested_correction: Option<String>,
    pub details: Details,
    /// Milliseconds.
    pub verification_time: f64,
}

/// Fields filled stage by stage; turned into a [`VerificationResult`] at the
/// single exit of a run.
#[derive(Debug, Clone, Default)]
pub(crate) struct Draft {
    pub syntax_valid: bool,
    pub domain_valid: bool,
    pub mx_record_valid: bool,
    pub smtp_valid: bool,
    pub is_disposable: bool,
    pub is_role_based: bool,
    pub is_free: bool,
    pub is_typo: bool,
    pub suggested_correction: Option<String>,
}

impl Draft {
    pub fn is_valid(&self) -> bool {
        self.syntax_valid
            && self.domain_valid
            && self.mx_record_valid
            && self.smtp_valid
            && !self.is_disposable
    }

    /// Reason for a run that went through every stage.
    pub fn completion_details(&self) -> Details {
        if !self.smtp_valid {
            Details::SmtpFailed
        } else if self.is_disposable {
            Details::Disposable
        } else if self.is_role_based {
            Details::RoleBased
        } else if self.is_typo {
            Details::PossibleTypo {
                suggestion: self.suggested_correction.clone(),
            }
        } else if self.is_free {
            Details::FreeProvider
        } else {
            Details::Deliverable
        }
    }

    pub fn finish(self, email: &str, details: Details, elapsed_ms: f64) -> VerificationResult {
        VerificationResult {
            email: email.to_string(),
            is_valid: self.is_valid(),
            syntax_valid: self.syntax_valid,
            domain_valid: self.domain_valid,
            mx_record_valid: self.mx_record_valid,
            smtp_valid: self.smtp_valid,
            is_disposable: self.is_disposable,
            is_role_based: self.is_role_based,
            is_free: self.is_free,
            is_typo: self.is_typo,
            suggested_correction: self.suggested_correction,
            details,
            verification_time: elapsed_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing() -> Draft {
        Draft {
            syntax_valid: true,
            domain_valid: true,
            mx_record_valid: true,
            smtp_valid: true,
            ..Draft::default()
        }
    }

    #[test]
    fn details_priority_order() {
        let mut draft = passing();
        draft.is_free = true;
        assert_eq!(draft.completion_details(), Details::FreeProvider);
        draft.is_typo = true;
        assert!(matches!(draft.completion_details(), Details::PossibleTypo { .. }));
        draft.is_role_based = true;
        assert_eq!(draft.completion_details(), Details::RoleBased);
        draft.is_disposable = true;
        assert_eq!(draft.completion_details(), Details::Disposable);
        draft.smtp_valid = false;
        assert_eq!(draft.completion_details(), Details::SmtpFailed);
    }

    #[test]
    fn validity_ignores_advisory_flags() {
        let mut draft = passing();
        draft.is_role_based = true;
        draft.is_free = true;
        draft.is_typo = true;
        assert!(draft.is_valid());
        draft.is_disposable = true;
        assert!(!draft.is_valid());
    }

    #[test]
    fn typo_message_with_and_without_suggestion() {
        let with = Details::PossibleTypo {
            suggestion: Some("user@gmail.com".into()),
        };
        assert_eq!(with.to_string(), "Possible typo detected. Did you mean user@gmail.com?");
        let without = Details::PossibleTypo { suggestion: None };
        assert_eq!(without.to_string(), "Possible typo detected.");
    }

    #[test]
    fn window_width_defaults_on_zero() {
        let mut settings = VerificationSettings::default();
        assert_eq!(settings.window_width(), 5);
        settings.concurrent_limit = 0;
        assert_eq!(settings.window_width(), 5);
        settings.concurrent_limit = 3;
        assert_eq!(settings.window_width(), 3);
    }

    #[test]
    fn clamped_keeps_recognized_range() {
        let settings = VerificationSettings {
            concurrent_limit: 42,
            ..VerificationSettings::default()
        };
        assert_eq!(settings.clamped().concurrent_limit, 10);
        let settings = VerificationSettings {
            concurrent_limit: 0,
            ..VerificationSettings::default()
        };
        assert_eq!(settings.clamped().concurrent_limit, 1);
    }
}
