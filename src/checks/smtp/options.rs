use std::borrow::Cow;
use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Configuration knobs for [`SmtpProbeChecker`](super::SmtpProbeChecker).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub helo_domain: String,
    pub mail_from: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub max_mx: usize,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            helo_domain: "localhost".to_string(),
            mail_from: String::new(),
            port: 25,
            timeout_ms: 5_000,
            max_mx: 3,
        }
    }
}

impl SmtpProbeOptions {
    /// Connect and per-command deadline. Zero means the 5 s default.
    pub fn timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            Duration::from_secs(5)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }

    pub fn helo_name<'a>(&'a self, fallback: &'a str) -> Cow<'a, str> {
        if self.helo_domain.trim().is_empty() {
            Cow::Borrowed(fallback)
        } else {
            Cow::Borrowed(self.helo_domain.as_str())
        }
    }

    /// Envelope sender; `postmaster@<domain>` when unset.
    pub fn mail_from(&self, ascii_domain: &str) -> String {
        if self.mail_from.trim().is_empty() {
            format!("postmaster@{ascii_domain}")
        } else {
            self.mail_from.clone()
        }
    }
}
