use super::{CheckError, DomainCheck, MxCheck, SmtpCheck};

/// Deterministic checker answering every call with a preset outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChecker {
    pub domain: bool,
    pub mx: bool,
    pub smtp: bool,
}

impl FixedChecker {
    pub fn all_pass() -> Self {
        Self {
            domain: true,
            mx: true,
            smtp: true,
        }
    }

    pub fn all_fail() -> Self {
        Self {
            domain: false,
            mx: false,
            smtp: false,
        }
    }
}

impl Default for FixedChecker {
    fn default() -> Self {
        Self::all_pass()
    }
}

impl DomainCheck for FixedChecker {
    async fn domain_exists(&self, _domain: &str) -> Result<bool, CheckError> {
        Ok(self.domain)
    }
}

impl MxCheck for FixedChecker {
    async fn has_mx_records(&self, _domain: &str) -> Result<bool, CheckError> {
        Ok(self.mx)
    }
}

impl SmtpCheck for FixedChecker {
    async fn accepts(&self, _address: &str) -> Result<bool, CheckError> {
        Ok(self.smtp)
    }
}
