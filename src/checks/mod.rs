//! Checker capabilities consumed by the verification pipeline.
//!
//! Each capability answers one question with a boolean and may suspend while
//! doing so. A checker fault is reported as [`CheckError`]; the pipeline turns
//! it into a negative outcome for that stage only.

mod error;
mod fixed;
mod simulated;

#[cfg(feature = "with-dns")]
mod dns;
#[cfg(feature = "with-smtp-verify")]
mod smtp;

pub use error::CheckError;
pub use fixed::FixedChecker;
pub use simulated::{SimulatedChecker, SimulationOptions};

#[cfg(feature = "with-dns")]
pub use dns::{DnsChecker, MxRecord};
#[cfg(feature = "with-smtp-verify")]
pub use smtp::{SmtpProbeChecker, SmtpProbeOptions};

use std::future::Future;

/// Does the domain exist at all?
pub trait DomainCheck {
    fn domain_exists(&self, domain: &str)
    -> impl Future<Output = Result<bool, CheckError>> + Send;
}

/// Does the domain publish mail exchangers?
pub trait MxCheck {
    fn has_mx_records(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<bool, CheckError>> + Send;
}

/// Does a mail server accept the full address as a recipient?
pub trait SmtpCheck {
    fn accepts(&self, address: &str) -> impl Future<Output = Result<bool, CheckError>> + Send;
}
