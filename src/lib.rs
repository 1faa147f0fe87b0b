#![forbid(unsafe_code)]
//! mailverify_lib: pipeline de vérification d'adresses e-mail
//!
//! One address goes through syntax, typo scan, domain, MX, SMTP and
//! classification stages; batches are scheduled in fixed-width windows.

pub mod checks;
pub mod classifier;
pub mod ingest;
pub mod pipeline;
pub mod validator;

#[cfg(feature = "with-serde")]
pub mod config;
#[cfg(feature = "with-csv")]
pub mod export;

pub use checks::{
    CheckError, DomainCheck, FixedChecker, MxCheck, SimulatedChecker, SimulationOptions, SmtpCheck,
};
pub use classifier::{
    Classifier, ReferenceTables, TypoCheck, close_match, detect_typo, is_disposable_domain,
    is_free_domain, is_role_based_local_part,
};
pub use ingest::{IngestError, parse_csv, parse_for_path, parse_text, read_file, read_text};
pub use pipeline::{
    BatchStatistics, Details, Stage, VerificationResult, VerificationSettings, Verifier,
};
pub use validator::{AddressParts, split_address, validate_syntax};

#[cfg(feature = "with-serde")]
pub use config::{AppConfig, ConfigError, DnsSettings, SmtpSettings};
#[cfg(feature = "with-csv")]
pub use export::{ExportError, ExportFilter, default_file_name, to_csv};

#[cfg(feature = "with-dns")]
pub use checks::DnsChecker;
#[cfg(feature = "with-smtp-verify")]
pub use checks::{SmtpProbeChecker, SmtpProbeOptions};
