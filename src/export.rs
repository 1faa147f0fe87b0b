//! CSV export of verification results.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::pipeline::VerificationResult;

pub const CSV_HEADER: [&str; 11] = [
    "Email",
    "Valid",
    "Syntax",
    "Domain",
    "MX Record",
    "SMTP",
    "Disposable",
    "Role-Based",
    "Free Provider",
    "Typo",
    "Details",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("écriture CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush CSV: {0}")]
    Flush(String),
    #[error("CSV non UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("unknown export filter '{0}', use: all|valid|invalid")]
    UnknownFilter(String),
}

/// Which results make it into an export.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl ExportFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }

    pub fn keeps(self, result: &VerificationResult) -> bool {
        match self {
            Self::All => true,
            Self::Valid => result.is_valid,
            Self::Invalid => !result.is_valid,
        }
    }
}

impl fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFilter {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            other => Err(ExportError::UnknownFilter(other.to_string())),
        }
    }
}

/// `email-verification-<filter>-<YYYY-MM-DD>.csv`
pub fn default_file_name(filter: ExportFilter, date: NaiveDate) -> String {
    format!(
        "email-verification-{}-{}.csv",
        filter.as_str(),
        date.format("%Y-%m-%d")
    )
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn escaped(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quoted(field)
    } else {
        field.to_string()
    }
}

/// Renders the header plus one row per kept result. `Details` is always
/// quoted; other fields only when they need it.
pub fn to_csv(results: &[VerificationResult], filter: ExportFilter) -> Result<String, ExportError> {
    // csv::Writer can only quote every field or none of them, so quoting is
    // done here and the writer only joins fields
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for r in results.iter().filter(|r| filter.keeps(r)) {
        let email = escaped(&r.email);
        let details = quoted(&r.details.to_string());
        wtr.write_record([
            email.as_str(),
            flag(r.is_valid),
            flag(r.syntax_valid),
            flag(r.domain_valid),
            flag(r.mx_record_valid),
            flag(r.smtp_valid),
            flag(r.is_disposable),
            flag(r.is_role_based),
            flag(r.is_free),
            flag(r.is_typo),
            details.as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
