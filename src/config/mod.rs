//! Runtime configuration, optionally loaded from a TOML file.

mod error;
mod file;

pub use error::ConfigError;
pub use file::ConfigFile;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::checks::SimulationOptions;
use crate::classifier::{Classifier, ReferenceTables};
use crate::pipeline::VerificationSettings;

/// Resolver knobs for the DNS-backed checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSettings {
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            attempts: 2,
        }
    }
}

/// Probe knobs for the SMTP-backed checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub helo_domain: String,
    pub mail_from: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub max_mx: usize,
}

impl Default for SmtpSettings {
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

#[cfg(feature = "with-smtp-verify")]
impl From<&SmtpSettings> for crate::checks::SmtpProbeOptions {
    fn from(s: &SmtpSettings) -> Self {
        Self {
            helo_domain: s.helo_domain.clone(),
            mail_from: s.mail_from.clone(),
            port: s.port,
            timeout_ms: s.timeout_ms,
            max_mx: s.max_mx,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub settings: VerificationSettings,
    pub tables: ReferenceTables,
    pub simulation: SimulationOptions,
    pub dns: DnsSettings,
    pub smtp: SmtpSettings,
    pub loaded_from: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        let mut config = Self::from_toml_str(&raw)?;
        config.loaded_from = Some(path.to_path_buf());
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        Self::from_file(file)
    }

    /// Overlays the file on the defaults and validates the result.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let s = file.settings;
        let settings = &mut config.settings;
        overlay(&mut settings.check_syntax, s.check_syntax);
        overlay(&mut settings.check_domain, s.check_domain);
        overlay(&mut settings.check_mx, s.check_mx);
        overlay(&mut settings.check_smtp, s.check_smtp);
        overlay(&mut settings.detect_disposable, s.detect_disposable);
        overlay(&mut settings.detect_role_based, s.detect_role_based);
        overlay(&mut settings.detect_free, s.detect_free);
        overlay(&mut settings.detect_typos, s.detect_typos);
        overlay(&mut settings.suggest_corrections, s.suggest_corrections);
        overlay(&mut settings.concurrent_limit, s.concurrent_limit);
        config.settings = config.settings.clamped();

        let t = file.tables;
        let tables = &mut config.tables;
        overlay(&mut tables.disposable_domains, t.disposable_domains);
        overlay(&mut tables.free_domains, t.free_domains);
        overlay(&mut tables.role_prefixes, t.role_prefixes);
        overlay(&mut tables.typos, t.typos);
        config.tables = config.tables.normalized();

        let sim = file.simulation;
        let simulation = &mut config.simulation;
        overlay_rate(
            &mut simulation.domain_pass_rate,
            "simulation.domain_pass_rate",
            sim.domain_pass_rate,
        )?;
        overlay_rate(
            &mut simulation.mx_pass_rate,
            "simulation.mx_pass_rate",
            sim.mx_pass_rate,
        )?;
        overlay_rate(
            &mut simulation.smtp_pass_rate,
            "simulation.smtp_pass_rate",
            sim.smtp_pass_rate,
        )?;
        overlay(&mut simulation.domain_latency, millis(sim.domain_latency_ms));
        overlay(&mut simulation.mx_latency, millis(sim.mx_latency_ms));
        overlay(&mut simulation.smtp_latency, millis(sim.smtp_latency_ms));

        overlay(&mut config.dns.timeout, millis(file.dns.timeout_ms));
        overlay(&mut config.dns.attempts, file.dns.attempts);
        if config.dns.attempts == 0 {
            return Err(ConfigError::invalid("dns.attempts", "au moins une tentative"));
        }

        let smtp = file.smtp;
        overlay(&mut config.smtp.helo_domain, smtp.helo_domain);
        overlay(&mut config.smtp.mail_from, smtp.mail_from);
        overlay(&mut config.smtp.port, smtp.port);
        overlay(&mut config.smtp.timeout_ms, smtp.timeout_ms);
        overlay(&mut config.smtp.max_mx, smtp.max_mx);
        if config.smtp.port == 0 {
            return Err(ConfigError::invalid("smtp.port", "le port 0 n'est pas utilisable"));
        }
        if config.smtp.max_mx == 0 {
            return Err(ConfigError::invalid("smtp.max_mx", "au moins un MX"));
        }

        Ok(config)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.tables.clone())
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn overlay_rate(slot: &mut f64, key: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        None => Ok(()),
        Some(v) if (0.0..=1.0).contains(&v) => {
            *slot = v;
            Ok(())
        }
        Some(v) => Err(ConfigError::RateOutOfRange { key, value: v }),
    }
}

fn millis(value: Option<u64>) -> Option<Duration> {
    value.map(Duration::from_millis)
}

#[cfg(test)]
mod tests;
