//! Shape of the TOML configuration file. Every key is optional; missing keys
//! keep the built-in defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) settings: SettingsSection,
    #[serde(default)]
    pub(crate) tables: TablesSection,
    #[serde(default)]
    pub(crate) simulation: SimulationSection,
    #[serde(default)]
    pub(crate) dns: DnsSection,
    #[serde(default)]
    pub(crate) smtp: SmtpSection,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct SettingsSection {
    pub(crate) check_syntax: Option<bool>,
    pub(crate) check_domain: Option<bool>,
    pub(crate) check_mx: Option<bool>,
    pub(crate) check_smtp: Option<bool>,
    pub(crate) detect_disposable: Option<bool>,
    pub(crate) detect_role_based: Option<bool>,
    pub(crate) detect_free: Option<bool>,
    pub(crate) detect_typos: Option<bool>,
    pub(crate) suggest_corrections: Option<bool>,
    pub(crate) concurrent_limit: Option<usize>,
}

/// Each list, when present, replaces the built-in one entirely.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct TablesSection {
    pub(crate) disposable_domains: Option<Vec<String>>,
    pub(crate) free_domains: Option<Vec<String>>,
    pub(crate) role_prefixes: Option<Vec<String>>,
    pub(crate) typos: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct SimulationSection {
    pub(crate) domain_pass_rate: Option<f64>,
    pub(crate) mx_pass_rate: Option<f64>,
    pub(crate) smtp_pass_rate: Option<f64>,
    pub(crate) domain_latency_ms: Option<u64>,
    pub(crate) mx_latency_ms: Option<u64>,
    pub(crate) smtp_latency_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct DnsSection {
    pub(crate) timeout_ms: Option<u64>,
    pub(crate) attempts: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct SmtpSection {
    pub(crate) helo_domain: Option<String>,
    pub(crate) mail_from: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) timeout_ms: Option<u64>,
    pub(crate) max_mx: Option<usize>,
}
