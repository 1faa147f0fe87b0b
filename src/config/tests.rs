use std::time::Duration;

use super::*;

#[test]
fn empty_file_keeps_defaults() {
    let config = AppConfig::from_toml_str("").unwrap();
    assert_eq!(config.settings, VerificationSettings::default());
    assert_eq!(config.tables, ReferenceTables::builtin().normalized());
    assert_eq!(config.simulation, SimulationOptions::default());
    assert_eq!(config.dns, DnsSettings::default());
    assert_eq!(config.smtp.port, 25);
}

#[test]
fn sections_overlay_defaults() {
    let raw = r#"
[settings]
check_smtp = false
concurrent_limit = 3

[tables]
free_domains = ["Example.ORG", "  "]
typos = { "exmaple.org" = "example.org" }

[simulation]
smtp_pass_rate = 0.5
smtp_latency_ms = 20

[dns]
timeout_ms = 1500

[smtp]
helo_domain = "probe.example.net"
max_mx = 1
"#;
    let config = AppConfig::from_toml_str(raw).unwrap();
    assert!(!config.settings.check_smtp);
    assert!(config.settings.check_mx);
    assert_eq!(config.settings.concurrent_limit, 3);

    assert_eq!(config.tables.free_domains, vec!["example.org"]);
    assert_eq!(config.tables.typos.get("exmaple.org").map(String::as_str), Some("example.org"));
    assert!(config.tables.disposable_domains.contains(&"mailinator.com".to_string()));

    assert_eq!(config.simulation.smtp_pass_rate, 0.5);
    assert_eq!(config.simulation.smtp_latency, Duration::from_millis(20));
    assert_eq!(config.simulation.domain_pass_rate, 0.9);

    assert_eq!(config.dns.timeout, Duration::from_millis(1500));
    assert_eq!(config.smtp.helo_domain, "probe.example.net");
    assert_eq!(config.smtp.max_mx, 1);

    let classifier = config.classifier();
    assert!(classifier.is_free_domain("example.org"));
    assert!(!classifier.is_free_domain("gmail.com"));
}

#[test]
fn concurrent_limit_is_clamped() {
    let config = AppConfig::from_toml_str("[settings]\nconcurrent_limit = 50\n").unwrap();
    assert_eq!(config.settings.concurrent_limit, 10);
    let config = AppConfig::from_toml_str("[settings]\nconcurrent_limit = 0\n").unwrap();
    assert_eq!(config.settings.concurrent_limit, 1);
}

#[test]
fn out_of_range_rate_is_rejected() {
    let err = AppConfig::from_toml_str("[simulation]\nmx_pass_rate = 1.5\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::RateOutOfRange { key: "simulation.mx_pass_rate", .. }
    ));
    let err = AppConfig::from_toml_str("[simulation]\ndomain_pass_rate = -0.1\n").unwrap_err();
    assert!(matches!(err, ConfigError::RateOutOfRange { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = AppConfig::from_toml_str("[settings]\ncheck_everything = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = AppConfig::from_toml_str("[metrics]\nenabled = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn degenerate_network_values_are_rejected() {
    let err = AppConfig::from_toml_str("[dns]\nattempts = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "dns.attempts", .. }));
    let err = AppConfig::from_toml_str("[smtp]\nport = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "smtp.port", .. }));
}

#[test]
fn missing_file_names_the_path() {
    let err = AppConfig::load(std::path::Path::new("/nope/mailverify.toml")).unwrap_err();
    assert!(err.to_string().contains("/nope/mailverify.toml"));
}
