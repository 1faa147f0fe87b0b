use std::time::Duration;

use rand::Rng;
use tracing::debug;

use super::{CheckError, DomainCheck, MxCheck, SmtpCheck};

/// Pass rates and latencies of the simulated checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    pub domain_pass_rate: f64,
    pub mx_pass_rate: f64,
    pub smtp_pass_rate: f64,
    pub domain_latency: Duration,
    pub mx_latency: Duration,
    pub smtp_latency: Duration,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            domain_pass_rate: 0.9,
            mx_pass_rate: 0.85,
            smtp_pass_rate: 0.8,
            domain_latency: Duration::from_millis(300),
            mx_latency: Duration::from_millis(400),
            smtp_latency: Duration::from_millis(500),
        }
    }
}

impl SimulationOptions {
    /// Same pass rates, no artificial latency.
    pub fn instant() -> Self {
        Self {
            domain_latency: Duration::ZERO,
            mx_latency: Duration::ZERO,
            smtp_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Stand-in for network probes: waits a fixed latency, then passes with a
/// fixed probability. The input is never inspected.
#[derive(Debug, Clone, Default)]
pub struct SimulatedChecker {
    options: SimulationOptions,
}

impl SimulatedChecker {
    pub fn new(options: SimulationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }
}

async fn simulate(check: &'static str, input: &str, latency: Duration, rate: f64) -> bool {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    let passed = roll(rate);
    debug!(check, input, passed, "simulated check");
    passed
}

fn roll(rate: f64) -> bool {
    if rate.is_nan() {
        return false;
    }
    rand::thread_rng().gen_bool(rate.clamp(0.0, 1.0))
}

impl DomainCheck for SimulatedChecker {
    async fn domain_exists(&self, domain: &str) -> Result<bool, CheckError> {
        let o = &self.options;
        Ok(simulate("domain", domain, o.domain_latency, o.domain_pass_rate).await)
    }
}

impl MxCheck for SimulatedChecker {
    async fn has_mx_records(&self, domain: &str) -> Result<bool, CheckError> {
        let o = &self.options;
        Ok(simulate("mx", domain, o.mx_latency, o.mx_pass_rate).await)
    }
}

impl SmtpCheck for SimulatedChecker {
    async fn accepts(&self, address: &str) -> Result<bool, CheckError> {
        let o = &self.options;
        Ok(simulate("smtp", address, o.smtp_latency, o.smtp_pass_rate).await)
    }
}
