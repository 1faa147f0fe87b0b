//! Verification pipeline for one address, and the batch scheduler on top of it.
//!
//! [`Verifier::verify_one`] walks the [`Stage`]s in order. Syntax, domain and
//! MX failures end the run early; an SMTP refusal is recorded and the run
//! goes on to classification. Every run ends at a single exit that stamps the
//! elapsed time, so each address yields exactly one [`VerificationResult`].

mod scheduler;
mod stages;
mod stats;
mod types;

pub use stages::Stage;
pub use stats::BatchStatistics;
pub use types::{
    DEFAULT_CONCURRENT_LIMIT, Details, MAX_CONCURRENT_LIMIT, VerificationResult,
    VerificationSettings,
};

use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::checks::{DomainCheck, FixedChecker, MxCheck, SimulatedChecker, SimulationOptions, SmtpCheck};
use crate::classifier::Classifier;
use crate::validator::split_address;
use stages::{Flow, Run};
use types::Draft;

/// Runs the pipeline with one injected checker per network-bound stage.
#[derive(Debug, Clone)]
pub struct Verifier<D, M, S> {
    domain_check: D,
    mx_check: M,
    smtp_check: S,
    classifier: Classifier,
}

impl<D, M, S> Verifier<D, M, S> {
    pub fn new(domain_check: D, mx_check: M, smtp_check: S) -> Self {
        Self {
            domain_check,
            mx_check,
            smtp_check,
            classifier: Classifier::builtin(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

impl Verifier<SimulatedChecker, SimulatedChecker, SimulatedChecker> {
    /// Randomized pass rates and artificial latency, no network access.
    pub fn simulated(options: SimulationOptions) -> Self {
        let checker = SimulatedChecker::new(options);
        Self::new(checker.clone(), checker.clone(), checker)
    }
}

impl Verifier<FixedChecker, FixedChecker, FixedChecker> {
    pub fn fixed(checker: FixedChecker) -> Self {
        Self::new(checker, checker, checker)
    }
}

impl<D, M, S> Verifier<D, M, S>
where
    D: DomainCheck,
    M: MxCheck,
    S: SmtpCheck,
{
    /// Verifies one address. Never fails: faults become negative outcomes.
    #[instrument(level = "debug", skip(self, settings))]
    pub async fn verify_one(&self, email: &str, settings: &VerificationSettings) -> VerificationResult {
        let started = Instant::now();
        let mut run = Run {
            email,
            parts: split_address(email),
            draft: Draft::default(),
        };

        let mut exit = None;
        for stage in Stage::ORDER {
            if let Flow::ShortCircuit(details) = self.run_stage(stage, &mut run, settings).await {
                debug!(stage = stage.name(), %details, "short-circuit");
                exit = Some(details);
                break;
            }
        }

        let details = exit.unwrap_or_else(|| run.draft.completion_details());
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        run.draft.finish(email, details, elapsed_ms)
    }
}
