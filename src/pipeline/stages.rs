use tracing::{debug, warn};

use super::Verifier;
use super::types::{Details, Draft, VerificationSettings};
use crate::checks::{CheckError, DomainCheck, MxCheck, SmtpCheck};
use crate::validator::{AddressParts, validate_syntax};

/// Pipeline stages, in execution order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Syntax,
    Typo,
    Domain,
    Mx,
    Smtp,
    Classify,
}

impl Stage {
    pub const ORDER: [Stage; 6] = [
        Stage::Syntax,
        Stage::Typo,
        Stage::Domain,
        Stage::Mx,
        Stage::Smtp,
        Stage::Classify,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Typo => "typo",
            Self::Domain => "domain",
            Self::Mx => "mx",
            Self::Smtp => "smtp",
            Self::Classify => "classify",
        }
    }
}

pub(crate) enum Flow {
    Continue,
    ShortCircuit(Details),
}

/// Per-run state handed from stage to stage.
pub(crate) struct Run<'a> {
    pub email: &'a str,
    pub parts: AddressParts<'a>,
    pub draft: Draft,
}

impl<D, M, S> Verifier<D, M, S>
where
    D: DomainCheck,
    M: MxCheck,
    S: SmtpCheck,
{
    pub(crate) async fn run_stage(
        &self,
        stage: Stage,
        run: &mut Run<'_>,
        settings: &VerificationSettings,
    ) -> Flow {
        match stage {
            Stage::Syntax => self.syntax_stage(run, settings),
            Stage::Typo => self.typo_stage(run, settings),
            Stage::Domain => self.domain_stage(run, settings).await,
            Stage::Mx => self.mx_stage(run, settings).await,
            Stage::Smtp => self.smtp_stage(run, settings).await,
            Stage::Classify => self.classify_stage(run, settings),
        }
    }

    fn syntax_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        if !settings.check_syntax {
            run.draft.syntax_valid = true;
            return Flow::Continue;
        }
        run.draft.syntax_valid = validate_syntax(run.email);
        if run.draft.syntax_valid {
            Flow::Continue
        } else {
            Flow::ShortCircuit(Details::InvalidSyntax)
        }
    }

    fn typo_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        if settings.detect_typos {
            let check = self.classifier.detect_typo(run.email);
            run.draft.is_typo = check.is_typo;
            if check.is_typo && settings.suggest_corrections {
                run.draft.suggested_correction = check.suggestion;
            }
        }
        Flow::Continue
    }

    async fn domain_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        if !settings.check_domain {
            run.draft.domain_valid = true;
            return Flow::Continue;
        }
        let domain = run.parts.domain_or_empty();
        let outcome = self.domain_check.domain_exists(domain).await;
        run.draft.domain_valid = settle(Stage::Domain, domain, outcome);
        if run.draft.domain_valid {
            Flow::Continue
        } else {
            Flow::ShortCircuit(Details::DomainNotFound)
        }
    }

    async fn mx_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        if !settings.check_mx {
            run.draft.mx_record_valid = true;
            return Flow::Continue;
        }
        let domain = run.parts.domain_or_empty();
        let outcome = self.mx_check.has_mx_records(domain).await;
        run.draft.mx_record_valid = settle(Stage::Mx, domain, outcome);
        if run.draft.mx_record_valid {
            Flow::Continue
        } else {
            Flow::ShortCircuit(Details::NoMxRecords)
        }
    }

    async fn smtp_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        if !settings.check_smtp {
            run.draft.smtp_valid = true;
            return Flow::Continue;
        }
        let outcome = self.smtp_check.accepts(run.email).await;
        run.draft.smtp_valid = settle(Stage::Smtp, run.email, outcome);
        // a refused recipient is recorded, never a short-circuit
        Flow::Continue
    }

    fn classify_stage(&self, run: &mut Run<'_>, settings: &VerificationSettings) -> Flow {
        let domain = run.parts.domain;
        if settings.detect_disposable {
            run.draft.is_disposable = domain.is_some_and(|d| self.classifier.is_disposable_domain(d));
        }
        if settings.detect_free {
            run.draft.is_free = domain.is_some_and(|d| self.classifier.is_free_domain(d));
        }
        if settings.detect_role_based {
            run.draft.is_role_based = self.classifier.is_role_based_local_part(run.parts.local);
        }
        Flow::Continue
    }
}

/// A checker fault counts as a negative outcome for that stage only.
fn settle(stage: Stage, input: &str, outcome: Result<bool, CheckError>) -> bool {
    match outcome {
        Ok(passed) => {
            debug!(stage = stage.name(), input, passed, "check settled");
            passed
        }
        Err(err) => {
            warn!(stage = stage.name(), input, error = %err, "check failed, counted as negative");
            false
        }
    }
}
