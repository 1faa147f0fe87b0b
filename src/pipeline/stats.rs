use super::VerificationResult;

/// Running aggregate over a batch. The caller owns it and feeds it results
/// as they are delivered; every counter is order-independent.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStatistics {
    pub total: usize,
    pub processed: usize,
    pub valid: usize,
    pub invalid: usize,
    pub disposable: usize,
    pub role_based: usize,
    pub free: usize,
    pub typos: usize,
    /// Milliseconds, mean over every processed result.
    pub average_verification_time: f64,
    #[cfg_attr(feature = "with-serde", serde(skip))]
    total_verification_time: f64,
}

impl BatchStatistics {
    /// Fresh statistics for a batch of `total` addresses.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &VerificationResult) {
        self.processed += 1;
        if result.is_valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        self.disposable += usize::from(result.is_disposable);
        self.role_based += usize::from(result.is_role_based);
        self.free += usize::from(result.is_free);
        self.typos += usize::from(result.is_typo);

        self.total_verification_time += result.verification_time;
        self.average_verification_time = self.total_verification_time / self.processed as f64;
    }

    /// Whole percent of the batch processed so far, rounded down.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.processed.min(self.total) * 100 / self.total;
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Details;

    fn result(valid: bool, time: f64) -> VerificationResult {
        VerificationResult {
            email: "a@example.com".into(),
            is_valid: valid,
            syntax_valid: true,
            domain_valid: true,
            mx_record_valid: true,
            smtp_valid: valid,
            is_disposable: false,
            is_role_based: false,
            is_free: false,
            is_typo: false,
            suggested_correction: None,
            details: Details::Deliverable,
            verification_time: time,
        }
    }

    #[test]
    fn running_mean_of_verification_time() {
        let mut stats = BatchStatistics::new(3);
        stats.record(&result(true, 10.0));
        assert_eq!(stats.average_verification_time, 10.0);
        stats.record(&result(false, 20.0));
        assert_eq!(stats.average_verification_time, 15.0);
        stats.record(&result(true, 30.0));
        assert_eq!(stats.average_verification_time, 20.0);
        assert_eq!((stats.valid, stats.invalid, stats.processed), (2, 1, 3));
        assert!(stats.is_complete());
    }

    #[test]
    fn advisory_flags_are_counted() {
        let mut stats = BatchStatistics::new(2);
        let mut flagged = result(false, 1.0);
        flagged.is_disposable = true;
        flagged.is_role_based = true;
        flagged.is_free = true;
        flagged.is_typo = true;
        stats.record(&flagged);
        stats.record(&result(true, 1.0));
        assert_eq!(
            (stats.disposable, stats.role_based, stats.free, stats.typos),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn progress_rounds_down() {
        let mut stats = BatchStatistics::new(3);
        assert_eq!(stats.progress_percent(), 0);
        stats.record(&result(true, 1.0));
        assert_eq!(stats.progress_percent(), 33);
        stats.record(&result(true, 1.0));
        assert_eq!(stats.progress_percent(), 66);
        stats.record(&result(true, 1.0));
        assert_eq!(stats.progress_percent(), 100);
        assert_eq!(BatchStatistics::new(0).progress_percent(), 0);
    }
}
