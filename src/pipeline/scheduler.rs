use futures::stream::{FuturesUnordered, StreamExt};
use tracing::info;

use super::{VerificationResult, VerificationSettings, Verifier};
use crate::checks::{DomainCheck, MxCheck, SmtpCheck};

impl<D, M, S> Verifier<D, M, S>
where
    D: DomainCheck,
    M: MxCheck,
    S: SmtpCheck,
{
    /// Verifies `addresses` in consecutive windows of
    /// [`VerificationSettings::window_width`] addresses.
    ///
    /// Addresses of one window run concurrently on the calling task and
    /// `on_result` sees them in completion order; the next window starts once
    /// the whole window has settled. `on_result` is called exactly once per
    /// address and never concurrently.
    pub async fn verify_batch<A, F>(
        &self,
        addresses: &[A],
        settings: &VerificationSettings,
        mut on_result: F,
    ) where
        A: AsRef<str>,
        F: FnMut(VerificationResult),
    {
        let width = settings.window_width();
        let windows = addresses.len().div_ceil(width);
        for (index, window) in addresses.chunks(width).enumerate() {
            info!(window = index + 1, of = windows, size = window.len(), "verifying window");
            let mut pending: FuturesUnordered<_> = window
                .iter()
                .map(|address| self.verify_one(address.as_ref(), settings))
                .collect();
            while let Some(result) = pending.next().await {
                on_result(result);
            }
        }
    }

    /// [`verify_batch`](Self::verify_batch), collected in delivery order.
    pub async fn verify_all<A>(
        &self,
        addresses: &[A],
        settings: &VerificationSettings,
    ) -> Vec<VerificationResult>
    where
        A: AsRef<str>,
    {
        let mut results = Vec::with_capacity(addresses.len());
        self.verify_batch(addresses, settings, |result| results.push(result))
            .await;
        results
    }
}
