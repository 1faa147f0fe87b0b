//! DNS-backed domain and MX checks (`with-dns` feature).

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
};
use tracing::debug;

use super::{CheckError, DomainCheck, MxCheck};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Answers domain existence (A/AAAA, then MX) and MX presence through an
/// async resolver. Cloning shares the resolver and its cache.
#[derive(Clone)]
pub struct DnsChecker {
    resolver: TokioAsyncResolver,
}

impl std::fmt::Debug for DnsChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsChecker").finish_non_exhaustive()
    }
}

impl DnsChecker {
    /// Uses the system resolver configuration (`/etc/resolv.conf` on Unix).
    pub fn from_system_conf() -> Result<Self, CheckError> {
        let resolver =
            TokioAsyncResolver::tokio_from_system_conf().map_err(CheckError::resolver_init)?;
        Ok(Self { resolver })
    }

    /// Uses the default upstream servers with the given per-query timeout and
    /// attempt count.
    pub fn with_timeout(timeout: Duration, attempts: usize) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = attempts.max(1);
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }

    /// MX records of `domain`, ascending preference, duplicates removed.
    /// An address literal such as `[192.0.2.1]` is its own implicit MX.
    pub async fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, CheckError> {
        if let Some(ip) = ip_literal(domain) {
            return Ok(vec![MxRecord::new(0, ip.to_string())]);
        }
        let ascii = normalize_domain(domain)?;
        sorted_mx_records(&self.resolver, &ascii).await
    }

    async fn has_address_records(&self, ascii: &str) -> Result<bool, CheckError> {
        match self.resolver.lookup_ip(ascii).await {
            Ok(lookup) => Ok(lookup.iter().next().is_some()),
            Err(err) if is_no_records(&err) => Ok(false),
            Err(err) => Err(CheckError::lookup(ascii, err)),
        }
    }
}

impl DomainCheck for DnsChecker {
    async fn domain_exists(&self, domain: &str) -> Result<bool, CheckError> {
        if let Some(ip) = ip_literal(domain) {
            debug!(%ip, "address literal, no lookup");
            return Ok(true);
        }
        let ascii = normalize_domain(domain)?;
        if self.has_address_records(&ascii).await? {
            debug!(domain = %ascii, "domain has address records");
            return Ok(true);
        }
        let records = sorted_mx_records(&self.resolver, &ascii).await?;
        debug!(domain = %ascii, mx = records.len(), "no address records, MX fallback");
        Ok(!records.is_empty())
    }
}

impl MxCheck for DnsChecker {
    async fn has_mx_records(&self, domain: &str) -> Result<bool, CheckError> {
        Ok(!self.mx_records(domain).await?.is_empty())
    }
}

pub(crate) async fn sorted_mx_records<R>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<Vec<MxRecord>, CheckError>
where
    R: LookupMx,
{
    let mut records = match resolver.lookup_mx(ascii_domain).await {
        Ok(records) => records,
        Err(err) if is_no_records(&err) => Vec::new(),
        Err(err) => return Err(CheckError::lookup(ascii_domain, err)),
    };

    records.sort();
    records.dedup();
    Ok(records)
}

/// `[a.b.c.d]` domain part as an IPv4 address.
pub(crate) fn ip_literal(domain: &str) -> Option<Ipv4Addr> {
    domain
        .trim()
        .strip_prefix('[')?
        .strip_suffix(']')?
        .parse()
        .ok()
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, CheckError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(CheckError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(CheckError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

pub(crate) trait LookupMx {
    fn lookup_mx(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<MxRecord>, ResolveError>> + Send;
}

impl LookupMx for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = self.mx_lookup(domain).await?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}
