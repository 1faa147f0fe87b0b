use thiserror::Error;

/// Faults raised by checker implementations.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed: {0}")]
    Idna(String),
    #[cfg(feature = "with-dns")]
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[cfg(feature = "with-dns")]
    #[error("DNS lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} timed out after {timeout_ms} ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("no SMTP servers available for {0}")]
    NoSmtpServers(String),
}

impl CheckError {
    pub fn idna<T: std::fmt::Display>(err: T) -> Self {
        Self::Idna(err.to_string())
    }

    #[cfg_attr(not(feature = "with-smtp-verify"), allow(dead_code))]
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    #[cfg_attr(not(feature = "with-smtp-verify"), allow(dead_code))]
    pub(crate) fn connect(host: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connect {
            host: host.into(),
            source,
        }
    }

    #[cfg_attr(not(feature = "with-smtp-verify"), allow(dead_code))]
    pub(crate) fn timeout(stage: &'static str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            stage,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    #[cfg(feature = "with-dns")]
    pub(crate) fn resolver_init(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::ResolverInit { source }
    }

    #[cfg(feature = "with-dns")]
    pub(crate) fn lookup(
        name: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Lookup {
            name: name.into(),
            source,
        }
    }
}
