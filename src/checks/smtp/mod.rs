//! SMTP acceptance probe (`with-smtp-verify` feature).
//!
//! Runs a minimal `EHLO` / `MAIL FROM` / `RCPT TO` dialogue against the MX
//! hosts of the address domain (falling back to the domain itself) and never
//! sends a message body.

mod options;
mod session;

pub use options::SmtpProbeOptions;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use self::session::{SmtpReply, SmtpSession};
use super::dns::{DnsChecker, ip_literal, normalize_domain};
use super::{CheckError, SmtpCheck};
use crate::validator::split_address;

#[derive(Debug, Clone)]
pub struct SmtpProbeChecker {
    dns: DnsChecker,
    options: SmtpProbeOptions,
}

impl SmtpProbeChecker {
    pub fn new(dns: DnsChecker, options: SmtpProbeOptions) -> Self {
        Self { dns, options }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }

    async fn candidate_hosts(&self, ascii_domain: &str) -> Result<Vec<String>, CheckError> {
        let mut hosts: Vec<String> = self
            .dns
            .mx_records(ascii_domain)
            .await?
            .into_iter()
            .map(|record| record.exchange)
            .collect();
        if hosts.is_empty() {
            // implicit MX: the domain itself
            hosts.push(ascii_domain.to_string());
        }
        hosts.truncate(self.options.max_mx.max(1));
        Ok(hosts)
    }

    async fn probe_host(&self, host: &str, ascii_domain: &str, address: &str) -> Result<Verdict, CheckError> {
        let mut session = SmtpSession::connect(host, self.options.port, self.options.timeout()).await?;
        let helo = self.options.helo_name(ascii_domain);
        let mail_from = self.options.mail_from(ascii_domain);
        let verdict = run_dialogue(&mut session, &helo, &mail_from, address).await;
        session.quit().await;
        verdict
    }
}

impl SmtpCheck for SmtpProbeChecker {
    async fn accepts(&self, address: &str) -> Result<bool, CheckError> {
        let domain = split_address(address).domain.ok_or(CheckError::EmptyDomain)?;
        let (ascii, hosts) = match literal_target(domain) {
            Some(target) => target,
            None => {
                let ascii = normalize_domain(domain)?;
                let hosts = self.candidate_hosts(&ascii).await?;
                (ascii, hosts)
            }
        };

        let mut last_error = None;
        for host in &hosts {
            match self.probe_host(host, &ascii, address).await {
                Ok(Verdict::Accepted) => return Ok(true),
                Ok(Verdict::Rejected) => return Ok(false),
                Ok(Verdict::Inconclusive(reason)) => {
                    debug!(host = %host, %reason, "inconclusive SMTP answer");
                    last_error = Some(CheckError::Protocol(reason));
                }
                Err(err) => {
                    debug!(host = %host, error = %err, "SMTP host failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(CheckError::NoSmtpServers(ascii)))
    }
}

/// For an address literal: the bracketed form used in HELO and the envelope
/// sender, and the bare IP as the only host to connect to.
fn literal_target(domain: &str) -> Option<(String, Vec<String>)> {
    let ip = ip_literal(domain)?;
    Some((format!("[{ip}]"), vec![ip.to_string()]))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    Accepted,
    Rejected,
    Inconclusive(String),
}

pub(crate) async fn run_dialogue<S>(
    session: &mut SmtpSession<S>,
    helo: &str,
    mail_from: &str,
    address: &str,
) -> Result<Verdict, CheckError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let banner = session.read_reply().await?;
    if !banner.is_positive_completion() {
        return Ok(Verdict::Inconclusive(format!(
            "greeting refused ({} {})",
            banner.code,
            banner.message()
        )));
    }

    let ehlo = session.command(&format!("EHLO {helo}")).await?;
    if !ehlo.is_positive_completion() {
        let helo_reply = session.command(&format!("HELO {helo}")).await?;
        if !helo_reply.is_positive_completion() {
            return Ok(Verdict::Inconclusive(format!("HELO rejected with {}", helo_reply.code)));
        }
    }

    let mail_reply = session.command(&format!("MAIL FROM:<{mail_from}>")).await?;
    if !mail_reply.is_positive_completion() {
        return Ok(Verdict::Inconclusive(format!(
            "MAIL FROM rejected with {}",
            mail_reply.code
        )));
    }

    let rcpt_reply = session.command(&format!("RCPT TO:<{address}>")).await?;
    Ok(classify_recipient(&rcpt_reply))
}

fn classify_recipient(reply: &SmtpReply) -> Verdict {
    if reply.is_positive_completion() {
        return Verdict::Accepted;
    }
    if matches!(reply.code, 550 | 551 | 553) {
        return Verdict::Rejected;
    }
    if reply.is_transient_failure() {
        return Verdict::Inconclusive(format!("temporary failure {}", reply.code));
    }
    if reply.is_permanent_failure() {
        return Verdict::Inconclusive(format!("policy rejection {}", reply.code));
    }
    Verdict::Inconclusive(format!("unexpected response {}", reply.code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

    /// Answers each client line with the next scripted reply and records
    /// what the client sent.
    async fn scripted_server(stream: DuplexStream, greeting: &str, replies: Vec<&'static str>) -> Vec<String> {
        let mut stream = BufReader::new(stream);
        stream.get_mut().write_all(greeting.as_bytes()).await.unwrap();
        let mut received = Vec::new();
        for reply in replies {
            let mut line = String::new();
            if stream.read_line(&mut line).await.unwrap() == 0 {
                break;
            }
            received.push(line.trim_end().to_string());
            stream.get_mut().write_all(reply.as_bytes()).await.unwrap();
        }
        received
    }

    async fn dialogue(greeting: &'static str, replies: Vec<&'static str>) -> (Result<Verdict, CheckError>, Vec<String>) {
        let (client, server) = tokio::io::duplex(1024);
        let server = tokio::spawn(scripted_server(server, greeting, replies));
        let mut session = SmtpSession::new(client, Duration::from_secs(2));
        let verdict = run_dialogue(&mut session, "probe.test", "postmaster@probe.test", "alice@example.com").await;
        drop(session);
        (verdict, server.await.unwrap())
    }

    #[tokio::test]
    async fn accepted_recipient() {
        let (verdict, sent) = dialogue(
            "220 mx.example.com ESMTP\r\n",
            vec!["250-mx.example.com\r\n250 SIZE 1000\r\n", "250 OK\r\n", "250 Accepted\r\n"],
        )
        .await;
        assert_eq!(verdict.unwrap(), Verdict::Accepted);
        assert_eq!(
            sent,
            vec![
                "EHLO probe.test",
                "MAIL FROM:<postmaster@probe.test>",
                "RCPT TO:<alice@example.com>",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let (verdict, _) = dialogue(
            "220 ready\r\n",
            vec!["250 hi\r\n", "250 OK\r\n", "550 5.1.1 user unknown\r\n"],
        )
        .await;
        assert_eq!(verdict.unwrap(), Verdict::Rejected);
    }

    #[tokio::test]
    async fn ehlo_refused_falls_back_to_helo() {
        let (verdict, sent) = dialogue(
            "220 ready\r\n",
            vec!["502 no ESMTP\r\n", "250 hi\r\n", "250 OK\r\n", "250 OK\r\n"],
        )
        .await;
        assert_eq!(verdict.unwrap(), Verdict::Accepted);
        assert_eq!(sent[1], "HELO probe.test");
    }

    #[tokio::test]
    async fn greylisting_is_inconclusive() {
        let (verdict, _) = dialogue(
            "220 ready\r\n",
            vec!["250 hi\r\n", "250 OK\r\n", "451 try later\r\n"],
        )
        .await;
        assert!(matches!(verdict.unwrap(), Verdict::Inconclusive(_)));
    }

    #[tokio::test]
    async fn refused_greeting_is_inconclusive() {
        let (verdict, sent) = dialogue("554 go away\r\n", vec![]).await;
        assert!(matches!(verdict.unwrap(), Verdict::Inconclusive(_)));
        assert!(sent.is_empty());
    }

    #[test]
    fn address_literal_targets_its_own_ip() {
        let (ascii, hosts) = literal_target("[192.168.0.1]").expect("literal");
        assert_eq!(ascii, "[192.168.0.1]");
        assert_eq!(hosts, vec!["192.168.0.1"]);
        let options = SmtpProbeOptions::default();
        assert_eq!(options.mail_from(&ascii), "postmaster@[192.168.0.1]");
        assert!(literal_target("example.com").is_none());
    }
}
