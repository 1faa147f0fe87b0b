use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::checks::CheckError;

/// A raw SMTP reply: status code and the text of every reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    pub fn message(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReplyLine {
    code: u16,
    continuation: bool,
    text: String,
}

fn parse_reply_line(raw: &str) -> Result<ReplyLine, CheckError> {
    let code_part = raw
        .get(..3)
        .ok_or_else(|| CheckError::Protocol(format!("invalid SMTP reply: '{raw}'")))?;
    let code = code_part
        .parse::<u16>()
        .map_err(|_| CheckError::Protocol(format!("invalid SMTP status code: '{code_part}'")))?;
    let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
    let text = raw.get(4..).unwrap_or_default().to_string();
    Ok(ReplyLine {
        code,
        continuation,
        text,
    })
}

pub(crate) struct SmtpSession<S> {
    stream: BufStream<S>,
    timeout: Duration,
}

impl SmtpSession<TcpStream> {
    pub(crate) async fn connect(host: &str, port: u16, limit: Duration) -> Result<Self, CheckError> {
        let stream = timeout(limit, TcpStream::connect((host, port)))
            .await
            .map_err(|_| CheckError::timeout("connect", limit))?
            .map_err(|err| CheckError::connect(format!("{host}:{port}"), err))?;
        Ok(Self::new(stream, limit))
    }
}

impl<S> SmtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, limit: Duration) -> Self {
        Self {
            stream: BufStream::new(stream),
            timeout: limit,
        }
    }

    pub(crate) async fn read_reply(&mut self) -> Result<SmtpReply, CheckError> {
        let limit = self.timeout;
        timeout(limit, self.read_reply_lines())
            .await
            .map_err(|_| CheckError::timeout("reply", limit))?
    }

    async fn read_reply_lines(&mut self) -> Result<SmtpReply, CheckError> {
        let mut code = None;
        let mut lines = Vec::new();
        loop {
            let mut raw = String::new();
            let bytes = self
                .stream
                .read_line(&mut raw)
                .await
                .map_err(CheckError::io)?;
            if bytes == 0 {
                return Err(CheckError::Protocol(
                    "connection closed while reading reply".to_string(),
                ));
            }
            let line = parse_reply_line(raw.trim_end_matches(['\r', '\n']))?;
            match code {
                Some(existing) if existing != line.code => {
                    return Err(CheckError::Protocol(format!(
                        "inconsistent SMTP reply codes: {existing} vs {}",
                        line.code
                    )));
                }
                Some(_) => {}
                None => code = Some(line.code),
            }
            lines.push(line.text);
            if !line.continuation {
                break;
            }
        }
        let code = code.ok_or_else(|| CheckError::Protocol("SMTP reply missing status code".into()))?;
        Ok(SmtpReply { code, lines })
    }

    pub(crate) async fn command(&mut self, command: &str) -> Result<SmtpReply, CheckError> {
        let limit = self.timeout;
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        let stream = &mut self.stream;
        timeout(limit, async move {
            stream.write_all(&data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| CheckError::timeout("command", limit))?
        .map_err(CheckError::io)?;
        self.read_reply().await
    }

    pub(crate) async fn quit(&mut self) {
        let _ = self.command("QUIT").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_final_and_continuation_lines() {
        assert_eq!(
            parse_reply_line("250-mx.example.com").unwrap(),
            ReplyLine {
                code: 250,
                continuation: true,
                text: "mx.example.com".into()
            }
        );
        let last = parse_reply_line("250 OK").unwrap();
        assert!(!last.continuation);
        assert_eq!(last.text, "OK");
        assert_eq!(parse_reply_line("354").unwrap().text, "");
    }

    #[test]
    fn rejects_garbage_lines() {
        assert!(parse_reply_line("25").is_err());
        assert!(parse_reply_line("abc hello").is_err());
    }

    #[tokio::test]
    async fn reads_multiline_reply() {
        let (client, mut server) = tokio::io::duplex(256);
        server
            .write_all(b"250-first\r\n250-second\r\n250 last\r\n")
            .await
            .unwrap();
        let mut session = SmtpSession::new(client, Duration::from_secs(1));
        let reply = session.read_reply().await.unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines, vec!["first", "second", "last"]);
        assert!(reply.is_positive_completion());
    }

    #[tokio::test]
    async fn mixed_codes_are_a_protocol_error() {
        let (client, mut server) = tokio::io::duplex(256);
        server.write_all(b"250-first\r\n550 last\r\n").await.unwrap();
        let mut session = SmtpSession::new(client, Duration::from_secs(1));
        let err = session.read_reply().await.expect_err("inconsistent codes");
        assert!(matches!(err, CheckError::Protocol(_)));
    }

    #[tokio::test]
    async fn closed_stream_is_reported() {
        let (client, server) = tokio::io::duplex(64);
        drop(server);
        let mut session = SmtpSession::new(client, Duration::from_secs(1));
        assert!(session.read_reply().await.is_err());
    }
}
