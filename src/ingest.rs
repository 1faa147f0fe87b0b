//! Turning pasted text or uploaded files into a list of candidate addresses.
//!
//! Tokens are trimmed and anything without an `@` is dropped. Nothing else is
//! validated here; that is the pipeline's job.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("lecture de {path} impossible: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "with-csv")]
    #[error("CSV invalide: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        IngestError::Read {
            path: path.display().to_string(),
            source,
        }
    }
}

fn keep(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty() && token.contains('@')).then(|| token.to_string())
}

/// Free text: addresses separated by newlines, commas or semicolons.
pub fn parse_text(text: &str) -> Vec<String> {
    text.split(['\n', ',', ';']).filter_map(keep).collect()
}

/// CSV content: the first comma-separated field of every line.
///
/// Quotes are not interpreted: one record is one physical line, so a stray
/// `"` never merges lines and quoted addresses are kept as written.
#[cfg(feature = "with-csv")]
pub fn parse_csv(content: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(email) = record.get(0).and_then(keep) {
            out.push(email);
        }
    }
    Ok(out)
}

/// CSV content without the `csv` crate: first comma-separated field per line.
#[cfg(not(feature = "with-csv"))]
pub fn parse_csv(content: &str) -> Result<Vec<String>, IngestError> {
    Ok(content
        .lines()
        .filter_map(|line| line.split(',').next())
        .filter_map(keep)
        .collect())
}

fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parses `content` as CSV when `path` ends in `.csv`, as free text otherwise.
pub fn parse_for_path(path: &Path, content: &str) -> Result<Vec<String>, IngestError> {
    if is_csv_path(path) {
        parse_csv(content)
    } else {
        Ok(parse_text(content))
    }
}

/// Reads `path` and parses it with [`parse_for_path`].
pub fn read_file(path: &Path) -> Result<Vec<String>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    parse_for_path(path, &content)
}

/// Reads everything from `reader` as free text.
pub fn read_text<R: Read>(mut reader: R) -> Result<Vec<String>, IngestError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| IngestError::read(Path::new("<stdin>"), e))?;
    Ok(parse_text(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_splits_on_every_separator() {
        let parsed = parse_text("a@x.com, b@y.com;c@z.com\n  d@w.com  \n");
        assert_eq!(parsed, vec!["a@x.com", "b@y.com", "c@z.com", "d@w.com"]);
    }

    #[test]
    fn tokens_without_at_are_dropped() {
        let parsed = parse_text("hello\n\n,;user@example.com,not-an-address");
        assert_eq!(parsed, vec!["user@example.com"]);
    }

    #[test]
    fn csv_keeps_first_field_only() {
        let content = "email,name\nalice@example.com,Alice\n bob@example.com , Bob\n,empty\n";
        let parsed = parse_csv(content).unwrap();
        // the header has no '@' and is filtered out
        assert_eq!(parsed, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn csv_unbalanced_quote_stays_on_its_line() {
        let content = "\"alice@example.com\nbob@example.com,Bob\ncarol@example.com\n";
        let parsed = parse_csv(content).unwrap();
        assert_eq!(
            parsed,
            vec!["\"alice@example.com", "bob@example.com", "carol@example.com"]
        );
    }

    #[test]
    fn csv_quoted_field_is_not_rewritten() {
        // first field is `"a`, which has no '@'
        assert!(parse_csv("\"a,b\"@example.com,x\n").unwrap().is_empty());
        let parsed = parse_csv("\"quoted\"@example.com,x\n").unwrap();
        assert_eq!(parsed, vec!["\"quoted\"@example.com"]);
    }

    #[test]
    fn extension_selects_mode() {
        let content = "a@x.com,b@y.com\n";
        let csv = parse_for_path(Path::new("list.CSV"), content).unwrap();
        assert_eq!(csv, vec!["a@x.com"]);
        let text = parse_for_path(Path::new("list.txt"), content).unwrap();
        assert_eq!(text, vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn reader_is_parsed_as_text() {
        let parsed = read_text("one@x.com\ntwo@y.com".as_bytes()).unwrap();
        assert_eq!(parsed, vec!["one@x.com", "two@y.com"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
