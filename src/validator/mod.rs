mod address;

pub use address::{AddressParts, split_address};

use std::sync::LazyLock;

use regex::Regex;

/// Local-part (dot-atoms without `<>()[]\,;:@"` or whitespace, or a quoted
/// string), then `@`, then a bracketed IPv4 literal or a dotted hostname whose
/// last label has at least two letters.
const SYNTAX_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

static SYNTAX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SYNTAX_PATTERN).expect("built-in email syntax pattern failed to compile")
});

/// Checks `email` against the fixed syntax pattern. The input is not trimmed.
pub fn validate_syntax(email: &str) -> bool {
    SYNTAX_RE.is_match(email)
}
