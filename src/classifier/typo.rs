use super::ReferenceTables;
use crate::validator::split_address;

/// Outcome of the typo scan for one address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypoCheck {
    pub is_typo: bool,
    pub suggestion: Option<String>,
}

impl TypoCheck {
    pub fn none() -> Self {
        Self::default()
    }

    fn suggest(local: &str, domain: &str) -> Self {
        Self {
            is_typo: true,
            suggestion: Some(format!("{local}@{domain}")),
        }
    }
}

pub(crate) fn detect_typo_in(tables: &ReferenceTables, address: &str) -> TypoCheck {
    let parts = split_address(address);
    let Some(domain) = parts.domain else {
        return TypoCheck::none();
    };
    let domain = domain.to_lowercase();

    if let Some(fix) = tables.typos.get(&domain) {
        return TypoCheck::suggest(parts.local, fix);
    }

    tables
        .reference_domains()
        .find(|candidate| *candidate != domain && close_match(&domain, candidate))
        .map(|candidate| TypoCheck::suggest(parts.local, candidate))
        .unwrap_or_default()
}

/// Crude similarity: at most 2 length difference and at most 2 differing
/// positions when both strings are compared index by index (a missing
/// character counts as a difference). Not an edit distance: a shifted
/// character makes every following position differ.
pub fn close_match(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > 2 {
        return false;
    }

    let mut differences = 0usize;
    for i in 0..a.len().max(b.len()) {
        if a.get(i) != b.get(i) {
            differences += 1;
            if differences > 2 {
                return false;
            }
        }
    }
    true
}
