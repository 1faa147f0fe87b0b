use std::collections::BTreeMap;

use phf::phf_map;

const DISPOSABLE_DOMAINS: &[&str] = &[
    "mailinator.com",
    "tempmail.com",
    "throwawaymail.com",
    "guerrillamail.com",
    "10minutemail.com",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
    "temp-mail.org",
    "dispostable.com",
];

const FREE_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
    "mail.com",
    "zoho.com",
    "gmx.com",
];

const ROLE_PREFIXES: &[&str] = &[
    "admin",
    "info",
    "support",
    "sales",
    "contact",
    "help",
    "service",
    "billing",
    "marketing",
    "webmaster",
    "postmaster",
    "hostmaster",
    "noreply",
    "no-reply",
    "mail",
    "office",
    "hr",
];

const COMMON_TYPOS: phf::Map<&'static str, &'static str> = phf_map! {
    "gmial.com" => "gmail.com",
    "gamil.com" => "gmail.com",
    "gmal.com" => "gmail.com",
    "gmail.co" => "gmail.com",
    "gmail.cm" => "gmail.com",
    "yaho.com" => "yahoo.com",
    "yahooo.com" => "yahoo.com",
    "yahoo.co" => "yahoo.com",
    "hotmial.com" => "hotmail.com",
    "hotmal.com" => "hotmail.com",
    "hotmai.com" => "hotmail.com",
    "outlok.com" => "outlook.com",
    "outloo.com" => "outlook.com",
    "outlook.co" => "outlook.com",
};

/// Reference data the classifier works over. List order matters: the typo
/// scan walks free domains first, then disposable ones, and stops at the
/// first close match.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTables {
    pub disposable_domains: Vec<String>,
    pub free_domains: Vec<String>,
    pub role_prefixes: Vec<String>,
    pub typos: BTreeMap<String, String>,
}

impl ReferenceTables {
    pub fn builtin() -> Self {
        Self {
            disposable_domains: to_owned_list(DISPOSABLE_DOMAINS),
            free_domains: to_owned_list(FREE_DOMAINS),
            role_prefixes: to_owned_list(ROLE_PREFIXES),
            typos: COMMON_TYPOS
                .entries()
                .map(|(typo, fix)| (typo.to_string(), fix.to_string()))
                .collect(),
        }
    }

    /// Lower-cases and trims every entry; empty entries are dropped.
    pub fn normalized(self) -> Self {
        Self {
            disposable_domains: normalize_list(self.disposable_domains),
            free_domains: normalize_list(self.free_domains),
            role_prefixes: normalize_list(self.role_prefixes),
            typos: self
                .typos
                .into_iter()
                .filter_map(|(typo, fix)| {
                    let typo = normalize_entry(&typo)?;
                    let fix = normalize_entry(&fix)?;
                    Some((typo, fix))
                })
                .collect(),
        }
    }

    /// Free domains followed by disposable domains, in table order.
    pub(crate) fn reference_domains(&self) -> impl Iterator<Item = &str> {
        self.free_domains
            .iter()
            .chain(self.disposable_domains.iter())
            .map(String::as_str)
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items.iter().filter_map(|s| normalize_entry(s)).collect()
}

fn normalize_entry(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
