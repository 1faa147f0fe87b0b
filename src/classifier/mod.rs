//! Pure, synchronous classification of addresses: disposable and free-provider
//! domains, role-based local-parts, and domain typos.
//!
//! The free functions use the built-in [`ReferenceTables`]; build a
//! [`Classifier`] to work over tables loaded from configuration.

mod tables;
mod typo;

pub use tables::ReferenceTables;
pub use typo::{TypoCheck, close_match};

use std::sync::LazyLock;

use typo::detect_typo_in;

static BUILTIN: LazyLock<Classifier> = LazyLock::new(Classifier::builtin);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    tables: ReferenceTables,
}

impl Classifier {
    pub fn new(tables: ReferenceTables) -> Self {
        Self {
            tables: tables.normalized(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(ReferenceTables::builtin())
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.tables.disposable_domains.contains(&domain)
    }

    pub fn is_free_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.tables.free_domains.contains(&domain)
    }

    /// `admin` and `admin.west` are role-based, `administrator` is not.
    pub fn is_role_based_local_part(&self, local: &str) -> bool {
        let local = local.to_lowercase();
        self.tables.role_prefixes.iter().any(|role| {
            local == *role
                || local
                    .strip_prefix(role.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn detect_typo(&self, address: &str) -> TypoCheck {
        detect_typo_in(&self.tables, address)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn is_disposable_domain(domain: &str) -> bool {
    BUILTIN.is_disposable_domain(domain)
}

pub fn is_free_domain(domain: &str) -> bool {
    BUILTIN.is_free_domain(domain)
}

pub fn is_role_based_local_part(local: &str) -> bool {
    BUILTIN.is_role_based_local_part(local)
}

pub fn detect_typo(address: &str) -> TypoCheck {
    BUILTIN.detect_typo(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn disposable_is_case_insensitive() {
        assert!(is_disposable_domain("mailinator.com"));
        assert!(is_disposable_domain("MailInator.COM"));
        assert!(!is_disposable_domain("gmail.com"));
    }

    #[test]
    fn free_providers() {
        assert!(is_free_domain("gmail.com"));
        assert!(is_free_domain("GMX.com"));
        assert!(!is_free_domain("example.com"));
        assert!(!is_free_domain(""));
    }

    #[test]
    fn role_prefix_needs_exact_or_dot() {
        assert!(is_role_based_local_part("admin"));
        assert!(is_role_based_local_part("Admin.West"));
        assert!(is_role_based_local_part("no-reply"));
        assert!(!is_role_based_local_part("administrator"));
        assert!(!is_role_based_local_part("admin-west"));
        assert!(!is_role_based_local_part("alice"));
    }

    #[test]
    fn detect_typo_uses_builtin_table() {
        let check = detect_typo("user@gmial.com");
        assert!(check.is_typo);
        assert_eq!(check.suggestion.as_deref(), Some("user@gmail.com"));
    }

    #[test]
    fn custom_tables_replace_builtin_data() {
        let classifier = Classifier::new(ReferenceTables {
            disposable_domains: vec!["Burner.test".into()],
            free_domains: vec!["freemail.test".into()],
            role_prefixes: vec!["ops".into()],
            typos: BTreeMap::from([("fremail.test".to_string(), "freemail.test".to_string())]),
        });
        assert!(classifier.is_disposable_domain("burner.test"));
        assert!(!classifier.is_disposable_domain("mailinator.com"));
        assert!(classifier.is_free_domain("FREEMAIL.test"));
        assert!(classifier.is_role_based_local_part("ops.eu"));
        assert!(!classifier.is_role_based_local_part("admin"));
        assert_eq!(
            classifier.detect_typo("x@fremail.test").suggestion.as_deref(),
            Some("x@freemail.test")
        );
    }

    proptest! {
        #[test]
        fn classification_is_idempotent(s in "\\PC{0,32}") {
            prop_assert_eq!(is_disposable_domain(&s), is_disposable_domain(&s));
            prop_assert_eq!(is_free_domain(&s), is_free_domain(&s));
            prop_assert_eq!(is_role_based_local_part(&s), is_role_based_local_part(&s));
        }
    }
}
