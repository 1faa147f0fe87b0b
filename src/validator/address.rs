/// Local-part and domain of an address as the pipeline sees them: text before
/// the first `@`, and text between the first and the second `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParts<'a> {
    pub local: &'a str,
    pub domain: Option<&'a str>,
}

impl<'a> AddressParts<'a> {
    /// Domain to hand to the checkers; empty when the address has no `@`.
    pub fn domain_or_empty(&self) -> &'a str {
        self.domain.unwrap_or("")
    }
}

/// Splits without validating; never fails.
pub fn split_address(address: &str) -> AddressParts<'_> {
    let mut parts = address.split('@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next();
    AddressParts { local, domain }
}
