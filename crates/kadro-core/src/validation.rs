//! Identifier validation helpers.

use std::sync::OnceLock;

use regex::Regex;

/// Tenant identifiers are opaque slugs: alphanumerics, `_` and `-`, 3-50
/// characters.
pub const TENANT_ID_PATTERN: &str = "^[a-zA-Z0-9_-]{3,50}$";

fn tenant_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TENANT_ID_PATTERN).expect("tenant id pattern is valid"))
}

pub fn is_valid_tenant_id(raw: &str) -> bool {
    tenant_id_regex().is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_pattern() {
        assert!(is_valid_tenant_id("abc"));
        assert!(is_valid_tenant_id("Acme_Corp-2024"));
        assert!(!is_valid_tenant_id("ab"));
        assert!(!is_valid_tenant_id("a.b.c"));
        assert!(!is_valid_tenant_id("tenant with spaces"));
    }
}
