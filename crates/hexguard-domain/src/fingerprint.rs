use hexguard_types::TypeName;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - rule_id
/// - involved types, in the order the rule reported them
pub fn fingerprint_for_violation(rule_id: &str, involved: &[TypeName]) -> String {
    let mut parts = vec![rule_id];
    parts.extend(involved.iter().map(TypeName::as_str));
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_sensitive_to_inputs() {
        let a = fingerprint_for_violation("aggregate-cycle", &[TypeName::new("a.A"), TypeName::new("a.B")]);
        let b = fingerprint_for_violation("aggregate-cycle", &[TypeName::new("a.A"), TypeName::new("a.B")]);
        let c = fingerprint_for_violation("aggregate-cycle", &[TypeName::new("a.A")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
