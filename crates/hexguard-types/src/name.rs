use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical qualified type name used as the identity of a type across a run.
///
/// Normalization rules are intentionally simple and deterministic:
/// - surrounding whitespace is trimmed
/// - `$` (nested-type separator) becomes `.`
/// - ordering is plain byte-wise string ordering
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().replace('$', "."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment (`com.acme.Order` -> `Order`).
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last dotted segment; empty for the default package.
    pub fn package(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        TypeName::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        TypeName::new(value)
    }
}
