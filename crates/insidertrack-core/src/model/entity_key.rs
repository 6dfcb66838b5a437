use crate::errors::{ExError, ExErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable slug identifying one tracked entity, e.g. `afry-ab`.
///
/// Keys are used verbatim as file and directory names, so only ASCII
/// alphanumerics, `-`, `_` and `.` are accepted and a key may not start
/// with `.`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKey(String);

impl EntityKey {
    /// Validate and wrap a slug
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the slug is empty, starts with `.`, or contains a
    /// character outside `[A-Za-z0-9._-]`.
    pub fn new(slug: impl Into<String>) -> Result<Self, ExError> {
        let slug = slug.into();
        if let Some(reason) = invalid_reason(&slug) {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("entity_key")
                .with_message(format!("invalid entity key {:?}: {}", slug, reason)));
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_reason(slug: &str) -> Option<&'static str> {
    if slug.is_empty() {
        return Some("must not be empty");
    }
    if slug.starts_with('.') {
        return Some("must not start with '.'");
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Some("only ASCII letters, digits, '-', '_' and '.' are allowed");
    }
    None
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityKey {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKey::new(s)
    }
}

impl TryFrom<String> for EntityKey {
    type Error = ExError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EntityKey::new(value)
    }
}

impl From<EntityKey> for String {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
