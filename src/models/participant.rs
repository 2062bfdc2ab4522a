use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier of someone taking part in a settlement round.
///
/// Ordering is lexicographic on the underlying id and is what the matcher
/// uses to break ties between equal balances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Participant {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for Participant {
    fn borrow(&self) -> &str {
        &self.0
    }
}
