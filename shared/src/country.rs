use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Codes that can never be selected: unknown territory, Taiwan and Antarctica.
pub const FORBIDDEN_COUNTRIES: [&str; 3] = ["UNK", "TWN", "ATA"];

/// Three-letter country code as used by the topology and both datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(String);

impl CountryId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CountryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CountryId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Whether a primary click on `id` may add it to the selection.
pub fn should_select(id: &str) -> bool {
    !FORBIDDEN_COUNTRIES.contains(&id)
}
