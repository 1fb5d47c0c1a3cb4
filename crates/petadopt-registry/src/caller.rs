//! Opaque caller identity supplied by the host per call.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identity of whoever issued the current call.
///
/// The registry never interprets it; it is stored verbatim as the owning
/// principal of users and shelters and used as the owner-lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CallerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CallerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
