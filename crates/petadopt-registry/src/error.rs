//! Error types for registry operations.

use serde::{Deserialize, Serialize};

use crate::store::Namespace;
use crate::validate::ValidationError;

/// Failure returned by every registry operation.
///
/// Variants are tagged so transport layers can forward them without string
/// matching. None of them is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is well-formed but violates a business rule.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The payload failed structural validation before any state was touched.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored record could not be encoded or decoded.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub(crate) fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidPayload(detail.into())
    }

    /// Stable tag for the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Store(_) => ErrorKind::Store,
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound(detail) | Self::InvalidPayload(detail) => detail.clone(),
            Self::Validation(err) => err.to_string(),
            Self::Store(err) => err.to_string(),
        }
    }
}

/// Wire tag for [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotFound,
    InvalidPayload,
    ValidationError,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "notFound",
            Self::InvalidPayload => "invalidPayload",
            Self::ValidationError => "validationError",
            Self::Store => "store",
        }
    }
}

/// Errors raised while mapping records in and out of the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to encode {namespace} record {key}: {message}")]
    Encode {
        namespace: Namespace,
        key: String,
        message: String,
    },

    #[error("failed to decode {namespace} record {key}: {message}")]
    Decode {
        namespace: Namespace,
        key: String,
        message: String,
    },
}
