//! Adoption records and their lifecycle.
//!
//! A record is filed `Pending` and moves exactly once to `Completed` or
//! `Failed`. Terminal states are final.

use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::store::Namespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdoptionStatus {
    Pending,
    Completed,
    Failed,
}

impl AdoptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `Pending -> Completed` and `Pending -> Failed` are legal.
    pub fn can_transition_to(self, next: AdoptionStatus) -> bool {
        !self.is_terminal() && next.is_terminal()
    }
}

/// `pet_name` and `user_name` are snapshots taken at filing time; later
/// edits to the pet or user do not flow back here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRecord {
    pub id: String,
    pub pet_id: String,
    pub user_id: String,
    pub pet_name: String,
    pub user_name: String,
    pub user_phone_number: String,
    pub address: String,
    pub reason_for_adoption: String,
    /// RFC 3339 timestamp of the filing.
    pub created_at: String,
    pub status: AdoptionStatus,
}

/// Caller-supplied fields for `file_for_adoption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionPayload {
    pub pet_id: String,
    pub user_id: String,
    pub user_phone_number: String,
    pub address: String,
    pub reason_for_adoption: String,
}

/// Replacement contact and reason fields for `update_adoption_record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionUpdate {
    pub id: String,
    pub user_name: String,
    pub user_phone_number: String,
    pub address: String,
    pub reason_for_adoption: String,
}

impl AdoptionRecord {
    pub fn is_pending(&self) -> bool {
        self.status == AdoptionStatus::Pending
    }

    pub(crate) fn apply_update(&mut self, update: AdoptionUpdate) {
        self.user_name = update.user_name;
        self.user_phone_number = update.user_phone_number;
        self.address = update.address;
        self.reason_for_adoption = update.reason_for_adoption;
    }
}

impl Entity for AdoptionRecord {
    const NAMESPACE: Namespace = Namespace::Adoptions;
    const LABEL: &'static str = "adoption record";

    fn id(&self) -> &str {
        &self.id
    }
}
