//! Shelters and the pets they house.

use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::store::Namespace;

/// A shelter. Every id in `pets` names a pet whose `shelter_id` is this
/// shelter's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub principal: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub pets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterPayload {
    pub name: String,
    pub location: String,
    pub phone: String,
    pub email: String,
}

/// Partial update for `update_shelter_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Shelter {
    pub fn payload(&self) -> ShelterPayload {
        ShelterPayload {
            name: self.name.clone(),
            location: self.location.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }

    pub(crate) fn with_payload(mut self, payload: ShelterPayload) -> Self {
        self.name = payload.name;
        self.location = payload.location;
        self.phone = payload.phone;
        self.email = payload.email;
        self
    }

    pub fn houses(&self, pet_id: &str) -> bool {
        self.pets.iter().any(|id| id == pet_id)
    }
}

impl ShelterPatch {
    pub(crate) fn merge_into(self, mut base: ShelterPayload) -> ShelterPayload {
        if let Some(name) = self.name {
            base.name = name;
        }
        if let Some(location) = self.location {
            base.location = location;
        }
        if let Some(phone) = self.phone {
            base.phone = phone;
        }
        if let Some(email) = self.email {
            base.email = email;
        }
        base
    }
}

impl Entity for Shelter {
    const NAMESPACE: Namespace = Namespace::Shelters;
    const LABEL: &'static str = "shelter";

    fn id(&self) -> &str {
        &self.id
    }
}
