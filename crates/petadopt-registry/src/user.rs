//! Adopter accounts.

use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::store::Namespace;

/// A registered adopter. At most one per owning principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub principal: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Adoption record ids in filing order.
    #[serde(default)]
    pub applications: Vec<String>,
}

/// Caller-supplied fields for `add_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Partial update for `update_user_info`; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl User {
    pub fn payload(&self) -> UserPayload {
        UserPayload {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }

    pub(crate) fn with_payload(mut self, payload: UserPayload) -> Self {
        self.name = payload.name;
        self.phone = payload.phone;
        self.email = payload.email;
        self.address = payload.address;
        self
    }
}

impl UserPatch {
    pub(crate) fn merge_into(self, mut base: UserPayload) -> UserPayload {
        if let Some(name) = self.name {
            base.name = name;
        }
        if let Some(phone) = self.phone {
            base.phone = phone;
        }
        if let Some(email) = self.email {
            base.email = email;
        }
        if let Some(address) = self.address {
            base.address = address;
        }
        base
    }
}

impl Entity for User {
    const NAMESPACE: Namespace = Namespace::Users;
    const LABEL: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}
