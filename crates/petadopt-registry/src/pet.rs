//! Pets listed by shelters.

use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::store::Namespace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PetStatus {
    #[default]
    NotAdopted,
    Adopted,
}

impl PetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAdopted => "notAdopted",
            Self::Adopted => "adopted",
        }
    }
}

/// A pet. `status` only moves to `Adopted` when an adoption completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    /// Age in whole years.
    pub age: u32,
    #[serde(default)]
    pub image: String,
    pub description: String,
    pub health_status: String,
    pub shelter_id: String,
    #[serde(default)]
    pub status: PetStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub age: u32,
    #[serde(default)]
    pub image: String,
    pub description: String,
    pub health_status: String,
    pub shelter_id: String,
}

impl Pet {
    pub fn payload(&self) -> PetPayload {
        PetPayload {
            name: self.name.clone(),
            species: self.species.clone(),
            breed: self.breed.clone(),
            gender: self.gender.clone(),
            age: self.age,
            image: self.image.clone(),
            description: self.description.clone(),
            health_status: self.health_status.clone(),
            shelter_id: self.shelter_id.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == PetStatus::NotAdopted
    }

    /// Case-insensitive exact match on the trimmed species name.
    pub fn is_species(&self, species: &str) -> bool {
        self.species.trim().to_lowercase() == species.trim().to_lowercase()
    }
}

impl Entity for Pet {
    const NAMESPACE: Namespace = Namespace::Pets;
    const LABEL: &'static str = "pet";

    fn id(&self) -> &str {
        &self.id
    }
}
