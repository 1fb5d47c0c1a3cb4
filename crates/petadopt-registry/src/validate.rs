//! Shape checks for every payload the registry accepts.
//!
//! Each check is pure and all-or-nothing: it reports the first offending
//! field and never partially accepts a payload. Update operations run the
//! same checks against the merged record, not just the patch.

use regex::Regex;
use std::sync::OnceLock;

use crate::adoption::{AdoptionPayload, AdoptionUpdate};
use crate::pet::PetPayload;
use crate::shelter::ShelterPayload;
use crate::user::UserPayload;

pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

/// A payload field that failed its shape check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid email address")]
    Email { field: &'static str },

    #[error(
        "{field} must be {min}-{max} digits without separators",
        min = PHONE_MIN_DIGITS,
        max = PHONE_MAX_DIGITS
    )]
    Phone { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::Email { field } | Self::Phone { field } => field,
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile"))
}

/// `local@domain.tld`: no whitespace, at least one dot after the `@`.
pub fn is_email(value: &str) -> bool {
    email_re().is_match(value)
}

/// 10 to 15 ASCII digits.
pub fn is_phone(value: &str) -> bool {
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&value.len())
        && value.bytes().all(|b| b.is_ascii_digit())
}

/// Non-empty after trimming.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_present(value) {
        Ok(())
    } else {
        Err(ValidationError::Empty { field })
    }
}

fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;
    if is_email(value) {
        Ok(())
    } else {
        Err(ValidationError::Email { field })
    }
}

fn require_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;
    if is_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::Phone { field })
    }
}

pub fn validate_user(payload: &UserPayload) -> Result<(), ValidationError> {
    require_text("name", &payload.name)?;
    require_phone("phone", &payload.phone)?;
    require_email("email", &payload.email)?;
    require_text("address", &payload.address)
}

pub fn validate_shelter(payload: &ShelterPayload) -> Result<(), ValidationError> {
    require_text("name", &payload.name)?;
    require_text("location", &payload.location)?;
    require_phone("phone", &payload.phone)?;
    require_email("email", &payload.email)
}

/// The image reference may be empty at creation; it is set later through
/// `add_pet_image`, which checks it with [`validate_image`].
pub fn validate_pet(payload: &PetPayload) -> Result<(), ValidationError> {
    require_text("name", &payload.name)?;
    require_text("species", &payload.species)?;
    require_text("breed", &payload.breed)?;
    require_text("gender", &payload.gender)?;
    require_text("description", &payload.description)?;
    require_text("healthStatus", &payload.health_status)?;
    require_text("shelterId", &payload.shelter_id)
}

pub fn validate_image(image: &str) -> Result<(), ValidationError> {
    require_text("image", image)
}

pub fn validate_adoption(payload: &AdoptionPayload) -> Result<(), ValidationError> {
    require_text("petId", &payload.pet_id)?;
    require_text("userId", &payload.user_id)?;
    require_phone("userPhoneNumber", &payload.user_phone_number)?;
    require_text("address", &payload.address)?;
    require_text("reasonForAdoption", &payload.reason_for_adoption)
}

pub fn validate_adoption_update(update: &AdoptionUpdate) -> Result<(), ValidationError> {
    require_text("userName", &update.user_name)?;
    require_phone("userPhoneNumber", &update.user_phone_number)?;
    require_text("address", &update.address)?;
    require_text("reasonForAdoption", &update.reason_for_adoption)
}
