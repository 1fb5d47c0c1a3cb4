//! The registry service: cross-entity rules and the adoption state machine.
//!
//! Every operation checks all of its preconditions before the first write,
//! so an operation that returns an error has changed nothing. Multi-record
//! writes (pet + shelter list, adoption + pet status) rely on the caller
//! holding the registry exclusively for the whole call: `&mut self` here,
//! [`crate::SharedRegistry`] in process, [`crate::mutate_registry_jsonl`]
//! across processes.

use tracing::{debug, info, warn};

use crate::adoption::{AdoptionPayload, AdoptionRecord, AdoptionStatus, AdoptionUpdate};
use crate::caller::CallerId;
use crate::clock::{Clock, SystemClock};
use crate::error::RegistryError;
use crate::ids::{IdGenerator, UuidIds};
use crate::pet::{Pet, PetPayload, PetStatus};
use crate::repository::{Entity, Repository};
use crate::shelter::{Shelter, ShelterPatch, ShelterPayload};
use crate::store::KvStore;
use crate::user::{User, UserPatch, UserPayload};
use crate::validate;

pub struct Registry<S> {
    store: S,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl<S: KvStore> Registry<S> {
    /// Registry over `store` with UUID ids and the system clock.
    pub fn new(store: S) -> Self {
        Self::with_sources(store, UuidIds, SystemClock)
    }

    pub fn with_sources(
        store: S,
        ids: impl IdGenerator + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            store,
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn require<T: Entity>(&self, id: &str) -> Result<T, RegistryError> {
        self.store
            .fetch::<T>(id)?
            .ok_or_else(|| RegistryError::not_found(T::LABEL, id))
    }

    fn lookup<T: Entity>(&self, id: &str) -> Result<Option<T>, RegistryError> {
        let found = self.store.fetch::<T>(id)?;
        debug!(entity = T::LABEL, id, hit = found.is_some(), "lookup");
        Ok(found)
    }

    // ── Users ──

    /// Register the caller as an adopter.
    ///
    /// A caller owns at most one user; a second registration is rejected.
    pub fn add_user(
        &mut self,
        caller: &CallerId,
        payload: UserPayload,
    ) -> Result<User, RegistryError> {
        validate::validate_user(&payload)?;
        if let Some(existing) = self.find_user_by_owner(caller)? {
            warn!(caller = %caller, user_id = %existing.id, "caller already registered");
            return Err(RegistryError::invalid(format!(
                "caller {caller} already owns user {}",
                existing.id
            )));
        }

        let user = User {
            id: self.ids.next_id(User::NAMESPACE),
            principal: caller.as_str().to_string(),
            applications: Vec::new(),
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
        };
        self.store.put(&user)?;
        info!(user_id = %user.id, caller = %caller, "user added");
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>, RegistryError> {
        self.lookup(id)
    }

    pub fn get_users(&self) -> Result<Vec<User>, RegistryError> {
        Ok(self.store.scan()?)
    }

    // Linear scan: there is no principal index. Fine for correctness; a
    // large store wants a principal -> id index here.
    fn find_user_by_owner(&self, caller: &CallerId) -> Result<Option<User>, RegistryError> {
        Ok(self
            .store
            .scan::<User>()?
            .into_iter()
            .find(|user| user.principal == caller.as_str()))
    }

    pub fn get_user_by_owner(&self, caller: &CallerId) -> Result<User, RegistryError> {
        self.find_user_by_owner(caller)?
            .ok_or_else(|| RegistryError::NotFound(format!("user owned by {caller}")))
    }

    /// Merge `patch` into the stored user and re-validate the result.
    pub fn update_user_info(&mut self, patch: UserPatch) -> Result<User, RegistryError> {
        let user: User = self.require(&patch.id)?;
        let merged = patch.merge_into(user.payload());
        validate::validate_user(&merged)?;

        let user = user.with_payload(merged);
        self.store.put(&user)?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// The user's adoption records in filing order.
    pub fn get_user_applications(
        &self,
        user_id: &str,
    ) -> Result<Vec<AdoptionRecord>, RegistryError> {
        let user: User = self.require(user_id)?;
        let mut records = Vec::with_capacity(user.applications.len());
        for id in &user.applications {
            if let Some(record) = self.store.fetch::<AdoptionRecord>(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    // ── Shelters ──

    pub fn create_shelter(
        &mut self,
        caller: &CallerId,
        payload: ShelterPayload,
    ) -> Result<Shelter, RegistryError> {
        validate::validate_shelter(&payload)?;

        let shelter = Shelter {
            id: self.ids.next_id(Shelter::NAMESPACE),
            principal: caller.as_str().to_string(),
            pets: Vec::new(),
            name: payload.name,
            location: payload.location,
            phone: payload.phone,
            email: payload.email,
        };
        self.store.put(&shelter)?;
        info!(shelter_id = %shelter.id, caller = %caller, "shelter created");
        Ok(shelter)
    }

    pub fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, RegistryError> {
        self.lookup(id)
    }

    pub fn get_shelters(&self) -> Result<Vec<Shelter>, RegistryError> {
        Ok(self.store.scan()?)
    }

    /// First shelter owned by the caller (linear scan, as for users).
    pub fn get_shelter_by_owner(&self, caller: &CallerId) -> Result<Shelter, RegistryError> {
        self.store
            .scan::<Shelter>()?
            .into_iter()
            .find(|shelter| shelter.principal == caller.as_str())
            .ok_or_else(|| RegistryError::NotFound(format!("shelter owned by {caller}")))
    }

    /// Merge `patch` into the stored shelter and re-validate the whole
    /// merged record.
    pub fn update_shelter_info(&mut self, patch: ShelterPatch) -> Result<Shelter, RegistryError> {
        let shelter: Shelter = self.require(&patch.id)?;
        let merged = patch.merge_into(shelter.payload());
        validate::validate_shelter(&merged)?;

        let shelter = shelter.with_payload(merged);
        self.store.put(&shelter)?;
        info!(shelter_id = %shelter.id, "shelter updated");
        Ok(shelter)
    }

    /// Pets housed by the shelter, in listing order.
    pub fn get_shelter_pets(&self, shelter_id: &str) -> Result<Vec<Pet>, RegistryError> {
        let shelter: Shelter = self.require(shelter_id)?;
        let mut pets = Vec::with_capacity(shelter.pets.len());
        for id in &shelter.pets {
            if let Some(pet) = self.store.fetch::<Pet>(id)? {
                pets.push(pet);
            }
        }
        Ok(pets)
    }

    // ── Pets ──

    /// List a new pet and append it to its shelter.
    pub fn add_pet(&mut self, payload: PetPayload) -> Result<Pet, RegistryError> {
        validate::validate_pet(&payload)?;
        let mut shelter: Shelter = self.require(&payload.shelter_id)?;

        let pet = Pet {
            id: self.ids.next_id(Pet::NAMESPACE),
            status: PetStatus::NotAdopted,
            name: payload.name,
            species: payload.species,
            breed: payload.breed,
            gender: payload.gender,
            age: payload.age,
            image: payload.image,
            description: payload.description,
            health_status: payload.health_status,
            shelter_id: payload.shelter_id,
        };
        shelter.pets.push(pet.id.clone());

        self.store.put(&pet)?;
        self.store.put(&shelter)?;
        info!(pet_id = %pet.id, shelter_id = %shelter.id, "pet added");
        Ok(pet)
    }

    pub fn add_pet_image(&mut self, pet_id: &str, image: String) -> Result<Pet, RegistryError> {
        let mut pet: Pet = self.require(pet_id)?;
        validate::validate_image(&image)?;

        pet.image = image;
        self.store.put(&pet)?;
        info!(pet_id = %pet.id, "pet image replaced");
        Ok(pet)
    }

    /// Patch health status and/or age, then re-validate the merged pet.
    pub fn update_pet_info(
        &mut self,
        pet_id: &str,
        health_status: Option<String>,
        age: Option<u32>,
    ) -> Result<Pet, RegistryError> {
        let mut pet: Pet = self.require(pet_id)?;
        if let Some(health_status) = health_status {
            pet.health_status = health_status;
        }
        if let Some(age) = age {
            pet.age = age;
        }
        validate::validate_pet(&pet.payload())?;

        self.store.put(&pet)?;
        info!(pet_id = %pet.id, "pet updated");
        Ok(pet)
    }

    pub fn get_pet(&self, id: &str) -> Result<Option<Pet>, RegistryError> {
        self.lookup(id)
    }

    pub fn get_pets(&self) -> Result<Vec<Pet>, RegistryError> {
        Ok(self.store.scan()?)
    }

    pub fn get_pets_not_adopted(&self) -> Result<Vec<Pet>, RegistryError> {
        Ok(self
            .store
            .scan::<Pet>()?
            .into_iter()
            .filter(Pet::is_available)
            .collect())
    }

    /// Case-insensitive exact species match.
    pub fn search_pets_by_species(&self, species: &str) -> Result<Vec<Pet>, RegistryError> {
        Ok(self
            .store
            .scan::<Pet>()?
            .into_iter()
            .filter(|pet| pet.is_species(species))
            .collect())
    }

    // ── Adoptions ──

    /// File a pending adoption of `payload.pet_id` by `payload.user_id`.
    ///
    /// The pet must be `NotAdopted` and have no other pending record. The
    /// pet's status is left alone: filing is not approval.
    pub fn file_for_adoption(
        &mut self,
        payload: AdoptionPayload,
    ) -> Result<AdoptionRecord, RegistryError> {
        validate::validate_adoption(&payload)?;
        let mut user: User = self.require(&payload.user_id)?;
        let pet: Pet = self.require(&payload.pet_id)?;

        if !pet.is_available() {
            warn!(pet_id = %pet.id, status = pet.status.as_str(), "filing rejected");
            return Err(RegistryError::invalid(format!(
                "pet {} is not available for adoption",
                pet.id
            )));
        }
        if let Some(pending) = self.pending_adoption_for(&pet.id)? {
            warn!(pet_id = %pet.id, adoption_id = %pending.id, "filing rejected");
            return Err(RegistryError::invalid(format!(
                "pet {} already has pending adoption {}",
                pet.id, pending.id
            )));
        }

        let record = AdoptionRecord {
            id: self.ids.next_id(AdoptionRecord::NAMESPACE),
            pet_id: pet.id,
            user_id: user.id.clone(),
            pet_name: pet.name,
            user_name: user.name.clone(),
            user_phone_number: payload.user_phone_number,
            address: payload.address,
            reason_for_adoption: payload.reason_for_adoption,
            created_at: self.clock.timestamp(),
            status: AdoptionStatus::Pending,
        };
        user.applications.push(record.id.clone());

        self.store.put(&record)?;
        self.store.put(&user)?;
        info!(
            adoption_id = %record.id,
            pet_id = %record.pet_id,
            user_id = %record.user_id,
            "adoption filed"
        );
        Ok(record)
    }

    fn pending_adoption_for(&self, pet_id: &str) -> Result<Option<AdoptionRecord>, RegistryError> {
        Ok(self
            .store
            .scan::<AdoptionRecord>()?
            .into_iter()
            .find(|record| record.pet_id == pet_id && record.is_pending()))
    }

    fn require_transition(
        &self,
        adoption_id: &str,
        next: AdoptionStatus,
    ) -> Result<AdoptionRecord, RegistryError> {
        let record: AdoptionRecord = self.require(adoption_id)?;
        if !record.status.can_transition_to(next) {
            warn!(
                adoption_id,
                from = record.status.as_str(),
                to = next.as_str(),
                "illegal adoption transition"
            );
            return Err(RegistryError::invalid(format!(
                "adoption {adoption_id} is {}, not pending",
                record.status.as_str()
            )));
        }
        Ok(record)
    }

    /// Approve a pending adoption: the record completes and the pet becomes
    /// adopted, together.
    ///
    /// A pet that is already adopted (a snapshot holding two pending records
    /// for it) rejects the completion and leaves both records untouched.
    pub fn complete_adoption(&mut self, adoption_id: &str) -> Result<AdoptionRecord, RegistryError> {
        let mut record = self.require_transition(adoption_id, AdoptionStatus::Completed)?;
        let mut pet: Pet = self.require(&record.pet_id)?;
        if !pet.is_available() {
            warn!(adoption_id, pet_id = %pet.id, "pet already adopted");
            return Err(RegistryError::invalid(format!(
                "pet {} is already adopted",
                pet.id
            )));
        }

        pet.status = PetStatus::Adopted;
        record.status = AdoptionStatus::Completed;
        self.store.put(&pet)?;
        self.store.put(&record)?;
        info!(adoption_id, pet_id = %pet.id, "adoption completed");
        Ok(record)
    }

    /// Reject a pending adoption. The pet stays available for new filings.
    pub fn fail_adoption(&mut self, adoption_id: &str) -> Result<AdoptionRecord, RegistryError> {
        let mut record = self.require_transition(adoption_id, AdoptionStatus::Failed)?;

        record.status = AdoptionStatus::Failed;
        self.store.put(&record)?;
        info!(adoption_id, pet_id = %record.pet_id, "adoption failed");
        Ok(record)
    }

    /// Replace the contact and reason fields. Allowed in any status.
    pub fn update_adoption_record(
        &mut self,
        update: AdoptionUpdate,
    ) -> Result<AdoptionRecord, RegistryError> {
        let mut record: AdoptionRecord = self.require(&update.id)?;
        validate::validate_adoption_update(&update)?;

        record.apply_update(update);
        self.store.put(&record)?;
        info!(adoption_id = %record.id, status = record.status.as_str(), "adoption record updated");
        Ok(record)
    }

    pub fn get_adoption_record(&self, id: &str) -> Result<Option<AdoptionRecord>, RegistryError> {
        self.lookup(id)
    }

    pub fn get_adoption_records(&self) -> Result<Vec<AdoptionRecord>, RegistryError> {
        Ok(self.store.scan()?)
    }

    /// Every record ever filed for the pet, any status.
    pub fn get_pet_adoptions(&self, pet_id: &str) -> Result<Vec<AdoptionRecord>, RegistryError> {
        Ok(self
            .store
            .scan::<AdoptionRecord>()?
            .into_iter()
            .filter(|record| record.pet_id == pet_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ErrorKind;
    use crate::ids::SequentialIds;
    use crate::memory::MemoryStore;
    use crate::store::Namespace;
    use chrono::TimeZone;

    fn registry() -> Registry<MemoryStore> {
        let at = chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        Registry::with_sources(MemoryStore::default(), SequentialIds::default(), FixedClock(at))
    }

    fn caller(id: &str) -> CallerId {
        CallerId::new(id)
    }

    fn shelter_payload() -> ShelterPayload {
        ShelterPayload {
            name: "Happy Tails".to_string(),
            location: "Springfield".to_string(),
            phone: "5555550100".to_string(),
            email: "desk@happytails.org".to_string(),
        }
    }

    fn user_payload() -> UserPayload {
        UserPayload {
            name: "Ada".to_string(),
            phone: "5555550199".to_string(),
            email: "ada@example.org".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    fn pet_payload(shelter_id: &str) -> PetPayload {
        PetPayload {
            name: "Rex".to_string(),
            species: "Dog".to_string(),
            breed: "Collie".to_string(),
            gender: "male".to_string(),
            age: 3,
            image: String::new(),
            description: "Friendly".to_string(),
            health_status: "healthy".to_string(),
            shelter_id: shelter_id.to_string(),
        }
    }

    fn adoption_payload(pet_id: &str, user_id: &str) -> AdoptionPayload {
        AdoptionPayload {
            pet_id: pet_id.to_string(),
            user_id: user_id.to_string(),
            user_phone_number: "5555550199".to_string(),
            address: "1 Main St".to_string(),
            reason_for_adoption: "Big yard".to_string(),
        }
    }

    #[test]
    fn add_user_rejects_second_registration_for_same_caller() {
        let mut registry = registry();
        registry
            .add_user(&caller("alice"), user_payload())
            .expect("first user should add");
        let err = registry
            .add_user(&caller("alice"), user_payload())
            .expect_err("second user for same caller must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
        assert_eq!(registry.get_users().expect("users").len(), 1);
    }

    #[test]
    fn owner_lookups_miss_with_not_found() {
        let registry = registry();
        let err = registry
            .get_user_by_owner(&caller("nobody"))
            .expect_err("no user");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = registry
            .get_shelter_by_owner(&caller("nobody"))
            .expect_err("no shelter");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn reads_on_missing_ids_are_absent_not_errors() {
        let registry = registry();
        assert!(registry.get_user("usr-9").expect("lookup").is_none());
        assert!(registry.get_pet("pet-9").expect("lookup").is_none());
        assert!(registry.get_shelter("shl-9").expect("lookup").is_none());
        assert!(registry.get_adoption_record("adp-9").expect("lookup").is_none());
        assert!(registry.get_pets().expect("scan").is_empty());
    }

    #[test]
    fn add_pet_validation_runs_before_shelter_lookup() {
        let mut registry = registry();
        let mut payload = pet_payload("shl-missing");
        payload.species = " ".to_string();
        let err = registry.add_pet(payload).expect_err("invalid pet");
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn update_user_info_revalidates_merged_record() {
        let mut registry = registry();
        let user = registry
            .add_user(&caller("alice"), user_payload())
            .expect("user should add");

        let err = registry
            .update_user_info(UserPatch {
                id: user.id.clone(),
                email: Some("broken".to_string()),
                ..UserPatch::default()
            })
            .expect_err("bad email must fail");
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let updated = registry
            .update_user_info(UserPatch {
                id: user.id.clone(),
                address: Some("2 Side St".to_string()),
                ..UserPatch::default()
            })
            .expect("address update should apply");
        assert_eq!(updated.address, "2 Side St");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.principal, "alice");
    }

    #[test]
    fn filing_snapshots_names_and_records_application() {
        let mut registry = registry();
        let shelter = registry
            .create_shelter(&caller("shelter-admin"), shelter_payload())
            .expect("shelter");
        let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
        let user = registry
            .add_user(&caller("alice"), user_payload())
            .expect("user");

        let record = registry
            .file_for_adoption(adoption_payload(&pet.id, &user.id))
            .expect("filing should succeed");
        assert_eq!(record.pet_name, "Rex");
        assert_eq!(record.user_name, "Ada");
        assert_eq!(record.created_at, "2024-05-01T09:00:00.000Z");

        registry
            .update_user_info(UserPatch {
                id: user.id.clone(),
                name: Some("Ada L.".to_string()),
                ..UserPatch::default()
            })
            .expect("rename");
        let stored = registry
            .get_adoption_record(&record.id)
            .expect("lookup")
            .expect("record exists");
        assert_eq!(stored.user_name, "Ada");

        let applications = registry
            .get_user_applications(&user.id)
            .expect("applications");
        assert_eq!(applications, vec![stored]);
    }

    #[test]
    fn second_pending_filing_for_same_pet_is_rejected() {
        let mut registry = registry();
        let shelter = registry
            .create_shelter(&caller("shelter-admin"), shelter_payload())
            .expect("shelter");
        let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
        let alice = registry
            .add_user(&caller("alice"), user_payload())
            .expect("alice");
        let bob = registry
            .add_user(&caller("bob"), user_payload())
            .expect("bob");

        registry
            .file_for_adoption(adoption_payload(&pet.id, &alice.id))
            .expect("first filing");
        let err = registry
            .file_for_adoption(adoption_payload(&pet.id, &bob.id))
            .expect_err("second pending filing must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);

        assert_eq!(registry.store().len(Namespace::Adoptions), 1);
        let bob = registry.get_user(&bob.id).expect("lookup").expect("bob");
        assert!(bob.applications.is_empty());
    }

    #[test]
    fn fail_adoption_rejects_terminal_records() {
        let mut registry = registry();
        let shelter = registry
            .create_shelter(&caller("shelter-admin"), shelter_payload())
            .expect("shelter");
        let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
        let user = registry
            .add_user(&caller("alice"), user_payload())
            .expect("user");
        let record = registry
            .file_for_adoption(adoption_payload(&pet.id, &user.id))
            .expect("filing");

        registry.complete_adoption(&record.id).expect("complete");
        let err = registry
            .fail_adoption(&record.id)
            .expect_err("completed record cannot fail");
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);

        let err = registry
            .complete_adoption("adp-missing")
            .expect_err("missing record");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn update_adoption_record_applies_in_any_status() {
        let mut registry = registry();
        let shelter = registry
            .create_shelter(&caller("shelter-admin"), shelter_payload())
            .expect("shelter");
        let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
        let user = registry
            .add_user(&caller("alice"), user_payload())
            .expect("user");
        let record = registry
            .file_for_adoption(adoption_payload(&pet.id, &user.id))
            .expect("filing");
        registry.fail_adoption(&record.id).expect("fail");

        let update = AdoptionUpdate {
            id: record.id.clone(),
            user_name: "Ada L.".to_string(),
            user_phone_number: "5555550123".to_string(),
            address: "2 Side St".to_string(),
            reason_for_adoption: "Moved house".to_string(),
        };
        let updated = registry
            .update_adoption_record(update.clone())
            .expect("update should apply to failed record");
        assert_eq!(updated.status, AdoptionStatus::Failed);
        assert_eq!(updated.address, "2 Side St");

        let err = registry
            .update_adoption_record(AdoptionUpdate {
                user_phone_number: "12-34".to_string(),
                ..update
            })
            .expect_err("bad phone");
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn species_search_and_availability_filters() {
        let mut registry = registry();
        let shelter = registry
            .create_shelter(&caller("shelter-admin"), shelter_payload())
            .expect("shelter");
        let dog = registry.add_pet(pet_payload(&shelter.id)).expect("dog");
        let mut cat = pet_payload(&shelter.id);
        cat.name = "Tom".to_string();
        cat.species = "cat".to_string();
        let cat = registry.add_pet(cat).expect("cat");
        let user = registry
            .add_user(&caller("alice"), user_payload())
            .expect("user");
        let record = registry
            .file_for_adoption(adoption_payload(&dog.id, &user.id))
            .expect("filing");
        registry.complete_adoption(&record.id).expect("complete");

        let cats = registry.search_pets_by_species("CAT").expect("search");
        assert_eq!(cats, vec![cat.clone()]);
        assert!(registry.search_pets_by_species("ca").expect("search").is_empty());

        let available = registry.get_pets_not_adopted().expect("available");
        assert_eq!(available, vec![cat]);

        let shelter_pets = registry.get_shelter_pets(&shelter.id).expect("shelter pets");
        assert_eq!(shelter_pets.len(), 2);
        assert_eq!(shelter_pets[0].id, dog.id);
        assert_eq!(registry.get_pet_adoptions(&dog.id).expect("history").len(), 1);
    }
}
