//! End-to-end registry behaviour over the in-memory store.

use chrono::{TimeZone, Utc};
use petadopt_registry::{
    AdoptionPayload, AdoptionRecord, AdoptionStatus, AdoptionUpdate, CallerId, ErrorKind,
    FixedClock, KvStore, MemoryStore, Namespace, PetPayload, PetStatus, Registry, SequentialIds,
    ShelterPatch, ShelterPayload, UserPayload,
};

fn registry() -> Registry<MemoryStore> {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid instant");
    Registry::with_sources(MemoryStore::default(), SequentialIds::default(), FixedClock(at))
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
fn created_shelter_reads_back_identically() {
    let mut registry = registry();
    let caller = CallerId::new("shelter-admin");
    let created = registry
        .create_shelter(&caller, shelter_payload())
        .expect("shelter should create");

    assert_eq!(created.principal, "shelter-admin");
    assert!(created.pets.is_empty());
    let fetched = registry
        .get_shelter(&created.id)
        .expect("lookup")
        .expect("shelter exists");
    assert_eq!(fetched, created);
    assert_eq!(
        registry.get_shelter_by_owner(&caller).expect("owner lookup"),
        created
    );
}

#[test]
fn add_pet_with_unknown_shelter_is_not_found_and_stores_nothing() {
    let mut registry = registry();
    let err = registry
        .add_pet(pet_payload("shl-missing"))
        .expect_err("unknown shelter must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(registry.store().len(Namespace::Pets), 0);
}

#[test]
fn add_pet_lists_pet_once_in_its_shelter() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    registry.add_pet(pet_payload(&shelter.id)).expect("second pet");

    assert_eq!(pet.status, PetStatus::NotAdopted);
    let shelter = registry
        .get_shelter(&shelter.id)
        .expect("lookup")
        .expect("shelter exists");
    assert_eq!(shelter.pets.iter().filter(|id| **id == pet.id).count(), 1);
    assert!(shelter.houses(&pet.id));
    assert!(!shelter.houses("pet-missing"));
    assert_eq!(shelter.pets.len(), 2);
}

#[test]
fn happy_path_completes_once() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let user = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("user");

    let filed = registry
        .file_for_adoption(adoption_payload(&pet.id, &user.id))
        .expect("filing should succeed");
    assert_eq!(filed.status, AdoptionStatus::Pending);
    let pet_now = registry.get_pet(&pet.id).expect("lookup").expect("pet");
    assert_eq!(pet_now.status, PetStatus::NotAdopted);
    let user_now = registry.get_user(&user.id).expect("lookup").expect("user");
    assert_eq!(user_now.applications, vec![filed.id.clone()]);

    let completed = registry
        .complete_adoption(&filed.id)
        .expect("completion should succeed");
    let pet_now = registry.get_pet(&pet.id).expect("lookup").expect("pet");
    assert_eq!(pet_now.status, PetStatus::Adopted);

    insta::assert_json_snapshot!(completed, @r#"
    {
      "id": "adp-4",
      "petId": "pet-2",
      "userId": "usr-3",
      "petName": "Rex",
      "userName": "Ada",
      "userPhoneNumber": "5555550199",
      "address": "1 Main St",
      "reasonForAdoption": "Big yard",
      "createdAt": "2024-05-01T09:00:00.000Z",
      "status": "completed"
    }
    "#);

    let err = registry
        .complete_adoption(&filed.id)
        .expect_err("second completion must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
}

#[test]
fn filing_for_adopted_pet_is_rejected_without_writes() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let alice = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("alice");
    let bob = registry
        .add_user(&CallerId::new("bob"), user_payload())
        .expect("bob");
    let filed = registry
        .file_for_adoption(adoption_payload(&pet.id, &alice.id))
        .expect("filing");
    registry.complete_adoption(&filed.id).expect("completion");

    let before = registry.store().clone();
    let err = registry
        .file_for_adoption(adoption_payload(&pet.id, &bob.id))
        .expect_err("adopted pet must be rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    assert_eq!(registry.store(), &before);
}

#[test]
fn failed_adoption_frees_pet_for_refiling() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let user = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("user");

    let first = registry
        .file_for_adoption(adoption_payload(&pet.id, &user.id))
        .expect("first filing");
    let failed = registry.fail_adoption(&first.id).expect("fail");
    assert_eq!(failed.status, AdoptionStatus::Failed);
    let pet_now = registry.get_pet(&pet.id).expect("lookup").expect("pet");
    assert_eq!(pet_now.status, PetStatus::NotAdopted);

    let second = registry
        .file_for_adoption(adoption_payload(&pet.id, &user.id))
        .expect("refiling should succeed");
    assert_ne!(second.id, first.id);
    let user_now = registry.get_user(&user.id).expect("lookup").expect("user");
    assert_eq!(user_now.applications, vec![first.id, second.id]);
}

#[test]
fn invalid_merged_updates_leave_records_unchanged() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");

    let err = registry
        .update_pet_info(&pet.id, Some("   ".to_string()), Some(4))
        .expect_err("empty health status must fail");
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(registry.get_pet(&pet.id).expect("lookup"), Some(pet.clone()));

    let err = registry
        .update_shelter_info(ShelterPatch {
            id: shelter.id.clone(),
            email: Some("desk-at-happytails".to_string()),
            ..ShelterPatch::default()
        })
        .expect_err("bad email must fail");
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    let stored = registry
        .get_shelter(&shelter.id)
        .expect("lookup")
        .expect("shelter");
    assert_eq!(stored.email, "desk@happytails.org");
    assert_eq!(stored.pets, vec![pet.id.clone()]);

    let updated = registry
        .update_pet_info(&pet.id, Some("recovering".to_string()), None)
        .expect("valid update");
    assert_eq!(updated.health_status, "recovering");
    assert_eq!(updated.age, 3);

    let err = registry
        .update_pet_info("pet-missing", None, Some(1))
        .expect_err("missing pet");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn identical_user_payloads_get_distinct_ids() {
    let mut registry = registry();
    let first = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("first user");
    let second = registry
        .add_user(&CallerId::new("bob"), user_payload())
        .expect("second user");
    assert_ne!(first.id, second.id);
    assert_eq!(registry.get_users().expect("users").len(), 2);
}

#[test]
fn pet_image_replaces_reference() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");

    let pet = registry
        .add_pet_image(&pet.id, "images/rex.png".to_string())
        .expect("image");
    assert_eq!(pet.image, "images/rex.png");

    let err = registry
        .add_pet_image(&pet.id, String::new())
        .expect_err("empty image");
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    let err = registry
        .add_pet_image("pet-missing", "x.png".to_string())
        .expect_err("missing pet");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn missing_references_are_not_found_and_write_nothing() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let user = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("user");

    let before = registry.store().clone();
    let err = registry
        .file_for_adoption(adoption_payload(&pet.id, "usr-missing"))
        .expect_err("unknown user");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.detail(), "user usr-missing");
    assert_eq!(registry.store(), &before);

    let err = registry
        .file_for_adoption(adoption_payload("pet-missing", &user.id))
        .expect_err("unknown pet");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.detail(), "pet pet-missing");
    assert_eq!(registry.store(), &before);

    let err = registry
        .fail_adoption("adp-missing")
        .expect_err("unknown adoption");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.detail(), "adoption record adp-missing");

    let err = registry
        .complete_adoption("adp-missing")
        .expect_err("unknown adoption");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = registry
        .update_adoption_record(AdoptionUpdate {
            id: "adp-missing".to_string(),
            user_name: "Ada".to_string(),
            user_phone_number: "5555550199".to_string(),
            address: "1 Main St".to_string(),
            reason_for_adoption: "Big yard".to_string(),
        })
        .expect_err("unknown adoption");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = registry
        .update_shelter_info(ShelterPatch {
            id: "shl-missing".to_string(),
            name: Some("Other".to_string()),
            ..ShelterPatch::default()
        })
        .expect_err("unknown shelter");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(registry.store(), &before);
}

fn seed_adoption(store: &mut MemoryStore, record: &AdoptionRecord) {
    store.insert(
        Namespace::Adoptions,
        &record.id,
        serde_json::to_value(record).expect("record should encode"),
    );
}

#[test]
fn completing_against_vanished_pet_is_not_found() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let user = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("user");
    let mut orphan = registry
        .file_for_adoption(adoption_payload(&pet.id, &user.id))
        .expect("filing");
    orphan.id = "adp-orphan".to_string();
    orphan.pet_id = "pet-gone".to_string();

    let mut store = registry.store().clone();
    seed_adoption(&mut store, &orphan);
    let mut registry = Registry::new(store);

    let err = registry
        .complete_adoption("adp-orphan")
        .expect_err("vanished pet");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.detail(), "pet pet-gone");
    let stored = registry
        .get_adoption_record("adp-orphan")
        .expect("lookup")
        .expect("record");
    assert_eq!(stored.status, AdoptionStatus::Pending);
}

#[test]
fn second_pending_record_cannot_complete_once_pet_is_adopted() {
    let mut registry = registry();
    let shelter = registry
        .create_shelter(&CallerId::new("shelter-admin"), shelter_payload())
        .expect("shelter");
    let pet = registry.add_pet(pet_payload(&shelter.id)).expect("pet");
    let user = registry
        .add_user(&CallerId::new("alice"), user_payload())
        .expect("user");
    let first = registry
        .file_for_adoption(adoption_payload(&pet.id, &user.id))
        .expect("filing");
    let mut duplicate = first.clone();
    duplicate.id = "adp-duplicate".to_string();

    let mut store = registry.store().clone();
    seed_adoption(&mut store, &duplicate);
    let mut registry = Registry::new(store);

    registry
        .complete_adoption(&first.id)
        .expect("first completion");
    let before = registry.store().clone();
    let err = registry
        .complete_adoption("adp-duplicate")
        .expect_err("pet already adopted");
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    assert_eq!(registry.store(), &before);

    let stored = registry
        .get_adoption_record("adp-duplicate")
        .expect("lookup")
        .expect("record");
    assert_eq!(stored.status, AdoptionStatus::Pending);
    let pet_now = registry.get_pet(&pet.id).expect("lookup").expect("pet");
    assert_eq!(pet_now.status, PetStatus::Adopted);
}
