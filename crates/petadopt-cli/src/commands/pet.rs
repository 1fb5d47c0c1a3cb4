use petadopt_registry::{Pet, PetPayload};

use crate::cli::PetCommands;
use crate::support::{
    Context, emit_list, emit_record, found_or_exit, mutate_or_exit, read_or_exit,
};

pub fn run(command: PetCommands, ctx: &Context) {
    match command {
        PetCommands::Add {
            shelter,
            name,
            species,
            breed,
            gender,
            age,
            image,
            description,
            health_status,
        } => run_add(
            PetPayload {
                name,
                species,
                breed,
                gender,
                age,
                image,
                description,
                health_status,
                shelter_id: shelter,
            },
            ctx,
        ),

        PetCommands::Get { id } => run_get(id, ctx),

        PetCommands::List => {
            let pets = read_or_exit(ctx, "pet.list", |registry| registry.get_pets());
            emit_list(ctx, "pet.list", &pets, describe);
        }

        PetCommands::Available => {
            let pets = read_or_exit(ctx, "pet.available", |registry| {
                registry.get_pets_not_adopted()
            });
            emit_list(ctx, "pet.available", &pets, describe);
        }

        PetCommands::Search { species } => {
            let pets = read_or_exit(ctx, "pet.search", |registry| {
                registry.search_pets_by_species(&species)
            });
            emit_list(ctx, "pet.search", &pets, describe);
        }

        PetCommands::Image { id, image } => {
            let action = "pet.image";
            let pet = mutate_or_exit(ctx, action, |registry| registry.add_pet_image(&id, image));
            emit_record(ctx, action, "pet", &pet, &format!("Image: {} {}", pet.id, pet.image));
        }

        PetCommands::Update {
            id,
            health_status,
            age,
        } => {
            let action = "pet.update";
            let pet = mutate_or_exit(ctx, action, |registry| {
                registry.update_pet_info(&id, health_status, age)
            });
            emit_record(ctx, action, "pet", &pet, &format!("Updated: {}", describe(&pet)));
        }
    }
}

fn run_add(payload: PetPayload, ctx: &Context) {
    let action = "pet.add";
    let pet = mutate_or_exit(ctx, action, |registry| registry.add_pet(payload));
    emit_record(
        ctx,
        action,
        "pet",
        &pet,
        &format!("Added: {} to {}", describe(&pet), pet.shelter_id),
    );
}

fn run_get(id: String, ctx: &Context) {
    let action = "pet.get";
    let found = read_or_exit(ctx, action, |registry| registry.get_pet(&id));
    let pet = found_or_exit(ctx, action, "pet", &id, found);
    emit_record(ctx, action, "pet", &pet, &describe(&pet));
}

fn describe(pet: &Pet) -> String {
    format!(
        "{} [{}] {} ({} {}, {}y)",
        pet.id,
        pet.status.as_str(),
        pet.name,
        pet.species,
        pet.breed,
        pet.age
    )
}
