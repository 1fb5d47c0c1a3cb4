use petadopt_registry::{Shelter, ShelterPatch, ShelterPayload};

use crate::cli::ShelterCommands;
use crate::support::{
    Context, emit_list, emit_record, found_or_exit, mutate_or_exit, read_or_exit,
};

pub fn run(command: ShelterCommands, ctx: &Context) {
    match command {
        ShelterCommands::Create {
            name,
            location,
            phone,
            email,
        } => run_create(
            ShelterPayload {
                name,
                location,
                phone,
                email,
            },
            ctx,
        ),

        ShelterCommands::Get { id } => run_get(id, ctx),

        ShelterCommands::List => run_list(ctx),

        ShelterCommands::Me => run_me(ctx),

        ShelterCommands::Update {
            id,
            name,
            location,
            phone,
            email,
        } => run_update(
            ShelterPatch {
                id,
                name,
                location,
                phone,
                email,
            },
            ctx,
        ),

        ShelterCommands::Pets { id } => run_pets(id, ctx),
    }
}

fn run_create(payload: ShelterPayload, ctx: &Context) {
    let action = "shelter.create";
    let caller = ctx.caller_or_exit(action);
    let shelter = mutate_or_exit(ctx, action, |registry| {
        registry.create_shelter(&caller, payload)
    });
    emit_record(
        ctx,
        action,
        "shelter",
        &shelter,
        &format!("Created: {}", describe(&shelter)),
    );
}

fn run_get(id: String, ctx: &Context) {
    let action = "shelter.get";
    let found = read_or_exit(ctx, action, |registry| registry.get_shelter(&id));
    let shelter = found_or_exit(ctx, action, "shelter", &id, found);
    emit_record(ctx, action, "shelter", &shelter, &describe(&shelter));
}

fn run_list(ctx: &Context) {
    let shelters = read_or_exit(ctx, "shelter.list", |registry| registry.get_shelters());
    emit_list(ctx, "shelter.list", &shelters, describe);
}

fn run_me(ctx: &Context) {
    let action = "shelter.me";
    let caller = ctx.caller_or_exit(action);
    let shelter = read_or_exit(ctx, action, |registry| {
        registry.get_shelter_by_owner(&caller)
    });
    emit_record(ctx, action, "shelter", &shelter, &describe(&shelter));
}

fn run_update(patch: ShelterPatch, ctx: &Context) {
    let action = "shelter.update";
    let shelter = mutate_or_exit(ctx, action, |registry| registry.update_shelter_info(patch));
    emit_record(
        ctx,
        action,
        "shelter",
        &shelter,
        &format!("Updated: {}", describe(&shelter)),
    );
}

fn run_pets(id: String, ctx: &Context) {
    let pets = read_or_exit(ctx, "shelter.pets", |registry| registry.get_shelter_pets(&id));
    emit_list(ctx, "shelter.pets", &pets, |pet| {
        format!("{} [{}] {} ({})", pet.id, pet.status.as_str(), pet.name, pet.species)
    });
}

fn describe(shelter: &Shelter) -> String {
    format!(
        "{} {} @ {} ({} pets)",
        shelter.id,
        shelter.name,
        shelter.location,
        shelter.pets.len()
    )
}
