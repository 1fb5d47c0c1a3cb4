use petadopt_registry::{AdoptionPayload, AdoptionRecord, AdoptionUpdate};

use crate::cli::AdoptionCommands;
use crate::support::{
    Context, emit_list, emit_record, found_or_exit, mutate_or_exit, read_or_exit,
};

pub fn run(command: AdoptionCommands, ctx: &Context) {
    match command {
        AdoptionCommands::File {
            pet,
            user,
            phone,
            address,
            reason,
        } => {
            let action = "adoption.file";
            let record = mutate_or_exit(ctx, action, |registry| {
                registry.file_for_adoption(AdoptionPayload {
                    pet_id: pet,
                    user_id: user,
                    user_phone_number: phone,
                    address,
                    reason_for_adoption: reason,
                })
            });
            emit_record(
                ctx,
                action,
                "adoption",
                &record,
                &format!("Filed: {}", describe(&record)),
            );
        }

        AdoptionCommands::Get { id } => {
            let action = "adoption.get";
            let found = read_or_exit(ctx, action, |registry| registry.get_adoption_record(&id));
            let record = found_or_exit(ctx, action, "adoption record", &id, found);
            emit_record(ctx, action, "adoption", &record, &describe(&record));
        }

        AdoptionCommands::List => {
            let records = read_or_exit(ctx, "adoption.list", |registry| {
                registry.get_adoption_records()
            });
            emit_list(ctx, "adoption.list", &records, describe);
        }

        AdoptionCommands::Complete { id } => {
            let action = "adoption.complete";
            let record = mutate_or_exit(ctx, action, |registry| registry.complete_adoption(&id));
            emit_record(
                ctx,
                action,
                "adoption",
                &record,
                &format!("Completed: {}", describe(&record)),
            );
        }

        AdoptionCommands::Fail { id } => {
            let action = "adoption.fail";
            let record = mutate_or_exit(ctx, action, |registry| registry.fail_adoption(&id));
            emit_record(
                ctx,
                action,
                "adoption",
                &record,
                &format!("Failed: {}", describe(&record)),
            );
        }

        AdoptionCommands::Update {
            id,
            user_name,
            phone,
            address,
            reason,
        } => {
            let action = "adoption.update";
            let record = mutate_or_exit(ctx, action, |registry| {
                registry.update_adoption_record(AdoptionUpdate {
                    id,
                    user_name,
                    user_phone_number: phone,
                    address,
                    reason_for_adoption: reason,
                })
            });
            emit_record(
                ctx,
                action,
                "adoption",
                &record,
                &format!("Updated: {}", describe(&record)),
            );
        }

        AdoptionCommands::ForPet { pet_id } => {
            let records = read_or_exit(ctx, "adoption.for-pet", |registry| {
                registry.get_pet_adoptions(&pet_id)
            });
            emit_list(ctx, "adoption.for-pet", &records, describe);
        }
    }
}

fn describe(record: &AdoptionRecord) -> String {
    format!(
        "{} [{}] {} by {} ({})",
        record.id,
        record.status.as_str(),
        record.pet_name,
        record.user_name,
        record.created_at
    )
}
