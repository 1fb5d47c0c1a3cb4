use petadopt_registry::{User, UserPatch, UserPayload};

use crate::cli::UserCommands;
use crate::support::{
    Context, emit_list, emit_record, found_or_exit, mutate_or_exit, read_or_exit,
};

pub fn run(command: UserCommands, ctx: &Context) {
    match command {
        UserCommands::Add {
            name,
            phone,
            email,
            address,
        } => run_add(
            UserPayload {
                name,
                phone,
                email,
                address,
            },
            ctx,
        ),

        UserCommands::Get { id } => run_get(id, ctx),

        UserCommands::List => run_list(ctx),

        UserCommands::Me => run_me(ctx),

        UserCommands::Update {
            id,
            name,
            phone,
            email,
            address,
        } => run_update(
            UserPatch {
                id,
                name,
                phone,
                email,
                address,
            },
            ctx,
        ),

        UserCommands::Applications { id } => run_applications(id, ctx),
    }
}

fn run_add(payload: UserPayload, ctx: &Context) {
    let action = "user.add";
    let caller = ctx.caller_or_exit(action);
    let user = mutate_or_exit(ctx, action, |registry| registry.add_user(&caller, payload));
    emit_record(ctx, action, "user", &user, &format!("Added: {}", describe(&user)));
}

fn run_get(id: String, ctx: &Context) {
    let action = "user.get";
    let found = read_or_exit(ctx, action, |registry| registry.get_user(&id));
    let user = found_or_exit(ctx, action, "user", &id, found);
    emit_record(ctx, action, "user", &user, &describe(&user));
}

fn run_list(ctx: &Context) {
    let users = read_or_exit(ctx, "user.list", |registry| registry.get_users());
    emit_list(ctx, "user.list", &users, describe);
}

fn run_me(ctx: &Context) {
    let action = "user.me";
    let caller = ctx.caller_or_exit(action);
    let user = read_or_exit(ctx, action, |registry| registry.get_user_by_owner(&caller));
    emit_record(ctx, action, "user", &user, &describe(&user));
}

fn run_update(patch: UserPatch, ctx: &Context) {
    let action = "user.update";
    let user = mutate_or_exit(ctx, action, |registry| registry.update_user_info(patch));
    emit_record(ctx, action, "user", &user, &format!("Updated: {}", describe(&user)));
}

fn run_applications(id: String, ctx: &Context) {
    let records = read_or_exit(ctx, "user.applications", |registry| {
        registry.get_user_applications(&id)
    });
    emit_list(ctx, "user.applications", &records, |record| {
        format!("{} [{}] {}", record.id, record.status.as_str(), record.pet_name)
    });
}

fn describe(user: &User) -> String {
    format!("{} {} <{}>", user.id, user.name, user.email)
}
