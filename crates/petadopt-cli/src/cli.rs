use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "petadopt",
    about = "Petadopt: users, shelters, pets and adoption records over a JSONL store",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Config file (defaults to ./petadopt.toml when present)
    #[arg(long, global = true, env = "PETADOPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store path (overrides `store_path` from config)
    #[arg(long, global = true, env = "PETADOPT_STORE")]
    pub store: Option<PathBuf>,

    /// Caller identity for owner-scoped commands
    #[arg(long, global = true, env = "PETADOPT_CALLER")]
    pub caller: Option<String>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage adopter accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage shelters
    Shelter {
        #[command(subcommand)]
        command: ShelterCommands,
    },

    /// Manage pets
    Pet {
        #[command(subcommand)]
        command: PetCommands,
    },

    /// File and resolve adoptions
    Adoption {
        #[command(subcommand)]
        command: AdoptionCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// Register the caller as an adopter
    Add {
        #[arg(long)]
        name: String,

        /// Phone number (10-15 digits)
        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        address: String,
    },

    /// Show one user
    Get {
        /// User ID
        id: String,
    },

    /// List all users
    List,

    /// Show the caller's own user
    Me,

    /// Update user fields; omitted fields keep their value
    Update {
        /// User ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// List a user's adoption records in filing order
    Applications {
        /// User ID
        id: String,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ShelterCommands {
    /// Create a shelter owned by the caller
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,

        /// Phone number (10-15 digits)
        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,
    },

    /// Show one shelter
    Get {
        /// Shelter ID
        id: String,
    },

    /// List all shelters
    List,

    /// Show the caller's own shelter
    Me,

    /// Update shelter fields; omitted fields keep their value
    Update {
        /// Shelter ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List the pets housed by a shelter
    Pets {
        /// Shelter ID
        id: String,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum PetCommands {
    /// Add a pet to a shelter
    Add {
        /// Owning shelter ID
        #[arg(long)]
        shelter: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        species: String,

        #[arg(long)]
        breed: String,

        #[arg(long)]
        gender: String,

        #[arg(long)]
        age: u32,

        /// Image reference
        #[arg(long, default_value = "")]
        image: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        health_status: String,
    },

    /// Show one pet
    Get {
        /// Pet ID
        id: String,
    },

    /// List all pets
    List,

    /// List pets that are not adopted
    Available,

    /// List pets of one species (case-insensitive)
    Search {
        species: String,
    },

    /// Replace a pet's image reference
    Image {
        /// Pet ID
        id: String,

        image: String,
    },

    /// Update health status and/or age
    Update {
        /// Pet ID
        id: String,

        #[arg(long)]
        health_status: Option<String>,

        #[arg(long)]
        age: Option<u32>,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum AdoptionCommands {
    /// File a pending adoption
    File {
        /// Pet ID
        #[arg(long)]
        pet: String,

        /// Adopting user ID
        #[arg(long)]
        user: String,

        /// Contact phone (10-15 digits)
        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        reason: String,
    },

    /// Show one adoption record
    Get {
        /// Adoption record ID
        id: String,
    },

    /// List all adoption records
    List,

    /// Complete a pending adoption and mark the pet adopted
    Complete {
        /// Adoption record ID
        id: String,
    },

    /// Fail a pending adoption
    Fail {
        /// Adoption record ID
        id: String,
    },

    /// Replace contact and reason fields
    Update {
        /// Adoption record ID
        id: String,

        #[arg(long)]
        user_name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        reason: String,
    },

    /// List every adoption record for one pet
    ForPet {
        /// Pet ID
        pet_id: String,
    },
}
