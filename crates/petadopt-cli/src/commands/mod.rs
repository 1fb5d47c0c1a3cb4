pub mod adoption;
pub mod pet;
pub mod shelter;
pub mod user;
