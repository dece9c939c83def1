//! Argon2id password hashing for stored credentials.
//!
//! Also owns the decoy verification run when a login names no known account.

pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;
