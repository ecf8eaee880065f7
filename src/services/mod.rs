//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! request handlers and the storage layer.

pub mod user;

pub use user::{RegisterRequest, UpdateProfileRequest, UserService};
