//! Authentication module
//!
//! Provides cookie-session authentication with bcrypt password hashing.

mod password;
mod session;

pub use password::PasswordService;
pub use session::{
    destroy_session, establish_session, session_layer, AuthUser, OptionalAuthUser,
    SESSION_USER_ID_KEY,
};
