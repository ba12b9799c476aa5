pub mod auth;

pub use auth::{AuthUser, AUTH_HEADER};
