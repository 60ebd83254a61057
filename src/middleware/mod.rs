pub mod auth;

pub use auth::{Role, Session};
