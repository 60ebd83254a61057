pub mod cookie;
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{decode_session_token, encode_session_token};
