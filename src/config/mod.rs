pub mod database;
pub mod rate_limit;
pub mod session;
