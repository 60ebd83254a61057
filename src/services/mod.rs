pub mod account;
pub mod bootstrap_admin;
pub mod report;
pub mod upload;
