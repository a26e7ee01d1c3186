pub mod auth;
pub mod page;
pub mod permission;
pub mod session;
