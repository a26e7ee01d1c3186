pub mod auth;
pub mod gate;
pub mod permission_cache;
pub mod resolver;
pub mod session;
