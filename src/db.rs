pub mod user_repo;
pub use user_repo::UserRepository;
pub mod permission_repo;
pub use permission_repo::{PermissionRepository, PermissionStore};

#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub use memory_store::InMemoryPermissionStore;
