//! Persistence adapters implementing the domain store ports.
//!
//! [`InMemoryStore`] implements `TagRepository`, `PostRepository`, and
//! `UserPermissionsRepository` over one shared state so relation writes and
//! tag usage reads always agree. A single instance is shared by the services
//! and the cleanup worker.

mod in_memory;

pub use in_memory::InMemoryStore;
