//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: the process-local store behind every repository port
//! - **queue**: tag cleanup queues (inline and channel-backed worker)
//!
//! Adapters are thin translators between domain types and their backing
//! mechanism. They contain no business logic.

pub mod persistence;
pub mod queue;
