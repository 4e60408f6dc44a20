//! Blog backend library: posts with user-scoped tags and orphan tag cleanup.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
