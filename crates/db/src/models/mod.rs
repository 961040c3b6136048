//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod company;
pub mod employee;
pub mod project;
pub mod project_document;
pub mod wizard_session;
