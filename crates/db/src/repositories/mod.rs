//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that take part in the
//! project commit transaction accept `&mut PgConnection` instead so callers
//! can pass `&mut *tx`.

pub mod company_repo;
pub mod employee_repo;
pub mod project_document_repo;
pub mod project_repo;
pub mod wizard_session_repo;

pub use company_repo::CompanyRepo;
pub use employee_repo::EmployeeRepo;
pub use project_document_repo::ProjectDocumentRepo;
pub use project_repo::ProjectRepo;
pub use wizard_session_repo::WizardSessionRepo;
