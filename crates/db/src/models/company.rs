//! Company entity model and DTOs.

use serde::{Deserialize, Serialize};
use smoothie_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A company row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 50, message = "Company name must be 1-50 characters"))]
    pub name: String,
}
