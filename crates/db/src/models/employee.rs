//! Employee entity model and DTOs.

use serde::{Deserialize, Serialize};
use smoothie_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// An employee row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub first_name: String,
    pub second_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    /// "First [Second] Last".
    pub fn full_name(&self) -> String {
        match self.second_name.as_deref() {
            Some(second) if !second.is_empty() => {
                format!("{} {second} {}", self.first_name, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// DTO for creating a new employee.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(max = 50))]
    pub second_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
}

/// Query parameters for the employee listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    /// Substring of "first second last" with spaces removed. Case-insensitive.
    pub pattern: Option<String>,
}

impl EmployeeFilter {
    /// Lowercased pattern with all whitespace stripped, or `None` when blank.
    pub fn normalized_pattern(&self) -> Option<String> {
        let pattern: String = self
            .pattern
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        (!pattern.is_empty()).then_some(pattern)
    }
}
