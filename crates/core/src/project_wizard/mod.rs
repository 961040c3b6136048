//! Project creation wizard: step definitions, state, validation, the pure
//! transition function, and the session-scoped state store.
//!
//! The wizard walks through five steps (basic data, companies, project head,
//! team, documents). Each submission is merged into a [`WizardState`]
//! snapshot, validated up to the submitted step, and persisted through a
//! [`SessionStore`] until the final step commits the project.

pub mod machine;
pub mod state;
pub mod store;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use machine::{RedirectTarget, StoreAction, Transition, WizardAction, WizardOutcome};
pub use state::{BasicInput, CompaniesInput, HeadInput, StepInput, TeamInput, WizardState};
pub use store::{MemorySessionStore, SessionStore, WizardStateStore};
pub use validation::{validate_state, FieldError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 5;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 5;

/// Session slot key under which the serialized wizard state is kept.
pub const WIZARD_SESSION_KEY: &str = "project_wizard";

/// Lowest accepted project priority.
pub const MIN_PRIORITY: i32 = 1;

/// Highest accepted project priority.
pub const MAX_PRIORITY: i32 = 10;

/// Maximum project name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The five steps of the project wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basic,
    Companies,
    Head,
    Team,
    Documents,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 5] = [
        Self::Basic,
        Self::Companies,
        Self::Head,
        Self::Team,
        Self::Documents,
    ];

    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Basic),
            2 => Ok(Self::Companies),
            3 => Ok(Self::Head),
            4 => Ok(Self::Team),
            5 => Ok(Self::Documents),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Basic => 1,
            Self::Companies => 2,
            Self::Head => 3,
            Self::Team => 4,
            Self::Documents => 5,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Information",
            Self::Companies => "Companies",
            Self::Head => "Project Head",
            Self::Team => "Team Members",
            Self::Documents => "Documents",
        }
    }

    /// The step after this one, or `None` on the last step.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.to_number() + 1).ok()
    }

    /// The step before this one, or `None` on the first step.
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.to_number().saturating_sub(1)).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
