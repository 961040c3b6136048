//! Wizard state snapshot and per-step field inputs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{WizardStep, MIN_STEP};
use crate::types::{Date, DbId};

/// Accumulated wizard data carried between steps.
///
/// Every step works on a fresh snapshot: [`WizardState::merged`] returns a new
/// value and leaves the stored one untouched until the caller persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub priority: Option<i32>,
    pub customer_company_id: Option<DbId>,
    pub executor_company_id: Option<DbId>,
    pub head_id: Option<DbId>,
    #[serde(default)]
    pub employee_ids: BTreeSet<DbId>,
    /// Furthest step the wizard has reached (1-based).
    #[serde(default = "first_step")]
    pub current_step: u8,
}

fn first_step() -> u8 {
    MIN_STEP
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            name: None,
            start_date: None,
            end_date: None,
            priority: None,
            customer_company_id: None,
            executor_company_id: None,
            head_id: None,
            employee_ids: BTreeSet::new(),
            current_step: MIN_STEP,
        }
    }
}

impl WizardState {
    /// Return a copy with the step's fields replaced by `input`.
    ///
    /// Each step owns a fixed group of fields and a submission overwrites the
    /// whole group, so clearing a field in the form clears it in the state.
    pub fn merged(&self, input: &StepInput) -> Self {
        let mut next = self.clone();
        match input {
            StepInput::Basic(basic) => {
                next.name = basic.name.clone();
                next.start_date = basic.start_date;
                next.end_date = basic.end_date;
                next.priority = basic.priority;
            }
            StepInput::Companies(companies) => {
                next.customer_company_id = companies.customer_company_id;
                next.executor_company_id = companies.executor_company_id;
            }
            StepInput::Head(head) => {
                next.head_id = head.head_id;
            }
            StepInput::Team(team) => {
                next.employee_ids = team.employee_ids.iter().copied().collect();
            }
            StepInput::Documents => {}
        }
        next
    }

    /// Return a copy positioned at `step`.
    pub fn at_step(mut self, step: WizardStep) -> Self {
        self.current_step = step.to_number();
        self
    }

    /// Return a copy whose team includes the project head.
    pub fn with_head_in_team(mut self) -> Self {
        if let Some(head_id) = self.head_id {
            self.employee_ids.insert(head_id);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Step inputs
// ---------------------------------------------------------------------------

/// Fields submitted on step 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BasicInput {
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub priority: Option<i32>,
}

/// Fields submitted on step 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompaniesInput {
    pub customer_company_id: Option<DbId>,
    pub executor_company_id: Option<DbId>,
}

/// Fields submitted on step 3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeadInput {
    pub head_id: Option<DbId>,
}

/// Fields submitted on step 4. A missing list means an empty team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamInput {
    #[serde(default)]
    pub employee_ids: Vec<DbId>,
}

/// A step submission tagged with the step whose fields it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Basic(BasicInput),
    Companies(CompaniesInput),
    Head(HeadInput),
    Team(TeamInput),
    /// Step 5 carries uploaded files, which never enter the session state.
    Documents,
}

impl StepInput {
    /// The step this input belongs to.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Basic(_) => WizardStep::Basic,
            Self::Companies(_) => WizardStep::Companies,
            Self::Head(_) => WizardStep::Head,
            Self::Team(_) => WizardStep::Team,
            Self::Documents => WizardStep::Documents,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
