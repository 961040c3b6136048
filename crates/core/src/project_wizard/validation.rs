//! Step validator for the project wizard.
//!
//! Rules run in a fixed order and every violation is reported, so the
//! field each message lands on is deterministic. Rules for later steps are
//! gated behind `current_step`: a step never fails on fields the user has
//! not been asked for yet.

use serde::Serialize;

use super::state::WizardState;
use super::{WizardStep, MAX_NAME_LENGTH, MAX_PRIORITY, MIN_PRIORITY};
use crate::error::CoreError;

pub const FIELD_NAME: &str = "name";
pub const FIELD_START_DATE: &str = "start_date";
pub const FIELD_END_DATE: &str = "end_date";
pub const FIELD_PRIORITY: &str = "priority";
pub const FIELD_CUSTOMER_COMPANY_ID: &str = "customer_company_id";
pub const FIELD_EXECUTOR_COMPANY_ID: &str = "executor_company_id";
pub const FIELD_HEAD_ID: &str = "head_id";

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

type Rule = fn(&WizardState, &mut Vec<FieldError>);

/// Rule groups in evaluation order, each gated by the step that introduces it.
const RULE_GROUPS: &[(WizardStep, &[Rule])] = &[
    (
        WizardStep::Basic,
        &[
            check_name,
            check_start_date,
            check_end_date,
            check_priority,
            check_date_order,
        ],
    ),
    (
        WizardStep::Companies,
        &[check_customer, check_executor, check_distinct_companies],
    ),
    (WizardStep::Head, &[check_head]),
];

/// Validate `state` up to its `current_step`.
///
/// Returns every violation in rule order; an empty list means the state may
/// move past its current step.
pub fn validate_state(state: &WizardState) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (index, (gate, rules)) in RULE_GROUPS.iter().enumerate() {
        // The basic group always runs, even for an out-of-range step.
        if index > 0 && state.current_step < gate.to_number() {
            break;
        }
        for rule in rules.iter() {
            rule(state, &mut errors);
        }
    }
    errors
}

/// Validate `state` and collapse the violations into a [`CoreError`].
pub fn ensure_valid(state: &WizardState) -> Result<(), CoreError> {
    let errors = validate_state(state);
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(CoreError::Validation(joined))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_name(state: &WizardState, errors: &mut Vec<FieldError>) {
    match state.name.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new(FIELD_NAME, "Project name is required")),
        Some(_) => {
            let len = state.name.as_deref().map_or(0, |n| n.chars().count());
            if len > MAX_NAME_LENGTH {
                errors.push(FieldError::new(FIELD_NAME, "Project name is too long"));
            }
        }
    }
}

fn check_start_date(state: &WizardState, errors: &mut Vec<FieldError>) {
    if state.start_date.is_none() {
        errors.push(FieldError::new(FIELD_START_DATE, "Start date is required"));
    }
}

fn check_end_date(state: &WizardState, errors: &mut Vec<FieldError>) {
    if state.end_date.is_none() {
        errors.push(FieldError::new(FIELD_END_DATE, "End date is required"));
    }
}

fn check_priority(state: &WizardState, errors: &mut Vec<FieldError>) {
    match state.priority {
        None => errors.push(FieldError::new(FIELD_PRIORITY, "Priority value is required")),
        Some(p) if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&p) => {
            errors.push(FieldError::new(FIELD_PRIORITY, "Priority is invalid"));
        }
        Some(_) => {}
    }
}

fn check_date_order(state: &WizardState, errors: &mut Vec<FieldError>) {
    if let (Some(start), Some(end)) = (state.start_date, state.end_date) {
        if end <= start {
            errors.push(FieldError::new(
                FIELD_END_DATE,
                "End date must be after start date",
            ));
        }
    }
}

fn check_customer(state: &WizardState, errors: &mut Vec<FieldError>) {
    if state.customer_company_id.is_none() {
        errors.push(FieldError::new(
            FIELD_CUSTOMER_COMPANY_ID,
            "Customer company is required",
        ));
    }
}

fn check_executor(state: &WizardState, errors: &mut Vec<FieldError>) {
    if state.executor_company_id.is_none() {
        errors.push(FieldError::new(
            FIELD_EXECUTOR_COMPANY_ID,
            "Executor company is required",
        ));
    }
}

fn check_distinct_companies(state: &WizardState, errors: &mut Vec<FieldError>) {
    if let (Some(customer), Some(executor)) = (state.customer_company_id, state.executor_company_id)
    {
        if customer == executor {
            errors.push(FieldError::new(
                FIELD_EXECUTOR_COMPANY_ID,
                "Executor must differ from customer",
            ));
        }
    }
}

fn check_head(state: &WizardState, errors: &mut Vec<FieldError>) {
    if state.head_id.is_none() {
        errors.push(FieldError::new(FIELD_HEAD_ID, "Head must be specified"));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
