//! Pure transition function for the project wizard.
//!
//! Handlers load the stored [`WizardState`], call into this module, then
//! carry out the returned [`Transition`]: apply its [`StoreAction`] to the
//! session store and turn its [`WizardOutcome`] into a response. Nothing here
//! touches I/O, so every path is testable without a transport.

use serde::Deserialize;

use super::state::{StepInput, WizardState};
use super::validation::{validate_state, FieldError};
use super::WizardStep;
use crate::error::CoreError;

/// Message shown on step 5 when committing the project fails.
pub const COMMIT_FAILED_MESSAGE: &str = "Failed to create project. Please try again.";

/// Navigation requested by a step submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    #[default]
    Next,
    Back,
}

impl WizardAction {
    /// Parse a form `action` value. Anything other than `back` moves forward.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("back") => Self::Back,
            _ => Self::Next,
        }
    }
}

/// What to do with the session slot after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Leave the stored state as it is.
    Keep,
    /// Replace the stored state.
    Save(WizardState),
    /// Remove the stored state.
    Clear,
}

/// Where the client should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Restart the wizard (state missing or expired).
    Create,
    /// Show a wizard step.
    Step(WizardStep),
    /// The wizard is finished; show the project listing.
    ProjectList,
}

/// Result of a wizard interaction, before any I/O is performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Present `step` with the given state and any errors.
    Render {
        step: WizardStep,
        state: WizardState,
        errors: Vec<FieldError>,
        message: Option<&'static str>,
    },
    /// Send the client elsewhere.
    Redirect(RedirectTarget),
    /// The state is complete; hand it to the commit engine.
    Commit(WizardState),
}

/// A store action paired with the outcome to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub store: StoreAction,
    pub outcome: WizardOutcome,
}

impl Transition {
    fn redirect(store: StoreAction, target: RedirectTarget) -> Self {
        Self {
            store,
            outcome: WizardOutcome::Redirect(target),
        }
    }

    fn render(step: WizardStep, state: WizardState, errors: Vec<FieldError>) -> Self {
        Self {
            store: StoreAction::Keep,
            outcome: WizardOutcome::Render {
                step,
                state,
                errors,
                message: None,
            },
        }
    }
}

/// Enter the wizard, discarding any previous state.
pub fn start() -> Transition {
    let state = WizardState::default();
    Transition {
        store: StoreAction::Save(state.clone()),
        outcome: WizardOutcome::Render {
            step: WizardStep::Basic,
            state,
            errors: Vec::new(),
            message: None,
        },
    }
}

/// Present a step from the stored state.
///
/// Missing state restarts the wizard; a step beyond the furthest one reached
/// redirects back to it so no step can be skipped.
pub fn show(stored: Option<WizardState>, step: WizardStep) -> Transition {
    let Some(state) = stored else {
        return Transition::redirect(StoreAction::Keep, RedirectTarget::Create);
    };
    if let Some(reached) = reached_step(&state, step) {
        return Transition::redirect(StoreAction::Keep, RedirectTarget::Step(reached));
    }
    Transition::render(step, state, Vec::new())
}

/// Apply a step submission.
///
/// Returns an error only when `input` carries fields of a different step
/// than the one addressed.
pub fn transition(
    stored: Option<WizardState>,
    step: WizardStep,
    action: WizardAction,
    input: StepInput,
) -> Result<Transition, CoreError> {
    if input.step() != step {
        return Err(CoreError::Validation(format!(
            "Step {} does not accept fields of step {}",
            step.to_number(),
            input.step().to_number()
        )));
    }

    let Some(state) = stored else {
        return Ok(Transition::redirect(
            StoreAction::Keep,
            RedirectTarget::Create,
        ));
    };
    if let Some(reached) = reached_step(&state, step) {
        return Ok(Transition::redirect(
            StoreAction::Keep,
            RedirectTarget::Step(reached),
        ));
    }

    Ok(match action {
        WizardAction::Next => advance(state, step, &input),
        WizardAction::Back => back(state, step, &input),
    })
}

/// The transition taken after the commit engine persisted the project.
pub fn committed() -> Transition {
    Transition::redirect(StoreAction::Clear, RedirectTarget::ProjectList)
}

/// The transition taken when the commit engine failed. State is kept so the
/// user can retry the final step.
pub fn commit_failed(state: WizardState) -> Transition {
    Transition {
        store: StoreAction::Keep,
        outcome: WizardOutcome::Render {
            step: WizardStep::Documents,
            state,
            errors: Vec::new(),
            message: Some(COMMIT_FAILED_MESSAGE),
        },
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// If `step` lies beyond the furthest step reached, return that step.
fn reached_step(state: &WizardState, step: WizardStep) -> Option<WizardStep> {
    if step.to_number() <= state.current_step {
        return None;
    }
    Some(WizardStep::from_number(state.current_step).unwrap_or(WizardStep::Basic))
}

fn advance(state: WizardState, step: WizardStep, input: &StepInput) -> Transition {
    let candidate = state.merged(input).at_step(step);
    let errors = validate_state(&candidate);
    if !errors.is_empty() {
        return Transition::render(step, candidate, errors);
    }

    match step.next() {
        Some(next) => {
            let mut saved = candidate.at_step(next);
            if step == WizardStep::Team {
                saved = saved.with_head_in_team();
            }
            Transition::redirect(StoreAction::Save(saved), RedirectTarget::Step(next))
        }
        None => Transition {
            store: StoreAction::Keep,
            outcome: WizardOutcome::Commit(candidate),
        },
    }
}

fn back(state: WizardState, step: WizardStep, input: &StepInput) -> Transition {
    let target = step.previous().unwrap_or(step);
    let saved = state.merged(input).at_step(target);
    Transition::redirect(StoreAction::Save(saved), RedirectTarget::Step(target))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
