//! Shared response envelope types for API handlers.
//!
//! Resource endpoints answer with a `{ "data": ... }` envelope. Wizard
//! endpoints answer with a [`StepView`] (also enveloped) or a `303 See Other`
//! redirect.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use smoothie_core::project_wizard::{FieldError, RedirectTarget, WizardState, WizardStep};

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A wizard step as presented to the client.
#[derive(Debug, Serialize)]
pub struct StepView {
    pub step: u8,
    pub step_label: &'static str,
    pub state: WizardState,
    pub errors: Vec<FieldError>,
    /// Form-level message not tied to a field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StepView {
    pub fn new(
        step: WizardStep,
        state: WizardState,
        errors: Vec<FieldError>,
        message: Option<&'static str>,
    ) -> Self {
        Self {
            step: step.to_number(),
            step_label: step.label(),
            state,
            errors,
            message,
        }
    }
}

/// URL of a redirect target, under `/api/v1`.
pub fn redirect_location(target: RedirectTarget) -> String {
    match target {
        RedirectTarget::Create => "/api/v1/projects/wizard".to_string(),
        RedirectTarget::Step(step) => {
            format!("/api/v1/projects/wizard/step/{}", step.to_number())
        }
        RedirectTarget::ProjectList => "/api/v1/projects".to_string(),
    }
}

/// `303 See Other` to the given target.
pub fn see_other(target: RedirectTarget) -> Response {
    let location = redirect_location(target);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
