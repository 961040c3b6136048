//! Handlers for the project creation wizard (`/projects/wizard`).
//!
//! Each handler loads the session's wizard state, runs the pure transition
//! function, applies the resulting store action and turns the outcome into a
//! response. The documents step additionally hands the finished state and
//! its uploads to the [`CommitEngine`].
//!
//! Every response to a request carrying a session re-issues the session
//! cookie, so its `Max-Age` counts from the last wizard request.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use smoothie_core::documents::UploadedFile;
use smoothie_core::project_wizard::machine;
use smoothie_core::project_wizard::{
    StepInput, StoreAction, Transition, WizardAction, WizardOutcome, WizardState,
    WizardStateStore, WizardStep,
};

use crate::engine::CommitEngine;
use crate::error::{AppError, AppResult};
use crate::middleware::session::{session_cookie, WizardSession};
use crate::response::{see_other, DataResponse, StepView};
use crate::state::AppState;

/// Multipart field carrying the navigation action on the documents step.
const ACTION_FIELD: &str = "action";

/// GET /api/v1/projects/wizard
///
/// Starts the wizard over at step 1, issuing a session cookie if the client
/// has none.
pub async fn create(State(state): State<AppState>, session: WizardSession) -> AppResult<Response> {
    let (session_id, fresh) = session.id_or_new();
    let store = WizardStateStore::new(state.session_store.as_ref(), &session_id);

    tracing::info!(session_id = %session_id, fresh, "Starting project wizard");
    let response = respond(&store, &session_id, machine::start()).await?;
    Ok(with_session_cookie(response, &session_id, &state))
}

/// GET /api/v1/projects/wizard/step/{n}
pub async fn show_step(
    State(state): State<AppState>,
    session: WizardSession,
    Path(n): Path<u8>,
) -> AppResult<Response> {
    let step = WizardStep::from_number(n)?;
    let Some(session_id) = session.id else {
        return respond_without_session(machine::show(None, step));
    };
    let store = WizardStateStore::new(state.session_store.as_ref(), &session_id);
    let stored = store.load().await?;
    let response = respond(&store, &session_id, machine::show(stored, step)).await?;
    Ok(with_session_cookie(response, &session_id, &state))
}

/// POST /api/v1/projects/wizard/step/{n}
///
/// Steps 1-4 take a JSON object with the step's fields and an optional
/// `action` (`"next"` or `"back"`). Step 5 takes `multipart/form-data` with
/// an `action` text field and any number of `files` parts.
pub async fn submit_step(
    State(state): State<AppState>,
    session: WizardSession,
    Path(n): Path<u8>,
    request: Request,
) -> AppResult<Response> {
    let step = WizardStep::from_number(n)?;

    let (action, input, files) = if step == WizardStep::Documents {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let (action, files) = read_documents_form(multipart).await?;
        (action, StepInput::Documents, files)
    } else {
        let Json(body) = Json::<serde_json::Value>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let action = WizardAction::parse(body.get(ACTION_FIELD).and_then(|v| v.as_str()));
        (action, parse_step_input(step, body)?, Vec::new())
    };

    let Some(session_id) = session.id else {
        tracing::debug!(step = n, "Wizard submission without session");
        return respond_without_session(machine::transition(None, step, action, input)?);
    };

    let store = WizardStateStore::new(state.session_store.as_ref(), &session_id);
    let stored = store.load().await?;
    let transition = machine::transition(stored, step, action, input)?;

    tracing::debug!(
        session_id = %session_id,
        step = n,
        action = ?action,
        files = files.len(),
        "Wizard step submitted"
    );

    let WizardOutcome::Commit(candidate) = transition.outcome else {
        let response = respond(&store, &session_id, transition).await?;
        return Ok(with_session_cookie(response, &session_id, &state));
    };

    // Detached so the commit, its cleanup and the session update all finish
    // even when the request is dropped (client disconnect, request timeout).
    let task = tokio::spawn(finish_commit(
        state.clone(),
        session_id.clone(),
        candidate,
        files,
    ));
    let outcome = task
        .await
        .map_err(|e| AppError::InternalError(format!("Commit task failed: {e}")))??;
    Ok(with_session_cookie(render(outcome)?, &session_id, &state))
}

/// Commit the finished wizard, then record the result in the session.
async fn finish_commit(
    state: AppState,
    session_id: String,
    candidate: WizardState,
    files: Vec<UploadedFile>,
) -> AppResult<WizardOutcome> {
    let engine = CommitEngine::from_state(&state);
    let next = match engine.commit(&candidate, &files).await {
        Ok(receipt) => {
            tracing::info!(
                session_id = %session_id,
                project_id = receipt.project_id,
                documents = receipt.document_count,
                "Project created from wizard"
            );
            machine::committed()
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Wizard commit failed");
            machine::commit_failed(candidate)
        }
    };
    let store = WizardStateStore::new(state.session_store.as_ref(), &session_id);
    apply(&store, &session_id, &next.store).await?;
    Ok(next.outcome)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply the transition's store action, then render its outcome.
async fn respond(
    store: &WizardStateStore<'_>,
    session_id: &str,
    transition: Transition,
) -> AppResult<Response> {
    apply(store, session_id, &transition.store).await?;
    render(transition.outcome)
}

async fn apply(store: &WizardStateStore<'_>, session_id: &str, action: &StoreAction) -> AppResult<()> {
    match action {
        StoreAction::Keep => {}
        StoreAction::Save(state) => {
            store.save(state).await?;
            tracing::debug!(
                session_id = %session_id,
                current_step = state.current_step,
                "Wizard state saved"
            );
        }
        StoreAction::Clear => {
            store.clear().await?;
            tracing::debug!(session_id = %session_id, "Wizard state cleared");
        }
    }
    Ok(())
}

fn with_session_cookie(mut response: Response, session_id: &str, state: &AppState) -> Response {
    if let Some(cookie) = session_cookie(session_id, state.config.session_idle_timeout) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Without a session there is nothing to persist; only redirects are possible.
fn respond_without_session(transition: Transition) -> AppResult<Response> {
    render(transition.outcome)
}

fn render(outcome: WizardOutcome) -> AppResult<Response> {
    match outcome {
        WizardOutcome::Redirect(target) => Ok(see_other(target)),
        WizardOutcome::Render {
            step,
            state,
            errors,
            message,
        } => {
            let status = if message.is_some() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else if !errors.is_empty() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::OK
            };
            let view = StepView::new(step, state, errors, message);
            Ok((status, Json(DataResponse { data: view })).into_response())
        }
        WizardOutcome::Commit(_) => Err(AppError::InternalError(
            "Commit outcome reached the renderer".into(),
        )),
    }
}

/// Decode the JSON body of steps 1-4 into that step's input.
fn parse_step_input(step: WizardStep, mut body: serde_json::Value) -> AppResult<StepInput> {
    if let Some(object) = body.as_object_mut() {
        object.remove(ACTION_FIELD);
    }
    Ok(match step {
        WizardStep::Basic => StepInput::Basic(decode(body)?),
        WizardStep::Companies => StepInput::Companies(decode(body)?),
        WizardStep::Head => StepInput::Head(decode(body)?),
        WizardStep::Team => StepInput::Team(decode(body)?),
        WizardStep::Documents => StepInput::Documents,
    })
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid step fields: {e}")))
}

/// Read the documents form: the `action` field plus every file part.
async fn read_documents_form(
    mut multipart: Multipart,
) -> AppResult<(WizardAction, Vec<UploadedFile>)> {
    let mut action = WizardAction::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                files.push(UploadedFile::new(file_name, data.to_vec()));
            }
            None if name == ACTION_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                action = WizardAction::parse(Some(&value));
            }
            None => {
                tracing::debug!(field = %name, "Ignoring unknown documents form field");
            }
        }
    }
    Ok((action, files))
}
