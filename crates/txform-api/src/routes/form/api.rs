//! Form actions - HTMX endpoints and JSON preview

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use txform_core::{CalculationRequest, CoreError, FormSession, FormSubmission, SubmitOutcome};
use uuid::Uuid;

use super::page::{render_result, render_row};
use crate::error::{alert_response, ApiError, ApiResult};
use crate::AppState;

/// Append one transaction group to the form
pub async fn htmx_add_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let id = parse_session_id(&id)?;
    let row = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.touch(chrono::Utc::now());
        session.add_transaction_row()
    };
    log::debug!("Form {} added transaction {}", id, row);

    Ok(Html(render_row(row, &state.config.form.currency_label)))
}

/// Submit the form to the backend; summary fragment on success, alert otherwise
pub async fn htmx_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    fields: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> ApiResult<Response> {
    let Form(fields) = fields.map_err(|e| ApiError::BadRequest { message: e.body_text() })?;
    let session = snapshot_session(&state, &id).await?;
    let submission = FormSubmission::from_pairs(fields)?;

    let response = match state.controller.submit_form(&session, &submission).await {
        SubmitOutcome::Rendered(view) => Html(render_result(Some(&view))).into_response(),
        SubmitOutcome::Alert(message) => alert_response(&message),
    };
    Ok(response)
}

/// Request JSON the form would send, without contacting the backend.
/// Failures answer 400 with the error code, message and suggestions.
pub async fn api_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    fields: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    match preview_request(&state, &id, fields).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(e.to_details())).into_response(),
    }
}

async fn preview_request(
    state: &AppState,
    id: &str,
    fields: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> ApiResult<CalculationRequest> {
    let Form(fields) = fields.map_err(|e| ApiError::BadRequest { message: e.body_text() })?;
    let session = snapshot_session(state, id).await?;
    let submission = FormSubmission::from_pairs(fields)?;
    Ok(state.controller.prepare(&session, &submission)?)
}

/// Copy the session out of the store so the lock is not held across the backend call
async fn snapshot_session(state: &AppState, id: &str) -> ApiResult<FormSession> {
    let id = parse_session_id(id)?;
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id)?;
    session.touch(chrono::Utc::now());
    Ok(session.clone())
}

fn parse_session_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::from(CoreError::SessionNotFound { id: id.to_string() }))
}
