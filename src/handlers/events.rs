use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::events::query;
use crate::events::EventQuery;
use crate::models::{AttendeeRole, EventDraft, EventPatch};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, success};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub emails: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: String,
}

fn validate_draft(draft: &EventDraft) -> Result<(), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }
    if draft.location.trim().is_empty() {
        return Err(AppError::Validation("Location must not be empty".to_string()));
    }
    if draft.date.trim().is_empty() || draft.time.trim().is_empty() {
        return Err(AppError::Validation("Date and time are required".to_string()));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(draft): Json<EventDraft>,
) -> Result<Response, AppError> {
    validate_draft(&draft)?;
    let view = state.events.create(draft, &requester).await?;
    Ok(created(view, "Event created").into_response())
}

pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let role = match params.role.as_deref() {
        None => None,
        Some(raw) => Some(AttendeeRole::parse(raw).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid role filter '{raw}': expected organizer or attendee"
            ))
        })?),
    };

    let event_query = EventQuery {
        search: params.search,
        date_from: params.date_from,
        date_to: params.date_to,
        role,
    };
    let views = query::list(&state.store, &requester, &event_query).await?;
    Ok(success(views, "Events retrieved").into_response())
}

pub async fn my_events(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Response, AppError> {
    let views = query::mine(&state.store, &requester).await?;
    Ok(success(views, "Events retrieved").into_response())
}

pub async fn invitations(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Response, AppError> {
    let views = query::invitations(&state.store, &requester).await?;
    Ok(success(views, "Invitations retrieved").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let view = state.events.get(&event_id, &requester).await?;
    Ok(success(view, "Event retrieved").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(event_id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, AppError> {
    let view = state.events.update(&event_id, patch, &requester).await?;
    Ok(success(view, "Event updated").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    state.events.delete(&event_id, &requester).await?;
    Ok(no_content().into_response())
}

pub async fn invite_to_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(event_id): Path<String>,
    Json(request): Json<InviteRequest>,
) -> Result<Response, AppError> {
    if request.emails.is_empty() {
        return Err(AppError::Validation(
            "At least one email is required".to_string(),
        ));
    }
    let view = state
        .events
        .invite(&event_id, &request.emails, &requester)
        .await?;
    Ok(success(view, "Invitations sent").into_response())
}

pub async fn respond_to_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(event_id): Path<String>,
    Json(request): Json<RespondRequest>,
) -> Result<Response, AppError> {
    let view = state
        .events
        .respond(&event_id, &request.status, &requester)
        .await?;
    Ok(success(view, "Response recorded").into_response())
}
