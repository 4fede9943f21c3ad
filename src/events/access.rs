use serde::Serialize;
use uuid::Uuid;

use crate::models::{AttendeeRole, Event, EventView, RsvpStatus};
use crate::utils::error::AppError;

/// The role/status pair computed for whoever is asking. Never stored:
/// derived fresh on every read so one caller's view cannot leak into
/// another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewerContext {
    pub role: Option<AttendeeRole>,
    pub status: Option<RsvpStatus>,
}

/// Resolve the requester's role and status for an event. The organizer
/// branch wins unconditionally and always reads as "going", regardless of
/// whatever the stored attendee entry says.
pub fn resolve_viewer_context(event: &Event, requester: &str) -> ViewerContext {
    if event.organizer_email == requester {
        return ViewerContext {
            role: Some(AttendeeRole::Organizer),
            status: Some(RsvpStatus::Going),
        };
    }

    // Attendee emails are unique per event, so the first match is the match.
    match event.attendees.iter().find(|a| a.email == requester) {
        Some(attendee) => ViewerContext {
            role: Some(attendee.role),
            status: Some(attendee.status),
        },
        None => ViewerContext {
            role: None,
            status: None,
        },
    }
}

pub fn can_update(event: &Event, requester: &str) -> bool {
    event.organizer_email == requester
}

pub fn can_delete(event: &Event, requester: &str) -> bool {
    event.organizer_email == requester
}

pub fn can_invite(event: &Event, requester: &str) -> bool {
    event.organizer_email == requester
}

pub fn can_respond(event: &Event, requester: &str) -> bool {
    event.organizer_email != requester && event.attendees.iter().any(|a| a.email == requester)
}

pub fn authorize_update(event: &Event, requester: &str) -> Result<(), AppError> {
    if can_update(event, requester) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the organizer can update this event".to_string(),
        ))
    }
}

pub fn authorize_delete(event: &Event, requester: &str) -> Result<(), AppError> {
    if can_delete(event, requester) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the organizer can delete this event".to_string(),
        ))
    }
}

pub fn authorize_invite(event: &Event, requester: &str) -> Result<(), AppError> {
    if can_invite(event, requester) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the organizer can invite users".to_string(),
        ))
    }
}

/// The organizer-immutability check runs first: it applies whenever the
/// requester is the organizer, independent of attendee-list membership.
pub fn authorize_respond(event: &Event, requester: &str) -> Result<(), AppError> {
    if event.organizer_email == requester {
        return Err(AppError::Forbidden(
            "Organizer status cannot be changed".to_string(),
        ));
    }
    if !event.attendees.iter().any(|a| a.email == requester) {
        return Err(AppError::Forbidden(
            "You are not invited to this event".to_string(),
        ));
    }
    Ok(())
}

/// Attach the requester's viewer context to an event record.
pub fn view_for(id: Uuid, event: Event, requester: &str) -> EventView {
    let context = resolve_viewer_context(&event, requester);
    EventView {
        id,
        title: event.title,
        description: event.description,
        date: event.date,
        time: event.time,
        location: event.location,
        organizer_email: event.organizer_email,
        attendees: event.attendees,
        created_at: event.created_at,
        updated_at: event.updated_at,
        user_role: context.role,
        user_status: context.status,
    }
}
