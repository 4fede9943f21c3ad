use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::events::access;
use crate::models::{Attendee, AttendeeRole, Event, EventDraft, EventPatch, EventView, RsvpStatus};
use crate::store::{Filter, Store, StoreError, Update};
use crate::utils::error::AppError;

/// Owns event create/update/delete and the invite/respond transitions of
/// the attendee list. Holds the store handle it was constructed with.
#[derive(Clone)]
pub struct EventService {
    store: Store,
}

impl EventService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an event with the requester auto-added as organizer/going.
    pub async fn create(&self, draft: EventDraft, requester: &str) -> Result<EventView, AppError> {
        let now = Utc::now();
        let event = Event {
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            organizer_email: requester.to_string(),
            attendees: vec![Attendee {
                email: requester.to_string(),
                role: AttendeeRole::Organizer,
                status: RsvpStatus::Going,
            }],
            created_at: now,
            updated_at: now,
        };

        let body = encode(&event)?;
        let id = self.store.events.insert_one(body).await?;
        info!(event_id = %id, organizer = %requester, "Event created");

        Ok(access::view_for(id, event, requester))
    }

    pub async fn get(&self, raw_id: &str, requester: &str) -> Result<EventView, AppError> {
        let id = parse_event_id(raw_id)?;
        let event = self.fetch(id).await?;
        Ok(access::view_for(id, event, requester))
    }

    /// Apply a tri-state patch. An all-absent patch is a no-op that does
    /// not touch `updated_at`; any present field refreshes it in the same
    /// atomic update.
    pub async fn update(
        &self,
        raw_id: &str,
        patch: EventPatch,
        requester: &str,
    ) -> Result<EventView, AppError> {
        let id = parse_event_id(raw_id)?;
        let event = self.fetch(id).await?;
        access::authorize_update(&event, requester)?;

        if patch.is_empty() {
            return Ok(access::view_for(id, event, requester));
        }

        let mut update = Update::new();
        if let Some(title) = patch.title {
            update = update.set("title", title);
        }
        if let Some(description) = patch.description {
            update = update.set("description", description);
        }
        if let Some(date) = patch.date {
            update = update.set("date", date);
        }
        if let Some(time) = patch.time {
            update = update.set("time", time);
        }
        if let Some(location) = patch.location {
            update = update.set("location", location);
        }
        update = update.set("updated_at", encode(&Utc::now())?);

        self.store
            .events
            .update_one(&Filter::new().id(id), &update)
            .await?;
        info!(event_id = %id, "Event updated");

        let event = self.fetch(id).await?;
        Ok(access::view_for(id, event, requester))
    }

    /// Hard removal, organizer only. No child records reference events,
    /// so there is nothing to cascade.
    pub async fn delete(&self, raw_id: &str, requester: &str) -> Result<(), AppError> {
        let id = parse_event_id(raw_id)?;
        let event = self.fetch(id).await?;
        access::authorize_delete(&event, requester)?;

        self.store.events.delete_one(&Filter::new().id(id)).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Append invitations, organizer only, additive-only. Candidates
    /// already present (or naming the organizer) are skipped, and
    /// duplicates within one call collapse to a single entry.
    pub async fn invite(
        &self,
        raw_id: &str,
        emails: &[String],
        requester: &str,
    ) -> Result<EventView, AppError> {
        let id = parse_event_id(raw_id)?;
        let event = self.fetch(id).await?;
        access::authorize_invite(&event, requester)?;

        // The membership skip runs on this snapshot; two concurrent calls
        // inviting the same email can both pass it. Accepted limitation:
        // the append itself is still a single atomic update.
        let mut seen: std::collections::HashSet<&str> =
            event.attendees.iter().map(|a| a.email.as_str()).collect();

        let mut added = Vec::new();
        for email in emails {
            if email == &event.organizer_email || !seen.insert(email.as_str()) {
                continue;
            }
            added.push(Attendee {
                email: email.clone(),
                role: AttendeeRole::Attendee,
                status: RsvpStatus::Pending,
            });
        }

        if added.is_empty() {
            return Ok(access::view_for(id, event, requester));
        }

        let values = added.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        let update = Update::new()
            .push_each("attendees", values)
            .set("updated_at", encode(&Utc::now())?);
        self.store
            .events
            .update_one(&Filter::new().id(id), &update)
            .await?;
        info!(event_id = %id, invited = added.len(), "Attendees invited");

        let event = self.fetch(id).await?;
        Ok(access::view_for(id, event, requester))
    }

    /// Record the requester's RSVP. The status edit and the timestamp
    /// refresh are one atomic update conditioned on both the event id and
    /// the attendee email.
    pub async fn respond(
        &self,
        raw_id: &str,
        raw_status: &str,
        requester: &str,
    ) -> Result<EventView, AppError> {
        let status = RsvpStatus::parse_response(raw_status).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid response status '{raw_status}': expected going, maybe or not_going"
            ))
        })?;

        let id = parse_event_id(raw_id)?;
        let event = self.fetch(id).await?;
        access::authorize_respond(&event, requester)?;

        let filter = Filter::new().id(id).eq("attendees.email", requester);
        let update = Update::new()
            .set_matched_element("attendees", "email", requester, "status", status.as_str())
            .set("updated_at", encode(&Utc::now())?);
        self.store.events.update_one(&filter, &update).await?;
        info!(event_id = %id, attendee = %requester, status = status.as_str(), "RSVP recorded");

        let event = self.fetch(id).await?;
        Ok(access::view_for(id, event, requester))
    }

    pub(crate) async fn fetch(&self, id: Uuid) -> Result<Event, AppError> {
        let doc = self
            .store
            .events
            .find_one(&Filter::new().id(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        decode(doc.body)
    }
}

/// Malformed ids are rejected before any store access.
fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Event not found".to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Store(StoreError::Codec(e)))
}

fn decode(body: Value) -> Result<Event, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Store(StoreError::Codec(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EventService {
        EventService::new(Store::open())
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: Some("quarterly sync".to_string()),
            date: "2025-06-01".to_string(),
            time: "10:00".to_string(),
            location: "HQ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_adds_organizer_as_going() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        assert_eq!(view.organizer_email, "a@example.com");
        assert_eq!(view.attendees.len(), 1);
        assert_eq!(view.attendees[0].email, "a@example.com");
        assert_eq!(view.attendees[0].role, AttendeeRole::Organizer);
        assert_eq!(view.attendees[0].status, RsvpStatus::Going);
        assert_eq!(view.user_role, Some(AttendeeRole::Organizer));
        assert_eq!(view.user_status, Some(RsvpStatus::Going));
        assert_eq!(view.created_at, view.updated_at);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids_are_not_found() {
        let service = service();
        let missing = service
            .get(&Uuid::new_v4().to_string(), "a@example.com")
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        let malformed = service.get("not-a-uuid", "a@example.com").await.unwrap_err();
        assert!(matches!(malformed, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_requires_organizer() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let patch = EventPatch {
            title: Some("Renamed".to_string()),
            ..EventPatch::default()
        };
        let err = service
            .update(&view.id.to_string(), patch, "b@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_updated_at_unchanged() {
        let service = service();
        let created = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let unchanged = service
            .update(&created.id.to_string(), EventPatch::default(), "a@example.com")
            .await
            .unwrap();
        assert_eq!(unchanged.updated_at, created.updated_at);
        assert_eq!(unchanged.title, "Kickoff");
    }

    #[tokio::test]
    async fn test_applied_patch_refreshes_updated_at() {
        let service = service();
        let created = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let patch = EventPatch {
            title: Some("Renamed".to_string()),
            location: Some("Offsite".to_string()),
            ..EventPatch::default()
        };
        let updated = service
            .update(&created.id.to_string(), patch, "a@example.com")
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.location, "Offsite");
        // Untouched fields survive.
        assert_eq!(updated.date, "2025-06-01");
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_by_non_organizer_is_forbidden_and_harmless() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();

        let err = service.delete(&id, "b@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Still retrievable by the organizer afterwards.
        let still_there = service.get(&id, "a@example.com").await.unwrap();
        assert_eq!(still_there.title, "Kickoff");
    }

    #[tokio::test]
    async fn test_delete_by_organizer_removes_the_event() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();

        service.delete(&id, "a@example.com").await.unwrap();
        let err = service.get(&id, "a@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invite_appends_pending_attendees_in_order() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let emails = vec!["b@example.com".to_string(), "c@example.com".to_string()];
        let updated = service
            .invite(&view.id.to_string(), &emails, "a@example.com")
            .await
            .unwrap();

        let listed: Vec<_> = updated.attendees.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(listed, vec!["a@example.com", "b@example.com", "c@example.com"]);
        assert!(updated
            .attendees
            .iter()
            .skip(1)
            .all(|a| a.role == AttendeeRole::Attendee && a.status == RsvpStatus::Pending));
        assert!(updated.updated_at > view.updated_at);
    }

    #[tokio::test]
    async fn test_invite_is_idempotent_within_and_across_calls() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();

        // Duplicates within one call collapse; the organizer is skipped.
        let emails = vec![
            "b@example.com".to_string(),
            "b@example.com".to_string(),
            "a@example.com".to_string(),
        ];
        let first = service.invite(&id, &emails, "a@example.com").await.unwrap();
        assert_eq!(first.attendees.len(), 2);

        // A second call naming the same email adds nothing and leaves the
        // timestamp alone.
        let again = service
            .invite(&id, &["b@example.com".to_string()], "a@example.com")
            .await
            .unwrap();
        assert_eq!(again.attendees.len(), 2);
        assert_eq!(again.updated_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_invite_leaves_organizer_entry_untouched() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let updated = service
            .invite(
                &view.id.to_string(),
                &["b@example.com".to_string()],
                "a@example.com",
            )
            .await
            .unwrap();

        let organizer = &updated.attendees[0];
        assert_eq!(organizer.email, "a@example.com");
        assert_eq!(organizer.role, AttendeeRole::Organizer);
        assert_eq!(organizer.status, RsvpStatus::Going);
    }

    #[tokio::test]
    async fn test_invite_requires_organizer() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();

        let err = service
            .invite(
                &view.id.to_string(),
                &["c@example.com".to_string()],
                "b@example.com",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_respond_updates_only_the_callers_entry() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();
        let emails = vec!["b@example.com".to_string(), "c@example.com".to_string()];
        service.invite(&id, &emails, "a@example.com").await.unwrap();

        let after_b = service.respond(&id, "going", "b@example.com").await.unwrap();
        assert_eq!(after_b.user_status, Some(RsvpStatus::Going));

        let after_c = service.respond(&id, "maybe", "c@example.com").await.unwrap();
        let statuses: Vec<_> = after_c.attendees.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![RsvpStatus::Going, RsvpStatus::Going, RsvpStatus::Maybe]
        );
    }

    #[tokio::test]
    async fn test_respond_transitions_are_unrestricted_and_repeatable() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();
        service
            .invite(&id, &["b@example.com".to_string()], "a@example.com")
            .await
            .unwrap();

        for status in ["going", "not_going", "maybe", "maybe"] {
            let after = service.respond(&id, status, "b@example.com").await.unwrap();
            assert_eq!(after.user_status, RsvpStatus::parse_response(status));
        }
    }

    #[tokio::test]
    async fn test_respond_with_bad_status_is_validation_and_mutates_nothing() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();
        service
            .invite(&id, &["b@example.com".to_string()], "a@example.com")
            .await
            .unwrap();
        let before = service.get(&id, "b@example.com").await.unwrap();

        for bad in ["pending", "attending", "GOING", ""] {
            let err = service.respond(&id, bad, "b@example.com").await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "status {bad:?}");
        }

        let after = service.get(&id, "b@example.com").await.unwrap();
        assert_eq!(after.user_status, before.user_status);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_respond_by_organizer_is_forbidden_for_any_status() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();

        for status in ["going", "maybe", "not_going"] {
            let err = service.respond(&id, status, "a@example.com").await.unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)), "status {status:?}");
        }
    }

    #[tokio::test]
    async fn test_respond_by_stranger_is_forbidden_and_event_unchanged() {
        let service = service();
        let view = service.create(draft("Kickoff"), "a@example.com").await.unwrap();
        let id = view.id.to_string();

        let err = service.respond(&id, "going", "z@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let after = service.get(&id, "a@example.com").await.unwrap();
        assert_eq!(after.attendees.len(), 1);
        assert_eq!(after.updated_at, view.updated_at);
    }

    #[tokio::test]
    async fn test_respond_on_missing_event_is_not_found() {
        let service = service();
        let err = service
            .respond(&Uuid::new_v4().to_string(), "going", "b@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
