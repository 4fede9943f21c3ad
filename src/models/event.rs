use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeRole {
    Organizer,
    Attendee,
}

impl AttendeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeRole::Organizer => "organizer",
            AttendeeRole::Attendee => "attendee",
        }
    }

    /// Parse a role filter value. Only the two real roles are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "organizer" => Some(AttendeeRole::Organizer),
            "attendee" => Some(AttendeeRole::Attendee),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Pending,
    Going,
    Maybe,
    NotGoing,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Going => "going",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::NotGoing => "not_going",
        }
    }

    /// Parse an invitation response. "pending" is the initial invited
    /// state, never a valid response, so it is rejected here.
    pub fn parse_response(raw: &str) -> Option<Self> {
        match raw {
            "going" => Some(RsvpStatus::Going),
            "maybe" => Some(RsvpStatus::Maybe),
            "not_going" => Some(RsvpStatus::NotGoing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub role: AttendeeRole,
    pub status: RsvpStatus,
}

/// The persisted event body. The id lives outside the body: the store
/// assigns it at insert and hands it back on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer_email: String,
    pub attendees: Vec<Attendee>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating an event. The organizer, the
/// initial attendee list and the timestamps are derived server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
}

/// A tri-state patch: every field is present-or-absent, and an absent
/// field leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
    }
}

/// An event as returned to a caller: the stored record plus the viewer's
/// own role/status, so no response ever carries another user's view.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer_email: String,
    pub attendees: Vec<Attendee>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_role: Option<AttendeeRole>,
    pub user_status: Option<RsvpStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsvp_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(RsvpStatus::NotGoing).unwrap(),
            serde_json::json!("not_going")
        );
    }

    #[test]
    fn test_parse_response_rejects_pending_and_garbage() {
        assert_eq!(RsvpStatus::parse_response("going"), Some(RsvpStatus::Going));
        assert_eq!(RsvpStatus::parse_response("maybe"), Some(RsvpStatus::Maybe));
        assert_eq!(
            RsvpStatus::parse_response("not_going"),
            Some(RsvpStatus::NotGoing)
        );
        assert_eq!(RsvpStatus::parse_response("pending"), None);
        assert_eq!(RsvpStatus::parse_response("GOING"), None);
        assert_eq!(RsvpStatus::parse_response("attending"), None);
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(EventPatch::default().is_empty());
        let patch = EventPatch {
            location: Some("Room 4".to_string()),
            ..EventPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
