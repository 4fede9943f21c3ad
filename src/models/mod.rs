pub mod event;
pub mod user;

pub use event::{Attendee, AttendeeRole, Event, EventDraft, EventPatch, EventView, RsvpStatus};
pub use user::User;
