pub mod access;
pub mod lifecycle;
pub mod query;

pub use access::{resolve_viewer_context, ViewerContext};
pub use lifecycle::EventService;
pub use query::EventQuery;
