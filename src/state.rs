use axum::extract::FromRef;

use crate::auth::TokenService;
use crate::events::EventService;
use crate::store::Store;

/// Shared application state: the store handle, the identity service and
/// the event service built on top of them. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub events: EventService,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenService) -> Self {
        let events = EventService::new(store.clone());
        Self {
            store,
            tokens,
            events,
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
