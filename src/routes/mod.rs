use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{auth, events, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes())
        .nest("/events", event_routes())
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.enable_hsts))
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(events::create_event).get(events::list_events))
        .route("/my-events", get(events::my_events))
        .route("/invitations", get(events::invitations))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/:id/invite", post(events::invite_to_event))
        .route("/:id/respond", post(events::respond_to_event))
}
