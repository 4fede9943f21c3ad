use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use eventplanner_server::auth::TokenService;
use eventplanner_server::config::Config;
use eventplanner_server::routes::create_routes;
use eventplanner_server::state::AppState;
use eventplanner_server::store::Store;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let store = Store::open();
    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl_hours);
    let state = AppState::new(store, tokens);

    let app = create_routes(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
