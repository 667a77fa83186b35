pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> anyhow::Result<Router> {
    let app_state = state::AppState::new(root)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Store summary
        .route("/api/state", get(routes::state::get_state))
        // Identity & sessions
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/me", get(routes::auth::me))
        // Kanban board
        .route("/api/board", get(routes::board::get_board))
        .route("/api/board/tasks", post(routes::board::add_task))
        .route("/api/board/tasks/{id}", put(routes::board::edit_task))
        .route("/api/board/tasks/{id}", delete(routes::board::delete_task))
        .route("/api/board/move", post(routes::board::move_task))
        .route("/api/board/prioritize", post(routes::board::prioritize))
        // Teams
        .route("/api/teams", get(routes::teams::list_teams))
        .route("/api/teams", post(routes::teams::create_team))
        .route("/api/teams/{id}", put(routes::teams::update_team))
        .route("/api/teams/{id}", delete(routes::teams::delete_team))
        .route("/api/teams/{id}/members", post(routes::teams::add_member))
        // User administration
        .route("/api/users", get(routes::users::list_users))
        .route("/api/users/{id}/role", put(routes::users::set_role))
        .route("/api/users/{id}", delete(routes::users::delete_user))
        // Chat
        .route("/api/chat/channels", get(routes::chat::list_channels))
        .route(
            "/api/chat/messages/{channel}",
            get(routes::chat::list_messages),
        )
        .route(
            "/api/chat/messages/{channel}",
            post(routes::chat::post_message),
        )
        // Learning
        .route(
            "/api/learning/certifications",
            get(routes::learning::list_certifications),
        )
        .route(
            "/api/learning/certifications",
            post(routes::learning::add_certification),
        )
        .route(
            "/api/learning/certifications/{id}",
            put(routes::learning::update_certification),
        )
        .route(
            "/api/learning/certifications/{id}",
            delete(routes::learning::delete_certification),
        )
        .route("/api/learning/path", post(routes::learning::generate_path))
        .route("/api/learning/path", get(routes::learning::get_path))
        // Personal tasks & performance
        .route("/api/my-tasks", get(routes::my_tasks::my_view))
        .route("/api/my-tasks", post(routes::my_tasks::add_task))
        .route(
            "/api/my-tasks/efficiency",
            put(routes::my_tasks::set_efficiency),
        )
        .route("/api/my-tasks/{id}", get(routes::my_tasks::user_view))
        .route("/api/my-tasks/{id}", put(routes::my_tasks::edit_task))
        .route("/api/my-tasks/{id}", delete(routes::my_tasks::delete_task))
        // Generation flows without board state
        .route("/api/reports/generate", post(routes::reports::generate))
        .route("/api/toolkit/generate", post(routes::toolkit::generate))
        .layer(cors)
        .with_state(app_state);

    Ok(router)
}

/// Start the API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(root)?;

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("cyberstack API listening on http://localhost:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the API server on a pre-bound listener, so the caller can read
/// the actual port first (useful when `port = 0` and the OS picks one).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root)?;

    tracing::info!("cyberstack API listening on http://localhost:{actual_port}");
    axum::serve(listener, app).await?;
    Ok(())
}
