use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// These routes handle the read-only memorial content, the public submission
/// intake, and the Auth Gate's login/verify pair.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // GET /heroes?search=...&rank=...&district=...
        // Hero summaries ordered by name, with aggregated award names.
        // All filter values are bound as SQL parameters in the repository.
        .route("/heroes", get(handlers::list_heroes))
        // GET /heroes/{id}
        // Full hero record with nested awards, military path, documents, and photos.
        .route("/heroes/{id}", get(handlers::get_hero))
        // GET /monuments and GET /monuments/{id}
        // Monument listing and detail (detail includes the photo gallery,
        // most recent upload first).
        .route("/monuments", get(handlers::list_monuments))
        .route("/monuments/{id}", get(handlers::get_monument))
        // POST /submissions
        // Public intake of hero materials; records enter the moderation queue
        // with status 'pending'.
        .route("/submissions", post(handlers::submit_materials))
        // POST /auth/login and GET /auth/verify
        // The Auth Gate: credential check + token issuance, and token verification
        // via the X-Auth-Token header.
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify", get(handlers::verify_token))
        // GET /files?hero_id=...
        // File registry listing, optionally scoped to one hero. Read-only, so public.
        .route("/files", get(handlers::list_files))
}
