use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, post, put},
};

/// Admin Router Module
///
/// Defines every store-mutating route. The whole router is wrapped in the
/// credential middleware (see `create_router`), and each handler additionally
/// takes the `AdminUser` extractor, so a request without a valid X-Auth-Token
/// is rejected with 401 before any persistence happens.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /heroes, PUT/DELETE /heroes/{id}
        // Hero CRUD. Delete cascades to awards, military path, documents,
        // photos, and registered files.
        .route("/heroes", post(handlers::create_hero))
        .route(
            "/heroes/{id}",
            put(handlers::update_hero).delete(handlers::delete_hero),
        )
        // POST /monuments, PUT/DELETE /monuments/{id}
        // Monument CRUD. Delete removes the photo gallery and the monument
        // atomically in one transaction.
        .route("/monuments", post(handlers::create_monument))
        .route(
            "/monuments/{id}",
            put(handlers::update_monument).delete(handlers::delete_monument),
        )
        // POST /upload
        // Blob upload: base64 bytes go to object storage under a generated key;
        // the response URL is what gets registered in the file registry.
        .route("/upload", post(handlers::upload_file))
        // POST /files, DELETE /files/{id}
        // File registry mutations (metadata only; blob bytes are opaque).
        .route("/files", post(handlers::register_file))
        .route("/files/{id}", delete(handlers::delete_file))
}
