use crate::{
    AppState,
    auth::{self, AdminUser},
    error::ApiError,
    models::{
        CreatedResponse, HeroDetail, HeroFile, HeroPayload, HeroSummary, LoginRequest,
        LoginResponse, MessageResponse, Monument, MonumentDetail, MonumentPayload,
        RegisterFileRequest, SubmissionRequest, UploadRequest, UploadResponse, VerifyResponse,
    },
    storage,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;

// --- Filter Structs ---

/// HeroFilter
///
/// Accepted query parameters for the public hero listing (GET /heroes).
/// Bound safely by Axum's Query extractor; the repository binds each value as a
/// SQL parameter.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct HeroFilter {
    /// Case-insensitive substring match over name, unit, and hometown.
    pub search: Option<String>,
    /// Exact rank filter.
    pub rank: Option<String>,
    /// Exact district filter.
    pub district: Option<String>,
}

/// FileFilter
///
/// Optional hero scope for the file registry listing (GET /files).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct FileFilter {
    pub hero_id: Option<i32>,
}

/// Treats whitespace-only optional filters as absent so they do not turn into
/// match-nothing SQL conditions.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// --- Hero Handlers ---

/// list_heroes
///
/// [Public Route] Lists hero summaries ordered by name, with optional search and
/// rank/district filters. Award names are aggregated per hero.
#[utoipa::path(
    get,
    path = "/heroes",
    params(HeroFilter),
    responses((status = 200, description = "List filtered heroes", body = [HeroSummary]))
)]
pub async fn list_heroes(
    State(state): State<AppState>,
    Query(filter): Query<HeroFilter>,
) -> Result<Json<Vec<HeroSummary>>, ApiError> {
    let heroes = state
        .repo
        .list_heroes(
            non_blank(filter.search),
            non_blank(filter.rank),
            non_blank(filter.district),
        )
        .await?;
    Ok(Json(heroes))
}

/// get_hero
///
/// [Public Route] Retrieves the full hero record with nested awards, military
/// path, documents, and photos.
#[utoipa::path(
    get,
    path = "/heroes/{id}",
    params(("id" = i32, Path, description = "Hero ID")),
    responses(
        (status = 200, description = "Found", body = HeroDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_hero(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HeroDetail>, ApiError> {
    match state.repo.get_hero(id).await? {
        Some(hero) => Ok(Json(hero)),
        None => Err(ApiError::NotFound("Hero not found".to_string())),
    }
}

/// create_hero
///
/// [Admin Route] Creates a hero. `name` is required; the district default is
/// applied when `region` is absent. The id is store-assigned.
#[utoipa::path(
    post,
    path = "/heroes",
    request_body = HeroPayload,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_hero(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<HeroPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Hero name is required".to_string()));
    }

    let id = state.repo.create_hero(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Hero created".to_string(),
        }),
    ))
}

/// update_hero
///
/// [Admin Route] Full replace of a hero's mutable fields; bumps the updated
/// timestamp. 404 when the id does not exist.
#[utoipa::path(
    put,
    path = "/heroes/{id}",
    params(("id" = i32, Path, description = "Hero ID")),
    request_body = HeroPayload,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_hero(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<HeroPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Hero name is required".to_string()));
    }

    if state.repo.update_hero(id, payload).await? {
        Ok(Json(MessageResponse {
            message: "Hero updated".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Hero not found".to_string()))
    }
}

/// delete_hero
///
/// [Admin Route] Deletes a hero; the schema cascades the deletion to every child
/// row. The response code tells the caller whether a row was actually removed.
#[utoipa::path(
    delete,
    path = "/heroes/{id}",
    params(("id" = i32, Path, description = "Hero ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_hero(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.repo.delete_hero(id).await? {
        Ok(Json(MessageResponse {
            message: "Hero deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Hero not found".to_string()))
    }
}

// --- Monument Handlers ---

/// list_monuments
///
/// [Public Route] Lists all monuments ordered by id.
#[utoipa::path(
    get,
    path = "/monuments",
    responses((status = 200, description = "All monuments", body = [Monument]))
)]
pub async fn list_monuments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Monument>>, ApiError> {
    Ok(Json(state.repo.list_monuments().await?))
}

/// get_monument
///
/// [Public Route] Retrieves one monument with its photo gallery, newest
/// uploads first.
#[utoipa::path(
    get,
    path = "/monuments/{id}",
    params(("id" = i32, Path, description = "Monument ID")),
    responses(
        (status = 200, description = "Found", body = MonumentDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_monument(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MonumentDetail>, ApiError> {
    match state.repo.get_monument(id).await? {
        Some(monument) => Ok(Json(monument)),
        None => Err(ApiError::NotFound("Monument not found".to_string())),
    }
}

/// create_monument
#[utoipa::path(
    post,
    path = "/monuments",
    request_body = MonumentPayload,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_monument(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<MonumentPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Monument name is required".to_string(),
        ));
    }

    let id = state.repo.create_monument(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Monument created".to_string(),
        }),
    ))
}

/// update_monument
#[utoipa::path(
    put,
    path = "/monuments/{id}",
    params(("id" = i32, Path, description = "Monument ID")),
    request_body = MonumentPayload,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_monument(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MonumentPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Monument name is required".to_string(),
        ));
    }

    if state.repo.update_monument(id, payload).await? {
        Ok(Json(MessageResponse {
            message: "Monument updated".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Monument not found".to_string()))
    }
}

/// delete_monument
///
/// [Admin Route] Removes the monument and its photos in one transaction.
#[utoipa::path(
    delete,
    path = "/monuments/{id}",
    params(("id" = i32, Path, description = "Monument ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_monument(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.repo.delete_monument(id).await? {
        Ok(Json(MessageResponse {
            message: "Monument deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Monument not found".to_string()))
    }
}

// --- Submission Intake ---

/// submit_materials
///
/// [Public Route] Accepts a visitor's offer of hero materials. Requires
/// `heroName` and `email` non-empty after trimming; the record enters the
/// moderation queue with status `pending`.
#[utoipa::path(
    post,
    path = "/submissions",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Accepted", body = CreatedResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn submit_materials(
    State(state): State<AppState>,
    Json(payload): Json<SubmissionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let hero_name = payload.hero_name.trim().to_string();
    let email = payload.email.trim().to_string();

    if hero_name.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(
            "Hero name and email are required".to_string(),
        ));
    }

    let submission = SubmissionRequest {
        hero_name,
        email,
        relationship: non_blank(payload.relationship),
        document_type: non_blank(payload.document_type),
        description: non_blank(payload.description),
        year: non_blank(payload.year),
    };

    let id = state.repo.create_submission(submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Материалы успешно отправлены на модерацию".to_string(),
        }),
    ))
}

// --- Auth Gate ---

/// login
///
/// [Public Route] Checks the presented credentials against the configured admin
/// account and issues an expiring session token. The failure response does not
/// reveal whether the login or the password was wrong.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !auth::check_credentials(&state.config, &payload.login, &payload.password) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::issue_token(&state.config, &payload.login)?;
    Ok(Json(LoginResponse {
        token,
        login: payload.login,
    }))
}

/// verify_token
///
/// [Public Route] Validates the credential in the X-Auth-Token header. The
/// extractor rejects with a distinguishing 401 message when the token is
/// missing, expired, or invalid.
#[utoipa::path(
    get,
    path = "/auth/verify",
    responses(
        (status = 200, description = "Valid", body = VerifyResponse),
        (status = 401, description = "Missing, expired, or invalid token")
    )
)]
pub async fn verify_token(admin: AdminUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { login: admin.login })
}

// --- File Registry & Upload ---

/// list_files
///
/// [Public Route] Lists file registry records, newest uploads first, optionally
/// scoped to one hero.
#[utoipa::path(
    get,
    path = "/files",
    params(FileFilter),
    responses((status = 200, description = "Files", body = [HeroFile]))
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(filter): Query<FileFilter>,
) -> Result<Json<Vec<HeroFile>>, ApiError> {
    Ok(Json(state.repo.list_files(filter.hero_id).await?))
}

/// upload_file
///
/// [Admin Route] Decodes the base64 payload and stores the blob in object
/// storage under a generated key (date prefix, random suffix, original
/// extension preserved). Returns the public URL for a subsequent
/// `POST /files` registration.
#[utoipa::path(
    post,
    path = "/upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Uploaded", body = UploadResponse),
        (status = 400, description = "Missing or invalid file data")
    )
)]
pub async fn upload_file(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    if payload.file.is_empty() {
        return Err(ApiError::Validation("File data is required".to_string()));
    }

    let bytes = BASE64
        .decode(payload.file.as_bytes())
        .map_err(|_| ApiError::Validation("File data is not valid base64".to_string()))?;

    let folder = non_blank(payload.folder).unwrap_or_else(|| "general".to_string());
    let content_type = payload
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let key = storage::object_key(&folder, &payload.filename);

    let url = state
        .storage
        .put_object(&key, bytes, &content_type)
        .await
        .map_err(ApiError::Storage)?;

    Ok(Json(UploadResponse {
        url,
        filename: key,
        message: "File uploaded successfully".to_string(),
    }))
}

/// register_file
///
/// [Admin Route] Persists metadata for a blob that was already uploaded. The
/// blob itself is opaque to this API; only the URL is stored. The record must
/// reference an existing hero.
#[utoipa::path(
    post,
    path = "/files",
    request_body = RegisterFileRequest,
    responses(
        (status = 201, description = "Registered", body = HeroFile),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Referenced hero not found")
    )
)]
pub async fn register_file(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterFileRequest>,
) -> Result<(StatusCode, Json<HeroFile>), ApiError> {
    if payload.file_name.trim().is_empty() || payload.file_url.trim().is_empty() {
        return Err(ApiError::Validation(
            "File name and URL are required".to_string(),
        ));
    }

    let file = state
        .repo
        .register_file(payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hero not found".to_string()))?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// delete_file
///
/// [Admin Route] Removes a file registry record. The blob in object storage is
/// left untouched (registry metadata only).
#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_file(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.repo.delete_file(id).await? {
        Ok(Json(MessageResponse {
            message: "File deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("File not found".to_string()))
    }
}
