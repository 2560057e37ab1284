use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// District applied to a hero when the payload does not provide one. The memorial
/// site is scoped to a single district, so the default covers almost every record.
pub const DEFAULT_DISTRICT: &str = "Неклиновский район";

// --- Core Application Schemas (Mapped to Database) ---

/// HeroSummary
///
/// One row of the public hero listing (`GET /heroes`). Produced by a single
/// aggregate query that joins `awards` and collapses the award names into an
/// alphabetically ordered array.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HeroSummary {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub rank: Option<String>,
    pub unit: Option<String>,
    pub hometown: Option<String>,
    pub region: Option<String>,
    /// Distinct award names, aggregated in SQL (`ARRAY_AGG ... FILTER`).
    pub awards: Vec<String>,
}

/// HeroDetail
///
/// The full hero record (`GET /heroes/{id}`) with all nested child collections.
/// The scalar columns come from one `heroes` row; the `#[sqlx(skip)]` collections
/// are filled by follow-up queries in the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HeroDetail {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
    pub birth_place: Option<String>,
    pub death_year: Option<i32>,
    pub death_place: Option<String>,
    pub rank: Option<String>,
    pub unit: Option<String>,
    pub hometown: Option<String>,
    pub region: Option<String>,
    pub biography: Option<String>,
    pub photo: Option<String>,
    /// Award names ordered by award date.
    #[sqlx(skip)]
    pub awards: Vec<String>,
    /// Service timeline, ordered by the explicit sort key with insertion order
    /// as a stable tie-break.
    #[sqlx(skip)]
    pub military_path: Vec<MilitaryPathEvent>,
    #[sqlx(skip)]
    pub documents: Vec<DocumentRecord>,
    /// Hero photos are displayed chronologically (by year), unlike monument
    /// photos which are newest-upload-first.
    #[sqlx(skip)]
    pub photos: Vec<HeroPhoto>,
}

/// MilitaryPathEvent
///
/// One entry of a hero's service timeline. Dates are free-form text
/// ("Июнь 1941"), so they are stored and returned verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MilitaryPathEvent {
    pub date: Option<String>,
    pub event: String,
}

/// DocumentRecord
///
/// An archival document attached to a hero.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentRecord {
    /// `type` is a reserved keyword in Rust, so the field is renamed for Rust use
    /// while the JSON key stays `type` for frontend compatibility.
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// HeroPhoto
///
/// A photo belonging to a hero, ordered by year for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HeroPhoto {
    pub url: String,
    pub description: Option<String>,
    pub year: Option<i32>,
}

/// Monument
///
/// One monument row as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Monument {
    pub id: i32,
    pub name: String,

    /// Maps SQL column "type" to Rust field "monument_type" (reserved keyword),
    /// serialized back as `type` on the wire.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub monument_type: Option<String>,

    pub description: Option<String>,
    pub location: Option<String>,
    pub settlement: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<String>,
    pub establishment_year: Option<i32>,
    pub architect: Option<String>,
    pub image_url: Option<String>,
    pub history: Option<String>,
}

/// MonumentDetail
///
/// Monument plus its photo gallery (`GET /monuments/{id}`). Photos are ordered
/// most-recent-upload-first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonumentDetail {
    pub id: i32,
    pub name: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub monument_type: Option<String>,

    pub description: Option<String>,
    pub location: Option<String>,
    pub settlement: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<String>,
    pub establishment_year: Option<i32>,
    pub architect: Option<String>,
    pub image_url: Option<String>,
    pub history: Option<String>,

    #[sqlx(skip)]
    pub photos: Vec<MonumentPhoto>,
}

/// MonumentPhoto
///
/// A photo belonging to a monument.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonumentPhoto {
    pub id: i32,
    pub title: Option<String>,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    pub photo_year: Option<i32>,
}

/// HeroFile
///
/// Metadata record linking a hero to an uploaded blob. The bytes themselves live
/// in object storage; only the public URL is kept here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HeroFile {
    pub id: i32,
    pub hero_id: i32,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_url: String,
    #[ts(type = "string")]
    pub uploaded_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// HeroPayload
///
/// Input payload for creating or fully replacing a hero. `name` is the only
/// required field; the district default is applied by the repository when
/// `region` is absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HeroPayload {
    pub name: String,
    pub birth_year: Option<i32>,
    pub birth_place: Option<String>,
    pub death_year: Option<i32>,
    pub death_place: Option<String>,
    pub rank: Option<String>,
    pub unit: Option<String>,
    pub hometown: Option<String>,
    pub region: Option<String>,
    pub biography: Option<String>,
    pub photo: Option<String>,
}

/// MonumentPayload
///
/// Input payload for creating or fully replacing a monument.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonumentPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub monument_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub settlement: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<String>,
    pub establishment_year: Option<i32>,
    pub architect: Option<String>,
    pub image_url: Option<String>,
    pub history: Option<String>,
}

/// SubmissionRequest
///
/// A public visitor's offer of hero materials. Only `heroName` and `email` are
/// required (checked after trimming); everything else is free-form context for
/// the moderators.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubmissionRequest {
    pub hero_name: String,
    pub relationship: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub year: Option<String>,
    pub email: String,
}

/// LoginRequest
///
/// Admin credentials presented to the Auth Gate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// UploadRequest
///
/// Input payload for the blob upload endpoint: base64-encoded bytes plus the
/// metadata needed to build the object key and set the stored content type.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadRequest {
    /// Base64-encoded file bytes.
    pub file: String,
    #[schema(example = "portrait.jpg")]
    pub filename: String,
    #[schema(example = "image/jpeg")]
    pub content_type: Option<String>,
    /// Logical folder prefix inside the bucket ("heroes", "monuments", ...).
    pub folder: Option<String>,
}

/// RegisterFileRequest
///
/// Registers metadata for a blob that was already uploaded via `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterFileRequest {
    pub hero_id: i32,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_url: String,
}

// --- Response Envelopes (Output Schemas) ---

/// CreatedResponse
///
/// Uniform `201` body for every create operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatedResponse {
    pub id: i32,
    pub message: String,
}

/// MessageResponse
///
/// Uniform body for update and delete confirmations.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// LoginResponse
///
/// Successful Auth Gate login: the opaque session token plus the login it was
/// issued for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub login: String,
}

/// VerifyResponse
///
/// Successful credential verification.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct VerifyResponse {
    pub login: String,
}

/// UploadResponse
///
/// Result of a blob upload: the publicly reachable URL and the generated object
/// key inside the bucket.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub message: String,
}
