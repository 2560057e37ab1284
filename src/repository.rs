use crate::models::{
    DEFAULT_DISTRICT, DocumentRecord, HeroDetail, HeroFile, HeroPayload, HeroPhoto, HeroSummary,
    MilitaryPathEvent, Monument, MonumentDetail, MonumentPayload, MonumentPhoto,
    RegisterFileRequest, SubmissionRequest,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, in-memory
/// mock, etc.).
///
/// Every method returns `Result` so the handlers can map unexpected store faults
/// to a generic 500 instead of swallowing them. Row-level outcomes use
/// `Option`/`bool`: `None` means not found, `false` means no row was affected.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's async task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Heroes ---
    // Public listing with search and filters. All filter values are bound parameters.
    async fn list_heroes(
        &self,
        search: Option<String>,
        rank: Option<String>,
        district: Option<String>,
    ) -> Result<Vec<HeroSummary>, sqlx::Error>;
    // Full record with nested awards, military path, documents, and photos.
    async fn get_hero(&self, id: i32) -> Result<Option<HeroDetail>, sqlx::Error>;
    // Returns the store-assigned id. The district default is applied here.
    async fn create_hero(&self, req: HeroPayload) -> Result<i32, sqlx::Error>;
    // Full replace of mutable fields; bumps updated_at. False when the id is absent.
    async fn update_hero(&self, id: i32, req: HeroPayload) -> Result<bool, sqlx::Error>;
    // Cascades to all child rows via FK constraints. False when the id was absent.
    async fn delete_hero(&self, id: i32) -> Result<bool, sqlx::Error>;

    // --- Monuments ---
    async fn list_monuments(&self) -> Result<Vec<Monument>, sqlx::Error>;
    async fn get_monument(&self, id: i32) -> Result<Option<MonumentDetail>, sqlx::Error>;
    async fn create_monument(&self, req: MonumentPayload) -> Result<i32, sqlx::Error>;
    async fn update_monument(&self, id: i32, req: MonumentPayload) -> Result<bool, sqlx::Error>;
    // Removes photos and the monument atomically inside one transaction.
    async fn delete_monument(&self, id: i32) -> Result<bool, sqlx::Error>;

    // --- Submission Intake ---
    // Append-only: persists with status 'pending' and returns the new id.
    async fn create_submission(&self, req: SubmissionRequest) -> Result<i32, sqlx::Error>;

    // --- File Registry ---
    async fn list_files(&self, hero_id: Option<i32>) -> Result<Vec<HeroFile>, sqlx::Error>;
    // None when the referenced hero does not exist.
    async fn register_file(&self, req: RegisterFileRequest)
    -> Result<Option<HeroFile>, sqlx::Error>;
    async fn delete_file(&self, id: i32) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL
/// database through a shared connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clone of the underlying pool, for callers that need raw SQL access
    /// (database-backed tests seed and inspect child tables directly).
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_heroes
    ///
    /// Implements flexible search/filtering using QueryBuilder for safe
    /// parameterization: every user-supplied value goes through `push_bind`,
    /// never into the SQL text. Search matches name, unit, and hometown
    /// case-insensitively; award names are aggregated per hero in SQL.
    async fn list_heroes(
        &self,
        search: Option<String>,
        rank: Option<String>,
        district: Option<String>,
    ) -> Result<Vec<HeroSummary>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"
            SELECT
                h.id, h.full_name AS name, h.birth_year, h.death_year, h.rank,
                h.military_unit AS unit, h.hometown, h.district AS region,
                COALESCE(
                    ARRAY_AGG(DISTINCT a.award_name ORDER BY a.award_name)
                        FILTER (WHERE a.award_name IS NOT NULL),
                    '{}'
                ) AS awards
            FROM heroes h
            LEFT JOIN awards a ON h.id = a.hero_id
            WHERE 1=1
            "#,
        );

        if let Some(s) = search {
            // Case-insensitive substring search across name, unit, and hometown.
            let pattern = format!("%{}%", s);
            builder.push(" AND (h.full_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR h.military_unit ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR h.hometown ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(r) = rank {
            builder.push(" AND h.rank = ");
            builder.push_bind(r);
        }

        if let Some(d) = district {
            builder.push(" AND h.district = ");
            builder.push_bind(d);
        }

        builder.push(" GROUP BY h.id ORDER BY h.full_name");

        builder
            .build_query_as::<HeroSummary>()
            .fetch_all(&self.pool)
            .await
    }

    /// get_hero
    ///
    /// One query for the hero row, then one per child collection. Orderings match
    /// the display contract: awards by date, path by sort key then insertion
    /// order, documents by insertion order, photos by year.
    async fn get_hero(&self, id: i32) -> Result<Option<HeroDetail>, sqlx::Error> {
        let hero = sqlx::query_as::<_, HeroDetail>(
            r#"SELECT id, full_name AS name, birth_year, birth_place, death_year, death_place,
                      rank, military_unit AS unit, hometown, district AS region,
                      biography, photo_url AS photo
               FROM heroes
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut hero) = hero else {
            return Ok(None);
        };

        hero.awards = sqlx::query_scalar::<_, String>(
            "SELECT award_name FROM awards WHERE hero_id = $1 ORDER BY award_date",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        hero.military_path = sqlx::query_as::<_, MilitaryPathEvent>(
            r#"SELECT event_date AS date, event_description AS event
               FROM military_path
               WHERE hero_id = $1
               ORDER BY sort_order, id"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        hero.documents = sqlx::query_as::<_, DocumentRecord>(
            r#"SELECT document_type, document_description AS description, document_date AS date
               FROM documents
               WHERE hero_id = $1
               ORDER BY id"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        hero.photos = sqlx::query_as::<_, HeroPhoto>(
            r#"SELECT photo_url AS url, photo_description AS description, photo_year AS year
               FROM photos
               WHERE hero_id = $1
               ORDER BY photo_year"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(hero))
    }

    /// create_hero
    ///
    /// Inserts a new hero and returns the store-assigned serial id. Ids are never
    /// client-supplied.
    async fn create_hero(&self, req: HeroPayload) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO heroes
                   (full_name, birth_year, birth_place, death_year, death_place,
                    rank, military_unit, hometown, district, biography, photo_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING id"#,
        )
        .bind(req.name)
        .bind(req.birth_year)
        .bind(req.birth_place)
        .bind(req.death_year)
        .bind(req.death_place)
        .bind(req.rank)
        .bind(req.unit)
        .bind(req.hometown)
        .bind(req.region.unwrap_or_else(|| DEFAULT_DISTRICT.to_string()))
        .bind(req.biography)
        .bind(req.photo)
        .fetch_one(&self.pool)
        .await
    }

    /// update_hero
    ///
    /// Full replace of the mutable columns, bumping `updated_at`. Returns false
    /// when no row matched the id.
    async fn update_hero(&self, id: i32, req: HeroPayload) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE heroes
               SET full_name = $2, birth_year = $3, birth_place = $4, death_year = $5,
                   death_place = $6, rank = $7, military_unit = $8, hometown = $9,
                   district = $10, biography = $11, photo_url = $12, updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.birth_year)
        .bind(req.birth_place)
        .bind(req.death_year)
        .bind(req.death_place)
        .bind(req.rank)
        .bind(req.unit)
        .bind(req.hometown)
        .bind(req.region.unwrap_or_else(|| DEFAULT_DISTRICT.to_string()))
        .bind(req.biography)
        .bind(req.photo)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// delete_hero
    ///
    /// Child rows (awards, military_path, documents, photos, hero_files) are
    /// removed by the `ON DELETE CASCADE` constraints in the schema.
    async fn delete_hero(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM heroes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_monuments(&self) -> Result<Vec<Monument>, sqlx::Error> {
        sqlx::query_as::<_, Monument>(
            r#"SELECT id, name, type, description, location, settlement, address,
                      coordinates, establishment_year, architect, image_url, history
               FROM monuments
               ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// get_monument
    ///
    /// Monument photos are ordered most-recent-upload-first, intentionally unlike
    /// hero photos (which order by year).
    async fn get_monument(&self, id: i32) -> Result<Option<MonumentDetail>, sqlx::Error> {
        let monument = sqlx::query_as::<_, MonumentDetail>(
            r#"SELECT id, name, type, description, location, settlement, address,
                      coordinates, establishment_year, architect, image_url, history
               FROM monuments
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut monument) = monument else {
            return Ok(None);
        };

        monument.photos = sqlx::query_as::<_, MonumentPhoto>(
            r#"SELECT id, title, photo_url, description, photo_year
               FROM monument_photos
               WHERE monument_id = $1
               ORDER BY upload_date DESC"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(monument))
    }

    async fn create_monument(&self, req: MonumentPayload) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO monuments
                   (name, type, description, location, settlement, address,
                    coordinates, establishment_year, architect, image_url, history)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING id"#,
        )
        .bind(req.name)
        .bind(req.monument_type)
        .bind(req.description)
        .bind(req.location)
        .bind(req.settlement)
        .bind(req.address)
        .bind(req.coordinates)
        .bind(req.establishment_year)
        .bind(req.architect)
        .bind(req.image_url)
        .bind(req.history)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_monument(&self, id: i32, req: MonumentPayload) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE monuments
               SET name = $2, type = $3, description = $4, location = $5, settlement = $6,
                   address = $7, coordinates = $8, establishment_year = $9, architect = $10,
                   image_url = $11, history = $12, updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.monument_type)
        .bind(req.description)
        .bind(req.location)
        .bind(req.settlement)
        .bind(req.address)
        .bind(req.coordinates)
        .bind(req.establishment_year)
        .bind(req.architect)
        .bind(req.image_url)
        .bind(req.history)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// delete_monument
    ///
    /// Photos and the monument row are removed inside one transaction: either
    /// both deletions commit or neither is visible.
    async fn delete_monument(&self, id: i32) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM monument_photos WHERE monument_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM monuments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// create_submission
    ///
    /// Append-only intake queue: every submission enters with status 'pending'
    /// and is moderated by an external process.
    async fn create_submission(&self, req: SubmissionRequest) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO submissions
                   (hero_name, relationship, document_type, description, year, email, status)
               VALUES ($1, $2, $3, $4, $5, $6, 'pending')
               RETURNING id"#,
        )
        .bind(req.hero_name)
        .bind(req.relationship)
        .bind(req.document_type)
        .bind(req.description)
        .bind(req.year)
        .bind(req.email)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_files(&self, hero_id: Option<i32>) -> Result<Vec<HeroFile>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, hero_id, file_name, file_type, file_url, uploaded_at FROM hero_files",
        );

        if let Some(hid) = hero_id {
            builder.push(" WHERE hero_id = ");
            builder.push_bind(hid);
        }

        builder.push(" ORDER BY uploaded_at DESC");

        builder
            .build_query_as::<HeroFile>()
            .fetch_all(&self.pool)
            .await
    }

    /// register_file
    ///
    /// A `hero_id` pointing at no hero trips the FK constraint; that violation
    /// (Postgres code 23503) is a caller mistake, reported as `None` rather
    /// than a store fault.
    async fn register_file(
        &self,
        req: RegisterFileRequest,
    ) -> Result<Option<HeroFile>, sqlx::Error> {
        let inserted = sqlx::query_as::<_, HeroFile>(
            r#"INSERT INTO hero_files (hero_id, file_name, file_type, file_url)
               VALUES ($1, $2, $3, $4)
               RETURNING id, hero_id, file_name, file_type, file_url, uploaded_at"#,
        )
        .bind(req.hero_id)
        .bind(req.file_name)
        .bind(req.file_type)
        .bind(req.file_url)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(file) => Ok(Some(file)),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_file(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hero_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
