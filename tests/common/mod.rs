#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use memorial_api::{
    AppState, MockStorageService, create_router,
    config::AppConfig,
    models::{
        DEFAULT_DISTRICT, HeroDetail, HeroFile, HeroPayload, HeroSummary, Monument,
        MonumentDetail, MonumentPayload, RegisterFileRequest, SubmissionRequest,
    },
    repository::{Repository, RepositoryState},
    storage::StorageState,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// --- In-Memory Repository ---

/// Backing state for the in-memory repository. One shared id counter keeps all
/// generated ids distinct, which is enough for handler-level assertions.
#[derive(Default)]
struct Inner {
    heroes: HashMap<i32, HeroPayload>,
    monuments: HashMap<i32, MonumentPayload>,
    submissions: HashMap<i32, SubmissionRequest>,
    files: Vec<HeroFile>,
    next_id: i32,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// InMemoryRepository
///
/// A full `Repository` implementation over a `Mutex<HashMap>`, letting the
/// integration tests exercise every handler (validation, lifecycle, auth
/// gating) without a running Postgres instance.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

impl InMemoryRepository {
    /// Number of registered files; used to assert that rejected mutations
    /// performed no persistence.
    pub fn file_count(&self) -> usize {
        self.inner.lock().unwrap().files.len()
    }

    pub fn submission_count(&self) -> usize {
        self.inner.lock().unwrap().submissions.len()
    }
}

fn hero_with_default_region(mut req: HeroPayload) -> HeroPayload {
    if req.region.is_none() {
        req.region = Some(DEFAULT_DISTRICT.to_string());
    }
    req
}

fn summary_of(id: i32, h: &HeroPayload) -> HeroSummary {
    HeroSummary {
        id,
        name: h.name.clone(),
        birth_year: h.birth_year,
        death_year: h.death_year,
        rank: h.rank.clone(),
        unit: h.unit.clone(),
        hometown: h.hometown.clone(),
        region: h.region.clone(),
        awards: vec![],
    }
}

fn detail_of(id: i32, h: &HeroPayload) -> HeroDetail {
    HeroDetail {
        id,
        name: h.name.clone(),
        birth_year: h.birth_year,
        birth_place: h.birth_place.clone(),
        death_year: h.death_year,
        death_place: h.death_place.clone(),
        rank: h.rank.clone(),
        unit: h.unit.clone(),
        hometown: h.hometown.clone(),
        region: h.region.clone(),
        biography: h.biography.clone(),
        photo: h.photo.clone(),
        awards: vec![],
        military_path: vec![],
        documents: vec![],
        photos: vec![],
    }
}

fn monument_of(id: i32, m: &MonumentPayload) -> Monument {
    Monument {
        id,
        name: m.name.clone(),
        monument_type: m.monument_type.clone(),
        description: m.description.clone(),
        location: m.location.clone(),
        settlement: m.settlement.clone(),
        address: m.address.clone(),
        coordinates: m.coordinates.clone(),
        establishment_year: m.establishment_year,
        architect: m.architect.clone(),
        image_url: m.image_url.clone(),
        history: m.history.clone(),
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_heroes(
        &self,
        search: Option<String>,
        rank: Option<String>,
        district: Option<String>,
    ) -> Result<Vec<HeroSummary>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let needle = search.map(|s| s.to_lowercase());

        let mut heroes: Vec<HeroSummary> = inner
            .heroes
            .iter()
            .filter(|(_, h)| {
                let search_ok = needle.as_ref().is_none_or(|n| {
                    let haystacks = [
                        Some(h.name.as_str()),
                        h.unit.as_deref(),
                        h.hometown.as_deref(),
                    ];
                    haystacks
                        .iter()
                        .flatten()
                        .any(|v| v.to_lowercase().contains(n))
                });
                let rank_ok = rank.as_ref().is_none_or(|r| h.rank.as_deref() == Some(r));
                let district_ok = district
                    .as_ref()
                    .is_none_or(|d| h.region.as_deref() == Some(d));
                search_ok && rank_ok && district_ok
            })
            .map(|(id, h)| summary_of(*id, h))
            .collect();

        heroes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(heroes)
    }

    async fn get_hero(&self, id: i32) -> Result<Option<HeroDetail>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.heroes.get(&id).map(|h| detail_of(id, h)))
    }

    async fn create_hero(&self, req: HeroPayload) -> Result<i32, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.heroes.insert(id, hero_with_default_region(req));
        Ok(id)
    }

    async fn update_hero(&self, id: i32, req: HeroPayload) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.heroes.contains_key(&id) {
            return Ok(false);
        }
        inner.heroes.insert(id, hero_with_default_region(req));
        Ok(true)
    }

    async fn delete_hero(&self, id: i32) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let removed = inner.heroes.remove(&id).is_some();
        if removed {
            inner.files.retain(|f| f.hero_id != id);
        }
        Ok(removed)
    }

    async fn list_monuments(&self) -> Result<Vec<Monument>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut monuments: Vec<Monument> = inner
            .monuments
            .iter()
            .map(|(id, m)| monument_of(*id, m))
            .collect();
        monuments.sort_by_key(|m| m.id);
        Ok(monuments)
    }

    async fn get_monument(&self, id: i32) -> Result<Option<MonumentDetail>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.monuments.get(&id).map(|m| {
            let base = monument_of(id, m);
            MonumentDetail {
                id: base.id,
                name: base.name,
                monument_type: base.monument_type,
                description: base.description,
                location: base.location,
                settlement: base.settlement,
                address: base.address,
                coordinates: base.coordinates,
                establishment_year: base.establishment_year,
                architect: base.architect,
                image_url: base.image_url,
                history: base.history,
                photos: vec![],
            }
        }))
    }

    async fn create_monument(&self, req: MonumentPayload) -> Result<i32, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.monuments.insert(id, req);
        Ok(id)
    }

    async fn update_monument(&self, id: i32, req: MonumentPayload) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.monuments.contains_key(&id) {
            return Ok(false);
        }
        inner.monuments.insert(id, req);
        Ok(true)
    }

    async fn delete_monument(&self, id: i32) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.monuments.remove(&id).is_some())
    }

    async fn create_submission(&self, req: SubmissionRequest) -> Result<i32, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.submissions.insert(id, req);
        Ok(id)
    }

    async fn list_files(&self, hero_id: Option<i32>) -> Result<Vec<HeroFile>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .files
            .iter()
            .rev() // newest first
            .filter(|f| hero_id.is_none_or(|hid| f.hero_id == hid))
            .cloned()
            .collect())
    }

    async fn register_file(
        &self,
        req: RegisterFileRequest,
    ) -> Result<Option<HeroFile>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.heroes.contains_key(&req.hero_id) {
            return Ok(None);
        }
        let id = inner.next_id();
        let file = HeroFile {
            id,
            hero_id: req.hero_id,
            file_name: req.file_name,
            file_type: req.file_type,
            file_url: req.file_url,
            uploaded_at: Utc::now(),
        };
        inner.files.push(file.clone());
        Ok(Some(file))
    }

    async fn delete_file(&self, id: i32) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.files.len();
        inner.files.retain(|f| f.id != id);
        Ok(inner.files.len() < before)
    }
}

// --- Test App Scaffolding ---

pub struct TestApp {
    pub address: String,
    /// Direct handle to the in-memory repository for persistence assertions.
    pub repo: Arc<InMemoryRepository>,
    pub config: AppConfig,
}

/// Spawns the full router on an ephemeral port against the in-memory repository
/// and mock storage. No external services needed.
pub async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::default());
    let storage = Arc::new(MockStorageService::new()) as StorageState;
    let config = AppConfig::default();

    let state = AppState {
        repo: repo.clone() as RepositoryState,
        storage,
        config: config.clone(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        repo,
        config,
    }
}

/// Issues a valid admin session token for the test configuration.
pub fn admin_token(config: &AppConfig) -> String {
    memorial_api::auth::issue_token(config, &config.admin_login).unwrap()
}
