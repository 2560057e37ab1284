mod common;

use common::{admin_token, spawn_app};
use serde_json::{Value, json};

// --- Health ---

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
}

// --- Hero Lifecycle ---

#[tokio::test]
async fn hero_lifecycle_create_get_update_delete() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    // Create
    let response = client
        .post(format!("{}/heroes", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "name": "Иванов Иван Иванович",
            "birthYear": 1920,
            "rank": "сержант",
            "unit": "5-й гвардейский полк"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    // Get: the wire contract is camelCase, and the district default is applied
    // when the payload omits the region.
    let response = client
        .get(format!("{}/heroes/{}", app.address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let hero: Value = response.json().await.unwrap();
    assert_eq!(hero["name"], "Иванов Иван Иванович");
    assert_eq!(hero["birthYear"], 1920);
    assert_eq!(hero["region"], "Неклиновский район");
    assert!(hero["awards"].as_array().unwrap().is_empty());
    assert!(hero["militaryPath"].as_array().unwrap().is_empty());

    // Update (full replace)
    let response = client
        .put(format!("{}/heroes/{}", app.address, id))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "name": "Иванов Иван Иванович",
            "birthYear": 1921,
            "region": "Ростовская область"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let hero: Value = client
        .get(format!("{}/heroes/{}", app.address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hero["birthYear"], 1921);
    assert_eq!(hero["region"], "Ростовская область");
    // The replace cleared the rank from the previous version.
    assert!(hero["rank"].is_null());

    // Delete
    let response = client
        .delete(format!("{}/heroes/{}", app.address, id))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Gone now, and a repeated delete reports the same.
    let response = client
        .get(format!("{}/heroes/{}", app.address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/heroes/{}", app.address, id))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn create_hero_rejects_blank_name() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/heroes", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Hero name is required");
}

#[tokio::test]
async fn hero_listing_filters_by_search_and_rank() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    for (name, rank) in [
        ("Петров Пётр", "рядовой"),
        ("Сидоров Семён", "сержант"),
        ("Петренко Павел", "сержант"),
    ] {
        let response = client
            .post(format!("{}/heroes", app.address))
            .header("X-Auth-Token", &token)
            .json(&json!({ "name": name, "rank": rank }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    // Unfiltered listing returns everything, ordered by name.
    let heroes: Vec<Value> = client
        .get(format!("{}/heroes", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(heroes.len(), 3);
    assert_eq!(heroes[0]["name"], "Петренко Павел");

    // Case-insensitive substring search.
    let heroes: Vec<Value> = client
        .get(format!("{}/heroes?search=петр", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(heroes.len(), 2);

    // Exact rank filter combined with search.
    let heroes: Vec<Value> = client
        .get(format!(
            "{}/heroes?search=петр&rank=сержант",
            app.address
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(heroes.len(), 1);
    assert_eq!(heroes[0]["name"], "Петренко Павел");

    // Whitespace-only filters are treated as absent.
    let heroes: Vec<Value> = client
        .get(format!("{}/heroes?search=%20%20", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(heroes.len(), 3);
}

// --- Monument Lifecycle ---

#[tokio::test]
async fn monument_lifecycle_and_type_key() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/monuments", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "name": "Мемориал Славы",
            "type": "мемориальный комплекс",
            "settlement": "с. Покровское",
            "establishmentYear": 1975
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    // Detail keeps the reserved-word field under the `type` key.
    let monument: Value = client
        .get(format!("{}/monuments/{}", app.address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(monument["type"], "мемориальный комплекс");
    assert_eq!(monument["establishmentYear"], 1975);
    assert!(monument["photos"].as_array().unwrap().is_empty());

    // Listing rows carry no photo gallery but the same scalar shape.
    let monuments: Vec<Value> = client
        .get(format!("{}/monuments", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(monuments.len(), 1);
    assert_eq!(monuments[0]["type"], "мемориальный комплекс");
    assert!(monuments[0].get("photos").is_none());

    let response = client
        .delete(format!("{}/monuments/{}", app.address, id))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/monuments/{}", app.address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_missing_monument_returns_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .put(format!("{}/monuments/999", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({ "name": "Обелиск" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

// --- Submission Intake ---

#[tokio::test]
async fn submission_accepted_with_moderation_message() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/submissions", app.address))
        .json(&json!({
            "heroName": "  Смирнов Алексей  ",
            "email": "family@example.com",
            "relationship": "внук",
            "documentType": "письма"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Материалы успешно отправлены на модерацию");
    assert_eq!(app.repo.submission_count(), 1);
}

#[tokio::test]
async fn submission_requires_hero_name_and_email() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for payload in [
        json!({ "heroName": "", "email": "family@example.com" }),
        json!({ "heroName": "Смирнов Алексей", "email": "   " }),
    ] {
        let response = client
            .post(format!("{}/submissions", app.address))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Hero name and email are required");
    }

    assert_eq!(app.repo.submission_count(), 0);
}

// --- File Registry ---

#[tokio::test]
async fn file_registry_register_list_delete() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let hero: Value = client
        .post(format!("{}/heroes", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({ "name": "Козлов Николай" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hero_id = hero["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/files", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "heroId": hero_id,
            "fileName": "portrait.jpg",
            "fileType": "image/jpeg",
            "fileUrl": "http://localhost:9000/memorial-test/heroes/portrait.jpg"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let file: Value = response.json().await.unwrap();
    let file_id = file["id"].as_i64().unwrap();
    assert_eq!(file["heroId"], hero_id);
    assert_eq!(file["fileName"], "portrait.jpg");
    assert!(file["uploadedAt"].is_string());

    // Scoped listing returns the record; an unrelated hero scope returns none.
    let files: Vec<Value> = client
        .get(format!("{}/files?hero_id={}", app.address, hero_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(files.len(), 1);

    let files: Vec<Value> = client
        .get(format!("{}/files?hero_id=9999", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(files.is_empty());

    let response = client
        .delete(format!("{}/files/{}", app.address, file_id))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(app.repo.file_count(), 0);
}

#[tokio::test]
async fn register_file_for_unknown_hero_returns_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/files", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "heroId": 9999,
            "fileName": "portrait.jpg",
            "fileUrl": "http://localhost:9000/memorial-test/portrait.jpg"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Hero not found");
    assert_eq!(app.repo.file_count(), 0);
}

#[tokio::test]
async fn register_file_requires_name_and_url() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/files", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "heroId": 1,
            "fileName": "",
            "fileUrl": ""
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(app.repo.file_count(), 0);
}

// --- Upload ---

#[tokio::test]
async fn upload_stores_blob_and_returns_url() {
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/upload", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "file": BASE64.encode(b"fake image bytes"),
            "filename": "portrait.jpg",
            "contentType": "image/jpeg",
            "folder": "heroes"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let url = body["url"].as_str().unwrap();
    let key = body["filename"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:9000/mock-bucket/heroes/"));
    assert!(key.starts_with("heroes/"));
    assert!(key.ends_with(".jpg"));
}

#[tokio::test]
async fn upload_rejects_invalid_base64() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app.config);

    let response = client
        .post(format!("{}/upload", app.address))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "file": "not%%%base64",
            "filename": "portrait.jpg"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "File data is not valid base64");
}
