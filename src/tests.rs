//! Integration tests for the Nera backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::gallery::GalleryCache;
use crate::{create_router, AppState};

const TEST_PSK: &str = "test-api-key";

/// Test fixture for integration tests.
struct TestFixture {
    /// Sends the admin key on every request.
    client: Client,
    /// Sends no key, like the public site.
    public: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some(TEST_PSK.to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Repository::new(pool);

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
            gallery_ttl: Duration::from_secs(300),
            gallery_max_count: 50,
        };

        let state = AppState {
            gallery: Arc::new(GalleryCache::new(repo.clone(), config.gallery_ttl)),
            repo: Arc::new(repo),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            public: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.public.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn admin(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> (u16, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let resp = request.send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        self.admin(reqwest::Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        self.admin(reqwest::Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        self.admin(reqwest::Method::DELETE, path, None).await
    }

    async fn create_media(&self, title: &str, media_type: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/admin/media",
                json!({
                    "title": title,
                    "url": format!("https://cdn.example.com/{}.jpg", title),
                    "type": media_type
                }),
            )
            .await;
        assert_eq!(status, 200, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .public
        .get(fixture.url("/api/admin/revision"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .public
        .post(fixture.url("/api/admin/faq"))
        .header("x-api-key", "wrong-key")
        .json(&json!({ "question": "q", "answer": "a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Nothing was written
    let (_, body) = fixture.get("/api/faq").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_valid_psk_and_bearer() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .admin(reqwest::Method::GET, "/api/admin/revision", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["revisionId"].is_number());

    let resp = fixture
        .public
        .get(fixture.url("/api/admin/revision"))
        .bearer_auth(TEST_PSK)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_admin_open_without_configured_psk() {
    let fixture = TestFixture::with_psk(None).await;

    let resp = fixture
        .public
        .get(fixture.url("/api/admin/revision"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_public_routes_need_no_key() {
    let fixture = TestFixture::new().await;

    for path in [
        "/api/projects",
        "/api/blog",
        "/api/team",
        "/api/faq",
        "/api/media",
        "/api/gallery/unique",
        "/api/settings",
        "/api/page-images/home",
        "/api/home",
    ] {
        let (status, body) = fixture.get(path).await;
        assert_eq!(status, 200, "{}", path);
        assert_eq!(body["success"], true, "{}", path);
    }
}

#[tokio::test]
async fn test_project_lifecycle() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .post(
            "/api/admin/projects",
            json!({
                "title": "Tiny A",
                "slug": "tiny-a",
                "description": "d",
                "images": ["u1", "u2"]
            }),
        )
        .await;
    assert_eq!(status, 200, "{}", created);
    assert_eq!(created["data"]["coverImage"], "u1");
    let id = created["data"]["id"].as_i64().unwrap();
    let revision_after_create = created["revisionId"].as_i64().unwrap();

    // Same record by slug and by id
    let (status, by_slug) = fixture.get("/api/projects/tiny-a").await;
    assert_eq!(status, 200);
    assert_eq!(by_slug["data"]["id"], id);
    assert_eq!(by_slug["data"]["images"], json!(["u1", "u2"]));
    assert_eq!(by_slug["data"]["title"], "Tiny A");

    let (status, by_id) = fixture.get(&format!("/api/projects/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(by_id["data"]["slug"], "tiny-a");

    // Image list is replaced, not merged
    let (status, updated) = fixture
        .put("/api/admin/projects/tiny-a", json!({ "images": ["u3"] }))
        .await;
    assert_eq!(status, 200, "{}", updated);
    assert!(updated["revisionId"].as_i64().unwrap() > revision_after_create);

    let (_, fetched) = fixture.get("/api/projects/tiny-a").await;
    assert_eq!(fetched["data"]["images"], json!(["u3"]));
    assert_eq!(fetched["data"]["coverImage"], "u3");
    assert_eq!(fetched["data"]["description"], "d");

    let (status, _) = fixture.delete("/api/admin/projects/tiny-a").await;
    assert_eq!(status, 200);

    let (status, missing) = fixture.get("/api/projects/tiny-a").await;
    assert_eq!(status, 404);
    assert_eq!(missing["error"]["code"], "NOT_FOUND");

    // Deleting twice is an error, not a no-op
    let (status, _) = fixture.delete("/api/admin/projects/tiny-a").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_project_explicit_cover() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .post(
            "/api/admin/projects",
            json!({
                "title": "Tiny B",
                "slug": "tiny-b",
                "description": "d",
                "images": ["u1", "u2"],
                "coverImage": "u2",
                "features": "solar, loft ,, deck",
                "price": "1.2M"
            }),
        )
        .await;
    assert_eq!(status, 200, "{}", created);
    assert_eq!(created["data"]["coverImage"], "u2");
    assert_eq!(created["data"]["features"], json!(["solar", "loft", "deck"]));
    assert_eq!(created["data"]["price"], "1.2M");

    // A cover outside the images is rejected
    let (status, body) = fixture
        .put("/api/admin/projects/tiny-b", json!({ "coverImage": "elsewhere" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Dropping the chosen cover falls back to the first image
    let (status, updated) = fixture
        .put("/api/admin/projects/tiny-b", json!({ "images": ["u4", "u1"] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["coverImage"], "u4");
}

#[tokio::test]
async fn test_project_validation_and_conflicts() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/admin/projects",
            json!({ "title": "", "slug": "ok-slug", "description": "d" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("title"));

    let (status, _) = fixture
        .post(
            "/api/admin/projects",
            json!({ "title": "T", "slug": "Not A Slug", "description": "d" }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, body) = fixture
        .post(
            "/api/admin/projects",
            json!({ "title": "T", "slug": "t", "description": "d", "images": ["a"], "coverImage": "b" }),
        )
        .await;
    assert_eq!(status, 400);
    assert!(body["error"]["message"].as_str().unwrap().contains("coverImage"));

    let payload = json!({ "title": "T", "slug": "taken", "description": "d" });
    let (status, _) = fixture.post("/api/admin/projects", payload.clone()).await;
    assert_eq!(status, 200);
    let (status, body) = fixture.post("/api/admin/projects", payload).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = fixture
        .put("/api/admin/projects/nope", json!({ "title": "x" }))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_project_list_newest_first_and_filters() {
    let fixture = TestFixture::new().await;

    for slug in ["first", "second", "third"] {
        let (status, _) = fixture
            .post(
                "/api/admin/projects",
                json!({ "title": slug, "slug": slug, "description": "d", "images": [format!("{}.jpg", slug)] }),
            )
            .await;
        assert_eq!(status, 200);
    }

    let (_, body) = fixture.get("/api/projects").await;
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["third", "second", "first"]);
    assert_eq!(body["data"][0]["images"], json!(["third.jpg"]));

    let (_, filtered) = fixture.get("/api/projects?slug=second").await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["data"][0]["slug"], "second");
    assert_eq!(filtered["data"][0]["images"], json!(["second.jpg"]));
    assert_eq!(filtered["data"][0]["coverImage"], "second.jpg");

    let id = filtered["data"][0]["id"].as_i64().unwrap();
    let (_, by_id) = fixture.get(&format!("/api/projects?id={}", id)).await;
    assert_eq!(by_id["data"][0]["images"], json!(["second.jpg"]));
}

#[tokio::test]
async fn test_blog_crud() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .post(
            "/api/admin/blog",
            json!({
                "title": "Küçük Evler",
                "slug": "kucuk-evler",
                "content": "Uzun yazı",
                "images": ["b1", "b2"],
                "coverImage": "b2",
                "features": ["minimal", "eco"]
            }),
        )
        .await;
    assert_eq!(status, 200, "{}", created);
    assert_eq!(created["data"]["coverImage"], "b2");
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, updated) = fixture
        .put(
            &format!("/api/admin/blog/{}", id),
            json!({ "title": "Küçük Evler 2" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["title"], "Küçük Evler 2");
    assert_eq!(updated["data"]["images"], json!(["b1", "b2"]));
    assert_eq!(updated["data"]["coverImage"], "b2");
    assert_eq!(updated["data"]["features"], json!(["minimal", "eco"]));

    // A shorter list replaces the old one and the removed cover falls back
    // to the first remaining image.
    let (status, replaced) = fixture
        .put(&format!("/api/admin/blog/{}", id), json!({ "images": ["b3"] }))
        .await;
    assert_eq!(status, 200, "{}", replaced);
    assert_eq!(replaced["data"]["images"], json!(["b3"]));
    assert_eq!(replaced["data"]["coverImage"], "b3");

    let (_, fetched) = fixture.get(&format!("/api/blog/{}", id)).await;
    assert_eq!(fetched["data"]["images"], json!(["b3"]));
    assert_eq!(fetched["data"]["coverImage"], "b3");

    let (_, list) = fixture.get("/api/blog").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (status, _) = fixture.delete("/api/admin/blog/kucuk-evler").await;
    assert_eq!(status, 200);
    let (status, _) = fixture.get(&format!("/api/blog/{}", id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_malformed_input_gets_error_envelope() {
    let fixture = TestFixture::new().await;

    // Wrongly typed field
    let (status, body) = fixture
        .post(
            "/api/admin/projects",
            json!({ "title": "T", "slug": "t", "description": "d", "images": "u1" }),
        )
        .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["revisionId"].is_i64());

    // Non-numeric id in the path
    let (status, body) = fixture.get("/api/team/abc").await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Unknown enum value in the query string
    let (status, body) = fixture.get("/api/media?type=FOO").await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Broken JSON
    let resp = fixture
        .client
        .post(fixture.url("/api/admin/projects"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // No JSON content type at all
    let resp = fixture
        .public
        .post(fixture.url("/api/contact"))
        .body("name=Ali")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (_, list) = fixture.get("/api/projects").await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_team_and_faq_keep_insertion_order() {
    let fixture = TestFixture::new().await;

    for (name, role) in [("Ali", "Mimar"), ("Zeynep", "Mühendis")] {
        let (status, _) = fixture
            .post("/api/admin/team", json!({ "name": name, "role": role }))
            .await;
        assert_eq!(status, 200);
    }
    let (_, team) = fixture.get("/api/team").await;
    assert_eq!(team["data"][0]["name"], "Ali");
    assert_eq!(team["data"][1]["name"], "Zeynep");

    let zeynep = team["data"][1]["id"].as_i64().unwrap();
    let (status, updated) = fixture
        .put(
            &format!("/api/admin/team/{}", zeynep),
            json!({ "photo": "/team/zeynep.jpg" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["role"], "Mühendis");
    assert_eq!(updated["data"]["photo"], "/team/zeynep.jpg");

    let (_, only) = fixture.get(&format!("/api/team?id={}", zeynep)).await;
    assert_eq!(ids(&only), vec![zeynep]);

    let (status, _) = fixture
        .post("/api/admin/team", json!({ "name": "Eksik" }))
        .await;
    assert_eq!(status, 400);

    let (status, faq) = fixture
        .post(
            "/api/admin/faq",
            json!({ "question": "Teslim süresi?", "answer": "8 hafta" }),
        )
        .await;
    assert_eq!(status, 200);
    let faq_id = faq["data"]["id"].as_i64().unwrap();

    let (status, updated) = fixture
        .put(&format!("/api/admin/faq/{}", faq_id), json!({ "answer": "10 hafta" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["question"], "Teslim süresi?");
    assert_eq!(updated["data"]["answer"], "10 hafta");

    let (status, _) = fixture.delete(&format!("/api/admin/faq/{}", faq_id)).await;
    assert_eq!(status, 200);
    let (status, _) = fixture.get(&format!("/api/faq/{}", faq_id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_media_crud_and_type_is_fixed() {
    let fixture = TestFixture::new().await;

    let image = fixture.create_media("kapak", "IMAGE").await;
    let video = fixture.create_media("tanitim", "VIDEO").await;

    let (_, videos) = fixture.get("/api/media?type=VIDEO").await;
    assert_eq!(ids(&videos), vec![video]);

    let (_, all) = fixture.get("/api/media").await;
    assert_eq!(ids(&all), vec![video, image]);

    let (status, body) = fixture
        .put(
            &format!("/api/admin/media/{}", image),
            json!({ "type": "VIDEO" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, updated) = fixture
        .put(
            &format!("/api/admin/media/{}", image),
            json!({ "type": "IMAGE", "alt": "Ön cephe" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["alt"], "Ön cephe");
    assert_eq!(updated["data"]["type"], "IMAGE");

    let (status, _) = fixture
        .post("/api/admin/media", json!({ "title": "x", "url": "y" }))
        .await;
    assert_eq!(status, 400);

    let (status, _) = fixture.delete(&format!("/api/admin/media/{}", video)).await;
    assert_eq!(status, 200);
    let (status, _) = fixture.get(&format!("/api/media/{}", video)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_gallery_unique_covers_pool() {
    let fixture = TestFixture::new().await;

    let mut pool = Vec::new();
    for title in ["g1", "g2", "g3"] {
        pool.push(fixture.create_media(title, "IMAGE").await);
    }
    fixture.create_media("clip", "VIDEO").await;

    let (_, first) = fixture.get("/api/gallery/unique?count=2").await;
    let (_, second) = fixture.get("/api/gallery/unique?count=2").await;

    let mut seen: Vec<i64> = ids(&first).into_iter().chain(ids(&second)).collect();
    seen.sort();
    seen.dedup();
    pool.sort();
    assert_eq!(seen, pool);

    // More than the pool holds returns the pool once
    let (_, everything) = fixture.get("/api/gallery/unique?count=40").await;
    let mut all = ids(&everything);
    all.sort();
    assert_eq!(all, pool);

    let (_, none) = fixture.get("/api/gallery/unique?count=0").await;
    assert!(ids(&none).is_empty());
    let (_, negative) = fixture.get("/api/gallery/random?count=-2").await;
    assert!(ids(&negative).is_empty());

    let (_, videos) = fixture.get("/api/gallery/videos?count=5").await;
    assert_eq!(videos["data"].as_array().unwrap().len(), 1);
    assert_eq!(videos["data"][0]["type"], "VIDEO");

    let (_, any) = fixture.get("/api/gallery/any?count=10").await;
    assert_eq!(any["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_media_changes_invalidate_gallery() {
    let fixture = TestFixture::new().await;

    fixture.create_media("a", "IMAGE").await;
    fixture.create_media("b", "IMAGE").await;

    // Warm the snapshot
    let (_, before) = fixture.get("/api/gallery/random?count=10").await;
    assert_eq!(ids(&before).len(), 2);

    let added = fixture.create_media("c", "IMAGE").await;
    let (_, after_create) = fixture.get("/api/gallery/random?count=10").await;
    assert!(ids(&after_create).contains(&added));

    let (status, _) = fixture.delete(&format!("/api/admin/media/{}", added)).await;
    assert_eq!(status, 200);
    let (_, after_delete) = fixture.get("/api/gallery/random?count=10").await;
    assert!(!ids(&after_delete).contains(&added));
    assert_eq!(ids(&after_delete).len(), 2);

    let (status, _) = fixture
        .admin(reqwest::Method::POST, "/api/admin/gallery/invalidate", None)
        .await;
    assert_eq!(status, 200);
    let (status, _) = fixture
        .admin(
            reqwest::Method::POST,
            "/api/admin/gallery/reset-exclusions",
            None,
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_contact_messages() {
    let fixture = TestFixture::new().await;

    // The public form needs no key
    let resp = fixture
        .public
        .post(fixture.url("/api/contact"))
        .json(&json!({
            "name": "Ayşe",
            "email": "ayse@example.com",
            "phone": "+90 555 000 00 00",
            "message": "Fiyat bilgisi alabilir miyim?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["data"]["isRead"], false);
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = fixture
        .public
        .post(fixture.url("/api/contact"))
        .json(&json!({ "name": "X", "email": "nope", "message": "m" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // The inbox is admin only
    let resp = fixture
        .public
        .get(fixture.url("/api/admin/contact"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let (status, inbox) = fixture
        .admin(reqwest::Method::GET, "/api/admin/contact", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&inbox), vec![id]);

    let path = format!("/api/admin/contact/{}/read", id);
    let (status, read) = fixture.admin(reqwest::Method::PUT, &path, None).await;
    assert_eq!(status, 200);
    assert_eq!(read["data"]["isRead"], true);
    let revision = read["revisionId"].as_i64().unwrap();

    // Marking again changes nothing
    let (status, again) = fixture.admin(reqwest::Method::PUT, &path, None).await;
    assert_eq!(status, 200);
    assert_eq!(again["data"]["isRead"], true);
    assert_eq!(again["revisionId"].as_i64().unwrap(), revision);

    let (status, _) = fixture
        .admin(reqwest::Method::PUT, "/api/admin/contact/9999/read", None)
        .await;
    assert_eq!(status, 404);

    let (status, _) = fixture.delete(&format!("/api/admin/contact/{}", id)).await;
    assert_eq!(status, 200);
    let (status, _) = fixture
        .admin(reqwest::Method::GET, &format!("/api/admin/contact/{}", id), None)
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_settings_merge() {
    let fixture = TestFixture::new().await;

    let (_, defaults) = fixture.get("/api/settings").await;
    assert_eq!(defaults["data"]["siteName"], "Nera");
    assert_eq!(defaults["data"]["contactEmail"], "info@nera.com");
    assert_eq!(defaults["data"]["maintenanceMode"], false);

    let (status, updated) = fixture
        .put(
            "/api/admin/settings",
            json!({ "siteName": "Nera Tiny", "maintenanceMode": true }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["siteName"], "Nera Tiny");
    assert_eq!(updated["data"]["contactEmail"], "info@nera.com");
    assert_eq!(updated["data"]["maintenanceMode"], true);

    let (status, _) = fixture
        .put("/api/admin/settings", json!({ "contactEmail": "broken" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_catalog_link() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/catalog").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["exists"], false);
    assert!(body["data"]["url"].is_null());
    let before = body["revisionId"].as_i64().unwrap();

    let (status, body) = fixture
        .put("/api/admin/catalog", json!({ "url": "https://cdn.example.com/katalog.docx" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .public
        .put(fixture.url("/api/admin/catalog"))
        .json(&json!({ "url": "/katalog.pdf" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let (status, body) = fixture
        .put("/api/admin/catalog", json!({ "url": "/katalog.pdf" }))
        .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["data"]["exists"], true);
    assert_eq!(body["revisionId"].as_i64().unwrap(), before + 1);

    let (_, body) = fixture.get("/api/catalog").await;
    assert_eq!(body["data"]["url"], "/katalog.pdf");

    let (status, body) = fixture.delete("/api/admin/catalog").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["exists"], false);
    assert_eq!(body["revisionId"].as_i64().unwrap(), before + 2);

    // Already empty
    let (status, body) = fixture.delete("/api/admin/catalog").await;
    assert_eq!(status, 200);
    assert_eq!(body["revisionId"].as_i64().unwrap(), before + 2);
}

#[tokio::test]
async fn test_page_images_and_home_content() {
    let fixture = TestFixture::new().await;

    let (_, home) = fixture.get("/api/page-images/home").await;
    assert_eq!(home["data"]["page"], "home");
    assert_eq!(home["data"]["images"], json!(["/default-hero.jpg", "/slider1.jpg"]));

    let (status, about) = fixture
        .put("/api/admin/page-images/about", json!({ "images": ["/a.jpg"] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(about["data"]["images"], json!(["/a.jpg"]));

    let (status, _) = fixture.get("/api/page-images/admin").await;
    assert_eq!(status, 404);

    let (_, content) = fixture.get("/api/home").await;
    assert_eq!(content["data"]["heroTitle"], "Hayalinizdeki Tiny House");

    let (status, updated) = fixture
        .put(
            "/api/admin/home",
            json!({ "heroButton": "Teklif Al", "sliderImages": ["/s.jpg"] }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["heroButton"], "Teklif Al");
    assert_eq!(updated["data"]["sliderImages"], json!(["/s.jpg"]));
    assert_eq!(updated["data"]["heroTitle"], "Hayalinizdeki Tiny House");
}

#[tokio::test]
async fn test_revision_increments_on_mutation() {
    let fixture = TestFixture::new().await;

    let (_, before) = fixture
        .admin(reqwest::Method::GET, "/api/admin/revision", None)
        .await;
    let start = before["data"]["revisionId"].as_i64().unwrap();

    let (_, created) = fixture
        .post("/api/admin/faq", json!({ "question": "q", "answer": "a" }))
        .await;
    assert_eq!(created["revisionId"].as_i64().unwrap(), start + 1);

    // Failed writes leave the revision alone
    let (_, failed) = fixture
        .post("/api/admin/faq", json!({ "question": "", "answer": "a" }))
        .await;
    assert_eq!(failed["revisionId"].as_i64().unwrap(), start + 1);
}
