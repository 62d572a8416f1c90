//! Shared harness for HTTP integration tests.
//!
//! Wires the real services over the in-memory repositories and a temporary
//! media directory, then exposes small request helpers.

use std::io::Cursor;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test, web};
use recipe_backend::Trace;
use recipe_backend::domain::{
    AccountService, CredentialHasher, LabelService, RecipeService, UuidUploadIds,
};
use recipe_backend::inbound::http::configure;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::storage::FsImageStore;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const BOUNDARY: &str = "integration-boundary";

/// Handler state plus the media directory backing it.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub media: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let media = TempDir::new().expect("media dir");
        let images = Arc::new(FsImageStore::open(media.path(), "/media/").expect("image store"));
        let store = Arc::new(InMemoryStore::new());
        let accounts = AccountService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            CredentialHasher::fast(),
        );
        let labels = LabelService::new(Arc::clone(&store));
        let recipes = RecipeService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            images,
            Arc::new(UuidUploadIds),
        );
        let state = web::Data::new(HttpState::new(
            Arc::new(accounts),
            Arc::new(labels),
            Arc::new(recipes),
        ));
        Self { state, media }
    }
}

/// Request builder carrying `Authorization: Token <token>`.
pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Token {token}")))
}

impl Harness {
    /// Send `req` through a fresh app sharing this state and decode the
    /// JSON body; empty bodies decode to `Null`.
    pub async fn send(&self, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .configure(configure),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    /// Register an account and return its API token.
    pub async fn sign_up(&self, email: &str) -> String {
        let (status, _) = self
            .send(test::TestRequest::post().uri("/api/v1/users").set_json(json!({
                "email": email,
                "password": "testpass123",
                "name": "Test Cook",
            })))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                test::TestRequest::post()
                    .uri("/api/v1/users/token")
                    .set_json(json!({ "email": email, "password": "testpass123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_owned()
    }

    /// Create a label under `/api/v1/{collection}` and return its id.
    pub async fn create_label(&self, token: &str, collection: &str, name: &str) -> i64 {
        let (status, body) = self
            .send(authed(
                test::TestRequest::post()
                    .uri(&format!("/api/v1/{collection}"))
                    .set_json(json!({ "name": name })),
                token,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("label id")
    }

    /// Create a recipe and return its id.
    pub async fn create_recipe(&self, token: &str, payload: Value) -> i64 {
        let (status, body) = self
            .send(authed(
                test::TestRequest::post()
                    .uri("/api/v1/recipes")
                    .set_json(payload),
                token,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("recipe id")
    }
}

/// Attach a single-part multipart body to `req`.
pub fn with_multipart(
    req: test::TestRequest,
    field: &str,
    file_name: Option<&str>,
    bytes: &[u8],
) -> test::TestRequest {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    req.insert_header((
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    ))
    .set_payload(body)
}

/// A tiny valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
