//! Recipe image uploads stored on a temporary media root.

#[expect(dead_code, reason = "The shared harness carries label helpers unused here.")]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use support::{Harness, authed, png_bytes, with_multipart};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

async fn recipe_for(harness: &Harness) -> (String, i64) {
    let token = harness.sign_up("cook@example.com").await;
    let id = harness
        .create_recipe(
            &token,
            json!({ "title": "Pancakes", "time_minutes": 15, "price": "3.00" }),
        )
        .await;
    (token, id)
}

#[rstest]
#[actix_web::test]
async fn uploaded_png_is_stored_and_linked(harness: Harness) {
    let (token, id) = recipe_for(&harness).await;

    let (status, body) = harness
        .send(authed(
            with_multipart(
                TestRequest::post().uri(&format!("/api/v1/recipes/{id}/upload-image")),
                "image",
                Some("pancakes.png"),
                &png_bytes(),
            ),
            &token,
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], id);
    let url = body["image"].as_str().expect("image url").to_owned();
    let relative = url
        .strip_prefix("/media/")
        .expect("media url prefix");
    assert!(relative.starts_with("uploads/recipe/"));
    assert!(relative.ends_with(".png"));
    assert!(harness.media.path().join(relative).is_file());

    let (_, detail) = harness
        .send(authed(
            TestRequest::get().uri(&format!("/api/v1/recipes/{id}")),
            &token,
        ))
        .await;
    assert_eq!(detail["image"], Value::String(url));
}

#[rstest]
#[actix_web::test]
async fn replacing_an_image_removes_the_old_file(harness: Harness) {
    let (token, id) = recipe_for(&harness).await;
    let upload = || {
        authed(
            with_multipart(
                TestRequest::post().uri(&format!("/api/v1/recipes/{id}/upload-image")),
                "image",
                Some("pancakes.png"),
                &png_bytes(),
            ),
            &token,
        )
    };

    let (_, first) = harness.send(upload()).await;
    let (status, second) = harness.send(upload()).await;

    assert_eq!(status, StatusCode::OK);
    let path = |body: &Value| {
        let url = body["image"].as_str().expect("image url");
        harness
            .media
            .path()
            .join(url.trim_start_matches("/media/"))
    };
    assert_ne!(first["image"], second["image"]);
    assert!(!path(&first).exists());
    assert!(path(&second).is_file());
}

#[rstest]
#[case::not_an_image(Some("notes.png"), b"definitely not pixels".as_slice(), "invalid_image")]
#[case::plain_value(None, b"just text".as_slice(), "invalid")]
#[actix_web::test]
async fn bad_uploads_are_rejected(
    harness: Harness,
    #[case] file_name: Option<&str>,
    #[case] bytes: &[u8],
    #[case] code: &str,
) {
    let (token, id) = recipe_for(&harness).await;

    let (status, body) = harness
        .send(authed(
            with_multipart(
                TestRequest::post().uri(&format!("/api/v1/recipes/{id}/upload-image")),
                "image",
                file_name,
                bytes,
            ),
            &token,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["details"]["fields"][0]["field"], "image");
    assert_eq!(body["details"]["fields"][0]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn missing_image_field_is_required(harness: Harness) {
    let (token, id) = recipe_for(&harness).await;

    let (status, body) = harness
        .send(authed(
            with_multipart(
                TestRequest::post().uri(&format!("/api/v1/recipes/{id}/upload-image")),
                "photo",
                Some("pancakes.png"),
                &png_bytes(),
            ),
            &token,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["fields"][0]["code"], "required");
}

#[rstest]
#[case::nested_path("photo.png/nested/evil")]
#[case::parent_segments("../../escape.png")]
#[case::overlong_extension(
    "photo.extensionthatrunsonandonandonpastanysensiblelengthforafilesuffix"
)]
#[actix_web::test]
async fn hostile_file_names_stay_in_the_upload_dir(harness: Harness, #[case] file_name: &str) {
    let (token, id) = recipe_for(&harness).await;

    let (status, body) = harness
        .send(authed(
            with_multipart(
                TestRequest::post().uri(&format!("/api/v1/recipes/{id}/upload-image")),
                "image",
                Some(file_name),
                &png_bytes(),
            ),
            &token,
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let url = body["image"].as_str().expect("image url");
    let relative = url
        .strip_prefix("/media/uploads/recipe/")
        .expect("upload dir prefix");
    assert!(!relative.contains('/'), "{relative}");
    assert!(relative.len() <= 64, "{relative}");
    let stored = harness.media.path().join("uploads/recipe").join(relative);
    assert!(stored.is_file());
    assert_eq!(
        std::fs::read_dir(harness.media.path().join("uploads/recipe"))
            .expect("upload dir")
            .count(),
        1
    );
}
