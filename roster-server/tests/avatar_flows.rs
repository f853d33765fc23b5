use std::io::Cursor;

use axum::http::StatusCode;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use serde_json::{Value, json};

mod support;

use support::{bearer, build_test_server};

async fn register(server: &TestServer) -> String {
    let response = server
        .post("/users")
        .json(&json!({
            "name": "Alice Smith",
            "email": "alice@example.com",
            "password": "hunter2hunter2"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["token"].as_str().expect("token present").to_string()
}

fn sample_image(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_fn(
        width,
        height,
        |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 64]),
    ));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("fixture encodes");
    out.into_inner()
}

fn avatar_form(bytes: Vec<u8>, filename: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "avatar",
        Part::bytes(bytes).file_name(filename.to_string()),
    )
}

#[tokio::test]
async fn upload_normalizes_and_round_trips() {
    let server = build_test_server();
    let token = register(&server).await;

    let png = sample_image(640, 480, image::ImageFormat::Png);
    let response = server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(png, "portrait.png"))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    let stored = response.as_bytes().to_vec();
    let decoded = image::load_from_memory(&stored).expect("stored blob decodes");
    assert_eq!((decoded.width(), decoded.height()), (250, 250));
}

#[tokio::test]
async fn jpeg_uploads_are_accepted_and_stored_as_png() {
    let server = build_test_server();
    let token = register(&server).await;

    let jpeg = sample_image(300, 200, image::ImageFormat::Jpeg);
    server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(jpeg, "photo.jpeg"))
        .await
        .assert_status_ok();

    let stored = server
        .get("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await
        .as_bytes()
        .to_vec();
    assert_eq!(
        image::guess_format(&stored).expect("format"),
        image::ImageFormat::Png
    );
}

#[tokio::test]
async fn disallowed_extension_is_rejected_before_processing() {
    let server = build_test_server();
    let token = register(&server).await;

    // Valid image bytes, wrong declared name: the filename screen fires.
    let png = sample_image(100, 100, image::ImageFormat::Png);
    let response = server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(png, "animation.gif"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Nothing was stored.
    server
        .get("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let server = build_test_server();
    let token = register(&server).await;

    let response = server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(vec![0u8; 1_000_001], "big.png"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undecodable_upload_is_rejected() {
    let server = build_test_server();
    let token = register(&server).await;

    let response = server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(b"not an image at all".to_vec(), "fake.png"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_avatar_field_is_rejected() {
    let server = build_test_server();
    let token = register(&server).await;

    let form = MultipartForm::new().add_part(
        "portrait",
        Part::bytes(sample_image(100, 100, image::ImageFormat::Png))
            .file_name("portrait.png"),
    );
    let response = server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn retrieval_and_deletion_lifecycle() {
    let server = build_test_server();
    let token = register(&server).await;

    // No avatar yet: explicit 404, not an empty success.
    server
        .get("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let png = sample_image(250, 250, image::ImageFormat::Png);
    server
        .post("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .multipart(avatar_form(png, "me.png"))
        .await
        .assert_status_ok();

    server
        .delete("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    server
        .get("/users/me/avatar")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn avatar_routes_require_authentication() {
    let server = build_test_server();

    server
        .get("/users/me/avatar")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .post("/users/me/avatar")
        .multipart(avatar_form(
            sample_image(10, 10, image::ImageFormat::Png),
            "me.png",
        ))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
