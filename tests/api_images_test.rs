//! Tests for upload and the display-facing image endpoints.

mod common;

use axum::http::StatusCode;
use common::fixtures::{self, colors, BMP_PIXEL_OFFSET, BMP_ROW_SIZE, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use common::{assert_bmp, assert_json_error, assert_ok, assert_status, TestApp};
use image::GenericImageView;
use inkframe::models::ImageRecord;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_upload_returns_created_record() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/images?name=beach.png", fixtures::red_blue_png())
        .await;
    assert_status(&response, StatusCode::CREATED);

    let record: ImageRecord = response.json();
    assert_eq!(record.name, "beach.png");
    assert!(record.is_visible, "New uploads join the rotation");
    assert!(!record.is_favorite);
    assert_eq!(record.last_queued_at, record.created_at);
    assert!(record.raster_key.ends_with("-beach.png"));
    assert_eq!(record.rendered_key.len(), 64, "sha256 hex digest");
}

#[tokio::test]
async fn test_upload_strips_client_path() {
    let app = TestApp::new();

    let record = app
        .upload("photos%2Fholiday%2Fsunset.png", fixtures::red_blue_png())
        .await;
    assert_eq!(record.name, "sunset.png");
}

#[tokio::test]
async fn test_upload_without_name_uses_default() {
    let app = TestApp::new();

    let response = app.post_bytes("/api/images", fixtures::red_blue_png()).await;
    assert_status(&response, StatusCode::CREATED);
    let record: ImageRecord = response.json();
    assert_eq!(record.name, "upload");
}

#[tokio::test]
async fn test_upload_rejects_garbage() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/images?name=notes.txt", b"definitely not an image".to_vec())
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let list = app.get("/api/admin/images").await;
    let records: Vec<ImageRecord> = list.json();
    assert!(records.is_empty(), "Failed uploads must not be stored");
}

#[tokio::test]
async fn test_upload_rejects_empty_body() {
    let app = TestApp::new();

    let response = app.post_bytes("/api/images", Vec::new()).await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_current_image_empty_pool() {
    let app = TestApp::new();

    assert_json_error(&app.get("/api/images/current").await, StatusCode::NOT_FOUND);
    assert_json_error(
        &app.get("/api/images/current/bitmap").await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_current_image_is_oldest_visible() {
    let app = TestApp::new();

    let first = app.upload("first.png", fixtures::red_blue_png()).await;
    let _second = app
        .upload("second.png", fixtures::solid_png(16, 8, [0, 255, 0]))
        .await;

    let response = app.get("/api/images/current").await;
    assert_ok(&response);
    let current: ImageRecord = response.json();
    assert_eq!(current.id, first.id);
}

#[tokio::test]
async fn test_current_bitmap_layout() {
    let app = TestApp::new();
    app.upload("split.png", fixtures::red_blue_png()).await;

    let response = app.get("/api/images/current/bitmap").await;
    assert_bmp(&response);

    let bmp = response.bytes();
    assert_eq!(
        response.headers.get("content-length").unwrap(),
        &bmp.len().to_string()
    );
    assert_eq!(bmp.len(), BMP_PIXEL_OFFSET + BMP_ROW_SIZE * DISPLAY_HEIGHT as usize);

    let width = i32::from_le_bytes(bmp[18..22].try_into().unwrap());
    let height = i32::from_le_bytes(bmp[22..26].try_into().unwrap());
    assert_eq!(width, DISPLAY_WIDTH as i32);
    assert_eq!(height, DISPLAY_HEIGHT as i32, "Rows are stored bottom-up");

    // Pure palette colors survive preprocessing, so every row is red then blue
    let red = (colors::RED << 4) | colors::RED;
    let blue = (colors::BLUE << 4) | colors::BLUE;
    let mut expected_row = vec![red; BMP_ROW_SIZE / 2];
    expected_row.extend(vec![blue; BMP_ROW_SIZE / 2]);
    for row in bmp[BMP_PIXEL_OFFSET..].chunks(BMP_ROW_SIZE) {
        assert_eq!(row, expected_row.as_slice());
    }
}

#[tokio::test]
async fn test_bitmap_decodes_with_standard_reader() {
    let app = TestApp::new();
    app.upload("split.png", fixtures::red_blue_png()).await;

    let response = app.get("/api/images/current/bitmap").await;
    assert_bmp(&response);

    let decoded = image::load_from_memory(response.bytes()).expect("BMP should decode");
    assert_eq!(decoded.dimensions(), (DISPLAY_WIDTH, DISPLAY_HEIGHT));

    let rgb = decoded.to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(rgb.get_pixel(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1).0, [0, 0, 255]);
}

#[tokio::test]
async fn test_upload_is_resized_to_display() {
    let app = TestApp::new();
    let record = app
        .upload("large.png", fixtures::solid_png(64, 64, [255, 255, 255]))
        .await;

    let response = app.get(&format!("/api/images/{}/bitmap", record.id)).await;
    assert_bmp(&response);

    let decoded = image::load_from_memory(response.bytes()).unwrap();
    assert_eq!(decoded.dimensions(), (DISPLAY_WIDTH, DISPLAY_HEIGHT));
}

#[tokio::test]
async fn test_bitmap_by_id() {
    let app = TestApp::new();
    let record = app
        .upload("green.png", fixtures::solid_png(16, 8, [0, 255, 0]))
        .await;

    let response = app.get(&format!("/api/images/{}/bitmap", record.id)).await;
    assert_bmp(&response);

    let etag = response.headers.get("etag").unwrap().to_str().unwrap();
    assert_eq!(etag, format!("\"{}\"", record.rendered_key));

    let green = (colors::GREEN << 4) | colors::GREEN;
    assert!(response.bytes()[BMP_PIXEL_OFFSET..]
        .iter()
        .all(|&byte| byte == green));
}

#[tokio::test]
async fn test_bitmap_unknown_id() {
    let app = TestApp::new();

    assert_json_error(&app.get("/api/images/999/bitmap").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identical_uploads_share_bitmap() {
    let app = TestApp::new();

    let a = app.upload("a.png", fixtures::red_blue_png()).await;
    let b = app.upload("b.png", fixtures::red_blue_png()).await;

    assert_ne!(a.id, b.id);
    assert_ne!(a.raster_key, b.raster_key);
    assert_eq!(a.rendered_key, b.rendered_key);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");
    assert_eq!(
        response.headers.get("connection").unwrap(),
        "close",
        "Every response must carry Connection: close"
    );
}
