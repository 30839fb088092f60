//! Tests for pool administration and runtime settings.

mod common;

use axum::http::StatusCode;
use common::fixtures;
use common::{assert_json_error, assert_ok, assert_status, TestApp};
use inkframe::models::ImageRecord;
use pretty_assertions::assert_eq;
use serde_json::json;

async fn upload_three(app: &TestApp) -> Vec<ImageRecord> {
    let mut records = Vec::new();
    for (name, color) in [
        ("red.png", [255, 0, 0]),
        ("green.png", [0, 255, 0]),
        ("blue.png", [0, 0, 255]),
    ] {
        records.push(app.upload(name, fixtures::solid_png(16, 8, color)).await);
    }
    records
}

async fn current_image(app: &TestApp) -> Option<ImageRecord> {
    let response = app.get("/api/images/current").await;
    (response.status == StatusCode::OK).then(|| response.json())
}

#[tokio::test]
async fn test_list_images_newest_first() {
    let app = TestApp::new();
    let uploaded = upload_three(&app).await;

    let response = app.get("/api/admin/images").await;
    assert_ok(&response);

    let listed: Vec<ImageRecord> = response.json();
    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![uploaded[2].id, uploaded[1].id, uploaded[0].id]);
}

#[tokio::test]
async fn test_favorite_roundtrip() {
    let app = TestApp::new();
    let uploaded = upload_three(&app).await;
    let id = uploaded[1].id;

    let response = app.post(&format!("/api/admin/images/{id}/favorite")).await;
    assert_ok(&response);
    let record: ImageRecord = response.json();
    assert!(record.is_favorite);

    let favorites: Vec<ImageRecord> = app.get("/api/admin/favorites").await.json();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, id);

    let response = app.delete(&format!("/api/admin/images/{id}/favorite")).await;
    assert_ok(&response);
    let record: ImageRecord = response.json();
    assert!(!record.is_favorite);

    let favorites: Vec<ImageRecord> = app.get("/api/admin/favorites").await.json();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_favorite_unknown_image() {
    let app = TestApp::new();

    let response = app.post("/api/admin/images/42/favorite").await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tick_rotates_current_image() {
    let app = TestApp::new();
    let uploaded = upload_three(&app).await;

    assert_eq!(current_image(&app).await.map(|r| r.id), Some(uploaded[0].id));

    let outcome = app.state.scheduler.tick().await;
    assert_eq!(outcome.rotated_out, Some(uploaded[0].id));
    assert_eq!(outcome.remaining, 2);

    assert_eq!(current_image(&app).await.map(|r| r.id), Some(uploaded[1].id));
}

#[tokio::test]
async fn test_favorite_refills_empty_pool() {
    let app = TestApp::new();
    let record = app.upload("only.png", fixtures::red_blue_png()).await;
    app.post(&format!("/api/admin/images/{}/favorite", record.id))
        .await;

    let outcome = app.state.scheduler.tick().await;
    assert_eq!(outcome.rotated_out, Some(record.id));
    assert_eq!(outcome.promoted, Some(record.id));
    assert!(!outcome.pool_empty);

    let current = current_image(&app).await.expect("favorite should be current");
    assert_eq!(current.id, record.id);
    assert!(current.last_queued_at >= record.last_queued_at);
}

#[tokio::test]
async fn test_pool_drains_without_favorites() {
    let app = TestApp::new();
    app.upload("only.png", fixtures::red_blue_png()).await;

    let outcome = app.state.scheduler.tick().await;
    assert!(outcome.pool_empty);
    assert!(current_image(&app).await.is_none());

    // Rotated-out images stay listed, just hidden
    let listed: Vec<ImageRecord> = app.get("/api/admin/images").await.json();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_visible);
}

#[tokio::test]
async fn test_requeue_moves_image_to_back() {
    let app = TestApp::new();
    let uploaded = upload_three(&app).await;

    // Rotate out the first image, then bring it back
    app.state.scheduler.tick().await;
    let armed = app.state.scheduler.next_run_at();

    let response = app
        .post(&format!("/api/admin/images/{}/requeue", uploaded[0].id))
        .await;
    assert_ok(&response);
    let record: ImageRecord = response.json();
    assert!(record.is_visible);

    assert_eq!(
        app.state.scheduler.next_run_at(),
        armed,
        "Requeue must not move the timer"
    );

    // Order is now green, blue, red
    let mut order = Vec::new();
    for _ in 0..3 {
        order.push(current_image(&app).await.expect("pool not empty").id);
        app.state.scheduler.tick().await;
    }
    assert_eq!(order, vec![uploaded[1].id, uploaded[2].id, uploaded[0].id]);
}

#[tokio::test]
async fn test_requeue_unknown_image() {
    let app = TestApp::new();

    let response = app.post("/api/admin/images/7/requeue").await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_image() {
    let app = TestApp::new();
    let record = app.upload("gone.png", fixtures::red_blue_png()).await;

    let response = app.delete(&format!("/api/admin/images/{}", record.id)).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    assert_json_error(
        &app.get(&format!("/api/images/{}/bitmap", record.id)).await,
        StatusCode::NOT_FOUND,
    );
    assert!(app.state.artifacts.get(&record.raster_key).await.unwrap().is_none());
    assert!(app.state.artifacts.get(&record.rendered_key).await.unwrap().is_none());

    let response = app.delete(&format!("/api/admin/images/{}", record.id)).await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_keeps_shared_bitmap() {
    let app = TestApp::new();
    let a = app.upload("a.png", fixtures::red_blue_png()).await;
    let b = app.upload("b.png", fixtures::red_blue_png()).await;

    let response = app.delete(&format!("/api/admin/images/{}", a.id)).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/images/{}/bitmap", b.id)).await;
    assert_ok(&response);
}

#[tokio::test]
async fn test_settings_defaults() {
    let app = TestApp::new();

    let response = app.get("/api/admin/settings").await;
    assert_ok(&response);

    let settings: serde_json::Value = response.json();
    assert_eq!(settings["rotation_interval_hours"], 4);
    assert_eq!(settings["default_image_duration_hours"], 24);
    assert_eq!(settings["dithering_enabled"], true);
}

#[tokio::test]
async fn test_update_settings() {
    let app = TestApp::new();

    let body = json!({
        "rotation_interval_hours": 12,
        "default_image_duration_hours": 6,
        "dithering_enabled": false,
        "sharpen_sigma": 0.0,
        "saturation_multiplier": 1.0,
        "contrast_multiplier": 1.0,
        "gamma": 1.0
    });
    let response = app.put_json("/api/admin/settings", &body).await;
    assert_ok(&response);

    let stored: serde_json::Value = app.get("/api/admin/settings").await.json();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_settings_drive_rotation_interval() {
    let app = TestApp::new();
    app.put_json(
        "/api/admin/settings",
        &json!({ "rotation_interval_hours": 12, "default_image_duration_hours": 24 }),
    )
    .await;
    upload_three(&app).await;

    // Two images left after the tick: 12h / 2 = 6h
    let outcome = app.state.scheduler.tick().await;
    assert_eq!(outcome.remaining, 2);

    let remaining_ms = app.state.scheduler.remaining_ms();
    let six_hours = 6 * 3600 * 1000;
    assert!(remaining_ms <= six_hours && remaining_ms > six_hours - 60_000);
}

#[tokio::test]
async fn test_update_settings_rejects_out_of_range() {
    let app = TestApp::new();

    for body in [
        json!({ "rotation_interval_hours": 0 }),
        json!({ "default_image_duration_hours": 101 }),
        json!({ "gamma": 9.0 }),
        json!({ "saturation_multiplier": 0.1 }),
    ] {
        let response = app.put_json("/api/admin/settings", &body).await;
        assert_json_error(&response, StatusCode::BAD_REQUEST);
    }

    // Nothing was saved
    let stored: serde_json::Value = app.get("/api/admin/settings").await.json();
    assert_eq!(stored["rotation_interval_hours"], 4);
}

#[tokio::test]
async fn test_settings_apply_to_next_upload() {
    let app = TestApp::new();
    let mid_gray = fixtures::solid_png(16, 8, [128, 128, 128]);

    let dithered = app.upload("before.png", mid_gray.clone()).await;
    app.put_json(
        "/api/admin/settings",
        &json!({ "dithering_enabled": false }),
    )
    .await;
    let flat = app.upload("after.png", mid_gray).await;

    assert_ne!(dithered.rendered_key, flat.rendered_key);
}
