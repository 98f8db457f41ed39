mod common;

use actix_web::test;
use serde_json::Value;

use common::{trip_json, TestApp};

#[actix_rt::test]
async fn test_weather_forecast_is_aggregated_per_day() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Kyoto", "2025-05-01", "2025-05-04")).await;

    let uri = format!("/api/sessions/{}/weather", id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2025-05-01");
    assert_eq!(days[0]["min_temperature"], 12.0);
    assert_eq!(days[0]["max_temperature"], 22.0);
    assert_eq!(days[0]["mean_temperature"], 16.0);
    assert_eq!(days[0]["weather_code"], 3);
    assert_eq!(days[0]["condition"], "Overcast");

    let req = test::TestRequest::get().uri(&uri).to_request();
    test::call_service(&app, req).await;
    assert_eq!(test_app.hits().weather(), 1);
    assert_eq!(test_app.hits().geocoder(), 1);
}

#[actix_rt::test]
async fn test_weather_window_is_capped_at_a_week() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Kyoto", "2025-05-01", "2025-05-20")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["days"].as_array().unwrap().len(), 7);
}

#[actix_rt::test]
async fn test_weather_for_unknown_destination() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Nowhere", "2025-05-01", "2025-05-04")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(test_app.hits().weather(), 0);
}

#[actix_rt::test]
async fn test_geocoder_retries_transient_failures() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Flaky Town", "2025-05-01", "2025-05-04")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(test_app.hits().geocoder(), 3);

    // failures are not cached, so a retry goes back to the network
    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(test_app.hits().geocoder(), 6);
}

#[actix_rt::test]
async fn test_geocoder_does_not_retry_client_errors() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Missing Town", "2025-05-01", "2025-05-04")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(test_app.hits().geocoder(), 1);
}

#[actix_rt::test]
async fn test_destination_images() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Kyoto", "2025-05-01", "2025-05-04")).await;

    let uri = format!("/api/sessions/{}/images?count=2", id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["query"], "Kyoto");
    assert_eq!(body["images"].as_array().unwrap().len(), 2);
    assert_eq!(body["images"][0], "https://images.example/Kyoto/0.jpg");
    assert!(body.get("message").is_none());

    let req = test::TestRequest::get().uri(&uri).to_request();
    test::call_service(&app, req).await;
    assert_eq!(test_app.hits().images(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/images?count=0", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_image_failures_return_empty_list_with_message() {
    let test_app = TestApp::with_env(&[("IMAGE_SEARCH_ACCESS_KEY", "wrong")]).await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Kyoto", "2025-05-01", "2025-05-04")).await;

    let uri = format!("/api/sessions/{}/images", id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["images"].as_array().unwrap().len(), 0);
    assert!(body["message"].is_string());

    let req = test::TestRequest::get().uri(&uri).to_request();
    test::call_service(&app, req).await;
    assert_eq!(test_app.hits().images(), 2);
}

#[actix_rt::test]
async fn test_weather_without_codes_has_no_condition() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Null Island", "2025-05-01", "2025-05-02")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["mean_temperature"], 16.0);
    assert!(days[0]["weather_code"].is_null());
    assert!(days[0]["condition"].is_null());
}

#[actix_rt::test]
async fn test_geocoder_does_not_retry_unreadable_replies() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let id = test_app.create_session(trip_json("Garbled Town", "2025-05-01", "2025-05-04")).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/weather", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(test_app.hits().geocoder(), 1);
}
