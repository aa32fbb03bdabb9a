//! End-to-end tests over HTTP against a relay bound on an ephemeral port.

mod common;

use std::sync::Arc;
use std::time::Duration;

use image_relay::provider::MockBackend;
use image_relay::server::SubmitResponse;
use pretty_assertions::assert_eq;
use reqwest::multipart::Form;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{controller_with, fal_backend, png_part, short_timeout, spawn_relay, EDIT_PATH, TEXT_PATH};

async fn post_job(base: &str, form: Form) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/jobs"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

async fn get_json(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn root_reports_liveness() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let (status, body) = get_json(format!("{base}/")).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Backend is running"}));
}

#[tokio::test]
async fn image_upload_scenario_completes_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EDIT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"images": [{"url": "https://x/1.png"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let base = spawn_relay(controller_with(Arc::new(fal_backend(&server)))).await;

    let form = Form::new()
        .text("prompt", "a cat in space")
        .text("model", "image-to-image")
        .part("image", png_part(b"cat", "cat.png"));
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 200);
    let submitted: SubmitResponse = serde_json::from_value(body).unwrap();
    assert_eq!(submitted.status.to_string(), "done");
    assert_eq!(submitted.model.as_str(), "image-to-image");
    assert_eq!(submitted.result, Some(vec!["https://x/1.png".to_string()]));
    assert_eq!(submitted.error, None);

    let (status, job) = get_json(format!("{base}/api/jobs/{}", submitted.job_id)).await;
    assert_eq!(status, 200);
    assert_eq!(job["status"], "done");
    assert_eq!(job["result"], json!(["https://x/1.png"]));
    assert_eq!(job["prompt"], "a cat in space");
}

#[tokio::test]
async fn missing_image_returns_400_and_records_failed_job() {
    let backend = Arc::new(MockBackend::new());
    let base = spawn_relay(controller_with(backend.clone())).await;

    let (status, body) = post_job(&base, Form::new().text("prompt", "a cat in space")).await;

    assert_eq!(status, 400);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["model"], "image-to-image");
    assert!(body["error"].as_str().unwrap().contains("image"));
    assert!(body.get("result").is_none());
    assert_eq!(backend.calls(), 0);

    let job_id = body["job_id"].as_str().unwrap();
    let (status, job) = get_json(format!("{base}/api/jobs/{job_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(job["status"], "failed");
}

#[tokio::test]
async fn upstream_failure_status_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EDIT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    let base = spawn_relay(controller_with(Arc::new(fal_backend(&server)))).await;

    let form = Form::new()
        .text("prompt", "a cat in space")
        .text("image_url", "https://a/1.png");
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 503);
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn upstream_timeout_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EDIT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"images": [{"url": "https://x/late.png"}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let backend = fal_backend(&server).with_timeout(short_timeout());
    let base = spawn_relay(controller_with(Arc::new(backend))).await;

    let form = Form::new()
        .text("prompt", "a cat in space")
        .text("image_urls", "https://a/1.png");
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 500);
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn unknown_job_is_404() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let (status, body) = get_json(format!("{base}/api/jobs/does-not-exist")).await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Job not found"}));
}

#[tokio::test]
async fn missing_prompt_is_rejected_without_creating_a_job() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let form = Form::new().part("image", png_part(b"cat", "cat.png"));
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("prompt"));

    let (_, jobs) = get_json(format!("{base}/api/jobs")).await;
    assert_eq!(jobs, json!([]));
}

#[tokio::test]
async fn url_lists_and_files_reach_remote_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EDIT_PATH))
        .and(body_json(json!({
            "prompt": "merge",
            "image_urls": [
                "data:image/png;base64,Y2F0",
                "https://a/1.png",
                "https://a/2.png",
                "https://a/3.png"
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"images": [{"url": "https://x/merged.png"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let base = spawn_relay(controller_with(Arc::new(fal_backend(&server)))).await;

    let form = Form::new()
        .text("prompt", "merge")
        .text("image_urls", r#"["https://a/1.png", "https://a/2.png"]"#)
        .text("image_url", "https://a/3.png")
        .part("images", png_part(b"cat", "cat.png"));
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["result"], json!(["https://x/merged.png"]));
}

#[tokio::test]
async fn text_to_image_needs_no_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"image": {"url": "https://x/t.png"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let base = spawn_relay(controller_with(Arc::new(fal_backend(&server)))).await;

    let form = Form::new()
        .text("prompt", "a lighthouse")
        .text("model", "text-to-image")
        .part("image", png_part(b"", "empty.png"));
    let (status, body) = post_job(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "done");
    assert_eq!(body["result"], json!(["https://x/t.png"]));
}

#[tokio::test]
async fn listing_returns_all_jobs_in_creation_order() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let (_, first) = post_job(
        &base,
        Form::new()
            .text("prompt", "first")
            .text("image_url", "https://a/1.png"),
    )
    .await;
    let (_, second) = post_job(&base, Form::new().text("prompt", "second")).await;

    let (status, jobs) = get_json(format!("{base}/api/jobs")).await;

    assert_eq!(status, 200);
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["id"], first["job_id"]);
    assert_eq!(jobs[0]["status"], "done");
    assert_eq!(jobs[1]["id"], second["job_id"]);
    assert_eq!(jobs[1]["status"], "failed");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{base}/api/jobs"))
        .header("origin", "http://editor.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn cross_origin_reads_carry_cors_header() {
    let base = spawn_relay(controller_with(Arc::new(MockBackend::new()))).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/api/jobs"))
        .header("origin", "http://editor.example")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
