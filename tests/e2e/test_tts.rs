use crate::e2e::helpers;

use helpers::engines::{cloud_audio, FAKE_MP3};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use neonvox_backend::domain::tts::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_text_with_cloud_engine(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({
                "text": "Hello, this is a test message for text to speech.",
                "engine": "cloud",
                "lang": "es"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header("content-disposition", "attachment; filename=neonvox.mp3")
        .assert_header_exists("x-request-id");

    assert_eq!(
        response.body_bytes,
        cloud_audio("Hello, this is a test message for text to speech.")
    );
    assert_eq!(ctx.cloud.languages(), vec!["es".to_string()]);
    assert!(ctx.local.sessions().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_default_engine_and_language(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "Default settings" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.cloud.texts(), vec!["Default settings".to_string()]);
    assert_eq!(ctx.cloud.languages(), vec!["en".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_trim_text_before_synthesis(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "   padded text \n" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.cloud.texts(), vec!["padded text".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_oversized_text_without_calling_engines(ctx: &TestContext) {
    let text = "a".repeat(2001);

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": text }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("text exceeds limit of 2000 characters");
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_text_at_exact_limit(ctx: &TestContext) {
    let text = "é".repeat(2000);

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": text }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "   " }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_engine(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "hello", "engine": "polly" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("engine must be 'cloud' or 'local'");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_out_of_range_volume(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({ "text": "hello", "engine": "local", "volume": 1.5 }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("volume must be between 0.0 and 1.0");
    assert!(ctx.local.sessions().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcode_local_engine_output(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({ "text": "Offline voice", "engine": "local", "rate": 150, "volume": 0.5 }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg");
    assert_eq!(response.body_bytes, FAKE_MP3.to_vec());
    assert_eq!(ctx.transcoder.conversions(), 1);

    let sessions = ctx.local.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].rate, Some(150));
    assert_eq!(sessions[0].volume, Some(0.5));
    assert_eq!(sessions[0].texts, vec!["Offline voice".to_string()]);
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_select_local_voice_by_preference(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({ "text": "Pick a voice", "engine": "local", "voice": "Female" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.local.sessions()[0].voice.as_deref(), Some("en-gb"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_default_voice_when_nothing_matches(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({ "text": "No match", "engine": "local", "voice": "robot" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.local.sessions()[0].voice, None);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_legacy_engine_names(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "legacy", "engine": "pyttsx3" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.transcoder.conversions(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_cloud_failure_to_bad_gateway(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "please FAIL now" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("synthesis failed");
}

#[tokio::test]
async fn it_should_deny_cloud_engine_by_policy() {
    let ctx = TestContext::build(TestOptions {
        allow_cloud: false,
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "hello", "engine": "cloud" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("disabled by server policy");
    assert!(ctx.cloud.texts().is_empty());
}

#[tokio::test]
async fn it_should_report_unavailable_cloud_engine() {
    let ctx = TestContext::build(TestOptions {
        cloud_available: false,
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn it_should_report_missing_transcoder_for_local_engine() {
    let ctx = TestContext::build(TestOptions {
        transcoder_available: false,
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "hello", "engine": "local" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("ffmpeg not installed");
    assert!(ctx.local.sessions().is_empty());
}

#[tokio::test]
async fn it_should_report_missing_local_engine() {
    let ctx = TestContext::build(TestOptions {
        local_available: false,
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "hello", "engine": "local" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("local engine not installed");
}

#[tokio::test]
async fn it_should_honor_configured_limit_and_default_engine() {
    let ctx = TestContext::build(TestOptions {
        default_engine: Engine::Local,
        max_chars: 10,
        ..Default::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "eleven char" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .client
        .post("/api/tts", &json!({ "text": "ten chars!" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.transcoder.conversions(), 1);
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_request_without_text_as_bad_request(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts", &json!({ "engine": "cloud" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("missing field `text`");
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_numeric_rate_as_bad_request(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts",
            &json!({ "text": "hello", "engine": "local", "rate": "fast" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("invalid input");
    assert!(ctx.local.sessions().is_empty());
}
