use crate::e2e::helpers;

use helpers::api_client::FormPart;
use helpers::engines::{cloud_audio, FAKE_MP3};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use test_context::test_context;

fn csv_file(content: &[u8]) -> FormPart<'_> {
    FormPart::File {
        name: "file",
        filename: "scripts.csv",
        content,
    }
}

fn entry_names(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_zip_rows_in_input_order(ctx: &TestContext) {
    let csv = b"filename,script_text\na.mp3,First line\nb.wav,Second line\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "application/zip")
        .assert_header("content-disposition", "attachment; filename=neonvox_batch.zip")
        .assert_header_exists("x-request-id");

    let entries = response.zip_entries();
    assert_eq!(entry_names(&entries), vec!["a.mp3", "b.mp3"]);
    assert_eq!(entries[0].1, cloud_audio("First line"));
    assert_eq!(entries[1].1, cloud_audio("Second line"));
    assert_eq!(
        ctx.cloud.texts(),
        vec!["First line".to_string(), "Second line".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_rows_missing_a_value(ctx: &TestContext) {
    let csv = b"filename,script_text\nintro,Hello\n,orphan text\nempty,\noutro,Bye\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let entries = response.zip_entries();
    assert_eq!(entry_names(&entries), vec!["intro.mp3", "outro.mp3"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_abort_batch_at_first_failing_row(ctx: &TestContext) {
    let csv = b"filename,script_text\na.mp3,Works fine\nb.mp3,This will FAIL\nc.mp3,Never reached\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("Row 2 ('b.mp3')");
    assert_eq!(
        ctx.cloud.texts(),
        vec!["Works fine".to_string(), "This will FAIL".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_batch_with_oversized_row_before_synthesis(ctx: &TestContext) {
    let csv = format!(
        "filename,script_text\nshort.mp3,Fine\nlong.mp3,{}\n",
        "x".repeat(2001)
    );

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv.as_bytes())])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Row 'long.mp3' (#2): text exceeds 2000 chars");
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_csv_without_required_columns(ctx: &TestContext) {
    let csv = b"filename,text\na.mp3,Hello\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("CSV appears empty or missing required columns");
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_csv_with_only_blank_rows(ctx: &TestContext) {
    let csv = b"filename,script_text\n,\n  ,  \n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("CSV appears empty");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_utf8_csv(ctx: &TestContext) {
    let csv = b"filename,script_text\na.mp3,caf\xe9\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("CSV must be UTF-8 encoded");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_csv_with_byte_order_mark(ctx: &TestContext) {
    let csv = b"\xef\xbb\xbffilename,script_text\nbom.mp3,Spreadsheet export\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(entry_names(&response.zip_entries()), vec!["bom.mp3"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_file_field(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[FormPart::Text("engine", "cloud")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("CSV file is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_numeric_rate(ctx: &TestContext) {
    let csv = b"filename,script_text\na.mp3,Hello\n";

    let response = ctx
        .client
        .post_multipart(
            "/api/tts-csv",
            &[FormPart::Text("rate", "fast"), csv_file(csv)],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("rate must be a number");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_form_settings_to_local_batch(ctx: &TestContext) {
    let csv = b"filename,script_text\none.mp3,First\ntwo.mp3,Second\n";

    let response = ctx
        .client
        .post_multipart(
            "/api/tts-csv",
            &[
                FormPart::Text("engine", "local"),
                FormPart::Text("voice", "female"),
                FormPart::Text("rate", "180"),
                FormPart::Text("volume", "0.8"),
                csv_file(csv),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let entries = response.zip_entries();
    assert_eq!(entry_names(&entries), vec!["one.mp3", "two.mp3"]);
    assert!(entries.iter().all(|(_, audio)| audio == FAKE_MP3));
    assert_eq!(ctx.transcoder.conversions(), 2);

    let sessions = ctx.local.sessions();
    assert_eq!(sessions.len(), 2);
    for session in &sessions {
        assert_eq!(session.voice.as_deref(), Some("en-gb"));
        assert_eq!(session.rate, Some(180));
        assert_eq!(session.volume, Some(0.8));
    }
    assert!(ctx.cloud.texts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_language_to_cloud_batch(ctx: &TestContext) {
    let csv = b"filename,script_text\nhola.mp3,Hola a todos\n";

    let response = ctx
        .client
        .post_multipart(
            "/api/tts-csv",
            &[FormPart::Text("lang", "es"), csv_file(csv)],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.cloud.languages(), vec!["es".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_last_row_for_duplicate_names(ctx: &TestContext) {
    let csv = b"filename,script_text\nclip.mp3,Take one\nclip.wav,Take two\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let entries = response.zip_entries();
    assert_eq!(entry_names(&entries), vec!["clip.mp3"]);
    assert_eq!(entries[0].1, cloud_audio("Take two"));
}

#[tokio::test]
async fn it_should_report_missing_transcoder_for_local_batch() {
    let ctx = TestContext::build(TestOptions {
        transcoder_available: false,
        ..Default::default()
    })
    .await;
    let csv = b"filename,script_text\na.mp3,Hello\n";

    let response = ctx
        .client
        .post_multipart(
            "/api/tts-csv",
            &[FormPart::Text("engine", "local"), csv_file(csv)],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(ctx.local.sessions().is_empty());
}

#[tokio::test]
async fn it_should_deny_cloud_batch_by_policy() {
    let ctx = TestContext::build(TestOptions {
        allow_cloud: false,
        ..Default::default()
    })
    .await;
    let csv = b"filename,script_text\na.mp3,Hello\n";

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv)])
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(ctx.cloud.texts().is_empty());
}

#[tokio::test]
async fn it_should_reject_upload_over_body_limit() {
    let ctx = TestContext::build(TestOptions {
        max_upload_bytes: 1024,
        ..Default::default()
    })
    .await;
    let csv = format!("filename,script_text\nbig.mp3,{}\n", "x".repeat(4096));

    let response = ctx
        .client
        .post_multipart("/api/tts-csv", &[csv_file(csv.as_bytes())])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("failed to read upload");
    assert!(ctx.cloud.texts().is_empty());
}
