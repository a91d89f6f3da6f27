use crate::e2e::helpers;

use helpers::mock_upstream::{fake_audio, FLAKY_PREFIX, JSON_BODY_INPUT, UPSTREAM_API_KEY};
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_text_to_speech(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post(
            "/api/tts/synthesize",
            &json!({ "text": "你好，这是一个测试语音生成的文本。" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("content-type", "audio/mpeg");
    response.assert_header_exists("x-elapsed-seconds");

    let expected = fake_audio("你好，这是一个测试语音生成的文本。");
    assert_eq!(response.body_bytes, expected);
    response.assert_header("x-audio-size", &expected.len().to_string());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_defaults_and_bearer_token_upstream(ctx: &mut TestContext) {
    ctx.client
        .post("/api/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let calls = ctx.upstream.calls();
    assert_eq!(calls.len(), 1);

    let expected_auth = format!("Bearer {}", UPSTREAM_API_KEY);
    assert_eq!(calls[0].authorization.as_deref(), Some(expected_auth.as_str()));

    let payload = &calls[0].payload;
    let defaults = &ctx.config.tts_defaults;
    assert_eq!(payload["input"], "hello");
    assert_eq!(payload["voice"], defaults.voice.as_str());
    assert_eq!(payload["model"], defaults.model.as_str());
    assert_eq!(payload["prompt_audio_url"], defaults.prompt_audio_url.as_str());
    assert_eq!(payload["prompt_text"], defaults.prompt_text.as_str());
    assert_eq!(payload["emo_text"], defaults.emo_text.as_str());
    assert_eq!(payload["use_emo_text"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_custom_voice_settings(ctx: &mut TestContext) {
    ctx.client
        .post(
            "/api/tts/synthesize",
            &json!({
                "text": "custom",
                "voice": "onyx",
                "model": "tts-1",
                "emo_text": "calm",
                "use_emo_text": false
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let payload = &ctx.upstream.calls()[0].payload;
    assert_eq!(payload["voice"], "onyx");
    assert_eq!(payload["model"], "tts-1");
    assert_eq!(payload["emo_text"], "calm");
    assert_eq!(payload["use_emo_text"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_reject_empty_text(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "" }))
        .await
        .unwrap();

    // The mock accepts anything; acceptance is up to the remote service
    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.upstream.inputs(), vec![String::new()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_upstream_rate_limit_to_429(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "fail:429" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::TOO_MANY_REQUESTS)
        .assert_error_message("HTTP 429");
    assert_eq!(ctx.upstream.calls().len(), 1, "client must not retry");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_upstream_validation_error_to_400(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "fail:422" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("rejected 'fail:422'");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_upstream_outage_to_502(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "fail:503" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("HTTP 503");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_json_success_body_as_decode_error(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": JSON_BODY_INPUT }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("failed to decode audio response");
}

#[tokio::test]
async fn it_should_surface_bad_api_key_as_external_error() {
    let ctx = TestContext::with_overrides(&[("TTS_API_KEY", "wrong-key")]).await;

    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("invalid api key");
}

#[tokio::test]
async fn it_should_report_unreachable_upstream_as_network_error() {
    let ctx = TestContext::with_overrides(&[("TTS_BASE_URL", "http://127.0.0.1:9/v1")]).await;

    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("network error");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_request_body(ctx: &mut TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "voice": "alloy" }))
        .await
        .unwrap();

    assert!(response.status.is_client_error());
    assert!(ctx.upstream.calls().is_empty());
}

#[tokio::test]
async fn it_should_retry_transient_upstream_failures_when_configured() {
    let ctx = TestContext::with_overrides(&[
        ("TTS_MAX_RETRIES", "2"),
        ("TTS_RETRY_DELAY_MS", "10"),
    ])
    .await;
    let text = format!("{}hello", FLAKY_PREFIX);

    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": text }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, fake_audio(&text));
    assert_eq!(ctx.upstream.inputs(), vec![text.clone(), text]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_retry_without_configured_retries(ctx: &mut TestContext) {
    let text = format!("{}hello", FLAKY_PREFIX);

    ctx.client
        .post("/api/tts/synthesize", &json!({ "text": text }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_GATEWAY);

    assert_eq!(ctx.upstream.inputs(), vec![text]);
}
