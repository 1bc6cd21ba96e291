//! Mock API tests for the blocking client.
//!
//! The blocking client owns its own runtime, so it is created, used and
//! dropped inside `spawn_blocking` while wiremock runs on the test runtime.

use std::time::Duration;

use serde_json::json;
use shuttleai::options::ClientOptions;
use shuttleai::{
    BlockingShuttleAi, ChatMessage, ChatRequest, ClientConfig, ClientError, VideoJobStatus,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn blocking_client(base_url: String) -> BlockingShuttleAi {
    let options = ClientOptions::new()
        .with_api_key("test-api-key")
        .with_base_url(base_url);
    let config = ClientConfig::resolve_with(options, |_| None).unwrap();
    BlockingShuttleAi::from_config(config).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_chat_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi there"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1", mock_server.uri());
    let content = tokio::task::spawn_blocking(move || {
        let client = blocking_client(base_url);
        let response = client
            .chat()
            .create(ChatRequest::new([ChatMessage::user("Hello")]))
            .unwrap();
        response.first_content().map(str::to_string)
    })
    .await
    .unwrap();

    assert_eq!(content.as_deref(), Some("Hi there"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_chat_stream() {
    let mock_server = MockServer::start().await;

    let body = concat!(
        "data: {\"id\":\"c\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",",
        "\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hi\"}}]}\n\n",
        "data: {\"id\":\"c\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",",
        "\"choices\":[{\"index\":0,\"delta\":{\"content\":\"!\"}}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"never\":\"parsed\"}\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1", mock_server.uri());
    let pieces = tokio::task::spawn_blocking(move || {
        let client = blocking_client(base_url);
        client
            .chat()
            .create_stream(ChatRequest::new([ChatMessage::user("Hello")]))
            .unwrap()
            .map(|chunk| chunk.unwrap().delta_content().unwrap_or_default().to_string())
            .collect::<Vec<_>>()
    })
    .await
    .unwrap();

    assert_eq!(pieces, vec!["Hi", "!"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_video_poll_and_save() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/video/generations/jobs/job-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "job-9", "status": "queued"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/video/generations/jobs/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-9",
            "status": "succeeded",
            "generations": [{
                "id": "gen-9",
                "output": {"video_url": format!("{}/files/gen-9.mp4", mock_server.uri())}
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/gen-9.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4".to_vec()))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1", mock_server.uri());
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("gen-9.mp4");
    let save_to = target.clone();

    let status = tokio::task::spawn_blocking(move || {
        let client = blocking_client(base_url);
        let job = client
            .video()
            .wait_for_completion("job-9", Duration::from_millis(5))
            .unwrap();
        let video = job.first_video().unwrap();
        client.video().save_to_file(video, &save_to).unwrap();
        job.status
    })
    .await
    .unwrap();

    assert_eq!(status, VideoJobStatus::Succeeded);
    assert_eq!(std::fs::read(&target).unwrap(), b"mp4");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_missing_video_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/video/generations/jobs/job-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-3",
            "status": "succeeded",
            "generations": [{"id": "gen-3", "output": {}}]
        })))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1", mock_server.uri());
    let err = tokio::task::spawn_blocking(move || {
        let client = blocking_client(base_url);
        let job = client.video().get_job_status("job-3").unwrap();
        client.video().download(job.first_video().unwrap()).unwrap_err()
    })
    .await
    .unwrap();

    assert!(matches!(err, ClientError::MissingVideoUrl));
}
