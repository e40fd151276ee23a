use super::*;
use crate::test_support::{spawn_emotion_server, Reply};
use axum::http::StatusCode;
use serde_json::json;
use shared::domain::RecommendationCategory;

fn clip() -> SelectedFile {
    SelectedFile::new("voice-note.wav", Some("audio/wav".into()), b"RIFF-audio".to_vec())
        .expect("file")
}

fn service(url: &str) -> HttpEmotionService {
    HttpEmotionService::new(url, Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn predict_uploads_multipart_audio_field() {
    let server = spawn_emotion_server(
        Reply::ok(json!({ "emotion": "Happy", "status": "success" })),
        Reply::ok(json!({ "recommendations": {} })),
    )
    .await;

    let emotion = service(&server.url).predict(&clip()).await.expect("predict");
    assert_eq!(emotion.as_str(), "Happy");

    let uploads = server.uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].name.as_deref(), Some("audio"));
    assert_eq!(uploads[0].filename.as_deref(), Some("voice-note.wav"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("audio/wav"));
    assert_eq!(uploads[0].bytes, b"RIFF-audio".to_vec());
}

#[tokio::test]
async fn predict_rejects_missing_or_blank_emotion() {
    for body in [json!({}), json!({ "emotion": "" }), json!({ "emotion": "   " })] {
        let server = spawn_emotion_server(Reply::ok(body.clone()), Reply::ok(json!({}))).await;
        let err = service(&server.url)
            .predict(&clip())
            .await
            .expect_err("invalid body");
        assert!(
            matches!(err, WorkflowError::PredictionResponseInvalid(_)),
            "body {body} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn predict_rejects_non_json_and_wrongly_typed_emotion() {
    let server = spawn_emotion_server(
        Reply::raw(StatusCode::OK, "not json"),
        Reply::ok(json!({})),
    )
    .await;
    let err = service(&server.url).predict(&clip()).await.expect_err("not json");
    assert!(matches!(err, WorkflowError::PredictionResponseInvalid(_)));

    let server =
        spawn_emotion_server(Reply::ok(json!({ "emotion": 3 })), Reply::ok(json!({}))).await;
    let err = service(&server.url).predict(&clip()).await.expect_err("number");
    assert!(matches!(err, WorkflowError::PredictionResponseInvalid(_)));
}

#[tokio::test]
async fn predict_non_2xx_surfaces_service_error_message() {
    let server = spawn_emotion_server(
        Reply::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "model not loaded" }),
        ),
        Reply::ok(json!({})),
    )
    .await;

    let err = service(&server.url).predict(&clip()).await.expect_err("500");
    let WorkflowError::PredictionRequestFailed(reason) = err.clone() else {
        panic!("expected request failure, got {err:?}");
    };
    assert!(reason.contains("500"), "{reason}");
    assert!(reason.contains("model not loaded"), "{reason}");
}

#[tokio::test]
async fn predict_connection_refused_is_request_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = service(&format!("http://{addr}"))
        .predict(&clip())
        .await
        .expect_err("refused");
    assert!(matches!(err, WorkflowError::PredictionRequestFailed(_)));
}

#[tokio::test]
async fn recommend_posts_emotion_and_accepts_partial_set() {
    let server = spawn_emotion_server(
        Reply::ok(json!({ "emotion": "happy" })),
        Reply::ok(json!({
            "status": "success",
            "recommendations": {
                "music": {
                    "title": "Here Comes the Sun",
                    "url": "https://www.youtube.com/watch?v=KQetemT1sWc",
                    "thumbnail": "https://i.ytimg.com/vi/KQetemT1sWc/mqdefault.jpg"
                },
                "movie": null,
                "book": null
            }
        })),
    )
    .await;

    let emotion = EmotionLabel::new("happy").expect("label");
    let set = service(&server.url).recommend(&emotion).await.expect("recommend");
    assert_eq!(
        set.get(RecommendationCategory::Music).map(|r| r.title.as_str()),
        Some("Here Comes the Sun")
    );
    assert!(set.movie.is_none());
    assert!(set.book.is_none());

    let requests = server.recommendation_requests.lock().await;
    assert_eq!(requests.as_slice(), &[json!({ "emotion": "happy" })]);
}

#[tokio::test]
async fn predicted_label_is_forwarded_exactly_as_received() {
    let server = spawn_emotion_server(
        Reply::ok(json!({ "emotion": " Sad " })),
        Reply::ok(json!({ "recommendations": {} })),
    )
    .await;
    let client = service(&server.url);

    let emotion = client.predict(&clip()).await.expect("predict");
    assert_eq!(emotion.as_str(), " Sad ");
    client.recommend(&emotion).await.expect("recommend");

    let requests = server.recommendation_requests.lock().await;
    assert_eq!(requests.as_slice(), &[json!({ "emotion": " Sad " })]);
}

#[tokio::test]
async fn recommend_empty_object_is_success() {
    let server = spawn_emotion_server(
        Reply::ok(json!({ "emotion": "neutral" })),
        Reply::ok(json!({ "recommendations": {} })),
    )
    .await;
    let emotion = EmotionLabel::new("neutral").expect("label");
    let set = service(&server.url).recommend(&emotion).await.expect("recommend");
    assert!(set.is_empty());
}

#[tokio::test]
async fn recommend_rejects_non_object_bodies() {
    for body in [
        json!([]),
        json!("nothing"),
        json!({ "recommendations": [] }),
        json!({ "recommendations": { "music": { "url": "https://x" } } }),
    ] {
        let server =
            spawn_emotion_server(Reply::ok(json!({ "emotion": "sad" })), Reply::ok(body.clone()))
                .await;
        let emotion = EmotionLabel::new("sad").expect("label");
        let err = service(&server.url)
            .recommend(&emotion)
            .await
            .expect_err("invalid");
        assert!(
            matches!(err, WorkflowError::RecommendationResponseInvalid(_)),
            "body {body} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn recommend_timeout_is_request_failure() {
    let server = spawn_emotion_server(
        Reply::ok(json!({ "emotion": "sad" })),
        Reply::ok(json!({ "recommendations": {} })).delayed(Duration::from_secs(3)),
    )
    .await;
    let client = HttpEmotionService::new(&server.url, Duration::from_millis(300)).expect("client");
    let emotion = EmotionLabel::new("sad").expect("label");

    let err = client.recommend(&emotion).await.expect_err("timeout");
    assert_eq!(
        err,
        WorkflowError::RecommendationRequestFailed("request timed out".into())
    );
}

#[test]
fn trailing_slash_is_trimmed_from_server_url() {
    let client = service("http://localhost:5000/");
    assert_eq!(client.server_url(), "http://localhost:5000");
}
