use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(&self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadedField {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    predict_reply: Reply,
    recommend_reply: Reply,
    uploads: Arc<Mutex<Vec<UploadedField>>>,
    recommendation_requests: Arc<Mutex<Vec<Value>>>,
}

pub struct EmotionServer {
    pub url: String,
    pub uploads: Arc<Mutex<Vec<UploadedField>>>,
    pub recommendation_requests: Arc<Mutex<Vec<Value>>>,
}

impl EmotionServer {
    pub async fn predict_calls(&self) -> usize {
        self.uploads.lock().await.len()
    }

    pub async fn recommend_calls(&self) -> usize {
        self.recommendation_requests.lock().await.len()
    }
}

pub async fn spawn_emotion_server(predict_reply: Reply, recommend_reply: Reply) -> EmotionServer {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState {
        predict_reply,
        recommend_reply,
        uploads: Arc::new(Mutex::new(Vec::new())),
        recommendation_requests: Arc::new(Mutex::new(Vec::new())),
    };
    let server = EmotionServer {
        url: format!("http://{addr}"),
        uploads: state.uploads.clone(),
        recommendation_requests: state.recommendation_requests.clone(),
    };
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/get_recommendations", post(get_recommendations))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    server
}

async fn predict(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.uploads.lock().await.push(UploadedField {
            name,
            filename,
            content_type,
            bytes,
        });
    }
    state.predict_reply.respond().await
}

async fn get_recommendations(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Response {
    state.recommendation_requests.lock().await.push(body);
    state.recommend_reply.respond().await
}
