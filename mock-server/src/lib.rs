use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

/// The only API key the mock accepts.
pub const VALID_API_KEY: &str = "mock-api-key";

pub const REQUEST_ID_HEADER: &str = "x-picsmize-request-id";

/// Fetch-mode request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub img_url: Option<String>,
    pub process: Option<String>,
}

pub fn app() -> Router {
    Router::new().route("/image/process", post(process_image))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": false, "message": message }))).into_response()
}

async fn process_image(headers: HeaderMap, body: Bytes) -> Response {
    let key = headers.get("apikey").and_then(|v| v.to_str().ok());
    if key != Some(VALID_API_KEY) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    if body.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Missing image input");
    }

    let input: ProcessRequest = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(_) => return failure(StatusCode::BAD_REQUEST, "Malformed JSON body"),
    };
    let url = input.img_url.as_deref().unwrap_or_default();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "bad image");
    }

    let id = Uuid::new_v4();
    debug!(%id, img_url = url, process = ?input.process, "processing image");
    let output: Value = json!({
        "status": true,
        "input": { "img_url": url, "process": input.process },
        "output": { "src": format!("https://cdn.picsmize.test/{id}.png") },
    });

    let mut response = Json(output).into_response();
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
