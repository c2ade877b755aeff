//! Shared mock backends for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[allow(dead_code)]
async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a JSON-RPC node whose answers come from `handler(method, params)`.
///
/// `Err(message)` becomes a JSON-RPC error object. Returns the endpoint URL.
#[allow(dead_code)]
pub async fn start_rpc_node<F>(handler: F) -> String
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    let app = Router::new().route(
        "/",
        post(move |Json(request): Json<Value>| {
            let handler = handler.clone();
            async move {
                let id = request["id"].clone();
                let method = request["method"].as_str().unwrap_or_default();
                let params = &request["params"];
                let response = match handler(method, params) {
                    Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
                    Err(message) => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": { "code": -32601, "message": message }
                    }),
                };
                Json(response)
            }
        }),
    );

    format!("http://{}", serve(app).await)
}

/// Serve NFT metadata documents at `/metadata/{id}`; unknown ids are 404.
///
/// Returns the base URL.
#[allow(dead_code)]
pub async fn start_metadata_host(documents: HashMap<String, Value>) -> String {
    let documents = Arc::new(documents);
    let app = Router::new().route(
        "/metadata/{id}",
        get(move |Path(id): Path<String>| {
            let documents = documents.clone();
            async move {
                documents
                    .get(&id)
                    .cloned()
                    .map(Json)
                    .ok_or(StatusCode::NOT_FOUND)
            }
        }),
    );

    format!("http://{}", serve(app).await)
}

/// In-memory Kubo API: `/api/v0/add` and `/api/v0/cat`.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct MockIpfs {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub auth_headers: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockIpfs {
    /// Start the node and return its base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/api/v0/add", post(add))
            .route("/api/v0/cat", post(cat))
            .with_state(self.clone());

        format!("http://{}", serve(app).await)
    }

    fn record_auth(&self, headers: &HeaderMap) {
        if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            self.auth_headers.lock().unwrap().push(value.to_string());
        }
    }
}

#[allow(dead_code)]
async fn add(
    State(node): State<MockIpfs>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    node.record_auth(&headers);

    let mut data = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        data.extend_from_slice(&field.bytes().await.unwrap());
    }

    let mut objects = node.objects.lock().unwrap();
    let cid = format!("QmMock{}", objects.len());
    let size = data.len();
    objects.insert(cid.clone(), data);

    Json(json!({ "Name": "data", "Hash": cid, "Size": size.to_string() }))
}

#[allow(dead_code)]
async fn cat(
    State(node): State<MockIpfs>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Vec<u8>, StatusCode> {
    node.record_auth(&headers);

    let cid = query.get("arg").ok_or(StatusCode::BAD_REQUEST)?;
    node.objects
        .lock()
        .unwrap()
        .get(cid)
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}
