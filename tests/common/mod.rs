//! In-process stand-in for a Ghost server.
//!
//! Runs an axum app on its own thread and runtime, records every request it
//! receives and answers with scripted replies in order. Once the script runs
//! out it answers 404 with a Ghost error envelope.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ghost_admin::AdminClient;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Test key: id "test123", secret "secretkey123"
pub const VALID_KEY: &str = "test123:7365637265746b6579313233";

pub const API_PREFIX: &str = "/ghost/api/admin";

const NOT_FOUND_BODY: &str =
    r#"{"errors":[{"message":"Resource not found error, cannot read post.","context":null,"type":"NotFoundError"}]}"#;

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query, e.g. "/ghost/api/admin/posts/?formats=html"
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    /// Decoded JOSE header of the bearer token
    pub fn token_header(&self) -> Value {
        self.token_segment(0)
    }

    pub fn token_claims(&self) -> Value {
        self.token_segment(1)
    }

    fn token_segment(&self, index: usize) -> Value {
        let auth = self.header("authorization").expect("missing Authorization header");
        let token = auth.strip_prefix("Ghost ").expect("Authorization is not a Ghost token");
        let segment = token.split('.').nth(index).expect("token has too few segments");
        let bytes = URL_SAFE_NO_PAD.decode(segment).expect("token segment is not base64url");
        serde_json::from_slice(&bytes).expect("token segment is not JSON")
    }
}

#[derive(Default)]
struct Shared {
    requests: Mutex<Vec<Recorded>>,
    replies: Mutex<VecDeque<Reply>>,
}

struct Reply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

pub struct MockGhost {
    pub url: String,
    shared: Arc<Shared>,
}

impl MockGhost {
    /// Start a mock server on a random local port
    pub fn start() -> Self {
        let shared = Arc::new(Shared::default());

        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = std_listener.local_addr().expect("mock server address");
        std_listener
            .set_nonblocking(true)
            .expect("set mock listener non-blocking");

        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&shared));

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build mock server runtime");
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener)
                    .expect("adopt mock listener");
                axum::serve(listener, app).await
            })
            .expect("mock server failed");
        });

        MockGhost {
            url: format!("http://{}", addr),
            shared,
        }
    }

    /// Queue a reply with a raw body
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.push(status, body, None)
    }

    /// Queue a reply that is held back for `delay` before it is written
    pub fn reply_after(&self, delay: Duration, status: u16, body: &str) -> &Self {
        self.push(status, body, Some(delay))
    }

    fn push(&self, status: u16, body: &str, delay: Option<Duration>) -> &Self {
        self.shared.replies.lock().unwrap().push_back(Reply {
            status,
            body: body.to_string(),
            delay,
        });
        self
    }

    /// Queue a reply with a JSON body
    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.reply(status, &body.to_string())
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Client pointed at this server with a valid key
    pub fn client(&self) -> AdminClient {
        self.client_with_key(VALID_KEY)
    }

    pub fn client_with_key(&self, api_key: &str) -> AdminClient {
        AdminClient::new(&self.url, api_key).expect("failed to build client")
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        uri: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers,
        body: body.to_vec(),
    });

    let reply = shared
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply {
            status: 404,
            body: NOT_FOUND_BODY.to_string(),
            delay: None,
        });

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

/// True when `needle` occurs somewhere in `haystack`
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
