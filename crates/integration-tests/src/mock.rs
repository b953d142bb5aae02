//! In-process stand-in for the spreadsheet web-app backend.
//!
//! Speaks the same surface the real backend does: one `/exec` endpoint
//! answering `?action=get_products` GETs, plain GETs (ping), and order
//! POSTs, plus the derived `/pub` CSV export path. Response bodies are
//! injected per test, so each test chooses how broken its backend is.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

/// What the mock backend serves, fixed at startup.
#[derive(Clone)]
pub struct MockBackend {
    /// Body of `GET /exec?action=get_products`.
    products_body: Arc<String>,
    /// Body of the CSV export; `None` serves 404 (sheet not published).
    csv_body: Arc<Option<String>>,
    /// Body of every `POST /exec`.
    submit_body: Arc<String>,
    /// Delay before answering a POST, for in-flight overlap tests.
    submit_delay: Duration,
    /// Count of POSTs received.
    posts: Arc<AtomicUsize>,
}

async fn exec_get(
    State(mock): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> String {
    if params.get("action").map(String::as_str) == Some("get_products") {
        mock.products_body.to_string()
    } else {
        r#"{"status":"success","message":"Farmstand API is running"}"#.to_string()
    }
}

async fn exec_post(State(mock): State<MockBackend>, _body: String) -> String {
    mock.posts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    tokio::time::sleep(mock.submit_delay).await;
    mock.submit_body.to_string()
}

async fn csv_get(State(mock): State<MockBackend>) -> Response {
    match mock.csv_body.as_ref() {
        Some(text) => text.clone().into_response(),
        None => (StatusCode::NOT_FOUND, "not published").into_response(),
    }
}

/// Serve a mock backend on an ephemeral local port.
///
/// Returns the bound address and the POST counter.
///
/// # Panics
///
/// Panics if the listener cannot bind, which only happens when the host has
/// no free ephemeral ports.
pub async fn serve(
    products_body: &str,
    csv_body: Option<&str>,
    submit_body: &str,
    submit_delay: Duration,
) -> (SocketAddr, Arc<AtomicUsize>) {
    let posts = Arc::new(AtomicUsize::new(0));
    let mock = MockBackend {
        products_body: Arc::new(products_body.to_string()),
        csv_body: Arc::new(csv_body.map(ToString::to_string)),
        submit_body: Arc::new(submit_body.to_string()),
        submit_delay,
        posts: Arc::clone(&posts),
    };

    let app = Router::new()
        .route("/exec", get(exec_get).post(exec_post))
        .route("/pub", get(csv_get))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        // Serve until the test runtime shuts down
        let _ = axum::serve(listener, app).await;
    });

    (addr, posts)
}
