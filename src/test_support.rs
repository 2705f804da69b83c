//! In-process HTTP server standing in for the feed host and the Bot API.

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const TEST_BOT_TOKEN: &str = "TESTTOKEN";

/// What `GET /feed` answers with.
#[derive(Clone)]
pub enum FeedResponse {
    Body(String),
    Status(u16),
    EchoUserAgent,
}

/// How `sendMessage` treats incoming posts.
#[derive(Clone)]
pub enum SendBehaviour {
    Accept,
    /// Answer 403 for these 1-based attempt numbers, accept the rest
    Forbid(Vec<usize>),
    ApiRejects,
}

struct ServerState {
    feed: FeedResponse,
    send: SendBehaviour,
    sent: Mutex<Vec<HashMap<String, String>>>,
}

pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    pub fn feed_url(&self) -> String {
        format!("http://{}/feed", self.addr)
    }

    pub fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every form posted to `sendMessage`, including rejected ones.
    pub fn sent_messages(&self) -> Vec<HashMap<String, String>> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent_messages()
            .into_iter()
            .map(|mut fields| fields.remove("text").unwrap_or_default())
            .collect()
    }
}

pub async fn spawn_server(feed: FeedResponse) -> TestServer {
    spawn_server_with(feed, SendBehaviour::Accept).await
}

pub async fn spawn_server_with(feed: FeedResponse, send: SendBehaviour) -> TestServer {
    let state = Arc::new(ServerState {
        feed,
        send,
        sent: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/feed", get(serve_feed))
        .route(
            &format!("/bot{}/sendMessage", TEST_BOT_TOKEN),
            post(send_message),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { addr, state }
}

/// Answers one request with a 200 whose body stops short of its `Content-Length`.
pub async fn spawn_cut_off_reply_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"ok\":tr",
            )
            .await
            .unwrap();
        socket.flush().await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

// Consume headers plus the declared body so closing the socket is a clean FIN.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&request).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

async fn serve_feed(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    match &state.feed {
        FeedResponse::Body(body) => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            body.clone(),
        )
            .into_response(),
        FeedResponse::Status(code) => StatusCode::from_u16(*code).unwrap().into_response(),
        FeedResponse::EchoUserAgent => headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
            .into_response(),
    }
}

async fn send_message(
    State(state): State<Arc<ServerState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let attempt = {
        let mut sent = state.sent.lock().unwrap();
        sent.push(fields);
        sent.len()
    };

    match &state.send {
        SendBehaviour::Forbid(attempts) if attempts.contains(&attempt) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })),
        )
            .into_response(),
        SendBehaviour::ApiRejects => Json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        }))
        .into_response(),
        _ => Json(json!({ "ok": true, "result": { "message_id": attempt } })).into_response(),
    }
}

/// Build one `<item>` element; `None` leaves the child out entirely.
pub fn rss_item(title: Option<&str>, link: Option<&str>) -> String {
    let mut item = String::from("<item>");
    if let Some(title) = title {
        item.push_str(&format!("<title>{}</title>", title));
    }
    if let Some(link) = link {
        item.push_str(&format!("<link>{}</link>", link));
    }
    item.push_str("<description>Press release</description></item>");
    item
}

pub fn rss_document(items: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <rss version=\"2.0\"><channel>\
         <title>Press Releases</title>\
         <link>https://www.state.gov/</link>\
         <description>Latest press releases</description>\
         {}</channel></rss>",
        items.concat()
    )
}
