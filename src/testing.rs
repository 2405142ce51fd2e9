//! Local stand-ins for the site, used by the async tests.
//!
//! `MockSite` is an axum server on `127.0.0.1:0` that answers the membership,
//! rating and comment endpoints the way the real site does, serves vehicle
//! pages carrying the data-attribute contract, and exposes a few utility
//! routes for exercising the dispatcher. `PushServer` is a one-shot socket
//! acceptor that sends a fixed list of frames and closes.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get, post};
use futures::{SinkExt, StreamExt};
use regex::Regex;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response as WsResponse,
};
use url::Url;

use crate::config::Config;

/// Vehicle id the mock site does not know
pub const UNKNOWN_VEHICLE: u64 = 999;
/// Token served in the page's hidden input
pub const PAGE_TOKEN: &str = "page-token";
/// Token served in the `csrftoken` cookie
pub const COOKIE_TOKEN: &str = "cookie-token";

#[derive(Default)]
struct SiteState {
    slow_started: Notify,
    requests: Mutex<Vec<String>>,
    csrf_seen: Mutex<Vec<Option<String>>>,
    favorites: Mutex<HashSet<u64>>,
    garage: Mutex<HashSet<u64>>,
    /// When set, membership answers report this state whatever happened
    forced_state: Mutex<Option<bool>>,
    ratings: Mutex<HashMap<u64, u8>>,
    next_comment: Mutex<u64>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct MockSite {
    addr: SocketAddr,
    state: Arc<SiteState>,
    task: JoinHandle<()>,
}

impl MockSite {
    pub async fn start() -> Self {
        let state = Arc::new(SiteState::default());
        let router = Router::new()
            .route("/echo", any(echo))
            .route("/text", get(|| async { "plain text" }))
            .route("/fail", get(fail))
            .route("/broken-json", get(broken_json))
            .route("/slow", get(slow))
            .route("/vehicle/{id}/", get(vehicle_page))
            .route("/api/{collection}/{action}/{id}/", post(membership))
            .route("/ajax/vehicle/{id}/rate/", post(rate))
            .route("/ajax/comment/new/", post(comment))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { addr, state, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Method and path of every site request, in arrival order
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state.requests).clone()
    }

    /// Requests whose path starts with `prefix`
    pub fn requests_to(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.split_once(' ').is_some_and(|(_, path)| path.starts_with(prefix)))
            .collect()
    }

    /// Anti-forgery header of each mutating request, in arrival order
    pub fn csrf_seen(&self) -> Vec<Option<String>> {
        lock(&self.state.csrf_seen).clone()
    }

    pub fn set_favorite(&self, vehicle_id: u64, member: bool) {
        set_member(&self.state.favorites, vehicle_id, member);
    }

    pub fn set_garage(&self, vehicle_id: u64, member: bool) {
        set_member(&self.state.garage, vehicle_id, member);
    }

    pub fn is_favorite(&self, vehicle_id: u64) -> bool {
        lock(&self.state.favorites).contains(&vehicle_id)
    }

    pub fn in_garage(&self, vehicle_id: u64) -> bool {
        lock(&self.state.garage).contains(&vehicle_id)
    }

    /// Make membership answers report `state` regardless of the request
    pub fn force_state(&self, state: Option<bool>) {
        *lock(&self.state.forced_state) = state;
    }

    /// Resolves once a request to `/slow` has reached the server
    pub async fn wait_for_slow_request(&self) {
        self.state.slow_started.notified().await;
    }
}

impl Drop for MockSite {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn set_member(set: &Mutex<HashSet<u64>>, vehicle_id: u64, member: bool) {
    let mut set = lock(set);
    if member {
        set.insert(vehicle_id);
    } else {
        set.remove(&vehicle_id);
    }
}

/// Configuration pointing at the mock site, notifications off
pub fn config_for(site: &MockSite) -> Config {
    let mut config = Config::default();
    config.site.base_url = site.base_url();
    config.notifications.enabled = false;
    config
}

fn record(state: &SiteState, method: &Method, uri: &Uri, headers: &HeaderMap) {
    lock(&state.requests).push(format!("{} {}", method, uri.path()));
    if !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        lock(&state.csrf_seen).push(header(headers, "x-csrftoken"));
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn csrf_rejected() -> Response {
    (
        StatusCode::FORBIDDEN,
        Html("<h1>Forbidden (403)</h1><p>CSRF verification failed.</p>"),
    )
        .into_response()
}

fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response()
}

async fn echo(
    State(state): State<Arc<SiteState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    record(&state, &method, &uri, &headers);
    axum::Json(json!({
        "method": method.as_str(),
        "query": uri.query(),
        "accept": header(&headers, "accept"),
        "csrf": header(&headers, "x-csrftoken"),
        "cookie": header(&headers, COOKIE.as_str()),
        "content_type": header(&headers, CONTENT_TYPE.as_str()),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn fail() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({"message": "database on fire", "code": 17})),
    )
}

async fn broken_json() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], "{\"success\": tru")
}

async fn slow(State(state): State<Arc<SiteState>>) -> impl IntoResponse {
    state.slow_started.notify_one();
    tokio::time::sleep(Duration::from_millis(300)).await;
    axum::Json(json!({"success": true}))
}

async fn vehicle_page(
    State(state): State<Arc<SiteState>>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri, &headers);
    if id == UNKNOWN_VEHICLE {
        return not_found_page();
    }

    let favorite = lock(&state.favorites).contains(&id);
    let garage = lock(&state.garage).contains(&id);
    let html = format!(
        r#"<!doctype html>
<html lang="zh-Hant">
<head><title>Vehicle {id} | Motry</title></head>
<body>
  <form method="post" action="/vehicle/{id}/rate/">
    <input type="hidden" name="csrfmiddlewaretoken" value="{PAGE_TOKEN}">
  </form>
  <button type="button" class="button" data-favorite-toggle data-vehicle-id="{id}" data-in-favorite="{favorite}">⭐</button>
  <p data-favorite-status></p>
  <button type="button" class="button" data-garage-toggle data-vehicle-id="{id}" data-in-garage="{garage}">❤️</button>
  <p data-garage-status></p>
</body>
</html>"#
    );
    (
        [(SET_COOKIE, format!("csrftoken={}; Path=/; SameSite=Lax", COOKIE_TOKEN))],
        Html(html),
    )
        .into_response()
}

async fn membership(
    State(state): State<Arc<SiteState>>,
    Path((collection, action, id)): Path<(String, String, u64)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri, &headers);
    if header(&headers, "x-csrftoken").is_none() {
        return csrf_rejected();
    }
    if id == UNKNOWN_VEHICLE {
        return not_found_page();
    }

    let (set, state_key, id_key, noun) = match collection.as_str() {
        "favorites" => (&state.favorites, "favorite", "favorite_id", "最愛"),
        "garage" => (&state.garage, "in_garage", "user_vehicle_id", "車庫"),
        _ => return not_found_page(),
    };
    let forced = *lock(&state.forced_state);

    let (status, body) = {
        let mut members = lock(set);
        match action.as_str() {
            "add" if members.contains(&id) => (
                StatusCode::OK,
                json!({"success": false, "message": format!("已在{}中", noun), state_key: true, id_key: id}),
            ),
            "add" => {
                members.insert(id);
                (
                    StatusCode::CREATED,
                    json!({"success": true, "message": format!("已加入{}", noun), state_key: true, id_key: id}),
                )
            }
            "remove" if members.remove(&id) => (
                StatusCode::OK,
                json!({"success": true, "message": format!("已從{}移除", noun), state_key: false}),
            ),
            "remove" => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "message": format!("不在{}中", noun), state_key: false}),
            ),
            _ => return not_found_page(),
        }
    };

    let mut body = body;
    if let Some(forced) = forced {
        body[state_key] = json!(forced);
    }
    (status, axum::Json(body)).into_response()
}

/// Text value of a multipart field
fn form_field(body: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r#"name="{}"\r\n(?:[^\r\n]+\r\n)*\r\n([^\r]*)\r\n"#,
        regex::escape(name)
    );
    Regex::new(&pattern)
        .ok()?
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// File name of a multipart file field
fn form_file(body: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"name="{}"; filename="([^"]*)""#, regex::escape(name));
    Regex::new(&pattern)
        .ok()?
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

async fn rate(
    State(state): State<Arc<SiteState>>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers);
    if header(&headers, "x-csrftoken").is_none() {
        return csrf_rejected();
    }
    if id == UNKNOWN_VEHICLE {
        return not_found_page();
    }

    let body = String::from_utf8_lossy(&body);
    let score = form_field(&body, "score").and_then(|s| s.parse::<u8>().ok());
    let Some(score) = score.filter(|s| (1..=5).contains(s)) else {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({"success": false, "error": "評分無效"})),
        )
            .into_response();
    };

    let created = lock(&state.ratings).insert(id, score).is_none();
    // One other rider already rated every vehicle 5 stars
    let avg = (f64::from(score) + 5.0) / 2.0;
    axum::Json(json!({
        "success": true,
        "created": created,
        "score": score,
        "avg_rating": avg,
        "rating_count": 2,
        "message": if created { "感謝你的評分!" } else { "評分已更新!" },
    }))
    .into_response()
}

async fn comment(
    State(state): State<Arc<SiteState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers);
    if header(&headers, "x-csrftoken").is_none() {
        return csrf_rejected();
    }

    let body = String::from_utf8_lossy(&body);
    let text = form_field(&body, "body_text").unwrap_or_default();
    let post = form_field(&body, "post").and_then(|p| p.parse::<u64>().ok());
    if text.trim().is_empty() || post.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({"success": false, "error": "留言失敗,請檢查輸入"})),
        )
            .into_response();
    }

    let parent = form_field(&body, "parent").and_then(|p| p.parse::<u64>().ok());
    // Comments numbered 300 and up sit at the deepest reply level
    if parent.is_some_and(|p| p >= 300) {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({"success": false, "error": "已達最大回覆深度(3層)"})),
        )
            .into_response();
    }

    let image = form_file(&body, "image")
        .or_else(|| form_field(&body, "image_url"))
        .unwrap_or_default();
    let comment_id = {
        let mut next = lock(&state.next_comment);
        *next += 1;
        *next
    };
    axum::Json(json!({
        "success": true,
        "comment_id": comment_id,
        "comment_html": format!(r#"<div class="comment" data-image="{}"><p>{}</p></div>"#, image, text),
        "parent_id": parent,
        "message": "留言已送出!",
    }))
    .into_response()
}

/// Accepts one socket connection, sends its frames, then closes
pub struct PushServer {
    addr: SocketAddr,
    cookie: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl PushServer {
    pub async fn start(frames: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cookie = Arc::new(Mutex::new(None));

        let seen = Arc::clone(&cookie);
        let task = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let callback =
                move |request: &Request, response: WsResponse| -> Result<WsResponse, ErrorResponse> {
                    *lock(&seen) = header(request.headers(), COOKIE.as_str());
                    Ok(response)
                };
            let Ok(mut socket) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
                return;
            };
            for frame in frames {
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    return;
                }
            }
            let _ = socket.close(None).await;
            while let Some(Ok(_)) = socket.next().await {}
        });

        Self { addr, cookie, task }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("ws://{}/ws/motry/notifications/", self.addr)).unwrap()
    }

    /// `Cookie` header sent with the handshake
    pub fn cookie(&self) -> Option<String> {
        lock(&self.cookie).clone()
    }
}

impl Drop for PushServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_extraction() {
        let body = "--b\r\nContent-Disposition: form-data; name=\"score\"\r\n\r\n4\r\n--b\r\n\
                    Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
                    Content-Type: image/png\r\n\r\nPNG\r\n--b--\r\n";
        assert_eq!(form_field(body, "score").as_deref(), Some("4"));
        assert_eq!(form_file(body, "image").as_deref(), Some("a.png"));
        assert_eq!(form_field(body, "missing"), None);
    }
}
