//! The push socket.
//!
//! One connection per session. Text frames are forwarded to the session over
//! an unbounded channel; everything else is ignored. When the socket closes or
//! fails the channel ends and is never reopened.

use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use url::Url;

/// Socket URL for the site: `http` maps to `ws`, `https` to `wss`
pub fn socket_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut url = base.join(path)?;
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    // Swapping between the special schemes http(s) and ws(s) is always allowed
    if url.set_scheme(scheme).is_err() {
        return Url::parse(&format!("{}://{}", scheme, &url[url::Position::BeforeHost..]));
    }
    Ok(url)
}

/// Receiving end of the push socket
#[derive(Debug)]
pub struct PushChannel {
    frames: mpsc::UnboundedReceiver<String>,
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PushChannel {
    /// Open the socket in the background. `cookie` is sent with the
    /// handshake so the server sees the same session as the page.
    pub fn connect(url: Url, cookie: Option<String>) -> Self {
        let (tx, frames) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(run(url, cookie, tx, Arc::clone(&active)));
        Self {
            frames,
            active,
            task,
        }
    }

    /// Next received frame, if one is waiting
    pub fn try_next(&mut self) -> Option<String> {
        match self.frames.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.active.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    /// Wait for the next frame; `None` once the socket has ended
    pub async fn next(&mut self) -> Option<String> {
        let frame = self.frames.recv().await;
        if frame.is_none() {
            self.active.store(false, Ordering::SeqCst);
        }
        frame
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    url: Url,
    cookie: Option<String>,
    tx: mpsc::UnboundedSender<String>,
    active: Arc<AtomicBool>,
) {
    let result = listen(&url, cookie, &tx).await;
    active.store(false, Ordering::SeqCst);
    match result {
        Ok(()) => tracing::warn!("Notification socket {} closed", url),
        Err(e) => tracing::warn!("Notification socket {} failed: {}", url, e),
    }
}

async fn listen(
    url: &Url,
    cookie: Option<String>,
    tx: &mpsc::UnboundedSender<String>,
) -> anyhow::Result<()> {
    let mut request = url.as_str().into_client_request()?;
    if let Some(cookie) = cookie {
        request.headers_mut().insert(COOKIE, HeaderValue::from_str(&cookie)?);
    }

    let (mut socket, _) = tokio_tungstenite::connect_async(request).await?;
    tracing::info!("Notification socket connected: {}", url);

    while let Some(message) = socket.next().await {
        match message? {
            Message::Text(text) => {
                if tx.send(text.as_str().to_owned()).is_err() {
                    // Receiver gone, the session was dropped
                    return Ok(());
                }
            }
            Message::Close(frame) => {
                tracing::debug!("Close frame received: {:?}", frame);
                return Ok(());
            }
            _ => {}
        }
    }
    Ok(())
}
