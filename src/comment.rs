//! Comment submission and the inline reply forms.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::dispatch::{FormData, RequestSpec};
use crate::i18n::Messages;

const COMMENT_PATH: &str = "/ajax/comment/new/";

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment text is empty")]
    EmptyBody,

    #[error("Failed to read image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommentError {
    /// Text shown to the user in the client's locale
    pub fn localized(&self, messages: &Messages) -> String {
        match self {
            CommentError::EmptyBody => messages.comment_empty.to_string(),
            CommentError::Image { path, .. } => format!("{}: {}", messages.image_unreadable, path),
        }
    }
}

/// An uploaded picture
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Read an image from disk, guessing the type from its extension
    pub async fn from_path(path: &Path) -> Result<Self, CommentError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| CommentError::Image {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Ok(Self {
            file_name,
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// A comment being written
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentDraft {
    pub post_id: u64,
    pub body_text: String,
    pub parent_id: Option<u64>,
    pub image_url: Option<String>,
    pub image: Option<ImageAttachment>,
}

impl CommentDraft {
    pub fn new(post_id: u64, body_text: impl Into<String>) -> Self {
        Self {
            post_id,
            body_text: body_text.into(),
            ..Default::default()
        }
    }

    pub fn reply_to(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// `POST /ajax/comment/new/` as multipart, with the busy overlay
    pub fn to_request(&self) -> Result<RequestSpec, CommentError> {
        let body = self.body_text.trim();
        if body.is_empty() {
            return Err(CommentError::EmptyBody);
        }

        let mut form = FormData::new()
            .text("post", self.post_id.to_string())
            .text("body_text", body);
        if let Some(parent) = self.parent_id {
            form = form.text("parent", parent.to_string());
        }
        if let Some(url) = self.image_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            form = form.text("image_url", url);
        }
        if let Some(image) = &self.image {
            form = form.file("image", &image.file_name, &image.mime, image.bytes.clone());
        }

        Ok(RequestSpec::post(COMMENT_PATH)
            .form(form)
            .with_busy_indicator())
    }
}

/// Server answer to a new comment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub comment_id: Option<u64>,
    /// Rendered comment markup, ready to insert into the thread
    #[serde(default)]
    pub comment_html: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommentResponse {
    pub fn summary(&self, messages: &Messages) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(messages.comment_sent)
            .to_string()
    }
}

/// Inline reply forms under a comment thread. At most one is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyForms {
    open: Option<u64>,
}

impl ReplyForms {
    /// Toggle the reply form under `comment_id`, closing any other.
    /// Returns whether it is now open.
    pub fn toggle(&mut self, comment_id: u64) -> bool {
        if self.open == Some(comment_id) {
            self.open = None;
            false
        } else {
            self.open = Some(comment_id);
            true
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self, comment_id: u64) -> bool {
        self.open == Some(comment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RequestBody;
    use crate::i18n::Locale;

    fn form(spec: &RequestSpec) -> &FormData {
        match spec.body() {
            Some(RequestBody::Form(form)) => form,
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_top_level_comment() {
        let spec = CommentDraft::new(5, "  nice car  ").to_request().unwrap();
        assert_eq!(spec.url(), "/ajax/comment/new/");
        assert!(spec.busy_indicator());
        let form = form(&spec);
        assert_eq!(form.get_text("post"), Some("5"));
        assert_eq!(form.get_text("body_text"), Some("nice car"));
        assert_eq!(form.get_text("parent"), None);
        assert_eq!(form.get_text("image_url"), None);
    }

    #[test]
    fn test_reply_with_image() {
        let image = ImageAttachment {
            file_name: "a.png".into(),
            mime: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        let spec = CommentDraft::new(5, "reply")
            .reply_to(44)
            .with_image_url(" ")
            .with_image(image)
            .to_request()
            .unwrap();
        let form = form(&spec);
        assert_eq!(form.get_text("parent"), Some("44"));
        assert_eq!(form.get_text("image_url"), None);
        assert_eq!(form.file_name("image"), Some("a.png"));
    }

    #[test]
    fn test_empty_comment_is_rejected() {
        assert!(matches!(
            CommentDraft::new(5, "   ").to_request(),
            Err(CommentError::EmptyBody)
        ));
    }

    #[test]
    fn test_only_one_reply_form_open() {
        let mut forms = ReplyForms::default();
        assert!(forms.toggle(1));
        assert!(forms.toggle(2));
        assert!(!forms.is_open(1));
        assert!(forms.is_open(2));
        assert!(!forms.toggle(2));
        assert!(!forms.is_open(2));
    }

    #[test]
    fn test_response_summary() {
        let m = Locale::En.messages();
        let response: CommentResponse =
            serde_json::from_str(r#"{"success":true,"comment_id":8,"parent_id":null}"#).unwrap();
        assert_eq!(response.comment_id, Some(8));
        assert_eq!(response.summary(m), m.comment_sent);
    }

    #[tokio::test]
    async fn test_image_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, b"jpeg").unwrap();
        let image = ImageAttachment::from_path(&path).await.unwrap();
        assert_eq!(image.file_name, "photo.JPG");
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg");

        assert!(ImageAttachment::from_path(&dir.path().join("missing.png")).await.is_err());
    }
}
