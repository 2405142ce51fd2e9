//! Session state modules
//!
//! Each state struct owns one concern of a vehicle page session together with
//! its background task, and reports what happened through `poll` methods.

mod forms;
mod notifications;
mod page;
mod toggle;
mod ui;

pub use forms::FormsState;
pub use notifications::NotificationState;
pub use page::PageState;
pub use toggle::ToggleTask;
pub use ui::UiState;

use crate::comment::CommentResponse;
use crate::rating::RatingResponse;
use crate::toggle::{Reconciled, ToggleKind};

/// Events that state poll methods can return.
/// These communicate results back to the session owner without direct mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// Update the status line
    StatusMessage(String),

    /// A failure nobody handled; shown blocking (modal window or stderr)
    Modal(String),

    /// A click needs an explicit yes/no before anything is sent
    ConfirmRequested { kind: ToggleKind, prompt: String },

    /// A membership request settled
    Toggled { kind: ToggleKind, result: Reconciled },

    /// The vehicle page was fetched and bound
    PageLoaded { vehicle_id: u64, title: Option<String> },

    /// A pushed alert was added to the stack
    AlertShown(String),

    /// The push socket is gone for good
    NotificationsClosed,

    RatingSaved(RatingResponse),

    CommentPosted(CommentResponse),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
