//! UI-related application state

use crate::i18n::Messages;
use crate::state::StateEvent;
use crate::toggle::ToggleKind;
use crate::ui::theme::Theme;

/// A yes/no question blocking one toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub kind: ToggleKind,
    pub prompt: String,
}

/// UI-related state
pub struct UiState {
    /// Current theme
    pub current_theme: Theme,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Text of the vehicle id box
    pub vehicle_input: String,
    /// Text of the post id box in the comment form
    pub post_input: String,
    /// Status line under the toggles
    pub status_message: Option<String>,
    /// Blocking message window
    pub modal: Option<String>,
    /// Open confirmation window
    pub confirm: Option<ConfirmDialog>,
    /// Title of the bound page, shown as the heading
    pub page_title: Option<String>,
    /// Set once the push socket has ended
    pub notifications_closed: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
}

impl UiState {
    /// Create a new UiState with the given theme
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            theme_dirty: true, // Apply theme on first frame
            vehicle_input: String::new(),
            post_input: String::new(),
            status_message: None,
            modal: None,
            confirm: None,
            page_title: None,
            notifications_closed: false,
            show_about_dialog: false,
        }
    }

    /// Reflect one session event in what the window shows
    pub fn apply(&mut self, event: &StateEvent, messages: &Messages) {
        match event {
            StateEvent::StatusMessage(message) => self.status_message = Some(message.clone()),
            StateEvent::Modal(message) => self.modal = Some(message.clone()),
            StateEvent::ConfirmRequested { kind, prompt } => {
                self.confirm = Some(ConfirmDialog {
                    kind: *kind,
                    prompt: prompt.clone(),
                })
            }
            StateEvent::PageLoaded { vehicle_id, title } => {
                self.page_title = title.clone();
                self.vehicle_input = vehicle_id.to_string();
                self.status_message = None;
                self.confirm = None;
            }
            StateEvent::NotificationsClosed => self.notifications_closed = true,
            StateEvent::RatingSaved(response) => {
                self.status_message = Some(match response.average_label() {
                    Some(average) => format!("{} {}", response.summary(messages), average),
                    None => response.summary(messages),
                })
            }
            StateEvent::CommentPosted(response) => {
                self.status_message = Some(response.summary(messages))
            }
            StateEvent::Toggled { .. }
            | StateEvent::AlertShown(_)
            | StateEvent::LogError(_)
            | StateEvent::LogInfo(_) => {}
        }
    }

    /// Switch between the dark and light theme
    pub fn set_dark(&mut self, dark: bool) {
        if self.current_theme.dark != dark {
            self.current_theme = Theme::from_config(dark);
            self.theme_dirty = true;
        }
    }
}
