//! Presentation of a membership control, derived from its state alone.

use serde::Serialize;

use crate::i18n::Messages;
use crate::toggle::{ToggleKind, ToggleState};

/// Style class applied while a request is in flight
pub const CLASS_LOADING: &str = "is-loading";
/// Style class for the de-emphasized "not a member" garage button
pub const CLASS_GHOST: &str = "button-ghost";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleView {
    pub label: &'static str,
    pub status: &'static str,
    pub enabled: bool,
    pub classes: Vec<&'static str>,
}

impl ToggleView {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }
}

pub fn render(kind: ToggleKind, state: ToggleState, messages: &'static Messages) -> ToggleView {
    let member = state.flag();
    let (on_label, off_label, on_status, off_status) = match kind {
        ToggleKind::Favorite => (
            messages.favorite_on_label,
            messages.favorite_off_label,
            messages.favorite_on_status,
            messages.favorite_off_status,
        ),
        ToggleKind::Garage => (
            messages.garage_on_label,
            messages.garage_off_label,
            messages.garage_on_status,
            messages.garage_off_status,
        ),
    };

    let mut classes = Vec::new();
    if kind == ToggleKind::Garage && !member {
        classes.push(CLASS_GHOST);
    }

    let label = match state {
        ToggleState::Pending(_) => {
            classes.push(CLASS_LOADING);
            messages.toggle_loading
        }
        ToggleState::Idle(_) if member => on_label,
        ToggleState::Idle(_) => off_label,
    };

    ToggleView {
        label,
        status: if member { on_status } else { off_status },
        enabled: !state.is_pending(),
        classes,
    }
}
