use serde::Serialize;

use crate::i18n::Messages;

/// The membership collections a vehicle can be toggled in and out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKind {
    Favorite,
    Garage,
}

impl ToggleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToggleKind::Favorite => "favorite",
            ToggleKind::Garage => "garage",
        }
    }

    /// URL segment of the membership API
    pub fn collection(&self) -> &'static str {
        match self {
            ToggleKind::Favorite => "favorites",
            ToggleKind::Garage => "garage",
        }
    }

    /// Response field holding the server's membership verdict
    pub fn state_key(&self) -> &'static str {
        match self {
            ToggleKind::Favorite => "favorite",
            ToggleKind::Garage => "in_garage",
        }
    }

    /// Attribute marking the control in page markup
    pub fn marker_attr(&self) -> &'static str {
        match self {
            ToggleKind::Favorite => "data-favorite-toggle",
            ToggleKind::Garage => "data-garage-toggle",
        }
    }

    /// Attribute carrying the initial membership in page markup
    pub fn state_attr(&self) -> &'static str {
        match self {
            ToggleKind::Favorite => "data-in-favorite",
            ToggleKind::Garage => "data-in-garage",
        }
    }

    /// Confirmation prompt required before removal, if any
    pub fn removal_prompt(&self, messages: &'static Messages) -> Option<&'static str> {
        match self {
            ToggleKind::Favorite => None,
            ToggleKind::Garage => Some(messages.garage_remove_confirm),
        }
    }

    /// Fallback confirmation when the server sends no message
    pub fn done_message(&self, member: bool, messages: &'static Messages) -> &'static str {
        match (self, member) {
            (ToggleKind::Favorite, true) => messages.favorite_added,
            (ToggleKind::Favorite, false) => messages.favorite_removed,
            (ToggleKind::Garage, true) => messages.garage_added,
            (ToggleKind::Garage, false) => messages.garage_removed,
        }
    }
}

/// Direction of a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    /// The operation that flips the given membership
    pub fn flipping(member: bool) -> Self {
        if member { Operation::Remove } else { Operation::Add }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
        }
    }
}

/// `/api/{favorites|garage}/{add|remove}/{id}/`
pub fn endpoint(kind: ToggleKind, operation: Operation, vehicle_id: u64) -> String {
    format!(
        "/api/{}/{}/{}/",
        kind.collection(),
        operation.as_str(),
        vehicle_id
    )
}
