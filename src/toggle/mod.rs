//! Membership toggle state machine.
//!
//! Each membership button on a page gets one `ToggleController`:
//!
//! ```text
//! Idle(flag) --click--> Pending(flag)          request add/remove
//! Pending(flag) --click--> Pending(flag)       ignored
//! Pending(_) --Success(payload)--> Idle(payload[state_key])
//! Pending(flag) --Failure--> Idle(flag)
//! ```
//!
//! The flag is never committed from the request that was sent; it only ever
//! comes from the server's answer, which may disagree with the direction that
//! was asked for.

mod kind;
mod view;

pub use kind::{Operation, ToggleKind, endpoint};
pub use view::{CLASS_GHOST, CLASS_LOADING, ToggleView};

use crate::dispatch::{Outcome, RequestSpec};
use crate::i18n::Messages;
use crate::markup::ControlBinding;

/// State of one membership control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle(bool),
    Pending(bool),
}

impl ToggleState {
    /// Last membership value confirmed by the server (or the markup)
    pub fn flag(&self) -> bool {
        match self {
            ToggleState::Idle(flag) | ToggleState::Pending(flag) => *flag,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ToggleState::Pending(_))
    }
}

/// A request the controller wants performed
#[derive(Debug, Clone)]
pub struct ToggleRequest {
    pub operation: Operation,
    pub spec: RequestSpec,
}

/// Result of a click
#[derive(Debug)]
pub enum Click {
    /// A request is already in flight
    Ignored,
    /// The user declined the removal confirmation
    Declined,
    Dispatch(ToggleRequest),
}

/// What reconciliation settled on, with the message to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub member: bool,
    pub succeeded: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ToggleController {
    kind: ToggleKind,
    vehicle_id: u64,
    state: ToggleState,
    messages: &'static Messages,
}

impl ToggleController {
    pub fn new(binding: &ControlBinding, messages: &'static Messages) -> Self {
        Self {
            kind: binding.kind,
            vehicle_id: binding.vehicle_id,
            state: ToggleState::Idle(binding.initial),
            messages,
        }
    }

    pub fn kind(&self) -> ToggleKind {
        self.kind
    }

    pub fn vehicle_id(&self) -> u64 {
        self.vehicle_id
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn is_member(&self) -> bool {
        self.state.flag()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Prompt the next click must be confirmed with, if any
    pub fn pending_confirmation(&self) -> Option<&'static str> {
        match self.state {
            ToggleState::Idle(true) => self.kind.removal_prompt(self.messages),
            _ => None,
        }
    }

    /// Handle a click. `confirm` is asked only when the click would remove a
    /// garage membership.
    pub fn click<F>(&mut self, confirm: F) -> Click
    where
        F: FnOnce(&str) -> bool,
    {
        let ToggleState::Idle(flag) = self.state else {
            tracing::debug!("{} {} click ignored while pending", self.kind.name(), self.vehicle_id);
            return Click::Ignored;
        };

        if let Some(prompt) = self.pending_confirmation() {
            if !confirm(prompt) {
                tracing::debug!("{} {} removal declined", self.kind.name(), self.vehicle_id);
                return Click::Declined;
            }
        }

        let operation = Operation::flipping(flag);
        self.state = ToggleState::Pending(flag);
        tracing::info!(
            "{} {}: requesting {}",
            self.kind.name(),
            self.vehicle_id,
            operation.as_str()
        );

        Click::Dispatch(ToggleRequest {
            operation,
            spec: RequestSpec::post(endpoint(self.kind, operation, self.vehicle_id)),
        })
    }

    /// Settle the in-flight request. Returns `None` when nothing was pending.
    pub fn reconcile(&mut self, outcome: &Outcome) -> Option<Reconciled> {
        let ToggleState::Pending(previous) = self.state else {
            tracing::warn!(
                "{} {}: outcome arrived with no request in flight",
                self.kind.name(),
                self.vehicle_id
            );
            return None;
        };

        let reconciled = match outcome {
            Outcome::Success(payload) => {
                let member = payload.flag(self.kind.state_key());
                let message = payload
                    .message()
                    .unwrap_or_else(|| self.kind.done_message(member, self.messages))
                    .to_string();
                Reconciled {
                    member,
                    succeeded: true,
                    message,
                }
            }
            Outcome::Failure(failure) => {
                let message = if failure.message.is_empty() {
                    self.messages.action_failed.to_string()
                } else {
                    failure.message.clone()
                };
                Reconciled {
                    member: previous,
                    succeeded: false,
                    message,
                }
            }
        };

        self.state = ToggleState::Idle(reconciled.member);
        Some(reconciled)
    }

    pub fn view(&self) -> ToggleView {
        view::render(self.kind, self.state, self.messages)
    }
}
