//! Membership toggle state: a controller plus its in-flight request

use tokio::task::JoinHandle;

use crate::dispatch::{Dispatcher, Failure, Outcome};
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};
use crate::toggle::{Click, ToggleController, ToggleKind, ToggleView};

pub struct ToggleTask {
    controller: ToggleController,
    task: Option<JoinHandle<Outcome>>,
}

impl ToggleTask {
    pub fn new(controller: ToggleController) -> Self {
        Self {
            controller,
            task: None,
        }
    }

    pub fn kind(&self) -> ToggleKind {
        self.controller.kind()
    }

    pub fn controller(&self) -> &ToggleController {
        &self.controller
    }

    pub fn view(&self) -> ToggleView {
        self.controller.view()
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Prompt that must be answered before the next click goes out
    pub fn pending_confirmation(&self) -> Option<&'static str> {
        self.controller.pending_confirmation()
    }

    /// Handle a click, spawning the request when the controller asks for one.
    /// Returns whether a request was started.
    pub fn click<F>(&mut self, dispatcher: &Dispatcher, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        match self.controller.click(confirm) {
            Click::Dispatch(request) => {
                let dispatcher = dispatcher.clone();
                self.task = Some(tokio::spawn(async move {
                    dispatcher.send(&request.spec).await
                }));
                true
            }
            Click::Ignored | Click::Declined => false,
        }
    }

    /// Poll the in-flight request and reconcile when it settles
    pub fn poll(&mut self, dispatcher: &Dispatcher) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let outcome = match poll_task(&mut self.task) {
            PollResult::Complete(Ok(outcome)) => outcome,
            PollResult::Complete(Err(e)) => {
                events.push(StateEvent::LogError(format!(
                    "{} request task failed: {}",
                    self.kind().name(),
                    e
                )));
                Outcome::Failure(Failure {
                    status: 0,
                    message: dispatcher.messages().network_error.to_string(),
                    payload: None,
                })
            }
            PollResult::Pending | PollResult::NoTask => return events,
        };

        if let Some(result) = self.controller.reconcile(&outcome) {
            if result.succeeded {
                events.push(StateEvent::StatusMessage(result.message.clone()));
            } else {
                events.push(StateEvent::Modal(result.message.clone()));
            }
            events.push(StateEvent::Toggled {
                kind: self.kind(),
                result,
            });
        }
        events
    }

    /// Wait for the in-flight request, if any, to finish
    pub async fn settle(&self) {
        crate::task::settle(&self.task).await;
    }
}
