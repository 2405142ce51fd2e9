//! Vehicle page loading state

use tokio::task::JoinHandle;

use crate::dispatch::{Dispatcher, Outcome, Payload, RequestSpec};
use crate::markup::PageMarkup;
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// `GET /vehicle/{id}/`, shown with the busy overlay
pub fn page_request(vehicle_id: u64) -> RequestSpec {
    RequestSpec::get(format!("/vehicle/{}/", vehicle_id)).with_busy_indicator()
}

#[derive(Default)]
pub struct PageState {
    /// Vehicle whose page is loaded or loading
    pub vehicle_id: Option<u64>,
    /// Bound markup of the loaded page
    pub markup: Option<PageMarkup>,
    task: Option<JoinHandle<Outcome>>,
    csrf_field: String,
}

impl PageState {
    pub fn new(csrf_field: impl Into<String>) -> Self {
        Self {
            csrf_field: csrf_field.into(),
            ..Default::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    /// Start loading a vehicle page, dropping the current one
    pub fn load(&mut self, dispatcher: &Dispatcher, vehicle_id: u64) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.vehicle_id = Some(vehicle_id);
        self.markup = None;

        let dispatcher = dispatcher.clone();
        self.task = Some(tokio::spawn(async move {
            dispatcher.send(&page_request(vehicle_id)).await
        }));
    }

    /// Poll the page request; on success the markup is parsed and kept
    pub fn poll(&mut self) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let Some(vehicle_id) = self.vehicle_id else {
            return events;
        };

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Outcome::Success(Payload::Text(html)))) => {
                let markup = PageMarkup::parse(&html, &self.csrf_field);
                if markup.bindings().next().is_none() {
                    events.push(StateEvent::LogInfo(format!(
                        "Vehicle {} page has no membership controls",
                        vehicle_id
                    )));
                }
                events.push(StateEvent::PageLoaded {
                    vehicle_id,
                    title: markup.title.clone(),
                });
                self.markup = Some(markup);
            }
            PollResult::Complete(Ok(Outcome::Success(Payload::Json(_)))) => {
                events.push(StateEvent::LogError(format!(
                    "Vehicle {} answered with JSON instead of a page",
                    vehicle_id
                )));
            }
            PollResult::Complete(Ok(Outcome::Failure(failure))) => {
                events.push(StateEvent::LogError(format!(
                    "Loading vehicle {} failed with {}",
                    vehicle_id, failure.status
                )));
                events.push(StateEvent::Modal(failure.message));
            }
            PollResult::Complete(Err(e)) => {
                events.push(StateEvent::LogError(format!("Page task failed: {}", e)));
            }
            PollResult::Pending | PollResult::NoTask => {}
        }
        events
    }

    pub async fn settle(&self) {
        crate::task::settle(&self.task).await;
    }
}
