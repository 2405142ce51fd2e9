//! Rating and comment form state

use tokio::task::JoinHandle;

use crate::comment::{CommentDraft, CommentResponse, ReplyForms};
use crate::dispatch::{Dispatcher, Outcome};
use crate::i18n::Messages;
use crate::rating::{RatingResponse, Score, rate_request};
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// Rating and comment forms of one page
#[derive(Default)]
pub struct FormsState {
    /// Score selected in the rating form
    pub score: u8,
    /// Text of the top-level comment box
    pub comment_text: String,
    /// Text of the open reply box
    pub reply_text: String,
    /// Optional image URL for the next comment
    pub image_url: String,
    pub replies: ReplyForms,
    /// Last rating the server confirmed
    pub last_rating: Option<RatingResponse>,
    /// Comments posted during this session, newest last
    pub posted: Vec<CommentResponse>,
    rating_task: Option<JoinHandle<Outcome>>,
    comment_task: Option<JoinHandle<Outcome>>,
}

impl FormsState {
    pub fn is_busy(&self) -> bool {
        self.rating_task.is_some() || self.comment_task.is_some()
    }

    pub fn is_rating(&self) -> bool {
        self.rating_task.is_some()
    }

    pub fn is_commenting(&self) -> bool {
        self.comment_task.is_some()
    }

    /// Submit a rating. Ignored while one is in flight.
    pub fn rate(&mut self, dispatcher: &Dispatcher, vehicle_id: u64, score: Score) {
        if self.rating_task.is_some() {
            return;
        }
        let dispatcher = dispatcher.clone();
        self.rating_task = Some(tokio::spawn(async move {
            dispatcher.send(&rate_request(vehicle_id, score)).await
        }));
    }

    /// Submit a comment. Ignored while one is in flight; returns an
    /// error message when the draft cannot be sent.
    pub fn comment(&mut self, dispatcher: &Dispatcher, draft: &CommentDraft) -> Result<(), String> {
        if self.comment_task.is_some() {
            return Ok(());
        }
        let spec = draft
            .to_request()
            .map_err(|e| e.localized(dispatcher.messages()))?;
        let dispatcher = dispatcher.clone();
        self.comment_task = Some(tokio::spawn(async move { dispatcher.send(&spec).await }));
        Ok(())
    }

    pub fn poll(&mut self, messages: &'static Messages) -> Vec<StateEvent> {
        let mut events = Vec::new();

        if let Some(outcome) = take_outcome(&mut self.rating_task, "Rating", &mut events) {
            match outcome {
                Outcome::Success(payload) => {
                    let response = payload.decode::<RatingResponse>().unwrap_or_default();
                    events.push(StateEvent::StatusMessage(response.summary(messages)));
                    self.last_rating = Some(response.clone());
                    events.push(StateEvent::RatingSaved(response));
                }
                Outcome::Failure(failure) => events.push(StateEvent::Modal(failure.message)),
            }
        }

        if let Some(outcome) = take_outcome(&mut self.comment_task, "Comment", &mut events) {
            match outcome {
                Outcome::Success(payload) => {
                    let response = payload.decode::<CommentResponse>().unwrap_or_default();
                    events.push(StateEvent::StatusMessage(response.summary(messages)));
                    if response.parent_id.is_some() {
                        self.reply_text.clear();
                        self.replies.close();
                    } else {
                        self.comment_text.clear();
                    }
                    self.image_url.clear();
                    self.posted.push(response.clone());
                    events.push(StateEvent::CommentPosted(response));
                }
                Outcome::Failure(failure) => events.push(StateEvent::Modal(failure.message)),
            }
        }

        events
    }

    pub async fn settle(&self) {
        crate::task::settle(&self.rating_task).await;
        crate::task::settle(&self.comment_task).await;
    }
}

fn take_outcome(
    task: &mut Option<JoinHandle<Outcome>>,
    what: &str,
    events: &mut Vec<StateEvent>,
) -> Option<Outcome> {
    match poll_task(task) {
        PollResult::Complete(Ok(outcome)) => Some(outcome),
        PollResult::Complete(Err(e)) => {
            events.push(StateEvent::LogError(format!("{} task failed: {}", what, e)));
            None
        }
        PollResult::Pending | PollResult::NoTask => None,
    }
}
