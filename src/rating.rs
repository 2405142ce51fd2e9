//! Vehicle rating submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::{FormData, RequestSpec};
use crate::i18n::Messages;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Score must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

impl RatingError {
    /// Text shown to the user in the client's locale
    pub fn localized(&self, messages: &Messages) -> String {
        match self {
            RatingError::OutOfRange(_) => messages.score_out_of_range.to_string(),
        }
    }
}

/// A star score the server will accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score(u8);

impl Score {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Score(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

/// `POST /ajax/vehicle/{id}/rate/` with the busy overlay
pub fn rate_request(vehicle_id: u64, score: Score) -> RequestSpec {
    RequestSpec::post(format!("/ajax/vehicle/{}/rate/", vehicle_id))
        .form(FormData::new().text("score", score.value().to_string()))
        .with_busy_indicator()
}

/// Server answer to a rating
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingResponse {
    #[serde(default)]
    pub success: bool,
    /// True for a first rating, false when an earlier one was replaced
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RatingResponse {
    pub fn summary(&self, messages: &Messages) -> String {
        match self.message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None if self.created => messages.rating_thanks.to_string(),
            None => messages.rating_updated.to_string(),
        }
    }

    /// "4.5 (12)" style average, when the server sent one
    pub fn average_label(&self) -> Option<String> {
        let avg = self.avg_rating?;
        Some(format!("{:.1} ({})", avg, self.rating_count.unwrap_or(0)))
    }
}
