use thiserror::Error;

use crate::dispatch::outcome::{Failure, Payload};
use crate::i18n::Messages;

/// Everything that can go wrong while performing one request.
///
/// None of these escape the dispatcher: each is folded into a [`Failure`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Server responded {status}: {message}")]
    Server {
        status: u16,
        message: String,
        payload: Option<Payload>,
    },
}

impl DispatchError {
    /// Convert into the failure shown to callers. Anything that produced no
    /// usable response becomes status 0 with the generic network message.
    pub fn into_failure(self, messages: &Messages) -> Failure {
        match self {
            DispatchError::Server {
                status,
                message,
                payload,
            } => Failure {
                status,
                message,
                payload,
            },
            DispatchError::Transport(_) | DispatchError::Parse(_) | DispatchError::InvalidUrl(_) => {
                Failure {
                    status: 0,
                    message: messages.network_error.to_string(),
                    payload: None,
                }
            }
        }
    }
}
