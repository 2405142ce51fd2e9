//! Push notification state: the socket and the alert stack it feeds

use std::time::{Duration, Instant};
use url::Url;

use crate::i18n::Messages;
use crate::notify::{AlertStack, PushChannel, decode_frame};
use crate::state::StateEvent;

pub struct NotificationState {
    channel: Option<PushChannel>,
    /// Created on the first alert
    alerts: Option<AlertStack>,
    display: Duration,
    fade: Duration,
    closed_reported: bool,
    messages: &'static Messages,
}

impl NotificationState {
    pub fn new(display: Duration, fade: Duration, messages: &'static Messages) -> Self {
        Self {
            channel: None,
            alerts: None,
            display,
            fade,
            closed_reported: false,
            messages,
        }
    }

    /// Open the push socket. A session connects at most once; a closed
    /// channel is not reopened.
    pub fn connect(&mut self, url: Url, cookie: Option<String>) {
        if self.channel.is_some() {
            tracing::debug!("Notification channel already opened, not reconnecting");
            return;
        }
        tracing::info!("Opening notification channel {}", url);
        self.channel = Some(PushChannel::connect(url, cookie));
    }

    pub fn is_active(&self) -> bool {
        self.channel.as_ref().is_some_and(PushChannel::is_active)
    }

    pub fn alerts(&self) -> Option<&AlertStack> {
        self.alerts.as_ref()
    }

    /// Decode one frame and raise an alert for it when it is a known kind
    pub fn handle_frame(&mut self, text: &str, now: Instant) -> Vec<StateEvent> {
        let mut events = Vec::new();
        match decode_frame(text) {
            Ok(Some(event)) => {
                let message = event.message(self.messages);
                let (display, fade) = (self.display, self.fade);
                self.alerts
                    .get_or_insert_with(|| AlertStack::new(display, fade))
                    .push(message.clone(), now);
                events.push(StateEvent::AlertShown(message));
            }
            Ok(None) => tracing::debug!("Ignoring push frame: {}", text),
            Err(e) => tracing::warn!("Dropping malformed push frame: {}", e),
        }
        events
    }

    /// Drain received frames and expire old alerts
    pub fn poll(&mut self, now: Instant) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let mut frames = Vec::new();
        if let Some(channel) = self.channel.as_mut() {
            while let Some(frame) = channel.try_next() {
                frames.push(frame);
            }
        }
        for frame in frames {
            events.extend(self.handle_frame(&frame, now));
        }

        if self.channel.is_some() && !self.is_active() && !self.closed_reported {
            self.closed_reported = true;
            events.push(StateEvent::NotificationsClosed);
        }

        if let Some(alerts) = self.alerts.as_mut() {
            alerts.prune(now);
        }
        events
    }

    /// Wait until a frame is buffered or the channel has ended
    pub async fn wait_for_frame(&mut self) -> Option<String> {
        match self.channel.as_mut() {
            Some(channel) => channel.next().await,
            None => None,
        }
    }
}
