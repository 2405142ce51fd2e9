//! Transient alert stack.
//!
//! Alerts stack in arrival order and expire independently: each is fully
//! visible for the display period, fades out over the fade period, then is
//! removed.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub created_at: DateTime<Local>,
    shown_at: Instant,
}

/// Where an alert is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertPhase {
    Visible,
    /// Fading out; the value is the remaining opacity in `0.0..=1.0`
    Fading(f32),
    Expired,
}

impl AlertPhase {
    pub fn opacity(&self) -> f32 {
        match self {
            AlertPhase::Visible => 1.0,
            AlertPhase::Fading(opacity) => *opacity,
            AlertPhase::Expired => 0.0,
        }
    }
}

#[derive(Debug)]
pub struct AlertStack {
    alerts: VecDeque<Alert>,
    next_id: u64,
    display: Duration,
    fade: Duration,
}

impl AlertStack {
    pub fn new(display: Duration, fade: Duration) -> Self {
        Self {
            alerts: VecDeque::new(),
            next_id: 1,
            display,
            fade,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.alerts.push_back(Alert {
            id,
            message: message.into(),
            created_at: Local::now(),
            shown_at: now,
        });
        id
    }

    pub fn phase(&self, alert: &Alert, now: Instant) -> AlertPhase {
        let age = now.saturating_duration_since(alert.shown_at);
        if age < self.display {
            return AlertPhase::Visible;
        }
        let fading = age - self.display;
        if fading >= self.fade {
            return AlertPhase::Expired;
        }
        AlertPhase::Fading(1.0 - fading.as_secs_f32() / self.fade.as_secs_f32())
    }

    /// Drop expired alerts, returning how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.alerts.len();
        let (display, fade) = (self.display, self.fade);
        self.alerts
            .retain(|a| now.saturating_duration_since(a.shown_at) < display + fade);
        before - self.alerts.len()
    }

    /// Alerts still on screen, oldest first, with their opacity
    pub fn visible(&self, now: Instant) -> Vec<(&Alert, f32)> {
        self.alerts
            .iter()
            .filter_map(|a| match self.phase(a, now) {
                AlertPhase::Expired => None,
                phase => Some((a, phase.opacity())),
            })
            .collect()
    }

    /// Time until the next alert changes phase, for scheduling a repaint
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.alerts
            .iter()
            .filter_map(|a| {
                let age = now.saturating_duration_since(a.shown_at);
                if age < self.display {
                    Some(self.display - age)
                } else {
                    (self.display + self.fade).checked_sub(age)
                }
            })
            .min()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
