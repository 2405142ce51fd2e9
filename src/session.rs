//! A vehicle page session.
//!
//! The session owns everything one open vehicle page needs: the dispatcher
//! with its busy overlay, the bound membership toggles, the rating and comment
//! forms and the push channel. Input arrives as [`SessionEvent`]s on a queue;
//! [`Session::process`] drains the queue, polls the background tasks and
//! reports what happened as [`StateEvent`]s. The GUI calls it once per frame,
//! the CLI in a loop.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::comment::CommentDraft;
use crate::config::Config;
use crate::dispatch::{BusyOverlay, Dispatcher};
use crate::i18n::Messages;
use crate::notify::{AlertStack, socket_url};
use crate::rating::Score;
use crate::state::{FormsState, NotificationState, PageState, StateEvent, ToggleTask};
use crate::toggle::{ToggleController, ToggleKind};

/// Input to a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Load a vehicle page and bind its controls
    Open(u64),
    /// A membership button was pressed
    Click(ToggleKind),
    /// Answer to a confirmation request
    Confirm { kind: ToggleKind, accepted: bool },
    /// Submit a star rating for the open vehicle
    Rate(u8),
    /// Submit a comment or reply
    Comment(CommentDraft),
    /// Open or close the reply form under a comment
    ToggleReply(u64),
    /// A push frame delivered from outside the session's own socket
    Frame(String),
    /// Timer tick; nothing to do but poll
    Tick,
}

pub struct Session {
    config: Config,
    dispatcher: Dispatcher,
    page: PageState,
    toggles: Vec<ToggleTask>,
    forms: FormsState,
    notifications: NotificationState,
    queue: VecDeque<SessionEvent>,
    /// Toggle waiting for a confirmation answer
    awaiting_confirmation: Option<ToggleKind>,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let dispatcher = Dispatcher::new(&config, BusyOverlay::new())?;
        let messages = dispatcher.messages();
        Ok(Self {
            page: PageState::new(config.csrf.field_name.clone()),
            notifications: NotificationState::new(
                config.notifications.display(),
                config.notifications.fade(),
                messages,
            ),
            config,
            dispatcher,
            toggles: Vec::new(),
            forms: FormsState::default(),
            queue: VecDeque::new(),
            awaiting_confirmation: None,
        })
    }

    /// Open the push channel when notifications are enabled. Must run inside
    /// the tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if !self.config.notifications.enabled {
            tracing::debug!("Notifications disabled");
            return Ok(());
        }
        let url = socket_url(self.dispatcher.base_url(), &self.config.site.notifications_path)
            .with_context(|| {
                format!(
                    "Invalid notification path: {}",
                    self.config.site.notifications_path
                )
            })?;
        self.notifications
            .connect(url, self.config.site.session_cookie.clone());
        Ok(())
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.queue.push_back(event);
    }

    /// Handle queued input, then collect the results of background work
    pub fn process(&mut self, now: Instant) -> Vec<StateEvent> {
        let mut events = Vec::new();

        while let Some(event) = self.queue.pop_front() {
            events.extend(self.handle(event, now));
        }

        for event in self.page.poll() {
            if let StateEvent::PageLoaded { vehicle_id, .. } = &event {
                self.bind_page(*vehicle_id);
            }
            events.push(event);
        }

        for toggle in &mut self.toggles {
            events.extend(toggle.poll(&self.dispatcher));
        }
        events.extend(self.forms.poll(self.dispatcher.messages()));
        events.extend(self.notifications.poll(now));

        for event in &events {
            match event {
                StateEvent::LogError(message) => tracing::error!("{}", message),
                StateEvent::LogInfo(message) => tracing::info!("{}", message),
                _ => {}
            }
        }
        events
    }

    fn handle(&mut self, event: SessionEvent, now: Instant) -> Vec<StateEvent> {
        let mut events = Vec::new();
        match event {
            SessionEvent::Open(vehicle_id) => {
                tracing::info!("Opening vehicle {}", vehicle_id);
                self.toggles.clear();
                self.awaiting_confirmation = None;
                self.forms = FormsState::default();
                self.page.load(&self.dispatcher, vehicle_id);
            }
            SessionEvent::Click(kind) => {
                if self.awaiting_confirmation.is_some() {
                    tracing::debug!("Click on {} while a confirmation is open", kind.name());
                    return events;
                }
                let Some(toggle) = self.toggles.iter_mut().find(|t| t.kind() == kind) else {
                    tracing::debug!("No {} control on this page", kind.name());
                    return events;
                };
                match toggle.pending_confirmation() {
                    Some(prompt) => {
                        self.awaiting_confirmation = Some(kind);
                        events.push(StateEvent::ConfirmRequested {
                            kind,
                            prompt: prompt.to_string(),
                        });
                    }
                    None => {
                        toggle.click(&self.dispatcher, |_| true);
                    }
                }
            }
            SessionEvent::Confirm { kind, accepted } => {
                if self.awaiting_confirmation != Some(kind) {
                    tracing::debug!("Stray confirmation for {}", kind.name());
                    return events;
                }
                self.awaiting_confirmation = None;
                if let Some(toggle) = self.toggles.iter_mut().find(|t| t.kind() == kind) {
                    if !toggle.click(&self.dispatcher, |_| accepted) {
                        events.push(StateEvent::LogInfo(format!(
                            "{} removal cancelled",
                            kind.name()
                        )));
                    }
                }
            }
            SessionEvent::Rate(score) => {
                let score = match Score::try_from(score) {
                    Ok(score) => score,
                    Err(e) => {
                        events.push(StateEvent::Modal(e.localized(self.dispatcher.messages())));
                        return events;
                    }
                };
                match self.vehicle_id() {
                    Some(vehicle_id) => self.forms.rate(&self.dispatcher, vehicle_id, score),
                    None => tracing::debug!("Rating ignored, no vehicle page is open"),
                }
            }
            SessionEvent::Comment(draft) => {
                if let Err(message) = self.forms.comment(&self.dispatcher, &draft) {
                    events.push(StateEvent::Modal(message));
                }
            }
            SessionEvent::ToggleReply(comment_id) => {
                self.forms.replies.toggle(comment_id);
                self.forms.reply_text.clear();
            }
            SessionEvent::Frame(text) => {
                events.extend(self.notifications.handle_frame(&text, now));
            }
            SessionEvent::Tick => {}
        }
        events
    }

    /// Hand the loaded markup to the dispatcher and the toggles
    fn bind_page(&mut self, vehicle_id: u64) {
        let Some(markup) = &self.page.markup else {
            return;
        };
        self.dispatcher.csrf().set_form_token(markup.csrf_token.clone());
        let messages = self.dispatcher.messages();
        self.toggles = markup
            .bindings()
            .map(|binding| ToggleTask::new(ToggleController::new(binding, messages)))
            .collect();
        tracing::info!(
            "Vehicle {} bound with {} membership control(s)",
            vehicle_id,
            self.toggles.len()
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn messages(&self) -> &'static Messages {
        self.dispatcher.messages()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Vehicle of the loaded page
    pub fn vehicle_id(&self) -> Option<u64> {
        self.page.markup.as_ref().and(self.page.vehicle_id)
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn toggle(&self, kind: ToggleKind) -> Option<&ToggleTask> {
        self.toggles.iter().find(|t| t.kind() == kind)
    }

    pub fn toggles(&self) -> &[ToggleTask] {
        &self.toggles
    }

    pub fn forms(&self) -> &FormsState {
        &self.forms
    }

    pub fn forms_mut(&mut self) -> &mut FormsState {
        &mut self.forms
    }

    pub fn awaiting_confirmation(&self) -> Option<ToggleKind> {
        self.awaiting_confirmation
    }

    pub fn overlay_visible(&self) -> bool {
        self.dispatcher.overlay().is_visible()
    }

    pub fn alerts(&self) -> Option<&AlertStack> {
        self.notifications.alerts()
    }

    pub fn notifications_active(&self) -> bool {
        self.notifications.is_active()
    }

    /// Whether any request is still in flight
    pub fn has_pending_work(&self) -> bool {
        !self.queue.is_empty()
            || self.page.is_loading()
            || self.forms.is_busy()
            || self.toggles.iter().any(ToggleTask::is_busy)
    }

    /// When the UI should wake up again without input
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        if self.has_pending_work() {
            return Some(Duration::from_millis(50));
        }
        self.alerts().and_then(|alerts| alerts.next_deadline(now))
    }

    /// Wait until every in-flight request has finished
    pub async fn settle(&self) {
        self.page.settle().await;
        for toggle in &self.toggles {
            toggle.settle().await;
        }
        self.forms.settle().await;
    }

    /// Wait for a push frame, returning `None` once the channel has ended
    pub async fn next_frame(&mut self) -> Option<String> {
        self.notifications.wait_for_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSite, PAGE_TOKEN, PushServer, UNKNOWN_VEHICLE, config_for};
    use crate::toggle::{CLASS_LOADING, ToggleState};

    /// Process input, wait for the requests it started, then collect results
    async fn run(session: &mut Session) -> Vec<StateEvent> {
        let mut events = session.process(Instant::now());
        session.settle().await;
        events.extend(session.process(Instant::now()));
        events
    }

    async fn open(site: &MockSite, vehicle_id: u64) -> Session {
        let mut session = Session::new(config_for(site)).unwrap();
        session.start().unwrap();
        session.push(SessionEvent::Open(vehicle_id));
        let events = run(&mut session).await;
        assert!(events
            .iter()
            .any(|e| matches!(e, StateEvent::PageLoaded { vehicle_id: id, .. } if *id == vehicle_id)));
        session
    }

    fn state(session: &Session, kind: ToggleKind) -> ToggleState {
        session.toggle(kind).unwrap().controller().state()
    }

    #[tokio::test]
    async fn test_open_binds_controls_from_markup() {
        let site = MockSite::start().await;
        site.set_garage(7, true);
        let session = open(&site, 7).await;

        assert_eq!(session.vehicle_id(), Some(7));
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(false));
        assert_eq!(state(&session, ToggleKind::Garage), ToggleState::Idle(true));
        assert_eq!(session.dispatcher().csrf().form_token().as_deref(), Some(PAGE_TOKEN));
        assert!(!session.overlay_visible());
    }

    #[tokio::test]
    async fn test_unknown_vehicle_shows_modal_and_binds_nothing() {
        let site = MockSite::start().await;
        let mut session = Session::new(config_for(&site)).unwrap();
        session.push(SessionEvent::Open(UNKNOWN_VEHICLE));
        let events = run(&mut session).await;

        assert!(events.contains(&StateEvent::Modal("Not Found".into())));
        assert!(session.toggles().is_empty());
        assert_eq!(session.vehicle_id(), None);
    }

    #[tokio::test]
    async fn test_rapid_clicks_send_one_add() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Click(ToggleKind::Favorite));
        session.push(SessionEvent::Click(ToggleKind::Favorite));
        session.process(Instant::now());
        let view = session.toggle(ToggleKind::Favorite).unwrap().view();
        assert!(!view.enabled);
        assert!(view.has_class(CLASS_LOADING));

        let events = run(&mut session).await;
        assert_eq!(site.requests_to("/api/"), vec!["POST /api/favorites/add/7/"]);
        assert_eq!(site.csrf_seen(), vec![Some(PAGE_TOKEN.to_string())]);
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(true));
        assert!(events.contains(&StateEvent::StatusMessage("已加入最愛".into())));
        assert!(site.is_favorite(7));
    }

    #[tokio::test]
    async fn test_server_state_wins_over_requested_direction() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;
        site.force_state(Some(false));

        session.push(SessionEvent::Click(ToggleKind::Favorite));
        run(&mut session).await;
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(false));
    }

    #[tokio::test]
    async fn test_add_on_existing_member_settles_true() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;
        // Added elsewhere after the page was rendered
        site.set_favorite(7, true);

        session.push(SessionEvent::Click(ToggleKind::Favorite));
        let events = run(&mut session).await;
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(true));
        assert!(events.contains(&StateEvent::StatusMessage("已在最愛中".into())));
    }

    #[tokio::test]
    async fn test_failure_restores_pre_click_state() {
        let site = MockSite::start().await;
        site.set_favorite(7, true);
        let mut session = open(&site, 7).await;
        // Removed elsewhere, so the remove answers 404
        site.set_favorite(7, false);

        session.push(SessionEvent::Click(ToggleKind::Favorite));
        let events = run(&mut session).await;
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(true));
        assert!(events.contains(&StateEvent::Modal("不在最愛中".into())));
    }

    #[tokio::test]
    async fn test_declined_garage_removal_sends_nothing() {
        let site = MockSite::start().await;
        site.set_garage(7, true);
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Click(ToggleKind::Garage));
        let events = session.process(Instant::now());
        assert!(matches!(
            events.as_slice(),
            [StateEvent::ConfirmRequested { kind: ToggleKind::Garage, .. }]
        ));
        assert_eq!(session.awaiting_confirmation(), Some(ToggleKind::Garage));

        session.push(SessionEvent::Confirm {
            kind: ToggleKind::Garage,
            accepted: false,
        });
        run(&mut session).await;
        assert!(site.requests_to("/api/").is_empty());
        assert_eq!(state(&session, ToggleKind::Garage), ToggleState::Idle(true));
        assert_eq!(session.awaiting_confirmation(), None);
    }

    #[tokio::test]
    async fn test_confirmed_garage_removal() {
        let site = MockSite::start().await;
        site.set_garage(7, true);
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Click(ToggleKind::Garage));
        session.process(Instant::now());
        session.push(SessionEvent::Confirm {
            kind: ToggleKind::Garage,
            accepted: true,
        });
        run(&mut session).await;

        assert_eq!(site.requests_to("/api/"), vec!["POST /api/garage/remove/7/"]);
        assert_eq!(state(&session, ToggleKind::Garage), ToggleState::Idle(false));
        assert!(!site.in_garage(7));
        let view = session.toggle(ToggleKind::Garage).unwrap().view();
        assert!(view.has_class(crate::toggle::CLASS_GHOST));
    }

    #[tokio::test]
    async fn test_controllers_are_independent() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Click(ToggleKind::Favorite));
        session.push(SessionEvent::Click(ToggleKind::Garage));
        run(&mut session).await;

        assert_eq!(site.requests_to("/api/").len(), 2);
        assert_eq!(state(&session, ToggleKind::Favorite), ToggleState::Idle(true));
        assert_eq!(state(&session, ToggleKind::Garage), ToggleState::Idle(true));
    }

    #[tokio::test]
    async fn test_rating_round_trip() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Rate(3));
        let events = run(&mut session).await;
        assert!(events.contains(&StateEvent::StatusMessage("感謝你的評分!".into())));
        let rating = session.forms().last_rating.clone().unwrap();
        assert!(rating.created);
        assert_eq!(rating.average_label().as_deref(), Some("4.0 (2)"));

        session.push(SessionEvent::Rate(5));
        let events = run(&mut session).await;
        assert!(events.contains(&StateEvent::StatusMessage("評分已更新!".into())));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_never_leaves_client() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Rate(9));
        let events = run(&mut session).await;
        assert!(events.iter().any(|e| matches!(e, StateEvent::Modal(_))));
        assert!(site.requests_to("/ajax/").is_empty());
    }

    #[tokio::test]
    async fn test_comment_and_reply() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Comment(CommentDraft::new(12, "Great build")));
        let events = run(&mut session).await;
        let posted = events.iter().find_map(|e| match e {
            StateEvent::CommentPosted(response) => Some(response.clone()),
            _ => None,
        });
        let posted = posted.unwrap();
        assert_eq!(posted.comment_id, Some(1));
        assert!(posted.comment_html.unwrap().contains("Great build"));

        session.push(SessionEvent::ToggleReply(1));
        session.process(Instant::now());
        assert!(session.forms().replies.is_open(1));

        session.push(SessionEvent::Comment(CommentDraft::new(12, "Thanks").reply_to(1)));
        run(&mut session).await;
        assert_eq!(session.forms().posted.len(), 2);
        assert_eq!(session.forms().posted[1].parent_id, Some(1));
        assert!(!session.forms().replies.is_open(1));
    }

    #[tokio::test]
    async fn test_reply_too_deep_is_reported() {
        let site = MockSite::start().await;
        let mut session = open(&site, 7).await;

        session.push(SessionEvent::Comment(CommentDraft::new(12, "deep").reply_to(300)));
        let events = run(&mut session).await;
        assert!(events.contains(&StateEvent::Modal("已達最大回覆深度(3層)".into())));
        assert!(session.forms().posted.is_empty());
    }

    #[tokio::test]
    async fn test_notifications_feed_alert_stack() {
        let site = MockSite::start().await;
        let server = PushServer::start(vec![
            r#"{"type":"new_post","vehicle":{"name":"Civic"},"title":"Hi"}"#.to_string(),
            r#"{"type":"something_else"}"#.to_string(),
        ])
        .await;

        let mut config = config_for(&site);
        config.notifications.enabled = true;
        config.site.notifications_path = server.url().to_string();
        let mut session = Session::new(config).unwrap();
        session.start().unwrap();

        let mut alerts = Vec::new();
        while let Some(frame) = session.next_frame().await {
            session.push(SessionEvent::Frame(frame));
            alerts.extend(
                session
                    .process(Instant::now())
                    .into_iter()
                    .filter(|e| matches!(e, StateEvent::AlertShown(_))),
            );
        }

        assert_eq!(alerts, vec![StateEvent::AlertShown("New post: Civic - Hi".into())]);
        assert!(!session.notifications_active());
        assert_eq!(session.alerts().unwrap().len(), 1);
    }
}
