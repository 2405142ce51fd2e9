use eframe::egui;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::session::{Session, SessionEvent};
use crate::state::UiState;
use crate::ui;
use crate::ui::theme::Theme;

/// How often to look for pushed frames while nothing else is scheduled
const PUSH_POLL: Duration = Duration::from_millis(250);

/// Main application state
pub struct MotryApp {
    /// Vehicle page session
    pub(crate) session: Session,
    /// Window state
    pub(crate) ui: UiState,
}

impl MotryApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            Config::default()
        });
        let theme = Theme::from_config(config.client.dark_theme);

        let mut session = Session::new(config)?;
        if let Err(e) = session.start() {
            tracing::error!("Notifications unavailable: {}", e);
        }

        Ok(Self {
            session,
            ui: UiState::new(theme),
        })
    }

    /// Parse the vehicle box and open that page
    pub(crate) fn open_vehicle(&mut self) {
        match self.ui.vehicle_input.trim().parse::<u64>() {
            Ok(id) => self.session.push(SessionEvent::Open(id)),
            Err(_) => {
                self.ui.modal = Some(format!(
                    "{}: {}",
                    self.session.messages().invalid_vehicle_id,
                    self.ui.vehicle_input.trim()
                ))
            }
        }
    }

    /// Flip the theme and remember the choice
    pub(crate) fn toggle_theme(&mut self) {
        let dark = !self.ui.current_theme.dark;
        self.ui.set_dark(dark);

        let mut config = self.session.config().clone();
        config.client.dark_theme = dark;
        if let Err(e) = config.save() {
            tracing::error!("Failed to save theme choice: {}", e);
        }
    }

    fn handle_events(&mut self, ctx: &egui::Context) {
        let events = self.session.process(Instant::now());
        let messages = self.session.messages();
        for event in &events {
            self.ui.apply(event, messages);
        }
        if events.iter().any(|e| matches!(e, crate::state::StateEvent::PageLoaded { .. })) {
            let title = match &self.ui.page_title {
                Some(title) => format!("Motry - {}", title),
                None => "Motry".to_string(),
            };
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }
    }
}

impl eframe::App for MotryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        self.handle_events(ctx);

        ui::render_top_bar(self, ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui::render_vehicle_view(self, ui);
            });
        });

        let now = Instant::now();
        ui::render_busy_overlay(self, ctx);
        ui::render_alerts(self, ctx, now);
        ui::render_confirm_dialog(self, ctx);
        ui::render_modal(self, ctx);
        ui::render_about_dialog(self, ctx);

        let wait = self
            .session
            .next_deadline(now)
            .or_else(|| self.session.notifications_active().then_some(PUSH_POLL));
        if let Some(wait) = wait {
            ctx.request_repaint_after(wait);
        }
    }
}
