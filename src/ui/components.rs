//! Shared UI components: top bar, overlays and dialogs

use eframe::egui::{self, Align2, RichText};
use std::time::Instant;

use crate::app::MotryApp;
use crate::session::SessionEvent;

/// Render the title bar with the theme switch and About button
pub fn render_top_bar(app: &mut MotryApp, ctx: &egui::Context) {
    let theme = app.ui.current_theme.clone();
    let messages = app.session.messages();

    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Motry").size(18.0).strong().color(theme.accent));

            let (dot, hint) = if app.session.notifications_active() {
                (theme.success, messages.alerts_on)
            } else if app.ui.notifications_closed {
                (theme.error, messages.alerts_closed)
            } else {
                (theme.text_muted, messages.alerts_off)
            };
            ui.label(RichText::new("●").color(dot)).on_hover_text(hint);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(messages.about_button).clicked() {
                    app.ui.show_about_dialog = true;
                }
                let label = if theme.dark {
                    messages.theme_light
                } else {
                    messages.theme_dark
                };
                if ui.button(label).clicked() {
                    app.toggle_theme();
                }
            });
        });
    });
}

/// Dim the window and swallow input while any request is in flight
pub fn render_busy_overlay(app: &MotryApp, ctx: &egui::Context) {
    if !app.session.overlay_visible() {
        return;
    }

    let theme = &app.ui.current_theme;
    #[allow(deprecated)]
    let screen = ctx.screen_rect();

    egui::Area::new(egui::Id::new("busy_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.allocate_rect(screen, egui::Sense::click_and_drag());
            ui.painter().rect_filled(screen, 0.0, theme.scrim);

            let center = egui::Rect::from_center_size(screen.center(), egui::vec2(220.0, 64.0));
            ui.scope_builder(egui::UiBuilder::new().max_rect(center), |ui| {
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label(
                        RichText::new(app.session.messages().busy).color(theme.text_primary),
                    );
                });
            });
        });
}

/// Pushed alerts stacked in the bottom-right corner, fading out at the end
pub fn render_alerts(app: &MotryApp, ctx: &egui::Context, now: Instant) {
    let Some(alerts) = app.session.alerts() else {
        return;
    };
    let visible = alerts.visible(now);
    if visible.is_empty() {
        return;
    }

    let theme = &app.ui.current_theme;
    egui::Area::new(egui::Id::new("alert_stack"))
        .order(egui::Order::Tooltip)
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .interactable(false)
        .show(ctx, |ui| {
            for (alert, opacity) in visible {
                ui.push_id(alert.id, |ui| {
                    ui.set_opacity(opacity);
                    egui::Frame::NONE
                        .fill(theme.bg_light)
                        .stroke(egui::Stroke::new(1.0, theme.accent))
                        .corner_radius(6.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&alert.message).color(theme.text_primary));
                            ui.label(
                                RichText::new(alert.created_at.format("%H:%M").to_string())
                                    .size(10.0)
                                    .color(theme.text_muted),
                            );
                        });
                });
                ui.add_space(6.0);
            }
        });
}

/// Yes/no window for a confirmed toggle
pub fn render_confirm_dialog(app: &mut MotryApp, ctx: &egui::Context) {
    let Some(dialog) = app.ui.confirm.clone() else {
        return;
    };

    let messages = app.session.messages();
    let mut answer = None;
    egui::Window::new(messages.confirm_title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(&dialog.prompt);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(messages.ok_button).clicked() {
                    answer = Some(true);
                }
                if ui.button(messages.cancel_button).clicked() {
                    answer = Some(false);
                }
            });
        });

    if let Some(accepted) = answer {
        app.ui.confirm = None;
        app.session.push(SessionEvent::Confirm {
            kind: dialog.kind,
            accepted,
        });
    }
}

/// Blocking message window
pub fn render_modal(app: &mut MotryApp, ctx: &egui::Context) {
    let Some(message) = app.ui.modal.clone() else {
        return;
    };
    let theme = &app.ui.current_theme;
    let messages = app.session.messages();

    let mut dismissed = false;
    egui::Window::new(messages.notice_title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(&message).color(theme.error));
            ui.add_space(8.0);
            if ui.button(messages.ok_button).clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        app.ui.modal = None;
    }
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut MotryApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let base_url = app.session.config().site.base_url.clone();
    let messages = app.session.messages();

    egui::Window::new(messages.about_title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Motry").size(24.0).strong().color(theme.accent));

                ui.add_space(4.0);
                ui.label(
                    RichText::new(messages.about_tagline)
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("{} {}", messages.version_label, env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );
                ui.hyperlink_to(&base_url, &base_url);

                ui.add_space(12.0);
                ui.label(
                    RichText::new(messages.built_with)
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                if ui.button(messages.close_button).clicked() {
                    app.ui.show_about_dialog = false;
                }
                ui.add_space(8.0);
            });
        });
}
