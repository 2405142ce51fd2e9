//! Vehicle page rendering: membership toggles, rating and comments

use eframe::egui::{self, Color32, RichText, Vec2};

use crate::app::MotryApp;
use crate::comment::CommentDraft;
use crate::session::SessionEvent;
use crate::toggle::{CLASS_GHOST, CLASS_LOADING, ToggleKind, ToggleView};
use crate::ui::theme::Theme;

/// Render the central panel
pub fn render_vehicle_view(app: &mut MotryApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let messages = app.session.messages();

    render_section_frame(&theme, ui, messages.section_vehicle, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(messages.vehicle_id_label).color(theme.text_muted));
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.ui.vehicle_input)
                    .desired_width(120.0)
                    .hint_text(messages.vehicle_id_hint),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let loading = app.session.page().is_loading();
            if ui.add_enabled(!loading, egui::Button::new(messages.open_button)).clicked() || submitted {
                app.open_vehicle();
            }
            if loading {
                ui.spinner();
            }
        });

        if let Some(vehicle_id) = app.session.vehicle_id() {
            ui.add_space(8.0);
            let title = app
                .ui
                .page_title
                .clone()
                .unwrap_or_else(|| format!("{} {}", messages.default_vehicle, vehicle_id));
            ui.label(RichText::new(title).size(18.0).strong().color(theme.text_primary));
        }
    });

    if app.session.vehicle_id().is_none() {
        return;
    }

    ui.add_space(12.0);
    render_section_frame(&theme, ui, messages.section_collections, |ui| {
        render_toggles(app, &theme, ui);
        if let Some(status) = &app.ui.status_message {
            ui.add_space(6.0);
            ui.label(RichText::new(status).color(theme.text_secondary));
        }
    });

    ui.add_space(12.0);
    render_section_frame(&theme, ui, messages.section_rating, |ui| {
        render_rating(app, &theme, ui);
    });

    ui.add_space(12.0);
    render_section_frame(&theme, ui, messages.section_comments, |ui| {
        render_comments(app, &theme, ui);
    });
}

fn render_toggles(app: &mut MotryApp, theme: &Theme, ui: &mut egui::Ui) {
    let views: Vec<(ToggleKind, ToggleView)> = app
        .session
        .toggles()
        .iter()
        .map(|t| (t.kind(), t.view()))
        .collect();

    if views.is_empty() {
        ui.label(RichText::new(app.session.messages().no_controls).color(theme.text_muted));
        return;
    }

    let mut clicked = None;
    ui.horizontal(|ui| {
        for (kind, view) in &views {
            ui.vertical(|ui| {
                if toggle_button(theme, ui, view).clicked() {
                    clicked = Some(*kind);
                }
                ui.label(RichText::new(view.status).size(11.0).color(theme.text_muted));
            });
            ui.add_space(16.0);
        }
    });

    if let Some(kind) = clicked {
        app.session.push(SessionEvent::Click(kind));
    }
}

/// A membership button styled from its view classes
fn toggle_button(theme: &Theme, ui: &mut egui::Ui, view: &ToggleView) -> egui::Response {
    let ghost = view.has_class(CLASS_GHOST);
    let (fill, text) = if ghost {
        (Color32::TRANSPARENT, theme.accent)
    } else {
        (theme.accent, theme.bg_darkest)
    };

    let button = egui::Button::new(RichText::new(view.label).color(text))
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, theme.accent))
        .corner_radius(6.0)
        .min_size(Vec2::new(140.0, 32.0));

    let response = ui.add_enabled(view.enabled, button);
    if view.has_class(CLASS_LOADING) {
        ui.ctx().request_repaint();
    }
    response
}

fn render_rating(app: &mut MotryApp, theme: &Theme, ui: &mut egui::Ui) {
    let messages = app.session.messages();
    let rating = app.session.forms().is_rating();
    let mut submit = None;

    ui.horizontal(|ui| {
        let score = &mut app.session.forms_mut().score;
        for value in crate::rating::MIN_SCORE..=crate::rating::MAX_SCORE {
            let star = if value <= *score { "★" } else { "☆" };
            let star = RichText::new(star).size(22.0).color(theme.warning);
            if ui.add(egui::Button::new(star).frame(false)).clicked() {
                *score = value;
            }
        }

        ui.add_space(12.0);
        let chosen = *score;
        if ui
            .add_enabled(chosen > 0 && !rating, egui::Button::new(messages.rate_button))
            .clicked()
        {
            submit = Some(chosen);
        }
        if rating {
            ui.spinner();
        }
    });

    if let Some(average) = app
        .session
        .forms()
        .last_rating
        .as_ref()
        .and_then(|r| r.average_label())
    {
        ui.label(RichText::new(format!("{} {}", messages.average_label, average)).color(theme.text_muted));
    }

    if let Some(score) = submit {
        app.session.push(SessionEvent::Rate(score));
    }
}

fn render_comments(app: &mut MotryApp, theme: &Theme, ui: &mut egui::Ui) {
    let messages = app.session.messages();
    let commenting = app.session.forms().is_commenting();
    let mut send = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(messages.post_id_label).color(theme.text_muted));
        ui.add(egui::TextEdit::singleline(&mut app.ui.post_input).desired_width(100.0));
    });
    {
        let forms = app.session.forms_mut();
        ui.add(
            egui::TextEdit::multiline(&mut forms.comment_text)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text(messages.comment_hint),
        );
        ui.horizontal(|ui| {
            ui.label(RichText::new(messages.image_url_label).color(theme.text_muted));
            ui.add(egui::TextEdit::singleline(&mut forms.image_url).desired_width(280.0));
        });
    }
    if ui
        .add_enabled(!commenting, egui::Button::new(messages.send_button))
        .clicked()
    {
        send = Some(None);
    }

    let posted: Vec<(u64, String)> = app
        .session
        .forms()
        .posted
        .iter()
        .filter_map(|c| Some((c.comment_id?, c.summary(messages))))
        .collect();

    let mut reply_toggle = None;
    for (comment_id, summary) in &posted {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("#{} {}", comment_id, summary)).color(theme.text_secondary));
            if ui.small_button(messages.reply_button).clicked() {
                reply_toggle = Some(*comment_id);
            }
        });

        if app.session.forms().replies.is_open(*comment_id) {
            ui.horizontal(|ui| {
                ui.add_space(16.0);
                ui.add(
                    egui::TextEdit::singleline(&mut app.session.forms_mut().reply_text)
                        .desired_width(320.0)
                        .hint_text(messages.reply_hint),
                );
                if ui
                    .add_enabled(!commenting, egui::Button::new(messages.reply_button))
                    .clicked()
                {
                    send = Some(Some(*comment_id));
                }
            });
        }
    }

    if let Some(comment_id) = reply_toggle {
        app.session.push(SessionEvent::ToggleReply(comment_id));
    }
    if let Some(parent) = send {
        submit_comment(app, parent);
    }
}

fn submit_comment(app: &mut MotryApp, parent: Option<u64>) {
    let Ok(post_id) = app.ui.post_input.trim().parse::<u64>() else {
        app.ui.modal = Some(format!(
            "{}: {}",
            app.session.messages().invalid_post_id,
            app.ui.post_input.trim()
        ));
        return;
    };

    let forms = app.session.forms();
    let mut draft = match parent {
        Some(parent) => CommentDraft::new(post_id, forms.reply_text.clone()).reply_to(parent),
        None => CommentDraft::new(post_id, forms.comment_text.clone()),
    };
    if parent.is_none() && !forms.image_url.trim().is_empty() {
        draft = draft.with_image_url(forms.image_url.trim());
    }
    app.session.push(SessionEvent::Comment(draft));
}

/// Titled panel frame, one per section
fn render_section_frame(
    theme: &Theme,
    ui: &mut egui::Ui,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui),
) {
    egui::Frame::NONE
        .fill(theme.bg_medium)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .corner_radius(8.0)
        .inner_margin(14.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).size(13.0).strong().color(theme.accent));
            ui.add_space(8.0);
            add_contents(ui);
        });
}
