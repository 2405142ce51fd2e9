use eframe::egui::{self, Color32, Stroke, Visuals};

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    pub dark: bool,

    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub border: Color32,
    pub selection: Color32,
    /// Dimming layer behind the busy spinner
    pub scrim: Color32,
}

impl Theme {
    pub fn from_config(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Asphalt dark theme
    pub fn dark() -> Self {
        Self {
            dark: true,
            bg_darkest: Color32::from_rgb(14, 15, 18),
            bg_dark: Color32::from_rgb(22, 24, 28),
            bg_medium: Color32::from_rgb(31, 34, 40),
            bg_light: Color32::from_rgb(45, 49, 57),

            text_primary: Color32::from_rgb(244, 245, 247),
            text_secondary: Color32::from_rgb(196, 199, 205),
            text_muted: Color32::from_rgb(134, 139, 148),

            accent: Color32::from_rgb(239, 68, 68),         // Red-500
            accent_hover: Color32::from_rgb(248, 113, 113), // Red-400
            accent_muted: Color32::from_rgb(185, 28, 28),   // Red-700

            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(234, 179, 8),
            error: Color32::from_rgb(248, 113, 113),

            border: Color32::from_rgb(58, 62, 71),
            selection: Color32::from_rgb(239, 68, 68).gamma_multiply(0.3),
            scrim: Color32::from_black_alpha(140),
        }
    }

    /// Daylight theme
    pub fn light() -> Self {
        Self {
            dark: false,
            bg_darkest: Color32::from_rgb(255, 255, 255),
            bg_dark: Color32::from_rgb(246, 247, 249),
            bg_medium: Color32::from_rgb(236, 238, 241),
            bg_light: Color32::from_rgb(222, 225, 230),

            text_primary: Color32::from_rgb(24, 26, 31),
            text_secondary: Color32::from_rgb(64, 68, 77),
            text_muted: Color32::from_rgb(112, 117, 128),

            accent: Color32::from_rgb(220, 38, 38),        // Red-600
            accent_hover: Color32::from_rgb(239, 68, 68),  // Red-500
            accent_muted: Color32::from_rgb(254, 202, 202), // Red-200

            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(202, 138, 4),
            error: Color32::from_rgb(220, 38, 38),

            border: Color32::from_rgb(203, 207, 214),
            selection: Color32::from_rgb(220, 38, 38).gamma_multiply(0.2),
            scrim: Color32::from_white_alpha(150),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
