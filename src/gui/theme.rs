use eframe::egui;

/// Look of the desktop window. Built once and handed to the app at
/// construction; nothing else touches the egui style afterwards.
#[derive(Debug, Clone)]
pub struct Theme {
    pub dark: bool,
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub accent: egui::Color32,
    pub success: egui::Color32,
    pub error: egui::Color32,
    pub log_text: egui::Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}

impl Theme {
    pub fn midnight() -> Self {
        Self {
            dark: true,
            panel_fill: egui::Color32::from_rgb(0x0a, 0x12, 0x20),
            window_fill: egui::Color32::from_rgb(0x17, 0x2b, 0x46),
            accent: egui::Color32::from_rgb(0x37, 0xbf, 0xae),
            success: egui::Color32::from_rgb(0x6c, 0xd4, 0x8a),
            error: egui::Color32::from_rgb(0xf0, 0x6a, 0x6a),
            log_text: egui::Color32::from_rgb(0xac, 0xc3, 0xdf),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            panel_fill: egui::Color32::from_rgb(0xf4, 0xf6, 0xf9),
            window_fill: egui::Color32::WHITE,
            accent: egui::Color32::from_rgb(0x1f, 0x7a, 0x6e),
            success: egui::Color32::from_rgb(0x1e, 0x8e, 0x3e),
            error: egui::Color32::from_rgb(0xc6, 0x28, 0x28),
            log_text: egui::Color32::from_rgb(0x30, 0x3a, 0x48),
        }
    }

    /// Picks the theme named by `MAILBACKUP_THEME` (`light` or `dark`).
    pub fn from_env() -> Self {
        match std::env::var("MAILBACKUP_THEME").as_deref() {
            Ok("light") => Self::light(),
            _ => Self::midnight(),
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);

        let mut visuals = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = self.panel_fill;
        visuals.window_fill = self.window_fill;
        visuals.selection.bg_fill = self.accent;
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, self.accent);
        visuals.widgets.active.bg_fill = self.accent;

        style.visuals = visuals;
        ctx.set_style(style);
    }
}
