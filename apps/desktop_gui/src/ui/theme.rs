//! Terminal-style palette and the red glitch wash.

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: egui::Color32,
    pub panel: egui::Color32,
    pub border: egui::Color32,
    pub accent: egui::Color32,
    pub text: egui::Color32,
    pub muted: egui::Color32,
    pub echo: egui::Color32,
    pub danger: egui::Color32,
    pub node_idle: egui::Color32,
    pub node_lit: egui::Color32,
    pub panel_rounding: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: egui::Color32::from_rgb(10, 10, 12),
            panel: egui::Color32::from_rgb(20, 20, 24),
            border: egui::Color32::from_rgb(52, 48, 36),
            accent: egui::Color32::from_rgb(247, 147, 26),
            text: egui::Color32::from_rgb(226, 226, 230),
            muted: egui::Color32::from_rgb(120, 120, 128),
            echo: egui::Color32::from_rgb(120, 220, 140),
            danger: egui::Color32::from_rgb(240, 71, 71),
            node_idle: egui::Color32::from_rgb(36, 36, 42),
            node_lit: egui::Color32::from_rgb(247, 147, 26),
            panel_rounding: 6,
        }
    }
}

impl Palette {
    /// Same palette washed towards red while a validation failure is shown.
    pub fn glitched(&self) -> Self {
        let wash = |c| mix_color(c, self.danger, 0.35);
        Self {
            background: wash(self.background),
            panel: wash(self.panel),
            border: self.danger,
            text: wash(self.text),
            echo: wash(self.echo),
            ..*self
        }
    }

    pub fn for_glitch(&self, glitch: bool) -> Self {
        if glitch {
            self.glitched()
        } else {
            *self
        }
    }

    pub fn corner_radius(&self) -> egui::CornerRadius {
        egui::CornerRadius::same(self.panel_rounding)
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.background;
        visuals.window_fill = self.panel;
        visuals.extreme_bg_color = self.node_idle;
        visuals.hyperlink_color = self.accent;
        visuals.selection.bg_fill = self.accent.gamma_multiply(0.4);
        visuals.override_text_color = Some(self.text);
        ctx.set_visuals(visuals);
    }
}

pub fn mix_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| -> u8 {
        let (a, b) = (a as f32, b as f32);
        (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
        from.a(),
    )
}
