use std::path::Path;

use arboard::Clipboard;
use challenge_core::catalog::{Choice, Offer};
use eframe::egui;
use shared::domain::{LogEntry, NodeIndex};

use super::theme::Palette;

const NODE_SIZE: f32 = 64.0;

pub fn log_panel(ui: &mut egui::Ui, entries: &[LogEntry], palette: &Palette) {
    egui::Frame::new()
        .fill(palette.panel)
        .stroke(egui::Stroke::new(1.0, palette.border))
        .corner_radius(palette.corner_radius())
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            egui::ScrollArea::vertical()
                .max_height(200.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in entries {
                        let color = if entry.is_echo() {
                            palette.echo
                        } else {
                            palette.muted
                        };
                        ui.label(
                            egui::RichText::new(entry.to_string())
                                .monospace()
                                .color(color),
                        );
                    }
                });
        });
}

pub fn primary_button(ui: &mut egui::Ui, label: &str, palette: &Palette) -> bool {
    ui.add(
        egui::Button::new(
            egui::RichText::new(label)
                .strong()
                .color(palette.background),
        )
        .fill(palette.accent)
        .corner_radius(egui::CornerRadius::same(4))
        .min_size(egui::vec2(220.0, 36.0)),
    )
    .clicked()
}

/// One button per option; returns the id of the clicked option.
pub fn choice_list(ui: &mut egui::Ui, choices: &[Choice], palette: &Palette) -> Option<String> {
    let mut picked = None;
    for choice in choices {
        let button = egui::Button::new(egui::RichText::new(&choice.label).color(palette.text))
            .fill(palette.node_idle)
            .stroke(egui::Stroke::new(1.0, palette.border))
            .corner_radius(egui::CornerRadius::same(4))
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add(button).clicked() {
            picked = Some(choice.id.clone());
        }
    }
    picked
}

/// Square nodes in a row, the lit one filled with the accent color.
pub fn node_grid(
    ui: &mut egui::Ui,
    node_count: u8,
    active: Option<NodeIndex>,
    palette: &Palette,
) -> Option<NodeIndex> {
    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        for node in 0..node_count {
            let index = NodeIndex(node);
            let fill = if active == Some(index) {
                palette.node_lit
            } else {
                palette.node_idle
            };
            let button = egui::Button::new(
                egui::RichText::new(format!("{}", node + 1))
                    .monospace()
                    .color(palette.muted),
            )
            .fill(fill)
            .stroke(egui::Stroke::new(1.0, palette.border))
            .corner_radius(palette.corner_radius());
            if ui.add_sized([NODE_SIZE, NODE_SIZE], button).clicked() {
                clicked = Some(index);
            }
        }
    });
    clicked
}

pub fn offer_links(ui: &mut egui::Ui, offer: &Offer, status: &mut String) {
    if let Some(url) = &offer.channel_invite_url {
        ui.horizontal(|ui| {
            ui.hyperlink_to(offer.channel_invite_label.as_str(), url);
            if ui.small_button("Copier").clicked() {
                copy_to_clipboard(url, status);
            }
        });
    }
    if let Some(url) = &offer.referral_url {
        ui.hyperlink_to(offer.referral_label.as_str(), url);
    }
}

fn copy_to_clipboard(text: &str, status: &mut String) {
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => *status = "Lien copié dans le presse-papiers".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "clipboard unavailable");
            *status = format!("Copie impossible: {err}");
        }
    }
}

/// Reads the logo into a texture. A missing or unreadable file just means no logo.
pub fn load_logo(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "logo not loaded");
            return None;
        }
    };
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Some(ctx.load_texture(
        format!("logo:{}", path.display()),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}
