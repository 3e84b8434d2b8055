use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use challenge_core::{ChallengeKind, Session, Variant};
use eframe::egui;
use shared::domain::{Phase, Snapshot};

use super::{
    theme::Palette,
    widgets::{choice_list, load_logo, log_panel, node_grid, offer_links, primary_button},
};
use crate::controller::{events::UiEvent, orchestration::dispatch_ui_event};

const IDLE_REPAINT: Duration = Duration::from_millis(250);
const LOGO_SIZE: f32 = 72.0;

pub struct ChallengeApp {
    session: Session,
    variant: Variant,
    palette: Palette,
    applied_glitch: Option<bool>,
    answer_input: String,
    status: String,
    logo_path: PathBuf,
    logo: Option<egui::TextureHandle>,
    logo_attempted: bool,
}

impl ChallengeApp {
    pub fn new(session: Session, logo_path: PathBuf) -> Self {
        let variant = session.controller().variant().clone();
        Self {
            session,
            variant,
            palette: Palette::default(),
            applied_glitch: None,
            answer_input: String::new(),
            status: String::new(),
            logo_path,
            logo: None,
            logo_attempted: false,
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context, glitch: bool) {
        if self.applied_glitch == Some(glitch) {
            return;
        }
        self.palette.for_glitch(glitch).apply(ctx);
        self.applied_glitch = Some(glitch);
    }

    fn show_header(&self, ui: &mut egui::Ui, palette: &Palette) {
        ui.vertical_centered(|ui| {
            if let Some(logo) = &self.logo {
                ui.add(egui::Image::new(logo).fit_to_exact_size(egui::vec2(LOGO_SIZE, LOGO_SIZE)));
            }
            ui.label(
                egui::RichText::new(&self.variant.title)
                    .monospace()
                    .size(20.0)
                    .color(palette.accent),
            );
            let offer = &self.variant.offer;
            if !offer.price_line.is_empty() {
                ui.label(egui::RichText::new(&offer.price_line).strong());
            }
            if !offer.tagline.is_empty() {
                ui.label(egui::RichText::new(&offer.tagline).color(palette.muted));
            }
        });
    }

    fn show_phase(
        &mut self,
        ui: &mut egui::Ui,
        snapshot: &Snapshot,
        palette: &Palette,
        events: &mut Vec<UiEvent>,
    ) {
        match snapshot.phase {
            Phase::Intro => {
                ui.vertical_centered(|ui| {
                    if primary_button(ui, &self.variant.offer.start_label, palette) {
                        events.push(UiEvent::StartPressed);
                    }
                });
            }
            Phase::Challenge(index) => {
                let Some(spec) = self.variant.phase(index) else {
                    return;
                };
                ui.label(
                    egui::RichText::new(format!(
                        "{} ({}/{})",
                        spec.title,
                        index + 1,
                        self.variant.phase_count()
                    ))
                    .strong()
                    .color(palette.accent),
                );
                ui.add_space(6.0);
                match &spec.challenge {
                    ChallengeKind::Text(text) => {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.answer_input)
                                .hint_text(text.placeholder.as_str())
                                .desired_width(f32::INFINITY),
                        );
                        if response.changed() {
                            events.push(UiEvent::AnswerEdited(self.answer_input.clone()));
                        }
                        let entered =
                            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if primary_button(ui, &text.submit_label, palette) || entered {
                            events.push(UiEvent::AnswerSubmitted(self.answer_input.clone()));
                        }
                    }
                    ChallengeKind::Choice(choice) => {
                        if let Some(choice_id) = choice_list(ui, &choice.choices, palette) {
                            events.push(UiEvent::ChoicePicked(choice_id));
                        }
                    }
                    ChallengeKind::Memory(memory) => {
                        if let Some(node) =
                            node_grid(ui, memory.node_count, snapshot.active_node, palette)
                        {
                            events.push(UiEvent::NodeClicked(node));
                        }
                        ui.label(
                            egui::RichText::new(format!(
                                "{}/{}",
                                snapshot.user_pattern.len(),
                                snapshot.pattern.len()
                            ))
                            .monospace()
                            .color(palette.muted),
                        );
                    }
                }
            }
            Phase::Success => {
                let offer = &self.variant.offer;
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&offer.success_headline)
                            .size(24.0)
                            .strong()
                            .color(palette.accent),
                    );
                    if !offer.success_body.is_empty() {
                        ui.label(offer.success_body.as_str());
                    }
                    ui.add_space(8.0);
                    offer_links(ui, offer, &mut self.status);
                    ui.add_space(8.0);
                    if primary_button(ui, &offer.reset_label, palette) {
                        events.push(UiEvent::ResetPressed);
                    }
                });
            }
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui, phase: Phase, palette: &Palette) {
        let offer = &self.variant.offer;
        if !self.status.is_empty() {
            ui.label(egui::RichText::new(&self.status).color(palette.danger));
        }
        if !phase.is_terminal() && !offer.warning.is_empty() {
            ui.label(egui::RichText::new(&offer.warning).small().color(palette.muted));
        }
        if !offer.footer.is_empty() {
            ui.label(
                egui::RichText::new(offer.footer.join("  •  "))
                    .small()
                    .monospace()
                    .color(palette.muted),
            );
        }
    }
}

impl eframe::App for ChallengeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.session.fire_due(now);
        let snapshot = self.session.snapshot();

        if !self.logo_attempted {
            self.logo = load_logo(ctx, &self.logo_path);
            self.logo_attempted = true;
        }
        self.apply_theme_if_needed(ctx, snapshot.glitch);
        let palette = self.palette.for_glitch(snapshot.glitch);

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::NONE
                    .fill(palette.background)
                    .inner_margin(egui::Margin::symmetric(24, 8)),
            )
            .show(ctx, |ui| self.show_footer(ui, snapshot.phase, &palette));

        let mut events = Vec::new();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(palette.background)
                    .stroke(egui::Stroke::new(2.0, palette.border))
                    .inner_margin(egui::Margin::same(24)),
            )
            .show(ctx, |ui| {
                self.show_header(ui, &palette);
                ui.add_space(12.0);
                log_panel(ui, &snapshot.log, &palette);
                ui.add_space(12.0);
                self.show_phase(ui, &snapshot, &palette, &mut events);
            });

        for event in events {
            dispatch_ui_event(&mut self.session, now, event, &mut self.status);
        }
        self.answer_input = self.session.snapshot().answer;

        match self.session.next_deadline() {
            Some(deadline) => ctx.request_repaint_after(deadline.saturating_duration_since(now)),
            None => ctx.request_repaint_after(IDLE_REPAINT),
        }
    }
}
