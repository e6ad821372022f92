// src/ui.rs

use rockgen::{HexColor, Session};

/// Requests the panel cannot carry out by itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    Randomize,
    CopyLink,
    DownloadSvg,
    DownloadPng,
}

/// Widget state that lives between frames but is not part of the shape.
pub struct PanelState {
    fill_hex: String,
    bg_hex: String,
    copied_at: Option<f64>,
    pub status: Option<String>,
}

impl PanelState {
    pub fn new(session: &Session) -> Self {
        Self {
            fill_hex: session.state().color.to_hex(),
            bg_hex: session.state().bg.to_hex(),
            copied_at: None,
            status: None,
        }
    }

    /// Re-syncs the hex fields after the colors changed elsewhere.
    pub fn sync_from(&mut self, session: &Session) {
        self.fill_hex = session.state().color.to_hex();
        self.bg_hex = session.state().bg.to_hex();
    }

    pub fn mark_copied(&mut self, now: f64) {
        self.copied_at = Some(now);
    }
}

fn to_color32(color: HexColor) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn color_row(ui: &mut egui::Ui, label: &str, color: HexColor, hex: &mut String) -> Option<HexColor> {
    let mut picked = None;
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = color.to_array();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            let color = HexColor::from(rgb);
            *hex = color.to_hex();
            picked = Some(color);
        }
        ui.label("#");
        let response = ui.add(egui::TextEdit::singleline(hex).desired_width(64.0).char_limit(7));
        if response.changed() {
            picked = HexColor::parse(hex);
        }
        if response.lost_focus() {
            // Show the canonical spelling of whatever color is in effect.
            *hex = picked.unwrap_or(color).to_hex();
        }
    });
    picked
}

pub fn build_ui(ctx: &egui::Context, session: &mut Session, panel: &mut PanelState) -> Option<UiAction> {
    let mut action = None;
    let now = ctx.input(|i| i.time);
    let config = session.config().clone();

    egui::Area::new(egui::Id::new("title"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 16.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(&config.window_title)
                    .heading()
                    .strong()
                    .color(to_color32(session.title_color())),
            );
        });

    egui::Window::new("Controls")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                let mut sides = session.state().sides;
                if ui
                    .add(egui::Slider::new(&mut sides, config.sides_range.clone()).text("Sides"))
                    .changed()
                {
                    session.set_sides(sides);
                }

                let mut variance = session.state().variance;
                if ui
                    .add(egui::Slider::new(&mut variance, config.variance_range.clone()).step_by(1.0).text("Variance"))
                    .changed()
                {
                    session.set_variance(variance);
                }

                let mut roughness = session.state().roughness;
                if ui
                    .add(egui::Slider::new(&mut roughness, config.roughness_range.clone()).step_by(1.0).text("Roughness"))
                    .changed()
                {
                    session.set_roughness(roughness);
                }

                ui.separator();

                if let Some(color) = color_row(ui, "Fill", session.state().color, &mut panel.fill_hex) {
                    session.set_fill(color);
                }
                if let Some(color) = color_row(ui, "Background", session.state().bg, &mut panel.bg_hex) {
                    session.set_background(color);
                }

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Randomize").clicked() {
                        action = Some(UiAction::Randomize);
                    }

                    let copied = panel
                        .copied_at
                        .is_some_and(|at| now - at < config.copy_feedback_secs);
                    if !copied {
                        panel.copied_at = None;
                    }
                    let label = if copied { "Copied!" } else { "Copy Link" };
                    if ui.add_enabled(!copied, egui::Button::new(label)).clicked() {
                        action = Some(UiAction::CopyLink);
                    }
                });

                ui.horizontal(|ui| {
                    if ui.button("Download SVG").clicked() {
                        action = Some(UiAction::DownloadSvg);
                    }
                    if ui.button("Download PNG").clicked() {
                        action = Some(UiAction::DownloadPng);
                    }
                });

                ui.separator();
                ui.label(format!("Seed: {}", session.state().seed));
                if let Some(status) = &panel.status {
                    ui.small(status);
                }
            });
        });

    // Keep repainting while the "Copied!" label is counting down.
    if panel.copied_at.is_some() {
        ctx.request_repaint();
    }

    action
}
