use eframe::egui::{Align, Context, Layout, RichText, Ui};

use super::super::{BubbleApp, StatusKind};

const FPS_SAMPLE_WINDOW: usize = 180;

impl BubbleApp {
    pub(in crate::app) fn update_frame_stats(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        let stats = &mut self.stats;
        stats.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        stats.fps_samples.push_back(stats.fps_current);
        while stats.fps_samples.len() > FPS_SAMPLE_WINDOW {
            stats.fps_samples.pop_front();
        }
    }

    fn frame_stats_text(&self) -> String {
        let mut parts = vec![format!("FPS {:.0}", self.stats.fps_current)];

        if !self.stats.fps_samples.is_empty() {
            let avg =
                self.stats.fps_samples.iter().sum::<f32>() / self.stats.fps_samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }

        parts.push(format!("{} bubbles", self.engine.nodes().len()));

        let motion = if !self.tick_loop.is_running() {
            "paused"
        } else if self.engine.is_settled() {
            "settled"
        } else {
            "moving"
        };
        parts.push(motion.to_owned());

        parts.join(" | ")
    }

    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("vibe bubbles");
            ui.separator();
            ui.label(format!("concepts: {}", self.engine.store().len()));
            if self.is_loading() {
                ui.spinner();
            }

            let mut dismiss = false;
            if let Some(status) = &self.status {
                let text = RichText::new(&status.message);
                let text = match status.kind {
                    StatusKind::Info => text.weak(),
                    StatusKind::Error => text.color(ui.visuals().error_fg_color),
                };
                ui.separator();
                ui.label(text);
                dismiss = ui.small_button("x").clicked();
            }
            if dismiss {
                self.status = None;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(self.frame_stats_text());
            });
        });
    }
}
