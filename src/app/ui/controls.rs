use eframe::egui::{self, Key, RichText, ScrollArea, Slider, Ui};
use tracing::{info, warn};

use crate::util::format_weight;
use crate::vibe::{Category, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT, write_export};

use super::super::render_utils::category_color;
use super::super::{BubbleApp, StatusKind};

impl BubbleApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Vibe");
        let source = self
            .concepts_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "bundled demo".to_owned());
        ui.label(RichText::new(format!("source: {source}")).weak());

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.is_loading(), egui::Button::new("Reload"))
                .clicked()
            {
                self.request_load();
            }
            if ui.button("Export").clicked() {
                self.export();
            }

            let running = self.tick_loop.is_running();
            if ui.button(if running { "Pause" } else { "Resume" }).clicked() {
                if running {
                    self.pause();
                } else {
                    self.resume();
                }
            }
        });

        ui.separator();
        self.draw_add_form(ui);

        ui.separator();
        egui::CollapsingHeader::new("Physics")
            .default_open(false)
            .show(ui, |ui| {
                let config = self.engine.config_mut();
                ui.add(Slider::new(&mut config.center_pull, 0.0..=0.05).text("centre pull"));
                ui.add(Slider::new(&mut config.damping, 0.5..=0.99).text("damping"));
                ui.add(Slider::new(&mut config.restitution, 0.0..=1.0).text("restitution"));
            });

        ui.separator();
        ui.label(
            RichText::new("Click a bubble to amplify it, right-click to rename, Delete to remove.")
                .weak(),
        );
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| self.draw_concept_list(ui));
    }

    fn draw_add_form(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Add concept").strong());

        let form = &mut self.add_form;
        egui::ComboBox::from_label("category")
            .selected_text(form.category.label())
            .show_ui(ui, |ui| {
                for category in Category::ALL {
                    ui.selectable_value(&mut form.category, category, category.label());
                }
            });

        let label_response = ui.add(
            egui::TextEdit::singleline(&mut form.label).hint_text("New label (e.g. rain)"),
        );
        ui.add(Slider::new(&mut form.weight, MIN_WEIGHT..=MAX_WEIGHT).step_by(0.1).text("weight"));

        let submitted =
            label_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
        if ui.button("Add").clicked() || submitted {
            let category = self.add_form.category;
            let label = self.add_form.label.clone();
            match self.engine.add_node(category, &label, self.add_form.weight) {
                Some(id) => {
                    info!(%id, category = category.key(), "concept added");
                    self.add_form.label.clear();
                    self.add_form.weight = DEFAULT_WEIGHT;
                }
                None => self.set_status(
                    StatusKind::Error,
                    format!("Cannot add \"{}\": label is empty or already used", label.trim()),
                ),
            }
        }
    }

    fn draw_concept_list(&mut self, ui: &mut Ui) {
        let mut removed = None;

        for category in Category::ALL {
            let mut concepts = self
                .engine
                .store()
                .iter()
                .filter(|concept| concept.category == category)
                .peekable();
            if concepts.peek().is_none() {
                continue;
            }

            ui.label(RichText::new(category.label()).color(category_color(category)));
            ui.horizontal_wrapped(|ui| {
                for concept in concepts {
                    let text = format!("{} {} ×", concept.label, format_weight(concept.weight));
                    if ui.small_button(text).clicked() {
                        removed = Some(concept.id.clone());
                    }
                }
            });
            ui.add_space(4.0);
        }

        if let Some(id) = removed {
            self.engine.remove_node(&id);
        }
    }

    fn export(&mut self) {
        match write_export(self.engine.store(), &self.export_path) {
            Ok(()) => {
                info!(path = %self.export_path.display(), "vibe exported");
                let message = format!("Exported to {}", self.export_path.display());
                self.set_status(StatusKind::Info, message);
            }
            Err(error) => {
                let message = format!("{error:#}");
                warn!(error = %message, "vibe export failed");
                self.set_status(StatusKind::Error, message);
            }
        }
    }
}
