use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Key, Pos2, Rect, Sense, Stroke, Ui, vec2,
};

use crate::engine::Node;
use crate::util::format_weight;
use crate::vibe::{MAX_WEIGHT, WEIGHT_STEP};

use super::{BubbleApp, follow_surface};
use super::render_utils::{blend_color, category_color, draw_background};

fn hovered_node(nodes: &[Node], origin: Pos2, pointer: Option<Pos2>) -> Option<usize> {
    let pointer = pointer?;
    // Later nodes are painted on top, so they win the hit test.
    nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| (origin + node.position).distance(pointer) <= node.radius)
        .map(|(index, _)| index)
}

/// Delete acts on the hovered bubble only when no text field owns the keyboard.
fn delete_requested(editing: bool, keyboard_claimed: bool, delete_pressed: bool) -> bool {
    delete_pressed && !editing && !keyboard_claimed
}

fn draw_node(painter: &egui::Painter, origin: Pos2, node: &Node, hovered: bool) {
    let center = origin + node.position;
    let base = category_color(node.category);
    let fill = blend_color(
        Color32::from_rgba_unmultiplied(20, 20, 24, 230),
        base,
        if hovered { 0.45 } else { 0.3 },
    );

    if node.weight >= MAX_WEIGHT - WEIGHT_STEP {
        painter.circle_filled(center, node.radius + 6.0, base.gamma_multiply(0.18));
    }
    painter.circle_filled(center, node.radius, fill);
    painter.circle_stroke(
        center,
        node.radius,
        Stroke::new(if node.frozen { 3.0 } else { 2.0 }, base),
    );

    if !node.frozen {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &node.label,
            FontId::proportional((node.radius * 0.28).clamp(11.0, 18.0)),
            Color32::from_rgb(235, 235, 240),
        );
    }
    painter.text(
        center + vec2(0.0, node.radius - 10.0),
        Align2::CENTER_CENTER,
        format_weight(node.weight),
        FontId::monospace(10.0),
        Color32::from_gray(160),
    );
}

impl BubbleApp {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let retargeted = follow_surface(
            &mut self.viewport,
            &mut self.tick_loop,
            &mut self.tick_handle,
            response.id,
        );
        if self.viewport.observe(rect.size()).is_some() || retargeted {
            self.engine.set_viewport(self.viewport.size());
        }

        let now = ui.input(|input| input.time);
        let engine = &mut self.engine;
        self.tick_loop
            .drive(ui.ctx(), now, |delta_seconds| engine.step(delta_seconds));

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let origin = rect.min;
        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = hovered_node(self.engine.nodes(), origin, pointer);

        for (index, node) in self.engine.nodes().iter().enumerate() {
            draw_node(&painter, origin, node, hovered == Some(index));
        }

        if self.engine.store().is_empty() {
            let message = if self.is_loading() {
                "Analysing vibe..."
            } else {
                "Load a vibe or add a concept to surface bubbles."
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(16.0),
                Color32::from_gray(140),
            );
        }

        let hovered_id = hovered.and_then(|index| {
            self.engine
                .nodes()
                .get(index)
                .map(|node| node.id.clone())
        });

        if let Some(id) = &hovered_id {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);

            if response.clicked() {
                self.engine.bump_weight(id);
            } else if response.secondary_clicked() && self.engine.begin_edit(id) {
                self.focus_editor = true;
            } else if delete_requested(
                self.engine.editing().is_some(),
                ui.ctx().wants_keyboard_input(),
                ui.input(|input| input.key_pressed(Key::Delete)),
            ) {
                self.engine.remove_node(id);
            }
        }

        self.draw_inline_editor(ui, origin);
    }

    fn draw_inline_editor(&mut self, ui: &mut Ui, origin: Pos2) {
        let Some(session) = self.engine.editing() else {
            return;
        };
        let Some(node) = self.engine.node(&session.id) else {
            // Node not spawned yet; it will be on the next tick.
            return;
        };
        let center = origin + node.position;
        let width = (node.radius * 1.8).max(120.0);
        let editor_rect = Rect::from_center_size(center, vec2(width, 24.0));

        let Some(draft) = self.engine.edit_draft_mut() else {
            return;
        };
        let editor = ui.put(
            editor_rect,
            egui::TextEdit::singleline(draft).horizontal_align(egui::Align::Center),
        );

        if self.focus_editor {
            editor.request_focus();
            self.focus_editor = false;
        } else if editor.lost_focus() {
            if ui.input(|input| input.key_pressed(Key::Escape)) {
                self.engine.cancel_edit();
            } else {
                self.engine.commit_edit();
            }
        }
    }
}
