use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::vibe::Category;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn category_color(category: Category) -> Color32 {
    match category {
        Category::Mood => Color32::from_rgb(139, 92, 246),
        Category::Colors => Color32::from_rgb(236, 72, 153),
        Category::Objects => Color32::from_rgb(56, 189, 248),
        Category::Style => Color32::from_rgb(250, 204, 21),
        Category::Lighting => Color32::from_rgb(148, 163, 184),
        Category::Time => Color32::from_rgb(52, 211, 153),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 17, 17));

    let step = 48.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 60, 70, 50));

    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            stroke,
        );
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            stroke,
        );
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        let base = Color32::from_rgb(0, 0, 0);
        let overlay = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(base, overlay, 0.0), base);
        assert_eq!(blend_color(base, overlay, 1.0), overlay);
        assert_eq!(blend_color(base, overlay, 7.0), overlay);
    }
}
