use eframe::egui::Vec2;

use crate::vibe::{Category, Concept, clamp_weight};

pub const BASE_RADIUS: f32 = 20.0;
pub const RADIUS_SCALE: f32 = 30.0;

pub fn radius_for_weight(weight: f32) -> f32 {
    BASE_RADIUS + clamp_weight(weight) * RADIUS_SCALE
}

/// Simulation-side view of one live concept.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub category: Category,
    pub label: String,
    pub weight: f32,
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub frozen: bool,
}

impl Node {
    pub(super) fn spawn(concept: &Concept, position: Vec2) -> Self {
        Self {
            id: concept.id.clone(),
            category: concept.category,
            label: concept.label.clone(),
            weight: concept.weight,
            radius: radius_for_weight(concept.weight),
            position,
            velocity: Vec2::ZERO,
            frozen: false,
        }
    }

    /// Refreshes the concept snapshot while leaving motion state alone.
    pub(super) fn sync_from(&mut self, concept: &Concept) {
        self.category = concept.category;
        if self.label != concept.label {
            self.label.clone_from(&concept.label);
        }
        self.weight = concept.weight;
        self.radius = radius_for_weight(concept.weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vibe::{MAX_WEIGHT, MIN_WEIGHT};

    #[test]
    fn radius_is_positive_and_monotonic() {
        let mut previous = 0.0;
        for step in 0..=40 {
            let weight = -1.0 + step as f32 * 0.1;
            let radius = radius_for_weight(weight);
            assert!(radius > 0.0);
            assert!(radius >= previous);
            previous = radius;
        }
    }

    #[test]
    fn radius_uses_clamped_weight() {
        assert_eq!(radius_for_weight(10.0), radius_for_weight(MAX_WEIGHT));
        assert_eq!(radius_for_weight(0.0), radius_for_weight(MIN_WEIGHT));
        assert_eq!(radius_for_weight(1.0), 50.0);
    }
}
