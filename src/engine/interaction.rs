use eframe::egui::Vec2;
use tracing::debug;

use crate::vibe::{Category, Concept, DEFAULT_WEIGHT, bumped_weight};

use super::{BubbleEngine, EditSession};

impl BubbleEngine {
    /// Click-to-amplify. Returns the new weight.
    pub fn bump_weight(&mut self, id: &str) -> Option<f32> {
        let weight = bumped_weight(self.store.get(id)?.weight);
        self.apply_weight_change(id, weight).then_some(weight)
    }

    /// Weight override from the user or the backend. The stored value is kept
    /// as given; only the simulation clamps it.
    pub fn apply_weight_change(&mut self, id: &str, weight: f32) -> bool {
        let weight = if weight.is_finite() {
            weight
        } else {
            DEFAULT_WEIGHT
        };
        self.store.set_weight(id, weight)
    }

    /// Renames a concept in place. Empty, unchanged, and colliding labels are
    /// ignored. The weight rides along with the concept, so the keyed export
    /// sees the old key disappear and the new one appear in a single change.
    pub fn apply_label_change(&mut self, id: &str, new_label: &str) -> bool {
        let new_label = new_label.trim();
        let Some(concept) = self.store.get(id) else {
            debug!(id, "rename of unknown concept ignored");
            return false;
        };
        if new_label.is_empty() || concept.label == new_label {
            return false;
        }
        if self
            .store
            .label_taken(concept.category, new_label, Some(id))
        {
            debug!(id, label = new_label, "rename collides with existing label");
            return false;
        }
        self.store.set_label(id, new_label.to_owned())
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.store.remove(id).is_none() {
            debug!(id, "delete of unknown concept ignored");
            return false;
        }
        self.nodes.retain(|node| node.id != id);
        if self
            .editing
            .as_ref()
            .is_some_and(|session| session.id == id)
        {
            self.editing = None;
        }
        true
    }

    /// Adds a concept and returns its id. The node appears on the next step.
    pub fn add_node(&mut self, category: Category, label: &str, weight: f32) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        if self.store.label_taken(category, label, None) {
            debug!(category = category.key(), label, "duplicate concept label ignored");
            return None;
        }

        let weight = if weight.is_finite() {
            weight
        } else {
            DEFAULT_WEIGHT
        };
        let id = self.store.fresh_id(category);
        self.store
            .insert(Concept::new(id.clone(), category, label, weight))
            .then_some(id)
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut String> {
        self.editing.as_mut().map(|session| &mut session.draft)
    }

    /// Starts an inline rename and freezes the node. Any previous session is
    /// discarded first.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(concept) = self.store.get(id) else {
            return false;
        };
        let draft = concept.label.clone();
        self.cancel_edit();

        self.set_frozen(id, true);
        self.editing = Some(EditSession {
            id: id.to_owned(),
            draft,
        });
        true
    }

    /// Applies the draft label and unfreezes. Returns whether the label changed.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.editing.take() else {
            return false;
        };
        self.set_frozen(&session.id, false);
        self.apply_label_change(&session.id, &session.draft)
    }

    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.editing.take() {
            self.set_frozen(&session.id, false);
        }
    }

    fn set_frozen(&mut self, id: &str, frozen: bool) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            node.frozen = frozen;
            if frozen {
                node.velocity = Vec2::ZERO;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use proptest::prelude::*;

    use super::*;
    use crate::vibe::{Category, MAX_WEIGHT, MIN_WEIGHT, export_document};

    const TICK: f32 = 1.0 / 60.0;

    fn engine() -> BubbleEngine {
        let mut engine = BubbleEngine::default();
        engine.set_viewport(vec2(640.0, 360.0));
        engine.load_concepts(vec![
            Concept::new("calm", Category::Mood, "calm", 1.2),
            Concept::new("hazy", Category::Mood, "hazy", 0.8),
            Concept::new("pink", Category::Colors, "electric pink", 1.0),
            Concept::new("dark", Category::Lighting, "dark", 1.0),
        ]);
        engine.step(TICK);
        engine
    }

    fn mood_sum(engine: &BubbleEngine) -> f32 {
        engine
            .store()
            .iter()
            .filter(|concept| concept.category == Category::Mood)
            .map(|concept| concept.weight)
            .sum()
    }

    #[test]
    fn bump_at_max_wraps_to_min() {
        let mut engine = engine();
        assert!(engine.apply_weight_change("calm", MAX_WEIGHT));
        assert_eq!(engine.bump_weight("calm"), Some(MIN_WEIGHT));
        assert_eq!(engine.store().get("calm").map(|c| c.weight), Some(MIN_WEIGHT));
    }

    #[test]
    fn bump_grows_radius_on_next_step() {
        let mut engine = engine();
        let before = engine.node("pink").map(|node| node.radius).expect("node");
        engine.bump_weight("pink");
        engine.step(TICK);
        let after = engine.node("pink").map(|node| node.radius).expect("node");
        assert!(after > before);
        assert_eq!(engine.bump_weight("missing"), None);
    }

    #[test]
    fn rename_moves_weight_to_new_key() {
        let mut engine = engine();
        let sum_before = mood_sum(&engine);

        assert!(engine.apply_label_change("calm", "serene"));

        assert_eq!(mood_sum(&engine), sum_before);
        let labels = engine
            .store()
            .iter()
            .filter(|concept| concept.category == Category::Mood)
            .map(|concept| concept.label.as_str())
            .collect::<Vec<_>>();
        assert!(labels.contains(&"serene"));
        assert!(!labels.contains(&"calm"));
        assert_eq!(engine.store().get("calm").map(|c| c.weight), Some(1.2));

        let exported = export_document(engine.store());
        let mood = exported["mood"].as_object().expect("mood map");
        assert!(mood.contains_key("serene"));
        assert!(!mood.contains_key("calm"));
        let exported_sum = mood.values().filter_map(|value| value.as_f64()).sum::<f64>();
        assert!((exported_sum - f64::from(sum_before)).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn rename_keeps_category_weight_sum(
            labels in proptest::collection::btree_set("[a-z]{1,8}", 2..6),
            weights in proptest::collection::vec(0.6f32..1.6, 6),
            pick in any::<prop::sample::Index>(),
            new_label in "[a-z]{1,8}",
        ) {
            prop_assume!(!labels.contains(&new_label));
            let labels = labels.into_iter().collect::<Vec<_>>();
            let mut engine = BubbleEngine::default();
            engine.load_concepts(
                labels
                    .iter()
                    .zip(&weights)
                    .map(|(label, weight)| {
                        Concept::new(label.clone(), Category::Mood, label.clone(), *weight)
                    })
                    .collect(),
            );
            let sum_before = mood_sum(&engine);
            let old_label = pick.get(&labels).clone();

            prop_assert!(engine.apply_label_change(&old_label, &new_label));

            prop_assert_eq!(mood_sum(&engine), sum_before);
            let exported = export_document(engine.store());
            let mood = exported["mood"].as_object().expect("mood map");
            prop_assert!(mood.contains_key(&new_label));
            prop_assert!(!mood.contains_key(&old_label));
            prop_assert_eq!(mood.len(), labels.len());
            let exported_sum = mood.values().filter_map(|value| value.as_f64()).sum::<f64>();
            prop_assert!((exported_sum - f64::from(sum_before)).abs() < 1e-4);
        }
    }

    #[test]
    fn rename_noops() {
        let mut engine = engine();
        let revision = engine.store().revision();
        assert!(!engine.apply_label_change("calm", ""));
        assert!(!engine.apply_label_change("calm", "   "));
        assert!(!engine.apply_label_change("calm", "calm"));
        assert!(!engine.apply_label_change("calm", "hazy"));
        assert!(!engine.apply_label_change("ghost", "anything"));
        assert_eq!(engine.store().revision(), revision);
    }

    #[test]
    fn delete_removes_concept_and_node() {
        let mut engine = engine();
        assert!(engine.remove_node("hazy"));
        assert!(engine.store().get("hazy").is_none());
        assert!(engine.node("hazy").is_none());
        assert!(!engine.remove_node("hazy"));
    }

    #[test]
    fn add_creates_unique_id_and_spawns_next_tick() {
        let mut engine = engine();
        assert_eq!(engine.add_node(Category::Objects, "  ", 1.0), None);
        assert_eq!(engine.add_node(Category::Mood, "hazy", 1.0), None);

        let id = engine
            .add_node(Category::Objects, "a neon sign", 1.4)
            .expect("added");
        let other = engine
            .add_node(Category::Objects, "a single rose", 1.0)
            .expect("added");
        assert_ne!(id, other);
        assert!(engine.node(&id).is_none());

        engine.step(TICK);
        let node = engine.node(&id).expect("spawned");
        assert_eq!(node.label, "a neon sign");
    }

    #[test]
    fn editing_freezes_until_commit() {
        let mut engine = engine();
        assert!(engine.begin_edit("pink"));
        let frozen_at = engine.node("pink").map(|node| node.position).expect("node");

        for _ in 0..10 {
            engine.step(TICK);
            let node = engine.node("pink").expect("node");
            assert_eq!(node.velocity, Vec2::ZERO);
            assert_eq!(node.position, frozen_at);
        }

        if let Some(draft) = engine.edit_draft_mut() {
            draft.clear();
            draft.push_str("hot pink");
        }
        assert!(engine.commit_edit());
        assert!(engine.editing().is_none());
        assert_eq!(engine.store().get("pink").map(|c| c.label.as_str()), Some("hot pink"));

        engine.step(TICK);
        let node = engine.node("pink").expect("node");
        assert!(!node.frozen);
        assert_eq!(node.label, "hot pink");
    }

    #[test]
    fn cancel_discards_draft_and_unfreezes() {
        let mut engine = engine();
        engine.begin_edit("dark");
        if let Some(draft) = engine.edit_draft_mut() {
            *draft = "light".to_owned();
        }
        engine.cancel_edit();
        assert_eq!(engine.store().get("dark").map(|c| c.label.as_str()), Some("dark"));
        assert!(!engine.node("dark").expect("node").frozen);
    }

    #[test]
    fn edit_session_survives_store_changes_and_ends_on_delete() {
        let mut engine = engine();
        engine.begin_edit("calm");
        engine.add_node(Category::Time, "midnight", 1.0);
        engine.step(TICK);
        assert!(engine.node("calm").expect("node").frozen);

        engine.remove_node("calm");
        assert!(engine.editing().is_none());
        assert!(!engine.commit_edit());
    }
}
