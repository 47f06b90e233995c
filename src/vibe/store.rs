use std::collections::HashSet;

use super::concept::{Category, Concept};

/// Ordered source of truth for which bubbles exist.
///
/// Every mutation bumps `revision`, which is how the engine notices it has to
/// reconcile its nodes before the next step.
#[derive(Clone, Debug, Default)]
pub struct ConceptStore {
    concepts: Vec<Concept>,
    revision: u64,
    next_serial: u64,
}

impl ConceptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.concepts.iter().find(|concept| concept.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn label_taken(&self, category: Category, label: &str, except_id: Option<&str>) -> bool {
        self.concepts.iter().any(|concept| {
            concept.category == category
                && concept.label == label
                && except_id != Some(concept.id.as_str())
        })
    }

    /// Drops everything and takes `concepts` in order. Entries with an id that
    /// was already taken earlier in the batch are skipped.
    pub fn replace_all(&mut self, concepts: Vec<Concept>) {
        let mut seen = HashSet::with_capacity(concepts.len());
        self.concepts = concepts
            .into_iter()
            .filter(|concept| seen.insert(concept.id.clone()))
            .collect();
        self.touch();
    }

    pub fn insert(&mut self, concept: Concept) -> bool {
        if self.contains(&concept.id) {
            return false;
        }
        self.concepts.push(concept);
        self.touch();
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Concept> {
        let index = self.concepts.iter().position(|concept| concept.id == id)?;
        let removed = self.concepts.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn set_weight(&mut self, id: &str, weight: f32) -> bool {
        let Some(concept) = self.concepts.iter_mut().find(|concept| concept.id == id) else {
            return false;
        };
        concept.weight = weight;
        self.touch();
        true
    }

    pub fn set_label(&mut self, id: &str, label: String) -> bool {
        let Some(concept) = self.concepts.iter_mut().find(|concept| concept.id == id) else {
            return false;
        };
        concept.label = label;
        self.touch();
        true
    }

    /// Next `<category>-<n>` id that no live concept uses.
    pub fn fresh_id(&mut self, category: Category) -> String {
        loop {
            self.next_serial += 1;
            let candidate = format!("{}-{}", category.key(), self.next_serial);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
