use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};

use super::concept::Category;
use super::store::ConceptStore;

/// Keyed vibe document consumed by the image generation step.
pub fn export_document(store: &ConceptStore) -> Value {
    let mut document = Map::new();

    for category in Category::ALL {
        let concepts = store
            .iter()
            .filter(|concept| concept.category == category)
            .collect::<Vec<_>>();

        let value = if category.is_keyed() {
            let mut weights = Map::with_capacity(concepts.len());
            for concept in concepts {
                weights.insert(concept.label.clone(), json!(concept.weight));
            }
            Value::Object(weights)
        } else {
            let mut labels: Vec<&str> = Vec::with_capacity(concepts.len());
            for concept in concepts {
                if !labels.contains(&concept.label.as_str()) {
                    labels.push(&concept.label);
                }
            }

            if category == Category::Style {
                if labels.is_empty() {
                    continue;
                }
                Value::String(labels.join(", "))
            } else {
                json!(labels)
            }
        };

        document.insert(category.key().to_owned(), value);
    }

    Value::Object(document)
}

pub fn write_export(store: &ConceptStore, path: &Path) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&export_document(store))
        .context("failed to serialize vibe export")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write vibe export to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vibe::concept::Concept;
    use crate::vibe::parse::parse_concepts;

    fn store_with(concepts: Vec<Concept>) -> ConceptStore {
        let mut store = ConceptStore::new();
        store.replace_all(concepts);
        store
    }

    #[test]
    fn keyed_and_list_categories_take_their_shapes() {
        let store = store_with(vec![
            Concept::new("a", Category::Mood, "calm", 1.2),
            Concept::new("b", Category::Mood, "hazy", 0.6),
            Concept::new("c", Category::Lighting, "dark", 1.0),
            Concept::new("d", Category::Time, "midnight", 1.0),
            Concept::new("e", Category::Style, "film photo", 1.0),
            Concept::new("f", Category::Style, "grainy", 1.0),
        ]);

        let document = export_document(&store);
        assert_eq!(document["mood"]["calm"].as_f64().map(|v| v as f32), Some(1.2));
        assert_eq!(document["mood"]["hazy"].as_f64().map(|v| v as f32), Some(0.6));
        assert_eq!(document["colors"], json!({}));
        assert_eq!(document["lighting"], json!(["dark"]));
        assert_eq!(document["time"], json!(["midnight"]));
        assert_eq!(document["style"], json!("film photo, grainy"));
    }

    #[test]
    fn mood_keys_keep_insertion_order() {
        let store = store_with(vec![
            Concept::new("a", Category::Mood, "zesty", 1.0),
            Concept::new("b", Category::Mood, "airy", 1.0),
        ]);
        let document = export_document(&store);
        let keys = document["mood"]
            .as_object()
            .map(|object| object.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(keys, vec!["zesty", "airy"]);
    }

    #[test]
    fn empty_style_is_omitted() {
        let document = export_document(&ConceptStore::new());
        assert!(document.get("style").is_none());
        assert_eq!(document["lighting"], json!([]));
    }

    #[test]
    fn export_reingests_to_same_labels() {
        let store = store_with(vec![
            Concept::new("a", Category::Mood, "calm", 1.2),
            Concept::new("b", Category::Objects, "a single rose", 0.8),
            Concept::new("c", Category::Lighting, "dark", 1.0),
        ]);
        let rendered = export_document(&store).to_string();
        let concepts = parse_concepts(&rendered).expect("export parses back");
        let mut labels = concepts
            .iter()
            .map(|concept| (concept.category, concept.label.clone()))
            .collect::<Vec<_>>();
        labels.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            labels,
            vec![
                (Category::Objects, "a single rose".to_owned()),
                (Category::Mood, "calm".to_owned()),
                (Category::Lighting, "dark".to_owned()),
            ]
        );
    }
}
