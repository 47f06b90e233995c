use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::concept::{Category, Concept, DEFAULT_WEIGHT};

/// Multiplier applied to ratio weights such as `"4/5"`.
pub const RATIO_WEIGHT_SCALE: f32 = 1.0;

#[derive(Debug, Deserialize)]
struct RawConcept {
    #[serde(default)]
    id: Option<String>,
    category: Category,
    label: String,
    #[serde(default)]
    weight: Option<Value>,
}

/// Accepts either a list of `{id, category, label, weight}` entries or the keyed
/// vibe document returned by the analysis backend.
pub fn parse_concepts(raw: &str) -> Result<Vec<Concept>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid concept JSON")?;
    match parsed {
        Value::Array(entries) => Ok(parse_entry_list(entries)),
        Value::Object(object) => Ok(parse_keyed_document(&object)),
        _ => Err(anyhow!(
            "unexpected JSON type for concepts; expected a list or an object"
        )),
    }
}

pub fn normalize_weight(raw: Option<&Value>) -> f32 {
    let Some(raw) = raw else {
        return DEFAULT_WEIGHT;
    };

    let parsed = match raw {
        Value::Null => return DEFAULT_WEIGHT,
        Value::Number(number) => number
            .as_f64()
            .map(|value| value as f32)
            .filter(|value| value.is_finite()),
        Value::String(text) => parse_weight_text(text),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(weight = %raw, "unparseable concept weight, using default");
        DEFAULT_WEIGHT
    })
}

fn parse_weight_text(text: &str) -> Option<f32> {
    let text = text.trim();
    if let Some((numerator, denominator)) = text.split_once('/') {
        let numerator = numerator.trim().parse::<f32>().ok()?;
        let denominator = denominator.trim().parse::<f32>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        let value = numerator / denominator * RATIO_WEIGHT_SCALE;
        return value.is_finite().then_some(value);
    }

    text.parse::<f32>().ok().filter(|value| value.is_finite())
}

fn parse_entry_list(entries: Vec<Value>) -> Vec<Concept> {
    let mut builder = ConceptBuilder::default();
    for entry in entries {
        match RawConcept::deserialize(&entry) {
            Ok(raw) => {
                let weight = normalize_weight(raw.weight.as_ref());
                builder.push(raw.id, raw.category, &raw.label, weight);
            }
            Err(error) => warn!(%error, "skipping malformed concept entry"),
        }
    }
    builder.finish()
}

fn parse_keyed_document(object: &Map<String, Value>) -> Vec<Concept> {
    let mut builder = ConceptBuilder::default();

    for category in Category::ALL {
        let aliases: &[&str] = match category {
            Category::Lighting => &["lighting", "light_or_dark"],
            Category::Time => &["time", "time_of_day"],
            _ => &[category.key()],
        };

        for alias in aliases {
            let Some(value) = object.get(*alias) else {
                continue;
            };

            match value {
                Value::Object(weights) if category.is_keyed() => {
                    for (label, weight) in weights {
                        builder.push(None, category, label, normalize_weight(Some(weight)));
                    }
                }
                Value::String(label) => {
                    builder.push(None, category, label, DEFAULT_WEIGHT);
                }
                Value::Array(items) => {
                    for item in items {
                        match item.as_str() {
                            Some(label) => builder.push(None, category, label, DEFAULT_WEIGHT),
                            None => warn!(category = category.key(), %item, "skipping non-string tag"),
                        }
                    }
                }
                other => {
                    warn!(category = category.key(), value = %other, "unsupported category value");
                }
            }
        }
    }

    builder.finish()
}

#[derive(Default)]
struct ConceptBuilder {
    concepts: Vec<Concept>,
    ids: HashSet<String>,
    labels: HashSet<(Category, String)>,
    serial: u64,
}

impl ConceptBuilder {
    fn push(&mut self, id: Option<String>, category: Category, label: &str, weight: f32) {
        let label = label.trim();
        if label.is_empty() {
            return;
        }
        if !self.labels.insert((category, label.to_owned())) {
            warn!(category = category.key(), label, "skipping duplicate concept label");
            return;
        }

        let id = match id.filter(|id| !id.trim().is_empty() && !self.ids.contains(id)) {
            Some(id) => id,
            None => self.generated_id(category),
        };
        self.ids.insert(id.clone());
        self.concepts.push(Concept::new(id, category, label, weight));
    }

    fn generated_id(&mut self, category: Category) -> String {
        loop {
            self.serial += 1;
            let candidate = format!("{}-{}", category.key(), self.serial);
            if !self.ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn finish(self) -> Vec<Concept> {
        self.concepts
    }
}
