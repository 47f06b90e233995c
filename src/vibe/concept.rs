use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT: f32 = 0.6;
pub const MAX_WEIGHT: f32 = 1.6;
pub const WEIGHT_STEP: f32 = 0.2;
pub const DEFAULT_WEIGHT: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mood,
    Colors,
    Objects,
    Style,
    Lighting,
    Time,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Mood,
        Self::Colors,
        Self::Objects,
        Self::Style,
        Self::Lighting,
        Self::Time,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::Colors => "colors",
            Self::Objects => "objects",
            Self::Style => "style",
            Self::Lighting => "lighting",
            Self::Time => "time",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mood => "Mood",
            Self::Colors => "Color",
            Self::Objects => "Object",
            Self::Style => "Style",
            Self::Lighting => "Lighting",
            Self::Time => "Time of day",
        }
    }

    /// Categories exported as `label -> weight` maps rather than plain lists.
    pub fn is_keyed(self) -> bool {
        matches!(self, Self::Mood | Self::Colors | Self::Objects)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Concept {
    pub id: String,
    pub category: Category,
    pub label: String,
    pub weight: f32,
}

impl Concept {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        label: impl Into<String>,
        weight: f32,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            label: label.into(),
            weight,
        }
    }
}

/// Weight as the simulation sees it. Stored weights are never clamped.
pub fn clamp_weight(weight: f32) -> f32 {
    if weight.is_finite() {
        weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
    } else {
        DEFAULT_WEIGHT
    }
}

/// One click on a bubble. Past the top of the range the weight wraps to the bottom.
pub fn bumped_weight(weight: f32) -> f32 {
    let next = weight + WEIGHT_STEP;
    if !next.is_finite() || next > MAX_WEIGHT + 1e-4 {
        MIN_WEIGHT
    } else {
        (next * 100.0).round() / 100.0
    }
}
