mod concept;
mod export;
mod load;
mod parse;
mod store;

pub use concept::{
    Category, Concept, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT, WEIGHT_STEP, bumped_weight,
    clamp_weight,
};
pub use export::{export_document, write_export};
pub use load::{demo_concepts, load_concept_file};
pub use store::ConceptStore;
