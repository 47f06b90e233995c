use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::concept::Concept;
use super::parse::parse_concepts;

const DEMO_DOCUMENT: &str = include_str!("demo.json");

pub fn load_concept_file(path: &Path) -> Result<Vec<Concept>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read concept file {}", path.display()))?;
    let concepts = parse_concepts(&raw)
        .with_context(|| format!("failed to parse concept file {}", path.display()))?;

    if concepts.is_empty() {
        return Err(anyhow!("no usable concepts found in {}", path.display()));
    }
    Ok(concepts)
}

pub fn demo_concepts() -> Result<Vec<Concept>> {
    parse_concepts(DEMO_DOCUMENT).context("bundled demo document is invalid")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn demo_document_parses() {
        let concepts = demo_concepts().expect("demo parses");
        assert_eq!(concepts.len(), 12);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("/definitely/not/here/vibe.json");
        let error = load_concept_file(&path).expect_err("missing file fails");
        assert!(format!("{error:#}").contains("/definitely/not/here/vibe.json"));
    }
}
