use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;
use crate::vibe::Concept;

use super::node::Node;

/// Keyed merge of the previous nodes against the live concepts. Output order
/// follows `concepts`; motion state follows the id.
pub(super) fn reconcile_nodes(
    previous: Vec<Node>,
    concepts: &[Concept],
    viewport: Vec2,
    spawn_jitter: f32,
) -> Vec<Node> {
    let mut prior_nodes = previous
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect::<HashMap<_, _>>();

    let center = viewport * 0.5;
    concepts
        .iter()
        .map(|concept| match prior_nodes.remove(&concept.id) {
            Some(mut node) => {
                node.sync_from(concept);
                node
            }
            None => Node::spawn(concept, spawn_position(&concept.id, center, spawn_jitter)),
        })
        .collect()
}

fn spawn_position(id: &str, center: Vec2, spawn_jitter: f32) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    let mut offset = vec2(jx, jy);
    if offset.length_sq() <= 0.0001 {
        offset = vec2(1.0, 0.0);
    }
    center + offset * spawn_jitter
}
