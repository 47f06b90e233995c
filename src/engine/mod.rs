mod interaction;
mod node;
mod physics;
mod reconcile;
mod scheduler;
mod viewport;

use eframe::egui::Vec2;
use tracing::info;

use crate::vibe::{Concept, ConceptStore};

pub use node::Node;
pub use physics::PhysicsConfig;
use physics::{PhysicsScratch, step_physics};
use reconcile::reconcile_nodes;
pub use scheduler::{TickHandle, TickLoop};
pub use viewport::{DEFAULT_VIEWPORT, ViewportTracker};

/// Inline rename in progress. The node it targets stays frozen until the
/// session is committed or cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub id: String,
    pub draft: String,
}

/// Owns the concept store and the live node set. All mutation goes through
/// this type between steps.
pub struct BubbleEngine {
    store: ConceptStore,
    nodes: Vec<Node>,
    reconciled_revision: Option<u64>,
    viewport: Vec2,
    config: PhysicsConfig,
    scratch: PhysicsScratch,
    editing: Option<EditSession>,
    settled: bool,
}

impl Default for BubbleEngine {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl BubbleEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            store: ConceptStore::new(),
            nodes: Vec::new(),
            reconciled_revision: None,
            viewport: DEFAULT_VIEWPORT,
            config,
            scratch: PhysicsScratch::default(),
            editing: None,
            settled: true,
        }
    }

    pub fn store(&self) -> &ConceptStore {
        &self.store
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Bulk replacement from a fresh analysis. Old nodes are discarded so
    /// nothing carries over, even when ids happen to repeat.
    pub fn load_concepts(&mut self, concepts: Vec<Concept>) {
        info!(count = concepts.len(), "loading new concept set");
        self.editing = None;
        self.nodes.clear();
        self.store.replace_all(concepts);
        self.reconciled_revision = None;
    }

    /// Rebuilds nodes from the store if it changed since the last reconcile.
    pub fn reconcile(&mut self) {
        let revision = self.store.revision();
        if self.reconciled_revision == Some(revision) {
            return;
        }

        let previous = std::mem::take(&mut self.nodes);
        self.nodes = reconcile_nodes(
            previous,
            self.store.concepts(),
            self.viewport,
            self.config.spawn_jitter,
        );
        if let Some(session) = &self.editing
            && let Some(node) = self.nodes.iter_mut().find(|node| node.id == session.id)
        {
            node.frozen = true;
            node.velocity = Vec2::ZERO;
        }
        self.reconciled_revision = Some(revision);
    }

    /// One tick: reconcile against the store, then advance the physics.
    pub fn step(&mut self, delta_seconds: f32) {
        self.reconcile();
        let moving = step_physics(
            &mut self.nodes,
            &mut self.scratch,
            self.viewport,
            self.config,
            delta_seconds,
        );
        self.settled = !moving;
    }
}
