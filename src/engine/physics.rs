use eframe::egui::{Vec2, vec2};
use tracing::warn;

use super::node::Node;

const DISTANCE_EPSILON: f32 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub center_pull: f32,
    pub damping: f32,
    pub collision_padding: f32,
    pub collision_stiffness: f32,
    pub restitution: f32,
    pub padding_fraction: f32,
    pub spawn_jitter: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            center_pull: 0.01,
            damping: 0.9,
            collision_padding: 6.0,
            collision_stiffness: 0.25,
            restitution: 0.35,
            padding_fraction: 0.04,
            spawn_jitter: 24.0,
        }
    }
}

#[derive(Default)]
pub(super) struct PhysicsScratch {
    impulses: Vec<Vec2>,
    contacts: Vec<u32>,
}

/// Inclusive range a node of `radius` may occupy along each axis.
pub(super) fn inset_bounds(viewport: Vec2, radius: f32, padding_fraction: f32) -> (Vec2, Vec2) {
    let padding = viewport * padding_fraction.max(0.0);
    let mut min = vec2(radius, radius) + padding;
    let mut max = viewport - vec2(radius, radius) - padding;

    // A viewport narrower than the bubble pins it to the centre line.
    if min.x > max.x {
        min.x = viewport.x * 0.5;
        max.x = min.x;
    }
    if min.y > max.y {
        min.y = viewport.y * 0.5;
        max.y = min.y;
    }
    (min, max)
}

fn time_step_scale(delta_seconds: f32) -> f32 {
    if delta_seconds.is_finite() && delta_seconds > 0.0 {
        (delta_seconds * 60.0).clamp(0.25, 3.0)
    } else {
        1.0
    }
}

fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Advances every node by one step. Returns whether anything is still moving.
pub(super) fn step_physics(
    nodes: &mut [Node],
    scratch: &mut PhysicsScratch,
    viewport: Vec2,
    config: PhysicsConfig,
    delta_seconds: f32,
) -> bool {
    let node_count = nodes.len();
    if node_count == 0 {
        return false;
    }

    let scale = time_step_scale(delta_seconds);
    let center = viewport * 0.5;
    let damping_factor = config.damping.clamp(0.0, 0.999).powf(scale);

    for node in nodes.iter_mut() {
        if node.frozen {
            node.velocity = Vec2::ZERO;
            continue;
        }
        node.velocity += (center - node.position) * (config.center_pull * scale);
    }

    scratch.impulses.clear();
    scratch.impulses.resize(node_count, Vec2::ZERO);
    scratch.contacts.clear();
    scratch.contacts.resize(node_count, 0);
    let impulses = &mut scratch.impulses;
    let contacts = &mut scratch.contacts;

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = nodes[i].position - nodes[j].position;
            let min_distance = nodes[i].radius + nodes[j].radius + config.collision_padding;
            let raw_distance = delta.length();
            if raw_distance.is_nan() || raw_distance >= min_distance {
                continue;
            }

            let (penetration_axis, distance) = if raw_distance > DISTANCE_EPSILON {
                (delta, raw_distance)
            } else {
                (fallback_direction(i, j) * DISTANCE_EPSILON, DISTANCE_EPSILON)
            };
            // The centre pull contracts every pair by `center_pull * distance`;
            // contacts push back against that on top of the stiffness term.
            let overlap = (min_distance - distance) / distance;
            let push =
                penetration_axis * (overlap * config.collision_stiffness + config.center_pull);

            impulses[i] += push;
            contacts[i] += 1;
            impulses[j] -= push;
            contacts[j] += 1;
        }
    }

    let mut any_motion = false;
    for (index, node) in nodes.iter_mut().enumerate() {
        if node.frozen {
            node.velocity = Vec2::ZERO;
        } else {
            if contacts[index] > 0 {
                node.velocity += impulses[index] / contacts[index] as f32 * scale;
            }
            node.velocity *= damping_factor;
            node.position += node.velocity * scale;
        }

        if !node.position.is_finite() || !node.velocity.is_finite() {
            warn!(id = %node.id, "non-finite bubble state, recentring");
            node.position = center;
            node.velocity = Vec2::ZERO;
        }

        let (min, max) = inset_bounds(viewport, node.radius, config.padding_fraction);
        if node.position.x > max.x {
            node.position.x = max.x;
            node.velocity.x = -node.velocity.x.abs() * config.restitution;
        } else if node.position.x < min.x {
            node.position.x = min.x;
            node.velocity.x = node.velocity.x.abs() * config.restitution;
        }
        if node.position.y > max.y {
            node.position.y = max.y;
            node.velocity.y = -node.velocity.y.abs() * config.restitution;
        } else if node.position.y < min.y {
            node.position.y = min.y;
            node.velocity.y = node.velocity.y.abs() * config.restitution;
        }

        if node.velocity.length_sq() > 0.000_001 {
            any_motion = true;
        }
    }

    any_motion
}
