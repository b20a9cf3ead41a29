use eframe::egui::{Vec2, vec2};

use super::quadtree::ChargeTree;
use super::{ResolvedLink, SimNode};

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) distance_min_sq: f32,
    pub(super) theta_sq: f32,
}

/// Tiny deterministic offset used when two points coincide on an axis.
fn jiggle(seed: usize) -> f32 {
    (((seed as f32) * 0.618_034 + 0.37).fract() - 0.5) * 1e-6
}

fn non_zero(value: f32, seed: usize) -> f32 {
    if value == 0.0 { jiggle(seed) } else { value }
}

/// Spring force pulling linked nodes toward their link distance.
pub(super) fn apply_links(nodes: &mut [SimNode], links: &[ResolvedLink], alpha: f32) {
    for (position, link) in links.iter().enumerate() {
        let (source, target) = (&nodes[link.source], &nodes[link.target]);
        let delta = vec2(
            non_zero(
                target.position.x + target.velocity.x - source.position.x - source.velocity.x,
                position,
            ),
            non_zero(
                target.position.y + target.velocity.y - source.position.y - source.velocity.y,
                position + 1,
            ),
        );
        let length = delta.length();
        let scale = (length - link.distance) / length * alpha * link.strength;
        let correction = delta * scale;

        nodes[link.target].velocity -= correction * link.bias;
        nodes[link.source].velocity += correction * (1.0 - link.bias);
    }
}

/// Many-body repulsion with the Barnes–Hut approximation.
pub(super) fn apply_charge(nodes: &mut [SimNode], params: ChargeParams, alpha: f32) {
    let positions = nodes.iter().map(|node| node.position).collect::<Vec<_>>();
    let Some(tree) = ChargeTree::build(&positions, params.strength) else {
        return;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        let mut push = Vec2::ZERO;
        let mut stack = vec![0usize];

        while let Some(cell_id) = stack.pop() {
            let cell = tree.cell(cell_id);
            let offset = cell.charge_center - positions[index];
            let mut distance_sq = offset.length_sq();
            let width = cell.width();

            if !cell.is_leaf() && width * width / params.theta_sq < distance_sq {
                if distance_sq < params.distance_min_sq {
                    distance_sq = (params.distance_min_sq * distance_sq).sqrt();
                }
                push += offset * (cell.charge * alpha / distance_sq);
                continue;
            }

            if !cell.is_leaf() {
                stack.extend(cell.children.iter().flatten().copied());
                continue;
            }

            for &other in &cell.points {
                if other == index {
                    continue;
                }
                let offset = vec2(
                    non_zero(positions[other].x - positions[index].x, index + other),
                    non_zero(positions[other].y - positions[index].y, index + other + 1),
                );
                let mut distance_sq = offset.length_sq();
                if distance_sq <= 0.0 {
                    continue;
                }
                if distance_sq < params.distance_min_sq {
                    distance_sq = (params.distance_min_sq * distance_sq).sqrt();
                }
                push += offset * (params.strength * alpha / distance_sq);
            }
        }

        node.velocity += push;
    }
}

/// Independent per-axis pull toward the origin.
pub(super) fn apply_axis(nodes: &mut [SimNode], strength: f32, alpha: f32) {
    for node in nodes.iter_mut() {
        node.velocity -= node.position * (strength * alpha);
    }
}

/// Shifts free nodes so that the mean position sits on the origin.
pub(super) fn apply_center(nodes: &mut [SimNode]) {
    if nodes.is_empty() {
        return;
    }
    let mean = nodes
        .iter()
        .fold(Vec2::ZERO, |acc, node| acc + node.position)
        / nodes.len() as f32;
    if mean.length_sq() <= f32::EPSILON {
        return;
    }
    for node in nodes.iter_mut().filter(|node| node.pin.is_none()) {
        node.position -= mean;
    }
}
