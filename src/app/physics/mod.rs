mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use crate::config::LayoutConfig;
use crate::map::{GraphStore, VisibleGraph};
use forces::{ChargeParams, apply_axis, apply_center, apply_charge, apply_links};

const INITIAL_RADIUS: f32 = 10.0;

/// Engine-owned layout record for one visible node.
pub(crate) struct SimNode {
    index: usize,
    position: Vec2,
    velocity: Vec2,
    pin: Option<Vec2>,
    is_root: bool,
}

impl SimNode {
    /// Index of the node in the graph store.
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    #[cfg(test)]
    pub(crate) fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.is_root
    }
}

/// A visible link resolved to simulation slots.
pub(crate) struct ResolvedLink {
    source: usize,
    target: usize,
    distance: f32,
    strength: f32,
    bias: f32,
}

pub(crate) struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<ResolvedLink>,
    slot_by_index: HashMap<usize, usize>,
    remembered: HashMap<usize, Vec2>,
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    running: bool,
}

fn phyllotaxis(slot: usize) -> Vec2 {
    let radius = INITIAL_RADIUS * (0.5 + slot as f32).sqrt();
    let angle = slot as f32 * PI * (3.0 - 5.0_f32.sqrt());
    vec2(radius * angle.cos(), radius * angle.sin())
}

impl Simulation {
    /// Builds a fresh simulation over the visible part of `store`.
    ///
    /// Nodes present in `prior` keep their position and velocity. Nodes that
    /// were laid out before and hidden since come back where they were last
    /// seen; anything else is seeded next to a visible parent, or on the
    /// phyllotaxis spiral around the origin.
    pub(crate) fn new(
        store: &GraphStore,
        visible: &VisibleGraph,
        config: LayoutConfig,
        prior: Option<Simulation>,
    ) -> Self {
        let (mut prior_nodes, mut remembered) = match prior {
            Some(prior) => {
                let mut remembered = prior.remembered;
                let mut nodes = HashMap::with_capacity(prior.nodes.len());
                for node in prior.nodes {
                    remembered.insert(node.index, node.position);
                    nodes.insert(node.index, node);
                }
                (nodes, remembered)
            }
            None => (HashMap::new(), HashMap::new()),
        };

        let mut nodes = Vec::with_capacity(visible.node_count());
        let mut slot_by_index = HashMap::with_capacity(visible.node_count());
        let mut unplaced = Vec::new();

        for (slot, &index) in visible.nodes().iter().enumerate() {
            let is_root = store.node(index).is_some_and(|node| node.is_root);
            slot_by_index.insert(index, slot);

            if let Some(mut node) = prior_nodes.remove(&index) {
                node.pin = None;
                node.is_root = is_root;
                nodes.push(node);
                continue;
            }

            let position = match remembered.remove(&index) {
                Some(position) => position,
                None => {
                    unplaced.push(slot);
                    phyllotaxis(slot)
                }
            };
            nodes.push(SimNode {
                index,
                position,
                velocity: Vec2::ZERO,
                pin: None,
                is_root,
            });
        }

        for slot in unplaced {
            let index = nodes[slot].index;
            let anchor = store
                .parents(index)
                .iter()
                .filter_map(|parent| slot_by_index.get(parent))
                .find(|&&parent_slot| parent_slot != slot)
                .map(|&parent_slot| nodes[parent_slot].position);
            if let Some(anchor) = anchor {
                nodes[slot].position = anchor + phyllotaxis(slot) * 0.5;
            }
        }

        let links = Self::resolve_links(store, visible, &slot_by_index, &nodes, &config);

        Self {
            nodes,
            links,
            slot_by_index,
            remembered,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: config.alpha_decay(),
            config,
            running: true,
        }
    }

    fn resolve_links(
        store: &GraphStore,
        visible: &VisibleGraph,
        slot_by_index: &HashMap<usize, usize>,
        nodes: &[SimNode],
        config: &LayoutConfig,
    ) -> Vec<ResolvedLink> {
        let ends = visible
            .links()
            .iter()
            .filter_map(|&link| store.link_ends().get(link))
            .filter_map(|(source, target)| {
                Some((*slot_by_index.get(source)?, *slot_by_index.get(target)?))
            })
            .filter(|(source, target)| source != target)
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; nodes.len()];
        for &(source, target) in &ends {
            degree[source] += 1;
            degree[target] += 1;
        }

        ends.into_iter()
            .map(|(source, target)| {
                let (source_degree, target_degree) = (degree[source] as f32, degree[target] as f32);
                let distance = if nodes[source].is_root || nodes[target].is_root {
                    config.root_link_distance
                } else {
                    config.link_distance
                };
                ResolvedLink {
                    source,
                    target,
                    distance,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect()
    }

    /// Advances one step. Returns false once the simulation has gone idle.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.nodes, &self.links, alpha);
        apply_charge(
            &mut self.nodes,
            ChargeParams {
                strength: self.config.charge_strength,
                distance_min_sq: self.config.charge_distance_min.powi(2),
                theta_sq: self.config.barnes_hut_theta.powi(2),
            },
            alpha,
        );
        apply_center(&mut self.nodes);
        apply_axis(&mut self.nodes, self.config.axis_strength, alpha);

        let keep = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= keep;
                node.position += node.velocity;
            }
        }

        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.running = false;
        }
        true
    }

    /// Raises the energy to at least `alpha` and resumes ticking.
    pub(crate) fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
        self.running = true;
    }

    pub(crate) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
        if target >= self.config.alpha_min {
            self.running = true;
        }
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(crate) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(crate) fn node(&self, index: usize) -> Option<&SimNode> {
        self.slot_by_index
            .get(&index)
            .and_then(|&slot| self.nodes.get(slot))
    }

    pub(crate) fn position(&self, index: usize) -> Option<Vec2> {
        self.node(index).map(SimNode::position)
    }

    /// Fixes a node at `position` until `unpin`.
    pub(crate) fn pin(&mut self, index: usize, position: Vec2) -> bool {
        let Some(&slot) = self.slot_by_index.get(&index) else {
            return false;
        };
        let node = &mut self.nodes[slot];
        node.pin = Some(position);
        node.position = position;
        node.velocity = Vec2::ZERO;
        true
    }

    pub(crate) fn unpin(&mut self, index: usize) {
        if let Some(&slot) = self.slot_by_index.get(&index) {
            self.nodes[slot].pin = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::fixtures::{map, small_tree};
    use crate::map::{CollapseSet, resolve};

    fn simulation(store: &GraphStore) -> Simulation {
        let visible = resolve(store, &CollapseSet::new());
        Simulation::new(store, &visible, LayoutConfig::default(), None)
    }

    fn run(sim: &mut Simulation, ticks: usize) {
        for _ in 0..ticks {
            sim.tick();
        }
    }

    #[test]
    fn alpha_decays_until_idle() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        assert!(sim.is_running());

        run(&mut sim, 400);
        assert!(!sim.is_running());
        assert!(sim.alpha() < LayoutConfig::default().alpha_min);
        assert!(!sim.tick());
    }

    #[test]
    fn reheat_resumes_an_idle_simulation() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        run(&mut sim, 400);

        sim.reheat(0.3);
        assert!(sim.is_running());
        assert!(sim.tick());
        assert!(sim.alpha() < 0.3);
    }

    #[test]
    fn alpha_target_keeps_simulation_warm() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        run(&mut sim, 400);

        sim.set_alpha_target(0.3);
        run(&mut sim, 400);
        assert!(sim.is_running());
        assert!(sim.alpha() > 0.25);

        sim.set_alpha_target(0.0);
        run(&mut sim, 400);
        assert!(!sim.is_running());
    }

    #[test]
    fn pinned_node_does_not_move() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        let b = store.index_of("b").expect("b exists");

        assert!(sim.pin(b, vec2(250.0, -40.0)));
        run(&mut sim, 50);
        assert_eq!(sim.position(b), Some(vec2(250.0, -40.0)));
        assert!(sim.node(b).is_some_and(SimNode::is_pinned));

        sim.unpin(b);
        run(&mut sim, 50);
        assert_ne!(sim.position(b), Some(vec2(250.0, -40.0)));
    }

    #[test]
    fn root_links_settle_longer_than_leaf_links() {
        let store = GraphStore::from_data(map(
            &[("r", true), ("a", false), ("b", false)],
            &[("r", "a"), ("a", "b")],
        ));
        let mut sim = simulation(&store);
        run(&mut sim, 300);

        let position = |id: &str| {
            let index = store.index_of(id).expect("id exists");
            sim.position(index).expect("visible")
        };
        let root_link = (position("r") - position("a")).length();
        let leaf_link = (position("a") - position("b")).length();

        assert!(root_link > leaf_link);
        assert!(position("r").is_finite());
    }

    #[test]
    fn layout_stays_near_origin() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        run(&mut sim, 300);

        let mean = sim
            .nodes()
            .iter()
            .fold(Vec2::ZERO, |acc, node| acc + node.position())
            / sim.nodes().len() as f32;
        assert!(mean.length() < 5.0);
    }

    #[test]
    fn rebuild_keeps_positions_of_surviving_nodes() {
        let store = GraphStore::from_data(small_tree());
        let mut sim = simulation(&store);
        run(&mut sim, 100);

        let a = store.index_of("a").expect("a exists");
        let d = store.index_of("d").expect("d exists");
        let before_a = sim.position(a);
        let before_d = sim.position(d);

        let mut collapsed = CollapseSet::new();
        collapsed.insert("b");
        let visible = resolve(&store, &collapsed);
        let sim = Simulation::new(&store, &visible, LayoutConfig::default(), Some(sim));
        assert_eq!(sim.position(a), before_a);
        assert!(sim.position(d).is_none());
        assert_eq!(sim.nodes().len(), 3);

        let visible = resolve(&store, &CollapseSet::new());
        let sim = Simulation::new(&store, &visible, LayoutConfig::default(), Some(sim));
        assert_eq!(sim.position(d), before_d);
    }

    #[test]
    fn empty_visible_set_is_harmless() {
        let store = GraphStore::new();
        let mut sim = simulation(&store);
        assert!(sim.nodes().is_empty());
        run(&mut sim, 10);
        assert!(!sim.pin(0, Vec2::ZERO));
    }
}
