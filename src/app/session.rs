use eframe::egui::{Pos2, Rect, Vec2};

use crate::config::MapConfig;
use crate::map::{CollapseSet, GraphStore, LoadReport, MapData, VisibleGraph, resolve};

use super::camera::{Camera, CameraTransition};
use super::physics::Simulation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MapEvent {
    SelectionChanged(Option<String>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DragGesture {
    /// Node pinned under the pointer; `grab_offset` is node minus pointer in world space.
    Node { index: usize, grab_offset: Vec2 },
    Pan,
}

/// Everything the map view needs between frames.
///
/// Inputs run to completion synchronously; selection changes are queued as
/// `MapEvent`s for the surrounding panels.
pub(crate) struct MapSession {
    pub(super) config: MapConfig,
    pub(super) store: GraphStore,
    pub(super) collapsed: CollapseSet,
    pub(super) visible: VisibleGraph,
    pub(super) simulation: Option<Simulation>,
    pub(super) camera: Camera,
    pub(super) transition: Option<CameraTransition>,
    pub(super) selected: Option<usize>,
    pub(super) hovered: Option<usize>,
    pub(super) pointer: Option<Pos2>,
    pub(super) drag: Option<DragGesture>,
    /// Selection before the latest node click, restored by a following double-click.
    pub(super) click_origin: Option<Option<usize>>,
    pub(super) viewport: Option<Rect>,
    pub(super) clock: f64,
    pub(super) live_layout: bool,
    events: Vec<MapEvent>,
}

impl MapSession {
    pub(crate) fn new(config: MapConfig) -> Self {
        Self {
            config,
            store: GraphStore::new(),
            collapsed: CollapseSet::new(),
            visible: VisibleGraph::default(),
            simulation: None,
            camera: Camera::IDENTITY,
            transition: None,
            selected: None,
            hovered: None,
            pointer: None,
            drag: None,
            click_origin: None,
            viewport: None,
            clock: 0.0,
            live_layout: true,
            events: Vec::new(),
        }
    }

    /// Replaces the active graph. The camera is left where it was.
    pub(crate) fn load(&mut self, data: MapData) -> LoadReport {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.stop();
        }
        self.simulation = None;

        let report = self.store.load(data);
        self.collapsed.clear();
        self.hovered = None;
        self.drag = None;
        self.click_origin = None;
        self.set_selected(None);

        self.visible = resolve(&self.store, &self.collapsed);
        self.simulation = Some(Simulation::new(
            &self.store,
            &self.visible,
            self.config.layout,
            None,
        ));

        tracing::info!(
            nodes = report.nodes,
            links = report.links,
            dropped_links = report.dropped_links,
            duplicate_nodes = report.duplicate_nodes,
            "map loaded"
        );
        report
    }

    pub(crate) fn has_graph(&self) -> bool {
        !self.store.is_empty()
    }

    pub(crate) fn store(&self) -> &GraphStore {
        &self.store
    }

    pub(crate) fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub(crate) fn collapsed(&self) -> &CollapseSet {
        &self.collapsed
    }

    pub(crate) fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub(crate) fn camera(&self) -> Camera {
        self.camera
    }

    pub(crate) fn config(&self) -> &MapConfig {
        &self.config
    }

    pub(crate) fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(crate) fn drag(&self) -> Option<DragGesture> {
        self.drag
    }

    pub(crate) fn live_layout(&self) -> bool {
        self.live_layout
    }

    pub(crate) fn set_live_layout(&mut self, enabled: bool) {
        self.live_layout = enabled;
        if enabled && let Some(simulation) = self.simulation.as_mut() {
            simulation.reheat(self.config.layout.reheat_alpha);
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.transition.is_some()
            || (self.live_layout && self.simulation.as_ref().is_some_and(Simulation::is_running))
    }

    pub(crate) fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sets the selection, queueing an event when it actually changes.
    pub(crate) fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        let id = selected
            .and_then(|index| self.store.node(index))
            .map(|node| node.id.clone());
        self.events.push(MapEvent::SelectionChanged(id));
    }

    pub(crate) fn select_by_id(&mut self, id: Option<&str>) {
        let index = id.and_then(|id| self.store.index_of(id));
        let index = index.filter(|&index| self.visible.contains(index));
        self.set_selected(index);
    }

    /// Advances camera animation and one layout step. Returns whether anything moved.
    pub(crate) fn tick(&mut self, now: f64) -> bool {
        self.clock = now;
        let mut moved = false;

        if let Some(transition) = self.transition {
            let (camera, done) = transition.sample(now);
            self.camera = camera;
            if done {
                self.transition = None;
            }
            moved = true;
        }

        if self.live_layout
            && let Some(simulation) = self.simulation.as_mut()
        {
            moved |= simulation.tick();
        }

        moved
    }

    /// Records the viewport. The world origin stays at its center.
    pub(crate) fn resize(&mut self, rect: Rect) {
        if self.viewport == Some(rect) {
            return;
        }
        let first = self.viewport.is_none();
        self.viewport = Some(rect);
        if !first && let Some(simulation) = self.simulation.as_mut() {
            simulation.reheat(self.config.layout.reheat_alpha);
        }
    }

    fn animate_camera_to(&mut self, target: Camera) {
        let from = self.camera;
        self.transition = Some(CameraTransition::new(
            from,
            target,
            self.clock,
            self.config.camera.transition_ms,
        ));
    }

    fn center_zoom_target(&self, factor: f32) -> Camera {
        let base = self
            .transition
            .map(|transition| transition.target())
            .unwrap_or(self.camera);
        let zoom = (base.zoom * factor).clamp(self.config.camera.min_zoom, self.config.camera.max_zoom);
        let applied = zoom / base.zoom;
        Camera {
            pan: base.pan * applied,
            zoom,
        }
    }

    pub(crate) fn zoom_in(&mut self) {
        if !self.has_graph() {
            return;
        }
        let target = self.center_zoom_target(self.config.camera.zoom_in_factor);
        self.animate_camera_to(target);
    }

    pub(crate) fn zoom_out(&mut self) {
        if !self.has_graph() {
            return;
        }
        let target = self.center_zoom_target(self.config.camera.zoom_out_factor);
        self.animate_camera_to(target);
    }

    pub(crate) fn reset_zoom(&mut self) {
        if !self.has_graph() {
            return;
        }
        self.animate_camera_to(Camera::IDENTITY);
    }

    /// Flips the collapse state of a node with children and rebuilds the visible graph.
    pub(crate) fn toggle_collapse(&mut self, index: usize) -> bool {
        if !self.store.has_children_at(index) {
            return false;
        }
        let Some(id) = self.store.node(index).map(|node| node.id.clone()) else {
            return false;
        };
        let collapsed = self.collapsed.toggle(&id);
        tracing::debug!(node = %id, collapsed, "collapse toggled");
        self.rebuild_visible();
        true
    }

    pub(crate) fn expand_all(&mut self) {
        if self.collapsed.is_empty() {
            return;
        }
        self.collapsed.clear();
        self.rebuild_visible();
    }

    pub(super) fn rebuild_visible(&mut self) {
        self.visible = resolve(&self.store, &self.collapsed);

        let prior = self.simulation.take();
        let mut simulation = Simulation::new(&self.store, &self.visible, self.config.layout, prior);

        if self.selected.is_some_and(|index| !self.visible.contains(index)) {
            self.set_selected(None);
        }
        if self.hovered.is_some_and(|index| !self.visible.contains(index)) {
            self.hovered = None;
        }
        match self.drag {
            Some(DragGesture::Node { index, .. }) if !self.visible.contains(index) => {
                self.drag = None;
                simulation.set_alpha_target(0.0);
            }
            Some(DragGesture::Node { index, grab_offset }) => {
                if let (Some(rect), Some(pointer)) = (self.viewport, self.pointer) {
                    let world = self.camera.screen_to_world(rect, pointer) + grab_offset;
                    simulation.pin(index, world);
                }
                simulation.set_alpha_target(self.config.layout.drag_alpha_target);
            }
            _ => {}
        }

        self.simulation = Some(simulation);
    }

    pub(crate) fn node_position(&self, index: usize) -> Option<Vec2> {
        self.simulation.as_ref()?.position(index)
    }
}
