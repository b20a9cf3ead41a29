use eframe::egui::{Pos2, Vec2};

use super::camera::CameraTransition;
use super::session::{DragGesture, MapSession};

impl MapSession {
    pub(crate) fn pointer_moved(&mut self, pointer: Pos2) {
        if self.viewport.is_none() {
            return;
        }
        self.pointer = Some(pointer);
        if self.drag.is_some() {
            return;
        }
        self.hovered = self.hit_test(pointer);
    }

    pub(crate) fn pointer_left(&mut self) {
        self.pointer = None;
        if self.drag.is_none() {
            self.hovered = None;
        }
    }

    /// Click on a node toggles its selection; clicks on the background are ignored.
    pub(crate) fn click(&mut self, pointer: Pos2) {
        if self.viewport.is_none() {
            return;
        }
        let Some(index) = self.hit_test(pointer) else {
            self.click_origin = None;
            return;
        };
        self.click_origin = Some(self.selected);
        if self.selected == Some(index) {
            self.set_selected(None);
        } else {
            self.set_selected(Some(index));
        }
    }

    /// Collapses a node or zooms the background. The selection is put back to
    /// what it was before the first click of the pair.
    pub(crate) fn double_click(&mut self, pointer: Pos2) {
        let Some(rect) = self.viewport else {
            return;
        };
        if let Some(selected) = self.click_origin.take() {
            self.set_selected(selected);
        }
        match self.hit_test(pointer) {
            Some(index) => {
                self.toggle_collapse(index);
            }
            None => {
                let camera = self.config.camera;
                let target = self.camera.zoomed_about(
                    rect,
                    pointer,
                    camera.double_click_factor,
                    camera.min_zoom,
                    camera.max_zoom,
                );
                self.transition = Some(CameraTransition::new(
                    self.camera,
                    target,
                    self.clock,
                    camera.transition_ms,
                ));
            }
        }
    }

    /// Starts a drag that was pressed at `press` and is now at `pointer`.
    ///
    /// The grab is decided at the press point; the node is pinned relative to
    /// the current pointer.
    pub(crate) fn drag_started(&mut self, press: Pos2, pointer: Pos2) {
        let Some(rect) = self.viewport else {
            return;
        };
        self.pointer = Some(pointer);
        self.click_origin = None;

        let hit = self.hit_test(press);
        let node = hit.and_then(|index| Some((index, self.node_position(index)?)));
        let Some((index, position)) = node else {
            self.transition = None;
            self.drag = Some(DragGesture::Pan);
            return;
        };

        let grab_offset = position - self.camera.screen_to_world(rect, press);
        let pinned = self.camera.screen_to_world(rect, pointer) + grab_offset;
        let drag_target = self.config.layout.drag_alpha_target;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_alpha_target(drag_target);
            simulation.reheat(drag_target);
            simulation.pin(index, pinned);
        }
        self.drag = Some(DragGesture::Node { index, grab_offset });
        self.hovered = Some(index);
    }

    pub(crate) fn drag_moved(&mut self, pointer: Pos2, delta: Vec2) {
        let Some(rect) = self.viewport else {
            return;
        };
        self.pointer = Some(pointer);
        match self.drag {
            Some(DragGesture::Node { index, grab_offset }) => {
                let world = self.camera.screen_to_world(rect, pointer) + grab_offset;
                if let Some(simulation) = self.simulation.as_mut() {
                    simulation.pin(index, world);
                }
            }
            Some(DragGesture::Pan) => {
                self.transition = None;
                self.camera.pan += delta;
            }
            None => {}
        }
    }

    pub(crate) fn drag_ended(&mut self) {
        if let Some(DragGesture::Node { index, .. }) = self.drag.take()
            && let Some(simulation) = self.simulation.as_mut()
        {
            simulation.unpin(index);
            simulation.set_alpha_target(0.0);
        }
        if let Some(pointer) = self.pointer {
            self.hovered = self.hit_test(pointer);
        }
    }

    /// Pans the camera directly, outside of a primary-button drag.
    pub(crate) fn pan_by(&mut self, delta: Vec2) {
        if self.viewport.is_none() || delta == Vec2::ZERO {
            return;
        }
        self.transition = None;
        self.camera.pan += delta;
    }

    /// Wheel or pinch zoom about `anchor`.
    pub(crate) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let Some(rect) = self.viewport else {
            return;
        };
        if factor <= 0.0 || (factor - 1.0).abs() <= f32::EPSILON {
            return;
        }
        self.transition = None;
        let camera = self.config.camera;
        self.camera = self
            .camera
            .zoomed_about(rect, anchor, factor, camera.min_zoom, camera.max_zoom);
    }

    pub(crate) fn wheel(&mut self, anchor: Pos2, scroll: f32) {
        let factor = (scroll * self.config.camera.wheel_sensitivity).exp();
        self.zoom_at(anchor, factor);
    }
}
