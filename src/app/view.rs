use eframe::egui::{self, PointerButton, Sense, Ui};

use super::ViewModel;
use super::render::{clear_tooltip, draw_background, paint_scene, show_tooltip};
use super::scene::build_scene;
use super::session::DragGesture;

/// Scroll that should drive the wheel zoom. Command-scroll already arrives
/// through `zoom_delta`.
fn wheel_scroll(scroll: f32, command: bool) -> Option<f32> {
    (!command && scroll.abs() > f32::EPSILON).then_some(scroll)
}

impl ViewModel {
    fn handle_map_input(&mut self, ui: &Ui, response: &egui::Response) {
        let session = &mut self.session;

        if response.hovered() {
            let (scroll, command, pinch, pointer) = ui.input(|input| {
                (
                    input.raw_scroll_delta.y,
                    input.modifiers.command,
                    input.zoom_delta(),
                    input.pointer.hover_pos(),
                )
            });
            let anchor = pointer.unwrap_or_else(|| response.rect.center());
            if let Some(scroll) = wheel_scroll(scroll, command) {
                session.wheel(anchor, scroll);
            }
            if (pinch - 1.0).abs() > f32::EPSILON {
                session.zoom_at(anchor, pinch);
            }
        }

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let press = ui.input(|input| input.pointer.press_origin()).unwrap_or(pointer);
            session.drag_started(press, pointer);
        }
        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            session.drag_moved(pointer, response.drag_delta());
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            session.drag_ended();
        }
        if response.dragged_by(PointerButton::Secondary) || response.dragged_by(PointerButton::Middle) {
            session.pan_by(response.drag_delta());
        }

        match response.hover_pos() {
            Some(pointer) => session.pointer_moved(pointer),
            None => session.pointer_left(),
        }

        if let Some(pointer) = response.interact_pointer_pos() {
            if response.double_clicked_by(PointerButton::Primary) {
                session.double_click(pointer);
            } else if response.clicked_by(PointerButton::Primary) {
                session.click(pointer);
            }
        }
    }

    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.session.resize(rect);

        let now = ui.input(|input| input.time);
        self.session.tick(now);
        self.handle_map_input(ui, &response);

        let painter = ui.painter_at(rect);
        let camera = self.session.camera();
        let style = self.session.config().style;
        draw_background(&painter, rect, camera, style.show_grid);

        if !self.session.has_graph() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No map loaded. Pass a map JSON file on the command line.",
                egui::FontId::proportional(15.0),
                egui::Color32::from_gray(150),
            );
            return;
        }

        match self.session.drag() {
            Some(DragGesture::Node { .. }) => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
            Some(DragGesture::Pan) => ui.ctx().set_cursor_icon(egui::CursorIcon::Move),
            None if self.session.hovered().is_some() => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            None => {}
        }

        let scene = build_scene(&self.session);
        paint_scene(ui.ctx(), &painter, rect, camera, &scene, &style);
        match &scene.tooltip {
            Some(tooltip) => show_tooltip(ui.ctx(), tooltip),
            None => clear_tooltip(ui.ctx()),
        }

        if self.session.is_animating() || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_scroll_is_left_to_pinch_zoom() {
        assert_eq!(wheel_scroll(-3.0, false), Some(-3.0));
        assert_eq!(wheel_scroll(-3.0, true), None);
        assert_eq!(wheel_scroll(0.0, false), None);
    }
}
