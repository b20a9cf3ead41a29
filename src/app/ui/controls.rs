use eframe::egui::{self, RichText, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::scene::NodeCategory;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Map Controls");
        ui.add_space(6.0);

        let has_graph = self.session.has_graph();
        ui.label(RichText::new("Camera").strong());
        ui.horizontal(|ui| {
            if ui.add_enabled(has_graph, egui::Button::new("+")).on_hover_text("Zoom in").clicked() {
                self.session.zoom_in();
            }
            if ui.add_enabled(has_graph, egui::Button::new("−")).on_hover_text("Zoom out").clicked() {
                self.session.zoom_out();
            }
            if ui.add_enabled(has_graph, egui::Button::new("Reset")).clicked() {
                self.session.reset_zoom();
            }
        });
        ui.small(format!("zoom: {:.0}%", self.session.camera().zoom * 100.0));

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        let mut live_layout = self.session.live_layout();
        if ui.checkbox(&mut live_layout, "Live layout").changed() {
            self.session.set_live_layout(live_layout);
        }
        let can_expand = !self.session.collapsed().is_empty();
        if ui.add_enabled(can_expand, egui::Button::new("Expand all")).clicked() {
            self.session.expand_all();
        }
        if let Some(simulation) = self.session.simulation() {
            let state = if simulation.is_running() { "settling" } else { "idle" };
            ui.small(format!("alpha: {:.3} ({state})", simulation.alpha()));
        }
        ui.small(format!(
            "visible: {} topics, {} links",
            self.session.visible().node_count(),
            self.session.visible().link_count()
        ));
        if self.report.dropped_links > 0 || self.report.duplicate_nodes > 0 {
            ui.small(format!(
                "ignored: {} dangling links, {} duplicate topics",
                self.report.dropped_links, self.report.duplicate_nodes
            ));
        }

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_legend(&self, ui: &mut Ui) {
        ui.label(RichText::new("Legend").strong());
        for category in NodeCategory::ALL {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
                ui.painter().circle(
                    rect.center(),
                    6.0,
                    category.fill(),
                    Stroke::new(1.5, egui::Color32::from_rgb(0x1e, 0x29, 0x3b)),
                );
                ui.label(category.legend_label());
            });
        }
        ui.add_space(4.0);
        ui.small("Click: select · Double-click: collapse / expand");
        ui.small("Drag: move topic or pan · Scroll: zoom");
    }
}
