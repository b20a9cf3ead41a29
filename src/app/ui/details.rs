use eframe::egui::{self, RichText, Ui};

use crate::map::ResourceKind;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Topic Details");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").on_hover_text("Close").clicked() {
                    self.session.select_by_id(None);
                }
            });
        });
        ui.add_space(6.0);

        let Some(node) = self
            .detail_id
            .as_deref()
            .and_then(|id| self.session.store().node_by_id(id))
        else {
            ui.label("Select a topic on the map.");
            return;
        };

        ui.label(RichText::new(node.label.as_str()).strong().size(16.0));
        ui.horizontal(|ui| {
            ui.small(format!("Level: {}", node.level.label()));
            if node.is_root {
                ui.small("· main topic");
            }
        });
        ui.add_space(6.0);
        if node.description.is_empty() {
            ui.weak("No description.");
        } else {
            ui.label(node.description.as_str());
        }

        let store = self.session.store();
        let mut connected = store
            .adjacency(&node.id)
            .into_iter()
            .filter_map(|id| store.node_by_id(id))
            .map(|neighbor| neighbor.label.as_str())
            .collect::<Vec<_>>();
        connected.sort_unstable();

        ui.add_space(6.0);
        if self.session.collapsed().contains(&node.id) {
            ui.label(RichText::new("Collapsed: double-click to expand").italics());
        } else if store.has_children(&node.id) {
            ui.weak("Double-click the topic to collapse its subtree.");
        }
        if !connected.is_empty() {
            ui.label(RichText::new("Connected topics").strong());
            ui.label(connected.join(", "));
        }

        ui.separator();
        ui.label(RichText::new("Resources").strong());
        if node.resources.is_empty() {
            ui.weak("No resources listed.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("resource_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for resource in &node.resources {
                    ui.horizontal(|ui| {
                        let badge = match resource.kind {
                            ResourceKind::Video => "▶",
                            ResourceKind::Website => "🔗",
                        };
                        ui.label(badge).on_hover_text(resource.kind.label());
                        ui.hyperlink_to(resource.title.as_str(), &resource.url);
                    });
                }
            });
    }
}
