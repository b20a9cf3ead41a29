use std::path::PathBuf;

use eframe::egui::{self, Align, Context, Layout};

use crate::map::{LoadReport, MapData, export_map};

use super::super::ViewModel;
use super::super::session::{MapEvent, MapSession};

impl ViewModel {
    pub(in crate::app) fn new(
        session: MapSession,
        report: LoadReport,
        title: Option<String>,
        source: Option<PathBuf>,
    ) -> Self {
        let title = title.unwrap_or_else(|| Self::derive_title(&session, source.as_ref()));
        Self {
            session,
            title,
            source,
            report,
            detail_id: None,
            status: None,
        }
    }

    fn derive_title(session: &MapSession, source: Option<&PathBuf>) -> String {
        if let Some(root) = session.store().data().root_labels().first() {
            return (*root).to_owned();
        }
        source
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Learning map".to_owned())
    }

    /// Swaps in a freshly loaded graph, keeping the camera and the title.
    pub(in crate::app) fn load(&mut self, data: MapData) {
        self.report = self.session.load(data);
        self.status = Some(format!(
            "Reloaded {} topics ({} links dropped)",
            self.report.nodes, self.report.dropped_links
        ));
        self.apply_events();
    }

    fn apply_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                MapEvent::SelectionChanged(id) => {
                    tracing::debug!(selected = ?id, "selection changed");
                    self.detail_id = id;
                }
            }
        }
    }

    fn export(&mut self) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.status = Some(match export_map(self.session.store().data(), &self.title, &dir) {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(error) => {
                tracing::warn!("export failed: {error:#}");
                format!("Export failed: {error:#}")
            }
        });
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(self.title.as_str());
                    ui.separator();
                    if let Some(source) = &self.source {
                        ui.label(format!("file: {}", source.display()));
                    }
                    let store = self.session.store();
                    let visible = self.session.visible();
                    ui.label(format!("topics: {}", store.nodes().len()));
                    ui.label(format!("links: {}", store.links().len()));
                    ui.label(format!(
                        "collapsed: {} ({} hidden)",
                        self.session.collapsed().len(),
                        visible.hidden_count()
                    ));

                    let reload_button = ui.add_enabled(
                        !is_loading && self.source.is_some(),
                        egui::Button::new("Reload"),
                    );
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    let export_button =
                        ui.add_enabled(self.session.has_graph(), egui::Button::new("Export JSON"));
                    if export_button.clicked() {
                        self.export();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_loading {
                            ui.spinner();
                        }
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.detail_id.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_map(ui));

        self.apply_events();
    }
}
