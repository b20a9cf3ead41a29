use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::config::MapConfig;
use crate::map::{LoadReport, MapData, read_map_file};

mod camera;
mod interaction;
mod physics;
mod render;
mod scene;
mod session;
mod ui;
mod view;

use session::MapSession;

pub struct LearningMapApp {
    source: Option<PathBuf>,
    title: Option<String>,
    config: MapConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<MapData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<MapData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: MapSession,
    title: String,
    source: Option<PathBuf>,
    report: LoadReport,
    detail_id: Option<String>,
    status: Option<String>,
}

impl LearningMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: Option<PathBuf>,
        title: Option<String>,
        config: MapConfig,
    ) -> Self {
        let state = match &source {
            Some(path) => Self::start_load(path.clone()),
            None => AppState::Ready(Box::new(ViewModel::new(
                MapSession::new(config),
                LoadReport::default(),
                title.clone(),
                None,
            ))),
        };
        Self {
            source,
            title,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<Result<MapData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = read_map_file(&path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        tracing::info!(path = %path.display(), "loading map");
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn ready_state(&self, data: MapData) -> AppState {
        let mut session = MapSession::new(self.config);
        let report = session.load(data);
        AppState::Ready(Box::new(ViewModel::new(
            session,
            report,
            self.title.clone(),
            self.source.clone(),
        )))
    }
}

impl eframe::App for LearningMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(data)) => transition = Some(Ok(data)),
                    Ok(Err(error)) => transition = Some(Err(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading learning map...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load learning map");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    let can_retry = self.source.is_some();
                    if ui.add_enabled(can_retry, egui::Button::new("Retry")).clicked() {
                        retry = true;
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested
                    && self.reload_rx.is_none()
                    && let Some(path) = self.source.clone()
                {
                    tracing::info!(path = %path.display(), "reloading map");
                    self.reload_rx = Some(Self::spawn_load(path));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(data)) => model.load(data),
                        Ok(Err(error)) => transition = Some(Err(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry && let Some(path) = self.source.clone() {
            self.reload_rx = None;
            self.state = Self::start_load(path);
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(data) => self.ready_state(data),
                Err(error) => {
                    tracing::error!("map load failed: {error}");
                    AppState::Error(error)
                }
            };
        }
    }
}
