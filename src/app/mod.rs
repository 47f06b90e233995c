use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::engine::{BubbleEngine, PhysicsConfig, TickHandle, TickLoop, ViewportTracker};
use crate::vibe::{Category, Concept, DEFAULT_WEIGHT, demo_concepts, load_concept_file};

mod canvas;
mod render_utils;
mod ui;

type LoadResult = Result<Vec<Concept>, String>;

pub struct AppOptions {
    pub concepts_path: Option<PathBuf>,
    pub export_path: PathBuf,
    pub start_paused: bool,
}

pub struct BubbleApp {
    engine: BubbleEngine,
    tick_loop: TickLoop,
    tick_handle: Option<TickHandle>,
    viewport: ViewportTracker<egui::Id>,
    concepts_path: Option<PathBuf>,
    export_path: PathBuf,
    load_rx: Option<Receiver<LoadResult>>,
    status: Option<StatusLine>,
    add_form: AddConceptForm,
    focus_editor: bool,
    stats: FrameStats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

struct StatusLine {
    kind: StatusKind,
    message: String,
}

struct AddConceptForm {
    category: Category,
    label: String,
    weight: f32,
}

impl Default for AddConceptForm {
    fn default() -> Self {
        Self {
            category: Category::Mood,
            label: String::new(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

#[derive(Default)]
struct FrameStats {
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl BubbleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let mut app = Self {
            engine: BubbleEngine::new(PhysicsConfig::default()),
            tick_loop: TickLoop::default(),
            tick_handle: None,
            viewport: ViewportTracker::default(),
            concepts_path: options.concepts_path,
            export_path: options.export_path,
            load_rx: None,
            status: None,
            add_form: AddConceptForm::default(),
            focus_editor: false,
            stats: FrameStats::default(),
        };

        if !options.start_paused {
            app.resume();
        }
        app.request_load();
        app
    }

    fn spawn_load(concepts_path: Option<PathBuf>) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match &concepts_path {
                Some(path) => load_concept_file(path),
                None => demo_concepts(),
            }
            .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn request_load(&mut self) {
        if self.load_rx.is_some() {
            return;
        }
        match &self.concepts_path {
            Some(path) => info!(path = %path.display(), "loading concepts"),
            None => info!("loading bundled demo concepts"),
        }
        self.load_rx = Some(Self::spawn_load(self.concepts_path.clone()));
    }

    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(concepts)) => {
                let count = concepts.len();
                self.engine.load_concepts(concepts);
                self.set_status(StatusKind::Info, format!("Loaded {count} concepts"));
            }
            Ok(Err(error)) => {
                warn!(%error, "concept load failed");
                self.set_status(StatusKind::Error, error);
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.set_status(
                    StatusKind::Error,
                    "Background load worker disconnected".to_owned(),
                );
            }
        }
    }

    fn set_status(&mut self, kind: StatusKind, message: String) {
        self.status = Some(StatusLine { kind, message });
    }

    fn resume(&mut self) {
        self.tick_handle = Some(self.tick_loop.start());
    }

    fn pause(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.tick_loop.cancel(handle);
        }
    }
}

/// Points the viewport tracker at `target`. When that replaces an earlier
/// surface, a running tick registration is cancelled and a fresh one taken.
fn follow_surface(
    viewport: &mut ViewportTracker<egui::Id>,
    tick_loop: &mut TickLoop,
    tick_handle: &mut Option<TickHandle>,
    target: egui::Id,
) -> bool {
    let replaced = viewport.retarget(target);
    if replaced && let Some(handle) = tick_handle.take() {
        tick_loop.cancel(handle);
        *tick_handle = Some(tick_loop.start());
    }
    replaced
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        self.update_frame_stats(ctx);
        if self.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));
    }
}

impl Drop for BubbleApp {
    fn drop(&mut self) {
        self.tick_loop.stop();
    }
}
