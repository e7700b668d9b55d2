use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Pos2, Vec2};
use tracing::warn;

use crate::stack::{DEFAULT_USER_ID, TagSet, fetch_tag_stats, parse_user_input};

mod chart;
mod legend;
mod physics;
mod render_utils;
mod scale;
mod ui;

use legend::Legend;
use scale::{AreaScale, ColorScale};
use ui::panels::draw_fetch_controls;

/// Duration of the size/color/legend transitions, in seconds.
const TRANSITION_SECS: f64 = 0.75;

type FetchResult = Result<TagSet, String>;

pub struct TagBubblesApp {
    state: AppState,
    fetch_rx: Option<Receiver<FetchResult>>,
    last_requested: Option<u64>,
    input: String,
}

enum AppState {
    Loading,
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: TagSet,
    area_scale: AreaScale,
    color_scale: ColorScale,
    nodes: Vec<RenderNode>,
    index_by_tag: HashMap<String, usize>,
    exiting: Vec<ExitingNode>,
    alpha: f32,
    transition_started_at: f64,
    legend: Legend,
    dragged: Option<String>,
    tooltip: TooltipState,
    physics_scratch: PhysicsScratch,
}

/// One bubble. Identity for animation purposes is the tag string: a tag
/// that survives a dataset update keeps its node, so position and velocity
/// carry over while size and color animate to their new targets.
struct RenderNode {
    tag: String,
    score: u64,
    world_pos: Vec2,
    velocity: Vec2,
    pinned: Option<Vec2>,
    radius_from: f32,
    radius_to: f32,
    color_from: Color32,
    color_to: Color32,
}

/// A bubble whose tag left the dataset: frozen in place, shrinking to zero
/// over the transition, then dropped.
struct ExitingNode {
    world_pos: Vec2,
    radius_from: f32,
    color: Color32,
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

struct TooltipState {
    text: String,
    anchor: Pos2,
    visible: bool,
    last_move_at: f64,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            text: String::new(),
            anchor: Pos2::ZERO,
            visible: false,
            last_move_at: 0.0,
        }
    }
}

impl TagBubblesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, user: String) -> Self {
        let user_id = parse_user_input(&user).unwrap_or(DEFAULT_USER_ID);
        let mut app = Self {
            state: AppState::Loading,
            fetch_rx: None,
            last_requested: None,
            input: user,
        };
        app.request_user(user_id);
        app
    }

    fn spawn_fetch(user_id: u64) -> Receiver<FetchResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = fetch_tag_stats(user_id).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    /// At most one fetch per distinct user id: a repeat request for the
    /// last-requested id is suppressed, as is any request while a fetch is
    /// already in flight.
    fn request_user(&mut self, user_id: u64) {
        if self.fetch_rx.is_some() || !should_fetch(self.last_requested, user_id) {
            return;
        }

        self.last_requested = Some(user_id);
        self.fetch_rx = Some(Self::spawn_fetch(user_id));
    }

    fn retry_last(&mut self) {
        if self.fetch_rx.is_some() {
            return;
        }

        let user_id = self.last_requested.unwrap_or(DEFAULT_USER_ID);
        self.last_requested = Some(user_id);
        self.fetch_rx = Some(Self::spawn_fetch(user_id));
        self.state = AppState::Loading;
    }
}

fn should_fetch(last_requested: Option<u64>, user_id: u64) -> bool {
    last_requested != Some(user_id)
}

impl eframe::App for TagBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|input| input.time);
        let mut transition = None;

        if let Some(rx) = self.fetch_rx.take() {
            match rx.try_recv() {
                Ok(Ok(dataset)) => {
                    if let AppState::Ready(model) = &mut self.state {
                        model.apply_dataset(dataset, now);
                    } else {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(dataset, now))));
                    }
                }
                Ok(Err(error)) => {
                    warn!(error = error.as_str(), "tag fetch failed");
                    transition = Some(AppState::Error(error));
                }
                Err(TryRecvError::Empty) => self.fetch_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {
                    transition =
                        Some(AppState::Error("background fetch worker disconnected".to_owned()));
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }

        // egui only repaints on input; keep polling the channel while a
        // fetch is in flight.
        if self.fetch_rx.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let is_fetching = self.fetch_rx.is_some();
        let mut requested = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading => {
                egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.heading("tag-bubbles");
                        ui.separator();
                        requested = draw_fetch_controls(ui, &mut self.input, is_fetching);
                    });
                });
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading top answer tags...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.heading("tag-bubbles");
                        ui.separator();
                        requested = draw_fetch_controls(ui, &mut self.input, is_fetching);
                    });
                });
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load top answer tags");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx, &mut self.input, &mut requested, is_fetching);
            }
        }

        if retry {
            self.retry_last();
        }

        if let Some(user_id) = requested {
            self.request_user(user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_for_an_id_fetches() {
        assert!(should_fetch(None, 5806646));
        assert!(should_fetch(Some(22656), 5806646));
    }

    #[test]
    fn repeat_request_for_the_same_id_is_suppressed() {
        assert!(!should_fetch(Some(5806646), 5806646));
    }
}
