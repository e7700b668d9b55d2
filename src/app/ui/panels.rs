use eframe::egui::{self, Align, Context, Key, Layout, Ui};

use crate::stack::parse_user_input;

use super::super::ViewModel;

/// Shortcut buttons for a few well-known answerers, the equivalent of the
/// clickable usernames next to the input field.
const PRESET_USERS: &[(&str, u64)] = &[
    ("Jon Skeet", 22656),
    ("VonC", 6309),
    ("BalusC", 157882),
];

/// Input field, load button and preset users. Returns the user id to fetch
/// when the user submitted one this frame.
pub(in crate::app) fn draw_fetch_controls(
    ui: &mut Ui,
    input: &mut String,
    is_fetching: bool,
) -> Option<u64> {
    let mut requested = None;

    let field = ui.add(
        egui::TextEdit::singleline(input)
            .hint_text("user id or profile URL")
            .desired_width(240.0),
    );
    let submitted = field.lost_focus() && ui.input(|state| state.key_pressed(Key::Enter));

    let load_clicked = ui
        .add_enabled(!is_fetching, egui::Button::new("Load"))
        .clicked();

    if submitted || load_clicked {
        match parse_user_input(input) {
            Some(user_id) => requested = Some(user_id),
            None => {
                tracing::warn!(input = input.as_str(), "unrecognized user id input");
            }
        }
    }

    ui.separator();
    for (name, user_id) in PRESET_USERS {
        if ui
            .add_enabled(!is_fetching, egui::Button::new(*name))
            .clicked()
        {
            requested = Some(*user_id);
        }
    }

    if is_fetching {
        ui.spinner();
    }

    requested
}

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        input: &mut String,
        requested: &mut Option<u64>,
        is_fetching: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("tag-bubbles");
                    ui.separator();
                    *requested = draw_fetch_controls(ui, input, is_fetching);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("{} points", self.dataset.total_score()));
                        ui.label(format!("{} tags", self.dataset.tag_count()));
                        ui.label(format!("user {}", self.dataset.user_id));
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_chart(ui);
        });
    }
}
