use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui};

use crate::util::ease_in_out_cubic;

use super::super::render_utils::{blend_color, circle_visible, world_to_screen};
use super::super::{ViewModel, physics};
use super::build::lerp;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const LABEL_COLOR: Color32 = Color32::from_rgb(24, 26, 30);
const LABEL_BASE_FONT: f32 = 13.0;
/// Labels that would render smaller than this are dropped entirely.
const LABEL_MIN_FONT: f32 = 14.0;
const LABEL_FIT_PADDING: f32 = 8.0;

impl ViewModel {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let now = ui.input(|input| input.time);
        let delta_seconds = ui
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);

        let progress = ease_in_out_cubic(self.transition_progress(now));
        let hovered = self.hovered_index(ui, rect, progress);
        self.handle_drag(rect, &response, hovered);

        self.alpha = physics::advance_alpha(self.alpha);
        let moving = physics::step_simulation(
            &mut self.nodes,
            &mut self.physics_scratch,
            self.alpha,
            delta_seconds,
        );

        let transitioning = progress < 1.0 || !self.exiting.is_empty();
        if moving || transitioning || response.dragged() {
            ui.ctx().request_repaint();
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        for exiting in &self.exiting {
            let radius = exiting.radius_from * (1.0 - progress);
            let position = world_to_screen(rect, exiting.world_pos);
            if radius > 0.25 && circle_visible(rect, position, radius) {
                painter.circle_filled(position, radius, exiting.color);
            }
        }
        if progress >= 1.0 {
            self.exiting.clear();
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let position = world_to_screen(rect, node.world_pos);
            let radius = lerp(node.radius_from, node.radius_to, progress);
            if radius <= 0.25 || !circle_visible(rect, position, radius) {
                continue;
            }

            let color = blend_color(node.color_from, node.color_to, progress);
            painter.circle_filled(position, radius, color);
            if hovered == Some(index) {
                painter.circle_stroke(position, radius, Stroke::new(1.5, Color32::from_gray(235)));
            }

            if let Some(font_size) = fitted_label_size(ui, &node.tag, radius) {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    &node.tag,
                    FontId::proportional(font_size),
                    LABEL_COLOR,
                );
            }
        }

        let legend_animating = self.legend.draw(&painter, rect, self.color_scale, now);
        if legend_animating {
            ui.ctx().request_repaint();
        }

        self.update_tooltip(ui, now, hovered);
        self.draw_tooltip(&painter);
    }
}

/// Font size that makes `text` span the circle's diameter minus padding,
/// or `None` when the fitted size would be illegibly small.
fn fitted_label_size(ui: &Ui, text: &str, radius: f32) -> Option<f32> {
    let width = ui.fonts_mut(|fonts| {
        fonts
            .layout_no_wrap(
                text.to_owned(),
                FontId::proportional(LABEL_BASE_FONT),
                Color32::WHITE,
            )
            .size()
            .x
    });
    if width <= f32::EPSILON {
        return None;
    }

    let font_size = ((radius * 2.0) - LABEL_FIT_PADDING) / width * LABEL_BASE_FONT;
    (font_size >= LABEL_MIN_FONT).then_some(font_size)
}
