use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Stroke, pos2, vec2};

use crate::util::ease_in_out_cubic;

use super::TRANSITION_SECS;
use super::render_utils::blend_color;
use super::scale::{ColorScale, nice_ticks};

const STRIP_WIDTH: f32 = 600.0;
const STRIP_HEIGHT: f32 = 10.0;
const STRIP_TOP: f32 = 34.0;
const GRADIENT_STOPS: usize = 10;
const SLICES_PER_STOP: usize = 6;
const TICK_LENGTH: f32 = 5.0;
const TICK_TARGET_COUNT: usize = 6;

/// Gradient strip plus bottom axis mirroring the color scale's domain.
/// The axis maximum animates whenever the score range changes.
pub(super) struct Legend {
    upper_from: f32,
    upper_to: f32,
    retargeted_at: f64,
}

impl Legend {
    pub(super) fn new(upper: f32) -> Self {
        Self {
            upper_from: upper,
            upper_to: upper,
            retargeted_at: 0.0,
        }
    }

    pub(super) fn retarget(&mut self, upper: f32, now: f64) {
        if (upper - self.upper_to).abs() < f32::EPSILON {
            return;
        }

        self.upper_from = self.displayed_upper(now);
        self.upper_to = upper;
        self.retargeted_at = now;
    }

    fn progress(&self, now: f64) -> f32 {
        (((now - self.retargeted_at) / TRANSITION_SECS).clamp(0.0, 1.0)) as f32
    }

    pub(super) fn displayed_upper(&self, now: f64) -> f32 {
        let eased = ease_in_out_cubic(self.progress(now));
        self.upper_from + ((self.upper_to - self.upper_from) * eased)
    }

    /// Returns whether the axis is still animating.
    pub(super) fn draw(
        &self,
        painter: &Painter,
        rect: Rect,
        color_scale: ColorScale,
        now: f64,
    ) -> bool {
        let strip_left = rect.center().x - (STRIP_WIDTH * 0.5);
        let strip_top = rect.top() + STRIP_TOP;

        painter.text(
            pos2(rect.center().x, strip_top - 8.0),
            Align2::CENTER_BOTTOM,
            "Scores",
            FontId::proportional(13.0),
            Color32::from_gray(210),
        );

        // The strip samples the scale at a fixed number of stops; between
        // stops the fill blends linearly, like an SVG gradient would.
        let mut stops = [Color32::BLACK; GRADIENT_STOPS];
        for (index, stop) in stops.iter_mut().enumerate() {
            let t = index as f32 / (GRADIENT_STOPS - 1) as f32;
            *stop = color_scale.color(t * color_scale.upper());
        }

        let span_width = STRIP_WIDTH / (GRADIENT_STOPS - 1) as f32;
        let slice_width = span_width / SLICES_PER_STOP as f32;
        for span in 0..(GRADIENT_STOPS - 1) {
            let span_left = strip_left + (span as f32 * span_width);
            for slice in 0..SLICES_PER_STOP {
                let blend = (slice as f32 + 0.5) / SLICES_PER_STOP as f32;
                let color = blend_color(stops[span], stops[span + 1], blend);
                let slice_rect = Rect::from_min_size(
                    pos2(span_left + (slice as f32 * slice_width), strip_top),
                    vec2(slice_width + 0.5, STRIP_HEIGHT),
                );
                painter.rect_filled(slice_rect, 0.0, color);
            }
        }

        let axis_top = strip_top + STRIP_HEIGHT;
        let axis_color = Color32::from_gray(170);
        painter.line_segment(
            [
                pos2(strip_left, axis_top),
                pos2(strip_left + STRIP_WIDTH, axis_top),
            ],
            Stroke::new(1.0, axis_color),
        );

        let upper = self.displayed_upper(now);
        for tick in nice_ticks(upper, TICK_TARGET_COUNT) {
            let fraction = if upper > 0.0 { tick / upper } else { 0.0 };
            let x = strip_left + (fraction * STRIP_WIDTH);
            painter.line_segment(
                [pos2(x, axis_top), pos2(x, axis_top + TICK_LENGTH)],
                Stroke::new(1.0, axis_color),
            );
            painter.text(
                pos2(x, axis_top + TICK_LENGTH + 2.0),
                Align2::CENTER_TOP,
                format!("{tick:.0}"),
                FontId::proportional(11.0),
                Color32::from_gray(190),
            );
        }

        self.progress(now) < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_legend_is_settled() {
        let legend = Legend::new(100.0);
        assert_eq!(legend.displayed_upper(5.0), 100.0);
        assert_eq!(legend.progress(5.0), 1.0);
    }

    #[test]
    fn retarget_animates_between_domains() {
        let mut legend = Legend::new(100.0);
        legend.retarget(140.0, 10.0);

        assert_eq!(legend.displayed_upper(10.0), 100.0);
        let midway = legend.displayed_upper(10.0 + (TRANSITION_SECS * 0.5));
        assert!(midway > 100.0 && midway < 140.0);
        assert_eq!(legend.displayed_upper(11.0), 140.0);
    }

    #[test]
    fn retarget_to_the_same_domain_is_a_no_op() {
        let mut legend = Legend::new(100.0);
        legend.retarget(100.0, 10.0);
        assert_eq!(legend.progress(10.0), 1.0);
    }

    #[test]
    fn retarget_mid_animation_starts_from_the_displayed_value() {
        let mut legend = Legend::new(100.0);
        legend.retarget(200.0, 10.0);

        let midway_time = 10.0 + (TRANSITION_SECS * 0.5);
        let displayed = legend.displayed_upper(midway_time);
        legend.retarget(50.0, midway_time);
        assert_eq!(legend.displayed_upper(midway_time), displayed);
        assert_eq!(legend.displayed_upper(midway_time + 1.0), 50.0);
    }
}
