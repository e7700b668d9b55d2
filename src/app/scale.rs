use std::f32::consts::PI;

use eframe::egui::Color32;

use super::render_utils::blend_color;

pub(super) const MAX_RADIUS: f32 = 90.0;
pub(super) const MAX_AREA: f32 = MAX_RADIUS * MAX_RADIUS * PI;

/// Linear map from the current score extent to circle area. The maximum
/// score always gets `MAX_AREA`; the minimum gets `MAX_AREA` shrunk by the
/// min/max ratio, so a 10x score spread yields a 10x area spread.
#[derive(Clone, Copy, Debug)]
pub(super) struct AreaScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl AreaScale {
    pub(super) fn from_extent(min_score: u64, max_score: u64) -> Self {
        let min_score = min_score as f32;
        let max_score = max_score as f32;

        if max_score <= 0.0 || (max_score - min_score).abs() < f32::EPSILON {
            // Degenerate extent: every bubble gets the full area.
            return Self {
                domain: (min_score, max_score),
                range: (MAX_AREA, MAX_AREA),
            };
        }

        Self {
            domain: (min_score, max_score),
            range: (MAX_AREA * (min_score / max_score), MAX_AREA),
        }
    }

    pub(super) fn area(self, score: u64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f32::EPSILON {
            return r1;
        }
        let t = (score as f32 - d0) / span;
        r0 + ((r1 - r0) * t)
    }

    pub(super) fn radius(self, score: u64) -> f32 {
        (self.area(score).max(0.0) / PI).sqrt()
    }
}

const COLOR_LOW: Color32 = Color32::from_rgb(34, 131, 187);
const COLOR_MID: Color32 = Color32::from_rgb(253, 255, 140);
const COLOR_HIGH: Color32 = Color32::from_rgb(216, 31, 28);

/// 3-stop blue -> yellow -> red gradient over `[0, upper/2, upper]`, where
/// `upper` is the maximum score rounded up to a magnitude-appropriate step.
#[derive(Clone, Copy, Debug)]
pub(super) struct ColorScale {
    upper: f32,
}

impl ColorScale {
    pub(super) fn from_max_score(max_score: u64) -> Self {
        Self {
            upper: rounded_upper(max_score) as f32,
        }
    }

    pub(super) fn upper(self) -> f32 {
        self.upper
    }

    pub(super) fn color(self, score: f32) -> Color32 {
        if self.upper <= 0.0 {
            return COLOR_LOW;
        }

        let mid = self.upper * 0.5;
        if score <= 0.0 {
            COLOR_LOW
        } else if score < mid {
            blend_color(COLOR_LOW, COLOR_MID, score / mid)
        } else if score < self.upper {
            blend_color(COLOR_MID, COLOR_HIGH, (score - mid) / (self.upper - mid))
        } else {
            COLOR_HIGH
        }
    }
}

/// Rounds a maximum score up to its leading-two-digits step: values under
/// 100 are kept exact, 137 becomes 140, 1234 becomes 1300.
pub(super) fn rounded_upper(max_score: u64) -> u64 {
    let digits = max_score.checked_ilog10().map_or(1, |log| log + 1);
    if digits <= 2 {
        return max_score;
    }

    let step = 10u64.pow(digits - 2);
    max_score.div_ceil(step) * step
}

/// Tick positions for the legend axis: a "nice" 1/2/5-stepped sequence
/// covering `[0, upper]`, endpoint included.
pub(super) fn nice_ticks(upper: f32, target_count: usize) -> Vec<f32> {
    if upper <= 0.0 {
        return vec![0.0];
    }

    let step = nice_step(upper, target_count.max(2));
    let mut ticks = Vec::new();
    let mut value = 0.0f32;
    while value <= upper + (step * 0.5) {
        ticks.push(value.min(upper));
        value += step;
    }
    let last = ticks.last().copied();
    if let Some(last) = last
        && (upper - last) > (step * 0.25)
    {
        ticks.push(upper);
    }
    ticks.dedup_by(|a, b| (*a - *b).abs() < f32::EPSILON);
    ticks
}

fn nice_step(span: f32, target_count: usize) -> f32 {
    let raw = span / target_count as f32;
    let magnitude = 10.0f32.powf(raw.log10().floor());
    let residual = raw / magnitude;

    let factor = if residual > 5.0 {
        10.0
    } else if residual > 2.0 {
        5.0
    } else if residual > 1.0 {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}
