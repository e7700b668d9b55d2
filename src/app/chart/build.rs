use std::collections::HashMap;

use eframe::egui::{Color32, Vec2, vec2};

use crate::stack::{TagSet, TagStat};
use crate::util::{ease_in_out_cubic, stable_pair};

use super::super::render_utils::blend_color;
use super::super::scale::{AreaScale, ColorScale};
use super::super::{
    ExitingNode, Legend, PhysicsScratch, RenderNode, TRANSITION_SECS, TooltipState, ViewModel,
    physics,
};

pub(super) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + ((to - from) * t)
}

impl ViewModel {
    pub(in crate::app) fn new(dataset: TagSet, now: f64) -> Self {
        let mut model = Self {
            dataset: TagSet {
                user_id: dataset.user_id,
                tags: Vec::new(),
            },
            area_scale: AreaScale::from_extent(0, 0),
            color_scale: ColorScale::from_max_score(0),
            nodes: Vec::new(),
            index_by_tag: HashMap::new(),
            exiting: Vec::new(),
            alpha: 1.0,
            transition_started_at: now,
            legend: Legend::new(0.0),
            dragged: None,
            tooltip: TooltipState::default(),
            physics_scratch: PhysicsScratch {
                forces: Vec::new(),
                positions: Vec::new(),
                radii: Vec::new(),
            },
        };
        model.apply_dataset(dataset, now);
        model
    }

    /// Eased progress of the size/color transition started by the most
    /// recent dataset update.
    pub(in crate::app) fn transition_progress(&self, now: f64) -> f32 {
        (((now - self.transition_started_at) / TRANSITION_SECS).clamp(0.0, 1.0)) as f32
    }

    /// Reconciles the incoming dataset against the rendered bubbles, keyed
    /// by tag. Surviving tags keep their node (position and velocity
    /// intact) and animate to the new size/color; new tags enter growing
    /// from zero; vanished tags shrink out in place.
    pub(in crate::app) fn apply_dataset(&mut self, dataset: TagSet, now: f64) {
        let (min_score, max_score) = dataset.score_extent().unwrap_or((0, 0));
        self.area_scale = AreaScale::from_extent(min_score, max_score);
        self.color_scale = ColorScale::from_max_score(max_score);
        self.legend.retarget(self.color_scale.upper(), now);

        // Displayed size/color right now, so a retarget mid-transition
        // animates from what is on screen rather than jumping.
        let displayed = ease_in_out_cubic(self.transition_progress(now));

        let mut prior_nodes = self
            .nodes
            .drain(..)
            .map(|node| (node.tag.clone(), node))
            .collect::<HashMap<_, _>>();

        let mut next_nodes = Vec::with_capacity(dataset.tags.len());
        for stat in &dataset.tags {
            let radius_to = self.area_scale.radius(stat.score);
            let color_to = self.color_scale.color(stat.score as f32);

            if let Some(mut node) = prior_nodes.remove(&stat.tag) {
                node.score = stat.score;
                node.radius_from = lerp(node.radius_from, node.radius_to, displayed);
                node.radius_to = radius_to;
                node.color_from = blend_color(node.color_from, node.color_to, displayed);
                node.color_to = color_to;
                next_nodes.push(node);
            } else {
                next_nodes.push(Self::make_render_node(
                    stat,
                    next_nodes.len(),
                    radius_to,
                    color_to,
                ));
            }
        }

        for (_tag, node) in prior_nodes {
            let radius_from = lerp(node.radius_from, node.radius_to, displayed);
            if radius_from > 0.1 {
                self.exiting.push(ExitingNode {
                    world_pos: node.world_pos,
                    radius_from,
                    color: blend_color(node.color_from, node.color_to, displayed),
                });
            }
        }

        self.index_by_tag = next_nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.tag.clone(), index))
            .collect();
        self.nodes = next_nodes;

        if let Some(tag) = &self.dragged
            && !self.index_by_tag.contains_key(tag)
        {
            self.dragged = None;
        }

        self.dataset = dataset;
        self.transition_started_at = now;
        self.alpha = physics::restart_alpha(self.alpha);
    }

    fn make_render_node(
        stat: &TagStat,
        index: usize,
        radius_to: f32,
        color_to: Color32,
    ) -> RenderNode {
        let (jx, jy) = stable_pair(&stat.tag);
        let mut direction = vec2(jx, jy);
        if direction.length_sq() <= 0.0001 {
            let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
            direction = vec2(angle.cos(), angle.sin());
        } else {
            direction = direction.normalized();
        }

        let initial_speed = 1.15 + (radius_to * 0.022);

        RenderNode {
            tag: stat.tag.clone(),
            score: stat.score,
            world_pos: Vec2::ZERO,
            velocity: direction * initial_speed,
            pinned: None,
            radius_from: 0.0,
            radius_to,
            color_from: color_to,
            color_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(tag: &str, score: u64) -> TagStat {
        TagStat {
            tag: tag.to_owned(),
            score,
            answer_count: 1,
        }
    }

    fn dataset(user_id: u64, tags: &[(&str, u64)]) -> TagSet {
        TagSet {
            user_id,
            tags: tags.iter().map(|(tag, score)| stat(tag, *score)).collect(),
        }
    }

    #[test]
    fn bubbles_are_sized_and_colored_by_score() {
        let model = ViewModel::new(dataset(1, &[("javascript", 100), ("css", 10)]), 0.0);

        assert_eq!(model.nodes.len(), 2);
        let js = &model.nodes[model.index_by_tag["javascript"]];
        let css = &model.nodes[model.index_by_tag["css"]];
        assert!(js.radius_to > css.radius_to);
        assert_eq!(model.color_scale.upper(), 100.0);
    }

    #[test]
    fn entering_bubbles_grow_from_zero() {
        let model = ViewModel::new(dataset(1, &[("rust", 50)]), 0.0);
        let node = &model.nodes[0];
        assert_eq!(node.radius_from, 0.0);
        assert!(node.radius_to > 0.0);
        assert!(node.velocity.length() > 0.0);
    }

    #[test]
    fn surviving_tags_keep_their_node_across_updates() {
        let mut model = ViewModel::new(dataset(1, &[("javascript", 100), ("css", 10)]), 0.0);
        let moved = vec2(40.0, -25.0);
        let drifting = vec2(1.5, -0.5);
        {
            let index = model.index_by_tag["javascript"];
            model.nodes[index].world_pos = moved;
            model.nodes[index].velocity = drifting;
        }

        // Transition fully settled before the next update arrives.
        model.apply_dataset(dataset(1, &[("javascript", 120), ("html", 30)]), 10.0);

        let js = &model.nodes[model.index_by_tag["javascript"]];
        assert_eq!(js.world_pos, moved);
        assert_eq!(js.velocity, drifting);
        assert_eq!(js.score, 120);
        // Size animates from the previously displayed radius, not from zero.
        assert!(js.radius_from > 0.0);
    }

    #[test]
    fn vanished_tags_shrink_out_in_place() {
        let mut model = ViewModel::new(dataset(1, &[("javascript", 100), ("css", 10)]), 0.0);
        let css_radius = model.nodes[model.index_by_tag["css"]].radius_to;

        model.apply_dataset(dataset(1, &[("javascript", 100)]), 10.0);

        assert!(!model.index_by_tag.contains_key("css"));
        assert_eq!(model.exiting.len(), 1);
        assert!((model.exiting[0].radius_from - css_radius).abs() < 0.01);
    }

    #[test]
    fn a_dragged_tag_that_vanishes_is_released() {
        let mut model = ViewModel::new(dataset(1, &[("javascript", 100), ("css", 10)]), 0.0);
        model.dragged = Some("css".to_owned());

        model.apply_dataset(dataset(1, &[("javascript", 100)]), 10.0);
        assert_eq!(model.dragged, None);

        model.dragged = Some("javascript".to_owned());
        model.apply_dataset(dataset(1, &[("javascript", 90), ("css", 20)]), 20.0);
        assert_eq!(model.dragged.as_deref(), Some("javascript"));
    }

    #[test]
    fn updates_re_energize_the_simulation() {
        let mut model = ViewModel::new(dataset(1, &[("javascript", 100)]), 0.0);
        model.alpha = 0.03;

        model.apply_dataset(dataset(1, &[("javascript", 100), ("css", 10)]), 10.0);
        assert!(model.alpha > 0.03);
    }

    #[test]
    fn lerp_interpolates_both_directions() {
        assert_eq!(lerp(0.0, 80.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 80.0, 0.5), 40.0);
        assert_eq!(lerp(0.0, 80.0, 1.0), 80.0);
        assert_eq!(lerp(60.0, 20.0, 0.5), 40.0);
    }

    #[test]
    fn transition_progress_is_clamped() {
        let mut model = ViewModel::new(dataset(1, &[("rust", 5)]), 100.0);
        model.transition_started_at = 100.0;
        assert_eq!(model.transition_progress(99.0), 0.0);
        assert!((model.transition_progress(100.375) - 0.5).abs() < 1e-6);
        assert_eq!(model.transition_progress(101.0), 1.0);
    }
}
