mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::{PhysicsScratch, RenderNode};
use forces::{CollisionParams, accumulate_collision_pairs, accumulate_repulsion_for_node};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.9;

/// Extra spacing added around each bubble for the collision force.
pub(super) const COLLISION_PADDING: f32 = 2.5;

/// Pull toward the chart center, per axis, scaled by alpha.
const CENTER_PULL_STRENGTH: f32 = 0.1;
const REPULSION_STRENGTH: f32 = 1500.0;
const REPULSION_SOFTENING: f32 = 400.0;
const COLLISION_STRENGTH: f32 = 0.5;

/// Fraction of velocity kept per tick (d3's velocityDecay of 0.4).
const VELOCITY_RETAIN: f32 = 0.6;
const MAX_SPEED: f32 = 14.0;

const ALPHA_TARGET: f32 = 0.03;
const ALPHA_DECAY: f32 = 0.0228;
const RESTART_ALPHA: f32 = 0.5;

/// One decay step of the simulation's energy parameter. Alpha converges
/// toward a small positive target so the layout keeps simmering gently
/// after it settles.
pub(super) fn advance_alpha(alpha: f32) -> f32 {
    alpha + ((ALPHA_TARGET - alpha) * ALPHA_DECAY)
}

/// Re-energizes the simulation after a dataset update or a drag start.
pub(super) fn restart_alpha(alpha: f32) -> f32 {
    alpha.max(RESTART_ALPHA)
}

/// Advances every bubble by one tick: center pull and long-range repulsion
/// scaled by `alpha`, short-range collision at full strength, then damped
/// integration, centroid recentering and pin enforcement. Returns whether
/// anything is still moving.
pub(super) fn step_simulation(
    nodes: &mut [RenderNode],
    scratch: &mut PhysicsScratch,
    alpha: f32,
    delta_seconds: f32,
) -> bool {
    let node_count = nodes.len();
    if node_count == 0 {
        return false;
    }

    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.forces.fill(Vec2::ZERO);
    scratch.positions.clear();
    scratch.radii.clear();
    let mut max_radius = 0.0_f32;
    for node in nodes.iter() {
        scratch.positions.push(node.world_pos);
        let collision_radius = node.radius_to + COLLISION_PADDING;
        scratch.radii.push(collision_radius);
        max_radius = max_radius.max(collision_radius);
    }

    let forces = &mut scratch.forces;
    let positions = &scratch.positions;
    let radii = &scratch.radii;
    let time_step_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);

    if let Some(quadtree) = QuadNode::build(positions) {
        let repulsion = REPULSION_STRENGTH * alpha;
        for (index, force) in forces.iter_mut().enumerate() {
            accumulate_repulsion_for_node(
                &quadtree,
                index,
                positions,
                repulsion,
                REPULSION_SOFTENING,
                BARNES_HUT_THETA,
                force,
            );
        }

        let max_pair_distance = max_radius * 2.0;
        if max_pair_distance > 0.0 {
            accumulate_collision_pairs(
                &quadtree,
                &quadtree,
                true,
                positions,
                radii,
                CollisionParams {
                    strength: COLLISION_STRENGTH,
                    max_pair_distance_sq: max_pair_distance * max_pair_distance,
                },
                forces,
            );
        }
    }

    for (index, force) in forces.iter_mut().enumerate() {
        *force -= positions[index] * (CENTER_PULL_STRENGTH * alpha);
    }

    let retain = VELOCITY_RETAIN.powf(time_step_scale);
    let max_speed_sq = MAX_SPEED * MAX_SPEED;
    let min_sleep_speed_sq = 0.02 * 0.02;
    let min_sleep_force_sq = 0.002 * 0.002;
    let mut any_motion = false;
    for (index, force) in forces.iter().enumerate() {
        let node = &mut nodes[index];
        let force_sq = force.length_sq();

        let mut velocity = (node.velocity + (*force * time_step_scale)) * retain;
        let mut speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= MAX_SPEED / speed_sq.sqrt();
            speed_sq = max_speed_sq;
        }

        if speed_sq < min_sleep_speed_sq && force_sq < min_sleep_force_sq {
            velocity = Vec2::ZERO;
            speed_sq = 0.0;
        }

        node.velocity = velocity;
        node.world_pos += velocity * time_step_scale;
        if speed_sq > 0.000_001 {
            any_motion = true;
        }
    }

    // The center force proper: translate so the mean position sits exactly
    // on the focal point.
    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.world_pos;
    }
    centroid /= node_count as f32;
    if centroid.length_sq() > 0.000_001 {
        for node in nodes.iter_mut() {
            node.world_pos -= centroid;
        }
    }

    for node in nodes.iter_mut() {
        if let Some(pinned) = node.pinned {
            node.world_pos = pinned;
            node.velocity = Vec2::ZERO;
        }
    }

    any_motion
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Color32, vec2};

    fn node(tag: &str, x: f32, y: f32, radius: f32) -> RenderNode {
        RenderNode {
            tag: tag.to_owned(),
            score: 1,
            world_pos: vec2(x, y),
            velocity: Vec2::ZERO,
            pinned: None,
            radius_from: radius,
            radius_to: radius,
            color_from: Color32::WHITE,
            color_to: Color32::WHITE,
        }
    }

    fn scratch() -> PhysicsScratch {
        PhysicsScratch {
            forces: Vec::new(),
            positions: Vec::new(),
            radii: Vec::new(),
        }
    }

    #[test]
    fn overlapping_bubbles_separate() {
        let mut nodes = vec![node("a", -1.0, 0.0, 40.0), node("b", 1.0, 0.0, 40.0)];
        let mut scratch = scratch();

        for _ in 0..120 {
            step_simulation(&mut nodes, &mut scratch, 1.0, 1.0 / 60.0);
        }

        let gap = (nodes[0].world_pos - nodes[1].world_pos).length();
        assert!(gap > 40.0, "bubbles stayed overlapped, gap {gap}");
    }

    #[test]
    fn centroid_is_recentered_on_the_focal_point() {
        let mut nodes = vec![node("a", 400.0, 120.0, 10.0), node("b", 420.0, 160.0, 10.0)];
        let mut scratch = scratch();

        step_simulation(&mut nodes, &mut scratch, 0.3, 1.0 / 60.0);

        let centroid = (nodes[0].world_pos + nodes[1].world_pos) * 0.5;
        assert!(centroid.length() < 0.01, "centroid {centroid:?}");
    }

    #[test]
    fn pinned_bubbles_do_not_move() {
        let mut nodes = vec![node("a", 0.0, 0.0, 30.0), node("b", 5.0, 0.0, 30.0)];
        nodes[0].pinned = Some(vec2(50.0, 60.0));
        let mut scratch = scratch();

        for _ in 0..30 {
            step_simulation(&mut nodes, &mut scratch, 1.0, 1.0 / 60.0);
        }

        assert_eq!(nodes[0].world_pos, vec2(50.0, 60.0));
        assert_eq!(nodes[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn alpha_decays_toward_its_simmer_target() {
        let mut alpha = 1.0;
        for _ in 0..2000 {
            alpha = advance_alpha(alpha);
        }
        assert!((alpha - 0.03).abs() < 0.005, "alpha {alpha}");
        assert!(restart_alpha(alpha) > alpha);
        assert_eq!(restart_alpha(0.9), 0.9);
    }

    #[test]
    fn an_empty_chart_reports_no_motion() {
        let mut scratch = scratch();
        assert!(!step_simulation(&mut [], &mut scratch, 1.0, 1.0 / 60.0));
    }
}
