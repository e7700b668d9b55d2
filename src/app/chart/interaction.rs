use eframe::egui::{self, Color32, FontId, Painter, Rect, Stroke, Ui, vec2};

use super::super::render_utils::{screen_to_world, world_to_screen};
use super::super::{ViewModel, physics};
use super::build::lerp;

/// Minimum interval between tooltip position updates, in seconds.
const TOOLTIP_MOVE_INTERVAL: f64 = 0.3;
const TOOLTIP_OFFSET: f32 = 14.0;

impl ViewModel {
    /// The bubble under the pointer, preferring the one whose center is
    /// closest when several overlap. Hit-testing uses the currently
    /// displayed radius.
    pub(super) fn hovered_index(&self, ui: &Ui, rect: Rect, progress: f32) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let position = world_to_screen(rect, node.world_pos);
                let radius = lerp(node.radius_from, node.radius_to, progress);
                let distance = position.distance(pointer);
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }

    /// Primary drag pins the grabbed bubble to the pointer; the pin is
    /// released when the drag ends, letting the simulation reclaim it.
    pub(super) fn handle_drag(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.dragged = Some(self.nodes[index].tag.clone());
            self.nodes[index].pinned = Some(self.nodes[index].world_pos);
            self.tooltip.visible = false;
            self.alpha = physics::restart_alpha(self.alpha);
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(tag) = &self.dragged
            && let Some(&index) = self.index_by_tag.get(tag)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.nodes[index].pinned = Some(screen_to_world(rect, pointer));
        }

        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(tag) = self.dragged.take()
            && let Some(&index) = self.index_by_tag.get(&tag)
        {
            self.nodes[index].pinned = None;
        }
    }

    pub(super) fn update_tooltip(&mut self, ui: &Ui, now: f64, hovered: Option<usize>) {
        if self.dragged.is_some() {
            self.tooltip.visible = false;
            return;
        }

        let Some(index) = hovered else {
            self.tooltip.visible = false;
            return;
        };

        let node = &self.nodes[index];
        self.tooltip.text = format!("{}: {}", node.tag, node.score);

        if anchor_due_for_update(self.tooltip.visible, self.tooltip.last_move_at, now)
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            self.tooltip.anchor = pointer;
            self.tooltip.last_move_at = now;
        }

        self.tooltip.visible = true;
    }

    pub(super) fn draw_tooltip(&self, painter: &Painter) {
        if !self.tooltip.visible || self.tooltip.text.is_empty() {
            return;
        }

        let galley = painter.layout_no_wrap(
            self.tooltip.text.clone(),
            FontId::proportional(13.0),
            Color32::from_gray(235),
        );

        let padding = vec2(8.0, 5.0);
        let origin = self.tooltip.anchor + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET);
        let background = Rect::from_min_size(origin, galley.size() + (padding * 2.0));

        painter.rect_filled(background, 4.0, Color32::from_rgba_unmultiplied(12, 14, 18, 235));
        painter.rect_stroke(
            background,
            4.0,
            Stroke::new(1.0, Color32::from_gray(70)),
            egui::StrokeKind::Outside,
        );
        painter.galley(origin + padding, galley, Color32::from_gray(235));
    }
}

/// A fresh tooltip anchors immediately; a visible one only follows the
/// pointer once the throttle interval has elapsed.
fn anchor_due_for_update(visible: bool, last_move_at: f64, now: f64) -> bool {
    !visible || (now - last_move_at) >= TOOLTIP_MOVE_INTERVAL
}
