use eframe::egui::{Color32, Pos2, Rect, Vec2};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Chart coordinates are centered on the chart rect; the simulation's focal
/// point is the world origin.
pub(super) fn world_to_screen(rect: Rect, world: Vec2) -> Pos2 {
    rect.center() + world
}

pub(super) fn screen_to_world(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.center()
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn world_origin_is_the_rect_center() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(1100.0, 540.0));
        assert_eq!(world_to_screen(rect, Vec2::ZERO), rect.center());
        assert_eq!(screen_to_world(rect, rect.center()), Vec2::ZERO);
    }

    #[test]
    fn screen_and_world_round_trip() {
        let rect = Rect::from_min_size(pos2(30.0, 40.0), vec2(800.0, 600.0));
        let world = vec2(-120.0, 75.0);
        assert_eq!(screen_to_world(rect, world_to_screen(rect, world)), world);
    }

    #[test]
    fn blend_color_endpoints_return_the_inputs() {
        let low = Color32::from_rgb(34, 131, 187);
        let high = Color32::from_rgb(216, 31, 28);
        assert_eq!(blend_color(low, high, 0.0), low);
        assert_eq!(blend_color(low, high, 1.0), high);
    }

    #[test]
    fn offscreen_circles_are_culled() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(50.0, 50.0), 10.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-50.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(50.0, 200.0), 10.0));
    }
}
