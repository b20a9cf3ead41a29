use eframe::egui::{Pos2, Rect, Vec2};

/// Translation and uniform scale applied to the whole scene.
///
/// The world origin sits at the viewport center when `pan` is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Camera {
    pub(crate) pan: Vec2,
    pub(crate) zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Camera {
    pub(crate) const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    pub(crate) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub(crate) fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Camera scaled by `factor` while the world point under `anchor` stays put.
    pub(crate) fn zoomed_about(
        &self,
        rect: Rect,
        anchor: Pos2,
        factor: f32,
        min_zoom: f32,
        max_zoom: f32,
    ) -> Self {
        let world_before = self.screen_to_world(rect, anchor);
        let zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        Self {
            pan: anchor - rect.center() - world_before * zoom,
            zoom,
        }
    }

    pub(crate) fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pan: self.pan + (other.pan - self.pan) * t,
            zoom: self.zoom + (other.zoom - self.zoom) * t,
        }
    }
}

pub(crate) fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Animated move between two cameras.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CameraTransition {
    from: Camera,
    to: Camera,
    started_at: f64,
    duration: f64,
}

impl CameraTransition {
    pub(crate) fn new(from: Camera, to: Camera, started_at: f64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            started_at,
            duration: duration_ms as f64 / 1000.0,
        }
    }

    pub(crate) fn target(&self) -> Camera {
        self.to
    }

    /// Camera at time `now`, and whether the transition has finished.
    pub(crate) fn sample(&self, now: f64) -> (Camera, bool) {
        if self.duration <= 0.0 {
            return (self.to, true);
        }
        let progress = ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32;
        if progress >= 1.0 {
            return (self.to, true);
        }
        (self.from.lerp(&self.to, ease_cubic_in_out(progress)), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn identity_maps_origin_to_viewport_center() {
        let camera = Camera::IDENTITY;
        assert_eq!(camera.world_to_screen(viewport(), Vec2::ZERO), pos2(400.0, 300.0));
        assert_eq!(camera.screen_to_world(viewport(), pos2(410.0, 290.0)), vec2(10.0, -10.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let camera = Camera {
            pan: vec2(30.0, -20.0),
            zoom: 1.5,
        };
        let anchor = pos2(120.0, 450.0);
        let before = camera.screen_to_world(viewport(), anchor);

        let zoomed = camera.zoomed_about(viewport(), anchor, 2.0, 0.1, 8.0);
        let after = zoomed.screen_to_world(viewport(), anchor);

        assert_eq!(zoomed.zoom, 3.0);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let camera = Camera::IDENTITY.zoomed_about(viewport(), pos2(0.0, 0.0), 100.0, 0.1, 8.0);
        assert_eq!(camera.zoom, 8.0);
        let camera = camera.zoomed_about(viewport(), pos2(0.0, 0.0), 0.0001, 0.1, 8.0);
        assert_eq!(camera.zoom, 0.1);
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn transition_reaches_target() {
        let target = Camera {
            pan: vec2(100.0, 0.0),
            zoom: 2.0,
        };
        let transition = CameraTransition::new(Camera::IDENTITY, target, 10.0, 250);

        let (start, done) = transition.sample(10.0);
        assert_eq!(start, Camera::IDENTITY);
        assert!(!done);

        let (middle, done) = transition.sample(10.125);
        assert!(!done);
        assert!((middle.zoom - 1.5).abs() < 1e-4);

        let (end, done) = transition.sample(10.3);
        assert_eq!(end, target);
        assert!(done);
    }
}
