use foundation::ids::FaceId;

/// Angle between adjacent faces of the prism.
pub const FACE_ANGLE_DEG: f64 = 120.0;

/// Signed delta in `[-180, 180)` taking `current` to an angle equivalent to
/// `target` the short way round.
pub fn shortest_delta(current_deg: f64, target_deg: f64) -> f64 {
    ((target_deg - current_deg).rem_euclid(360.0) + 540.0).rem_euclid(360.0) - 180.0
}

/// Prism angle at which `face` faces the viewer.
pub fn face_angle(face: FaceId) -> f64 {
    -(face.index() as f64) * FACE_ANGLE_DEG
}

/// Desktop panel order: left neighbour, focused face, right neighbour.
pub fn panel_order(focused: FaceId) -> [FaceId; 3] {
    [focused.prev(), focused, focused.next()]
}

/// Cumulative prism rotation. Never normalized, so consecutive rotations
/// always animate along the short path.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PrismRotation {
    degrees: f64,
}

impl PrismRotation {
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Turns to `face`; returns the new cumulative angle.
    pub fn rotate_to(&mut self, face: FaceId) -> f64 {
        self.degrees += shortest_delta(self.degrees, face_angle(face));
        self.degrees
    }

    /// Angle to show while a finger drags `dx_px` across a face `face_width_px`
    /// wide; not committed.
    pub fn drag_preview(&self, dx_px: f64, face_width_px: f64) -> f64 {
        if face_width_px <= 0.0 {
            return self.degrees;
        }
        self.degrees + dx_px * FACE_ANGLE_DEG / face_width_px
    }
}

#[cfg(test)]
mod tests {
    use super::{PrismRotation, face_angle, panel_order, shortest_delta};
    use foundation::ids::FaceId;

    #[test]
    fn delta_is_short_and_lands_on_target() {
        for current in [-1080.0, -725.0, -240.0, -1.0, 0.0, 30.0, 359.0, 721.5] {
            for face in FaceId::ALL {
                let target = face_angle(face);
                let d = shortest_delta(current, target);
                assert!(d.abs() <= 180.0, "delta {d} from {current}");
                let landed = (current + d - target).rem_euclid(360.0);
                assert!(landed < 1e-9 || (360.0 - landed) < 1e-9);
            }
        }
    }

    #[test]
    fn repeated_rotation_never_drifts() {
        let mut r = PrismRotation::default();
        let mut face = FaceId::Events;
        r.rotate_to(face);
        for _ in 0..50 {
            face = face.next();
            let before = r.degrees();
            r.rotate_to(face);
            assert_eq!(r.degrees() - before, -120.0);
        }
        // One face step per call, never the long way round.
        assert_eq!(r.degrees(), -120.0 * 51.0);

        let at = r.degrees();
        r.rotate_to(face);
        assert_eq!(r.degrees(), at);
    }

    #[test]
    fn rotating_back_and_forth_returns_home() {
        let mut r = PrismRotation::default();
        r.rotate_to(FaceId::Events);
        r.rotate_to(FaceId::Timeline);
        r.rotate_to(FaceId::Events);
        r.rotate_to(FaceId::Comparison);
        r.rotate_to(FaceId::Events);
        assert_eq!(r.degrees(), -120.0);
    }

    #[test]
    fn panel_order_wraps() {
        assert_eq!(
            panel_order(FaceId::Comparison),
            [FaceId::Timeline, FaceId::Comparison, FaceId::Events]
        );
        assert_eq!(
            panel_order(FaceId::Events),
            [FaceId::Comparison, FaceId::Events, FaceId::Timeline]
        );
    }

    #[test]
    fn drag_preview_maps_face_width_to_face_angle() {
        let r = PrismRotation::default();
        assert_eq!(r.drag_preview(-360.0, 360.0), -120.0);
        assert_eq!(r.drag_preview(90.0, 360.0), 30.0);
        assert_eq!(r.drag_preview(90.0, 0.0), 0.0);
    }
}
