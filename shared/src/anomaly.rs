//! Proximity trigger around the manually placed anomaly.

use bevy::prelude::*;
use serde::Deserialize;

/// Vertical cylinder around the anomaly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AnomalyZone {
    pub center: Vec3,
    /// Horizontal radius.
    pub radius: f32,
    /// Maximum height difference from `center`.
    pub vertical_tolerance: f32,
}

impl AnomalyZone {
    pub fn contains(&self, position: Vec3) -> bool {
        let horizontal = Vec2::new(position.x, position.z).distance(Vec2::new(self.center.x, self.center.z));
        horizontal <= self.radius && (position.y - self.center.y).abs() <= self.vertical_tolerance
    }
}

/// Zone membership and the "look closer" hint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnomalyTracker {
    inside: bool,
    hint_visible: bool,
}

impl AnomalyTracker {
    /// Re-test membership. The hint stays hidden while the anomaly dialogue
    /// is on screen. Returns `true` when membership changed.
    pub fn update(&mut self, zone: Option<&AnomalyZone>, position: Vec3, dialogue_active: bool) -> bool {
        let inside = zone.is_some_and(|z| z.contains(position));
        let changed = inside != self.inside;
        self.inside = inside;
        self.hint_visible = inside && !dialogue_active;
        changed
    }

    pub fn inside(&self) -> bool {
        self.inside
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: AnomalyZone = AnomalyZone {
        center: Vec3::new(10.0, 1.6, 20.0),
        radius: 2.0,
        vertical_tolerance: 2.5,
    };

    #[test]
    fn test_zone_cylinder() {
        assert!(ZONE.contains(Vec3::new(11.5, 1.6, 20.0)));
        assert!(ZONE.contains(Vec3::new(10.0, 4.0, 21.0)));
        assert!(!ZONE.contains(Vec3::new(12.5, 1.6, 20.0)));
        assert!(!ZONE.contains(Vec3::new(10.0, 4.2, 20.0)));
    }

    #[test]
    fn test_hint_suppressed_by_dialogue() {
        let mut tracker = AnomalyTracker::default();
        assert!(tracker.update(Some(&ZONE), ZONE.center, false));
        assert!(tracker.hint_visible());

        assert!(!tracker.update(Some(&ZONE), ZONE.center, true));
        assert!(tracker.inside());
        assert!(!tracker.hint_visible());

        assert!(tracker.update(Some(&ZONE), Vec3::ZERO, false));
        assert!(!tracker.hint_visible());
    }

    #[test]
    fn test_no_zone_configured() {
        let mut tracker = AnomalyTracker::default();
        assert!(!tracker.update(None, Vec3::ZERO, false));
        assert!(!tracker.inside());
    }
}
