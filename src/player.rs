//! Player character state: position, movement gate, map marker.

use glam::Vec3;

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    spawn: Vec3,
    /// Movement input is disabled while the map view is up
    movement_enabled: bool,
    /// The overhead marker shown in the map view
    marker_visible: bool,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            spawn,
            movement_enabled: true,
            marker_visible: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move up to `max_step` units toward `target`. Respects the movement gate.
    pub fn step_towards(&mut self, target: Vec3, max_step: f32) {
        if !self.movement_enabled {
            return;
        }
        let delta = target - self.position;
        let distance = delta.length();
        if distance <= max_step {
            self.position = target;
        } else {
            self.position += delta / distance * max_step;
        }
    }

    /// Back to spawn with movement restored (session restart)
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.movement_enabled = true;
        self.marker_visible = false;
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }

    pub fn marker_visible(&self) -> bool {
        self.marker_visible
    }

    pub fn set_marker_visible(&mut self, visible: bool) {
        self.marker_visible = visible;
    }
}
