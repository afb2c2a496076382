//! Game camera mode: follow view vs top-down city map.
//!
//! Projection math is engine territory; the orchestrator only tracks which
//! mode the player is in.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Third-person view tracking the player
    Follow,
    /// Fixed overhead city map
    TopDown,
}

#[derive(Debug, Clone)]
pub struct GameCamera {
    mode: CameraMode,
}

impl GameCamera {
    pub fn new() -> Self {
        Self {
            mode: CameraMode::Follow,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Flip between follow and map view, returning the new mode
    pub fn toggle(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::Follow => CameraMode::TopDown,
            CameraMode::TopDown => CameraMode::Follow,
        };
        self.mode
    }

    pub fn reset(&mut self) {
        self.mode = CameraMode::Follow;
    }
}

impl Default for GameCamera {
    fn default() -> Self {
        Self::new()
    }
}
