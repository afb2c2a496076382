//! Audio cue surface and the proximity loudness curve.
//!
//! Cues are fire-and-forget; the synthesis backend owns everything after the
//! channel. `fire_volume` is the contract for how the crackle of the target
//! fire swells as the player closes in.

use serde::Serialize;

/// Distance at or under which the fire burns at full volume
pub const FIRE_NEAR_DISTANCE: f32 = 2.0;
/// Distance at or beyond which the fire is inaudible
pub const FIRE_FAR_DISTANCE: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AudioCue {
    #[serde(rename = "playRingtone")]
    PlayRingtone,

    #[serde(rename = "stopRingtone")]
    StopRingtone,

    #[serde(rename = "playQuestComplete")]
    PlayQuestComplete,

    /// Continuous proximity feedback while a quest is in progress
    #[serde(rename = "updateFireVolume")]
    UpdateFireVolume { distance: f32 },
}

/// Map distance to a [0, 1] volume, logarithmically between the near and far
/// bounds so the swell is audible long before the fire is in sight.
pub fn fire_volume(distance: f32) -> f32 {
    if distance <= FIRE_NEAR_DISTANCE {
        return 1.0;
    }
    if distance >= FIRE_FAR_DISTANCE {
        return 0.0;
    }
    let span = (FIRE_FAR_DISTANCE / FIRE_NEAR_DISTANCE).ln();
    1.0 - (distance / FIRE_NEAR_DISTANCE).ln() / span
}

/// Headless cue sink standing in for the synthesis backend: tracks what a real
/// mixer would be doing so sessions can report and assert on it.
#[derive(Debug, Default)]
pub struct AudioState {
    ringtone_playing: bool,
    fire_volume: f32,
}

impl AudioState {
    pub fn apply(&mut self, cue: &AudioCue) {
        match cue {
            AudioCue::PlayRingtone => self.ringtone_playing = true,
            AudioCue::StopRingtone => self.ringtone_playing = false,
            AudioCue::PlayQuestComplete => {}
            AudioCue::UpdateFireVolume { distance } => self.fire_volume = fire_volume(*distance),
        }
    }

    pub fn ringtone_playing(&self) -> bool {
        self.ringtone_playing
    }

    pub fn fire_volume(&self) -> f32 {
        self.fire_volume
    }
}
