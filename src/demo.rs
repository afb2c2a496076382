//! Scripted session driver.
//!
//! The autopilot stands in for a human player: it answers phone calls,
//! dismisses modals after a fixed reaction delay, and walks the player
//! straight toward the active fire point. Deterministic, so the binary and the
//! end-to-end test replay identical sessions.

use crate::game::{Game, GameState};
use crate::ui::{UiCommand, UiEvent};

/// Ticks between seeing a modal and reacting to it
const REACTION_TICKS: u32 = 2;

pub struct Autopilot {
    /// Units the player covers per tick
    speed_per_tick: f32,
    /// Countdown-tagged events waiting to be dispatched
    scheduled: Vec<(u32, UiEvent)>,
}

impl Autopilot {
    pub fn new(speed_per_tick: f32) -> Self {
        Self {
            speed_per_tick,
            scheduled: Vec::new(),
        }
    }

    /// Watch an outbound command and queue the matching reaction
    pub fn observe(&mut self, command: &UiCommand) {
        match command {
            UiCommand::ShowPhoneCallModal { .. } => self.schedule(UiEvent::CallAnswered),
            UiCommand::ShowInstructionModal { .. } => self.schedule(UiEvent::InstructionModalClosed),
            _ => {}
        }
    }

    fn schedule(&mut self, event: UiEvent) {
        self.scheduled.push((REACTION_TICKS, event));
    }

    /// Advance reaction countdowns; returns the events due this tick
    pub fn poll(&mut self) -> Vec<UiEvent> {
        let mut due = Vec::new();
        self.scheduled.retain_mut(|(ticks, event)| {
            if *ticks == 0 {
                due.push(*event);
                false
            } else {
                *ticks -= 1;
                true
            }
        });
        due
    }

    /// Walk toward the active objective while a quest is in progress
    pub fn steer(&self, game: &mut Game) {
        if game.state() != GameState::Playing {
            return;
        }
        if let Some(target) = game.objective_position() {
            game.player_mut().step_towards(target, self.speed_per_tick);
        }
    }
}
