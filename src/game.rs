//! Game orchestrator: the authoritative session state machine.
//!
//! One `Game` owns one session. Ticks drive the objective check and the
//! millisecond deadlines; frontend events arrive through a single dispatch
//! function. Side effects leave as `UiCommand`/`AudioCue` messages, so every
//! transition is observable without a renderer.

use std::sync::Arc;

use glam::Vec3;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audio::AudioCue;
use crate::camera::{CameraMode, GameCamera};
use crate::player::Player;
use crate::quest::{QuestId, QuestManager, QuestRegistry, DISPATCH_SPEAKER};
use crate::ui::{QuestLogEntry, UiCommand, UiEvent};
use crate::world::World;

// ============================================================================
// Constants
// ============================================================================

/// Delay before the first quest of a session is introduced
pub const QUEST_START_DELAY_MS: u64 = 3_000;

/// Countdown for each quest attempt
pub const QUEST_TIME_LIMIT_MS: u64 = 120_000;

/// Delay between the time-out prompt and the forced session restart
pub const RESTART_DELAY_MS: u64 = 4_000;

/// Linear distance within which an objective counts as reached
pub const COMPLETION_RADIUS: f32 = 5.0;

const TIMEOUT_TEXT: &str =
    "Too slow. The fire has gone out, and the city does not wait for stragglers. \
     We start over from the top.";

const OUTRO_TEXT: &str =
    "Every fire found, every riddle answered. The city sleeps easier tonight.";

// ============================================================================
// State
// ============================================================================

/// Top-level session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Between quests: startup, post-timeout, or campaign complete
    AwaitingQuest,
    /// A quest is being introduced (phone ring and/or riddle modal)
    ShowingInstructions,
    /// The player is hunting the objective; countdown running
    Playing,
    /// Objective reached; success modal up
    ShowingSuccess,
}

/// The quest currently being introduced, before the player starts pursuing it
#[derive(Debug, Clone, Copy)]
struct PendingQuest {
    quest_id: QuestId,
    /// Still in the ringing-phone sub-phase; the riddle is not on screen yet
    awaiting_call: bool,
}

pub struct Game {
    session_id: Uuid,
    state: GameState,
    quests: QuestManager,
    world: World,
    player: Player,
    camera: GameCamera,
    pending_quest: Option<PendingQuest>,

    // One-shot deadlines, epoch milliseconds. `None` means cancelled/idle.
    next_quest_at: Option<u64>,
    quest_deadline: Option<u64>,
    restart_at: Option<u64>,

    ui: mpsc::UnboundedSender<UiCommand>,
    audio: mpsc::UnboundedSender<AudioCue>,
}

impl Game {
    pub fn new(
        registry: Arc<QuestRegistry>,
        world: World,
        ui: mpsc::UnboundedSender<UiCommand>,
        audio: mpsc::UnboundedSender<AudioCue>,
    ) -> Self {
        let player = Player::new(world.spawn_position());
        Self {
            session_id: Uuid::new_v4(),
            state: GameState::AwaitingQuest,
            quests: QuestManager::new(registry),
            world,
            player,
            camera: GameCamera::new(),
            pending_quest: None,
            next_quest_at: None,
            quest_deadline: None,
            restart_at: None,
            ui,
            audio,
        }
    }

    /// Begin the session: schedule the first quest introduction
    pub fn start(&mut self, now_ms: u64) {
        info!("Session {} started ({} quests)", self.session_id, self.quests.quest_count());
        self.state = GameState::AwaitingQuest;
        self.next_quest_at = Some(now_ms + QUEST_START_DELAY_MS);
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// One step of the session loop. Deadlines fire here and nowhere else.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(at) = self.restart_at {
            if now_ms >= at {
                self.restart_session(now_ms);
                return;
            }
        }

        match self.state {
            GameState::AwaitingQuest => {
                if let Some(at) = self.next_quest_at {
                    if now_ms >= at {
                        self.next_quest_at = None;
                        if let Some(quest) = self.quests.next_pending() {
                            self.begin_intro(quest.id);
                        }
                    }
                }
            }
            GameState::Playing => {
                self.update_timer(now_ms);
                // The countdown may have ended the attempt this very tick
                if self.state == GameState::Playing {
                    self.update_quest_progress();
                }
            }
            GameState::ShowingInstructions | GameState::ShowingSuccess => {}
        }
    }

    fn update_timer(&mut self, now_ms: u64) {
        let Some(deadline) = self.quest_deadline else {
            return;
        };
        if now_ms >= deadline {
            self.quest_deadline = None;
            self.fail_timeout(now_ms);
        } else {
            self.send_ui(UiCommand::UpdateTimer {
                remaining_ms: deadline - now_ms,
            });
        }
    }

    /// Per-tick objective check. Suspended while movement is disabled (map
    /// view); lookup misses skip the tick rather than fail it.
    fn update_quest_progress(&mut self) {
        if !self.player.movement_enabled() {
            return;
        }
        let Some(quest) = self.quests.current() else {
            return;
        };
        let Some(target) = self.world.fire_point_position(quest.id) else {
            return;
        };

        let dist_sq = self.player.position().distance_squared(target);
        if dist_sq < COMPLETION_RADIUS * COMPLETION_RADIUS {
            self.complete_active_quest(quest.speaker().to_string(), quest.success_message.clone());
        } else {
            let distance = dist_sq.sqrt();
            self.send_ui(UiCommand::UpdateDistance {
                distance: Some(distance),
            });
            self.send_audio(AudioCue::UpdateFireVolume { distance });
        }
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Single entry point for frontend events.
    pub fn handle_event(&mut self, event: UiEvent, now_ms: u64) {
        match event {
            UiEvent::InfoPressed => self.show_quest_log(),
            UiEvent::MapTogglePressed => self.toggle_map_view(),
            UiEvent::CallAnswered | UiEvent::PhoneModalClosed => {
                // Either path reveals the riddle; it is never skippable
                if self.state == GameState::ShowingInstructions {
                    self.reveal_riddle();
                }
            }
            UiEvent::InstructionModalClosed => match self.state {
                GameState::ShowingInstructions => {
                    // Ignored while the phone is still ringing: the riddle
                    // modal is not on screen yet
                    if self.pending_quest.is_some_and(|p| !p.awaiting_call) {
                        self.start_playing(now_ms);
                    }
                }
                GameState::ShowingSuccess => self.advance_after_success(),
                GameState::AwaitingQuest | GameState::Playing => {
                    debug!("Ignoring modal close in {:?}", self.state);
                }
            },
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn begin_intro(&mut self, quest_id: QuestId) {
        let Some((quest, _)) = self.quests.get(quest_id) else {
            return;
        };
        info!("Introducing quest {} ('{}')", quest.id, quest.title);

        self.state = GameState::ShowingInstructions;
        self.pending_quest = Some(PendingQuest {
            quest_id: quest.id,
            awaiting_call: quest.requires_call(),
        });

        if quest.requires_call() {
            self.send_audio(AudioCue::PlayRingtone);
            self.send_ui(UiCommand::ShowPhoneCallModal {
                caller: quest.speaker().to_string(),
            });
        } else {
            self.send_ui(UiCommand::ShowInstructionModal {
                speaker: quest.speaker().to_string(),
                text: quest.riddle.clone(),
            });
        }
    }

    fn reveal_riddle(&mut self) {
        let Some(pending) = self.pending_quest.as_mut() else {
            return;
        };
        if !pending.awaiting_call {
            return;
        }
        pending.awaiting_call = false;

        let quest_id = pending.quest_id;
        let Some((quest, _)) = self.quests.get(quest_id) else {
            return;
        };

        self.send_audio(AudioCue::StopRingtone);
        self.send_ui(UiCommand::HidePhoneCallModal);
        self.send_ui(UiCommand::ShowInstructionModal {
            speaker: quest.speaker().to_string(),
            text: quest.riddle.clone(),
        });
    }

    fn start_playing(&mut self, now_ms: u64) {
        let Some(pending) = self.pending_quest.take() else {
            return;
        };

        self.quests.activate(pending.quest_id);
        self.world.show_fire_at_point(pending.quest_id);
        self.quest_deadline = Some(now_ms + QUEST_TIME_LIMIT_MS);
        self.state = GameState::Playing;

        self.send_ui(UiCommand::UpdateTimer {
            remaining_ms: QUEST_TIME_LIMIT_MS,
        });
        info!("Quest {} active, countdown running", pending.quest_id);
    }

    fn complete_active_quest(&mut self, speaker: String, success_message: String) {
        // Cancel the countdown before anything else: a stale deadline must
        // never fire against the success screen or the next quest.
        self.quest_deadline = None;
        self.state = GameState::ShowingSuccess;

        self.send_audio(AudioCue::PlayQuestComplete);
        self.send_ui(UiCommand::UpdateDistance { distance: None });
        self.send_ui(UiCommand::ShowInstructionModal {
            speaker,
            text: success_message,
        });
        info!("Objective reached");
    }

    fn advance_after_success(&mut self) {
        match self.quests.complete_current_and_next() {
            Some(next) => self.begin_intro(next.id),
            None => {
                info!(
                    "Campaign complete: {}/{} quests",
                    self.quests.completed_count(),
                    self.quests.quest_count()
                );
                self.world.hide_all_fires();
                self.state = GameState::AwaitingQuest;
                self.send_ui(UiCommand::UpdateDistance { distance: None });
                self.send_ui(UiCommand::ShowInstructionModal {
                    speaker: DISPATCH_SPEAKER.to_string(),
                    text: OUTRO_TEXT.to_string(),
                });
            }
        }
    }

    fn fail_timeout(&mut self, now_ms: u64) {
        info!("Quest timed out; session restart pending");

        self.state = GameState::AwaitingQuest;
        self.pending_quest = None;
        self.next_quest_at = None;
        self.restart_at = Some(now_ms + RESTART_DELAY_MS);
        self.world.hide_all_fires();

        self.send_ui(UiCommand::UpdateDistance { distance: None });
        self.send_ui(UiCommand::ShowInstructionModal {
            speaker: DISPATCH_SPEAKER.to_string(),
            text: TIMEOUT_TEXT.to_string(),
        });
    }

    /// Hard reset after a timed-out attempt: fresh progression from the
    /// registry template, player back at spawn, follow view restored.
    fn restart_session(&mut self, now_ms: u64) {
        info!("Session {} restarting", self.session_id);

        self.quests.reset();
        self.player.respawn();
        self.camera.reset();
        self.world.set_map_view(false);
        self.world.hide_all_fires();

        self.pending_quest = None;
        self.quest_deadline = None;
        self.restart_at = None;
        self.state = GameState::AwaitingQuest;
        self.next_quest_at = Some(now_ms + QUEST_START_DELAY_MS);
    }

    // ========================================================================
    // Parallel mode: map view
    // ========================================================================

    /// Orthogonal to quest state: flips the camera, gates movement, swaps fire
    /// effects for teleport pads. Objective checks stay suspended while the
    /// map is up so the pause cannot be penalized.
    fn toggle_map_view(&mut self) {
        let mode = self.camera.toggle();
        let map_up = mode == CameraMode::TopDown;

        self.player.set_movement_enabled(!map_up);
        self.player.set_marker_visible(map_up);
        self.world.set_map_view(map_up);
        debug!("Map view {}", if map_up { "opened" } else { "closed" });
    }

    fn show_quest_log(&mut self) {
        let entries = self
            .quests
            .all()
            .map(|(quest, progress)| QuestLogEntry {
                id: quest.id,
                title: quest.title.clone(),
                status: progress.status.as_str(),
            })
            .collect();
        self.send_ui(UiCommand::ShowQuestLog { entries });
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Target position of the quest being pursued, if any
    pub fn objective_position(&self) -> Option<Vec3> {
        let quest = self.quests.current()?;
        self.world.fire_point_position(quest.id)
    }

    /// True once every quest is completed and the session has wound down
    pub fn is_session_complete(&self) -> bool {
        self.state == GameState::AwaitingQuest && self.quests.is_campaign_complete()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn camera(&self) -> &GameCamera {
        &self.camera
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn quests(&self) -> &QuestManager {
        &self.quests
    }

    // Channel sends are fire-and-forget: a detached frontend drops commands,
    // the state machine stays consistent.
    fn send_ui(&self, command: UiCommand) {
        let _ = self.ui.send(command);
    }

    fn send_audio(&self, cue: AudioCue) {
        let _ = self.audio.send(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::{QuestDefinition, Trigger};
    use std::collections::HashMap;
    use tokio::sync::mpsc::UnboundedReceiver;

    const T0: u64 = 1_000_000;

    struct Harness {
        game: Game,
        ui_rx: UnboundedReceiver<UiCommand>,
        audio_rx: UnboundedReceiver<AudioCue>,
    }

    fn quest(id: QuestId, trigger: Trigger, caller: Option<&str>) -> QuestDefinition {
        QuestDefinition {
            id,
            title: format!("Quest {}", id),
            riddle: format!("Riddle {}", id),
            success_message: format!("Success {}", id),
            trigger,
            caller: caller.map(str::to_string),
        }
    }

    fn harness(quests: Vec<QuestDefinition>, fire_points: HashMap<QuestId, Vec3>) -> Harness {
        let registry = Arc::new(QuestRegistry::new(quests).unwrap());
        let world = World::new(fire_points, Vec::new(), Vec3::ZERO);
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (audio_tx, audio_rx) = mpsc::unbounded_channel();
        Harness {
            game: Game::new(registry, world, ui_tx, audio_tx),
            ui_rx,
            audio_rx,
        }
    }

    fn two_direct_quests() -> Harness {
        harness(
            vec![
                quest(1, Trigger::Direct, None),
                quest(2, Trigger::Direct, None),
            ],
            HashMap::from([
                (1, Vec3::new(30.0, 0.0, 0.0)),
                (2, Vec3::new(0.0, 0.0, 40.0)),
            ]),
        )
    }

    fn drain_ui(h: &mut Harness) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = h.ui_rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn drain_audio(h: &mut Harness) -> Vec<AudioCue> {
        let mut cues = Vec::new();
        while let Ok(cue) = h.audio_rx.try_recv() {
            cues.push(cue);
        }
        cues
    }

    fn has_modal_with(commands: &[UiCommand], needle: &str) -> bool {
        commands.iter().any(|c| {
            matches!(c, UiCommand::ShowInstructionModal { text, .. } if text.contains(needle))
        })
    }

    /// Drive a fresh session to the point where quest 1 is active and playing
    fn into_playing(h: &mut Harness, now: u64) {
        h.game.start(now);
        h.game.tick(now + QUEST_START_DELAY_MS);
        h.game.handle_event(UiEvent::InstructionModalClosed, now + QUEST_START_DELAY_MS);
        assert_eq!(h.game.state(), GameState::Playing);
    }

    #[test]
    fn test_intro_waits_for_start_delay() {
        let mut h = two_direct_quests();
        h.game.start(T0);
        assert_eq!(h.game.state(), GameState::AwaitingQuest);

        h.game.tick(T0 + QUEST_START_DELAY_MS - 1);
        assert_eq!(h.game.state(), GameState::AwaitingQuest);

        h.game.tick(T0 + QUEST_START_DELAY_MS);
        assert_eq!(h.game.state(), GameState::ShowingInstructions);
        assert!(has_modal_with(&drain_ui(&mut h), "Riddle 1"));
    }

    #[test]
    fn test_full_two_quest_walkthrough() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        assert_eq!(h.game.quests().current().unwrap().id, 1);
        assert_eq!(h.game.world().visible_fire(), Some(1));
        drain_ui(&mut h);

        // Walk onto quest 1's fire point
        h.game.player_mut().set_position(Vec3::new(30.0, 0.0, 0.0));
        h.game.tick(T0 + 10_000);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
        let commands = drain_ui(&mut h);
        assert!(has_modal_with(&commands, "Success 1"));
        assert!(commands.contains(&UiCommand::UpdateDistance { distance: None }));
        assert!(drain_audio(&mut h).contains(&AudioCue::PlayQuestComplete));

        // Dismiss success: quest 2 introduced immediately
        h.game.handle_event(UiEvent::InstructionModalClosed, T0 + 11_000);
        assert_eq!(h.game.state(), GameState::ShowingInstructions);
        assert!(has_modal_with(&drain_ui(&mut h), "Riddle 2"));

        h.game.handle_event(UiEvent::InstructionModalClosed, T0 + 12_000);
        assert_eq!(h.game.state(), GameState::Playing);
        assert_eq!(h.game.quests().current().unwrap().id, 2);
        assert_eq!(h.game.world().visible_fire(), Some(2));

        // Reach quest 2 and dismiss: terminal
        h.game.player_mut().set_position(Vec3::new(0.0, 0.0, 40.0));
        h.game.tick(T0 + 20_000);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
        h.game.handle_event(UiEvent::InstructionModalClosed, T0 + 21_000);

        assert_eq!(h.game.state(), GameState::AwaitingQuest);
        assert!(h.game.is_session_complete());
        assert!(h.game.quests().current().is_none());
        assert_eq!(h.game.world().visible_fire(), None);
        assert!(has_modal_with(&drain_ui(&mut h), "Every fire found"));

        // Nothing further is scheduled
        h.game.tick(T0 + 60_000);
        assert_eq!(h.game.state(), GameState::AwaitingQuest);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);

        // Exactly on the radius: squared distance == threshold squared
        h.game
            .player_mut()
            .set_position(Vec3::new(30.0 - COMPLETION_RADIUS, 0.0, 0.0));
        h.game.tick(T0 + 5_000);
        assert_eq!(h.game.state(), GameState::Playing);

        // A hair inside completes
        h.game
            .player_mut()
            .set_position(Vec3::new(30.0 - COMPLETION_RADIUS + 0.01, 0.0, 0.0));
        h.game.tick(T0 + 5_050);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
    }

    #[test]
    fn test_hud_distance_and_fire_volume_while_playing() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        drain_ui(&mut h);
        drain_audio(&mut h);

        h.game.player_mut().set_position(Vec3::new(10.0, 0.0, 0.0));
        h.game.tick(T0 + 5_000);

        let commands = drain_ui(&mut h);
        assert!(commands.iter().any(|c| matches!(
            c,
            UiCommand::UpdateDistance { distance: Some(d) } if (*d - 20.0).abs() < 1e-4
        )));
        assert!(commands
            .iter()
            .any(|c| matches!(c, UiCommand::UpdateTimer { remaining_ms } if *remaining_ms < QUEST_TIME_LIMIT_MS)));
        assert!(drain_audio(&mut h).iter().any(|c| matches!(
            c,
            AudioCue::UpdateFireVolume { distance } if (*distance - 20.0).abs() < 1e-4
        )));
    }

    #[test]
    fn test_phonecall_prompt_precedes_riddle() {
        let mut h = harness(
            vec![quest(1, Trigger::Phonecall, Some("Mara Voss"))],
            HashMap::from([(1, Vec3::new(10.0, 0.0, 0.0))]),
        );
        h.game.start(T0);
        h.game.tick(T0 + QUEST_START_DELAY_MS);

        let commands = drain_ui(&mut h);
        assert!(commands
            .iter()
            .any(|c| matches!(c, UiCommand::ShowPhoneCallModal { caller } if caller == "Mara Voss")));
        assert!(!has_modal_with(&commands, "Riddle 1"));
        assert!(drain_audio(&mut h).contains(&AudioCue::PlayRingtone));

        // Closing the riddle modal now is meaningless: the phone is ringing
        h.game.handle_event(UiEvent::InstructionModalClosed, T0 + 4_000);
        assert_eq!(h.game.state(), GameState::ShowingInstructions);
        assert!(h.game.quests().current().is_none());

        // Answering reveals the riddle and stops the ring
        h.game.handle_event(UiEvent::CallAnswered, T0 + 5_000);
        let commands = drain_ui(&mut h);
        assert!(commands.contains(&UiCommand::HidePhoneCallModal));
        assert!(has_modal_with(&commands, "Riddle 1"));
        assert!(drain_audio(&mut h).contains(&AudioCue::StopRingtone));

        h.game.handle_event(UiEvent::InstructionModalClosed, T0 + 6_000);
        assert_eq!(h.game.state(), GameState::Playing);
    }

    #[test]
    fn test_dismissed_phone_prompt_still_reveals_riddle() {
        let mut h = harness(
            vec![quest(1, Trigger::Phonecall, Some("Mara Voss"))],
            HashMap::from([(1, Vec3::new(10.0, 0.0, 0.0))]),
        );
        h.game.start(T0);
        h.game.tick(T0 + QUEST_START_DELAY_MS);
        drain_ui(&mut h);
        drain_audio(&mut h);

        h.game.handle_event(UiEvent::PhoneModalClosed, T0 + 5_000);
        assert!(has_modal_with(&drain_ui(&mut h), "Riddle 1"));
        assert!(drain_audio(&mut h).contains(&AudioCue::StopRingtone));

        // The fall-through only happens once
        h.game.handle_event(UiEvent::PhoneModalClosed, T0 + 5_100);
        assert!(drain_ui(&mut h).is_empty());
    }

    #[test]
    fn test_timeout_is_terminal_for_the_attempt() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        let start = T0 + QUEST_START_DELAY_MS;
        drain_ui(&mut h);

        h.game.tick(start + QUEST_TIME_LIMIT_MS);
        assert_eq!(h.game.state(), GameState::AwaitingQuest);
        assert!(has_modal_with(&drain_ui(&mut h), "Too slow"));
        assert_eq!(h.game.world().visible_fire(), None);

        // Standing on the target afterwards must not complete anything
        h.game.player_mut().set_position(Vec3::new(30.0, 0.0, 0.0));
        h.game.tick(start + QUEST_TIME_LIMIT_MS + 1_000);
        assert_ne!(h.game.state(), GameState::ShowingSuccess);
        assert_eq!(h.game.quests().completed_count(), 0);
    }

    #[test]
    fn test_timeout_forces_full_session_restart() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        let start = T0 + QUEST_START_DELAY_MS;
        h.game.player_mut().set_position(Vec3::new(99.0, 0.0, 99.0));

        let expiry = start + QUEST_TIME_LIMIT_MS;
        h.game.tick(expiry);
        drain_ui(&mut h);

        // Restart fires after the delay, progression rebuilt from scratch
        h.game.tick(expiry + RESTART_DELAY_MS);
        assert_eq!(h.game.state(), GameState::AwaitingQuest);
        assert_eq!(h.game.quests().completed_count(), 0);
        assert_eq!(h.game.player().position(), Vec3::ZERO);
        assert_eq!(h.game.camera().mode(), CameraMode::Follow);

        // And the first quest is introduced again after the start delay
        h.game.tick(expiry + RESTART_DELAY_MS + QUEST_START_DELAY_MS);
        assert_eq!(h.game.state(), GameState::ShowingInstructions);
        assert!(has_modal_with(&drain_ui(&mut h), "Riddle 1"));
    }

    #[test]
    fn test_stale_deadline_never_fires_after_success() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        let start = T0 + QUEST_START_DELAY_MS;

        // Succeed with one millisecond to spare
        h.game.player_mut().set_position(Vec3::new(30.0, 0.0, 0.0));
        h.game.tick(start + QUEST_TIME_LIMIT_MS - 1);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
        drain_ui(&mut h);

        // Ticks past the old deadline must not raise the timeout
        h.game.tick(start + QUEST_TIME_LIMIT_MS + 10_000);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
        assert!(!has_modal_with(&drain_ui(&mut h), "Too slow"));
    }

    #[test]
    fn test_map_view_suspends_objective_checks() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);

        h.game.handle_event(UiEvent::MapTogglePressed, T0 + 5_000);
        assert_eq!(h.game.camera().mode(), CameraMode::TopDown);
        assert!(!h.game.player().movement_enabled());
        assert!(h.game.player().marker_visible());
        assert!(h.game.world().teleports_visible());
        assert_eq!(h.game.world().visible_fire(), None);

        // In range, but the map is up: no completion
        h.game.player_mut().set_position(Vec3::new(30.0, 0.0, 0.0));
        h.game.tick(T0 + 6_000);
        assert_eq!(h.game.state(), GameState::Playing);

        // Back to follow view: the suspended check completes
        h.game.handle_event(UiEvent::MapTogglePressed, T0 + 7_000);
        assert_eq!(h.game.world().visible_fire(), Some(1));
        h.game.tick(T0 + 7_050);
        assert_eq!(h.game.state(), GameState::ShowingSuccess);
    }

    #[test]
    fn test_map_toggle_leaves_quest_progression_alone() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);

        h.game.handle_event(UiEvent::MapTogglePressed, T0 + 5_000);
        h.game.handle_event(UiEvent::MapTogglePressed, T0 + 6_000);
        assert_eq!(h.game.state(), GameState::Playing);
        assert_eq!(h.game.quests().current().unwrap().id, 1);
        assert!(h.game.player().movement_enabled());
    }

    #[test]
    fn test_quest_log_reflects_progression() {
        let mut h = two_direct_quests();
        into_playing(&mut h, T0);
        drain_ui(&mut h);

        h.game.handle_event(UiEvent::InfoPressed, T0 + 5_000);
        let commands = drain_ui(&mut h);
        let Some(UiCommand::ShowQuestLog { entries }) = commands.last() else {
            panic!("expected a quest log");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, "active");
        assert_eq!(entries[1].status, "locked");
    }

    #[test]
    fn test_missing_fire_point_skips_the_tick() {
        // The active quest has no fire point in this map
        let mut h = harness(
            vec![quest(1, Trigger::Direct, None)],
            HashMap::new(),
        );
        into_playing(&mut h, T0);
        drain_ui(&mut h);

        h.game.tick(T0 + 5_000);
        assert_eq!(h.game.state(), GameState::Playing);
        // No distance HUD update without a target; the timer still runs
        let commands = drain_ui(&mut h);
        assert!(!commands.iter().any(|c| matches!(c, UiCommand::UpdateDistance { .. })));
        assert!(commands.iter().any(|c| matches!(c, UiCommand::UpdateTimer { .. })));
    }
}
