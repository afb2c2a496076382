//! UI message surface.
//!
//! The orchestrator never touches widgets. Inbound `UiEvent`s arrive from
//! whatever frontend is attached (button presses, modal close events) and
//! outbound `UiCommand`s tell it what to present. Both travel over unbounded
//! channels so the state machine can be tested without any renderer.

use serde::{Deserialize, Serialize};

use crate::quest::QuestId;

// ============================================================================
// Frontend -> Game Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    /// Info button: request the quest log
    #[serde(rename = "info")]
    InfoPressed,

    /// Map button: toggle follow view / top-down map
    #[serde(rename = "map")]
    MapTogglePressed,

    /// Riddle, success, or failure modal dismissed
    #[serde(rename = "instructionModalClose")]
    InstructionModalClosed,

    /// Phone prompt dismissed without answering
    #[serde(rename = "phoneModalClose")]
    PhoneModalClosed,

    /// Phone prompt answered
    #[serde(rename = "answerCall")]
    CallAnswered,
}

// ============================================================================
// Game -> Frontend Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum UiCommand {
    /// Present a modal with narration or riddle text
    #[serde(rename = "showInstructionModal")]
    ShowInstructionModal { speaker: String, text: String },

    /// Present the incoming-call prompt
    #[serde(rename = "showPhoneCallModal")]
    ShowPhoneCallModal { caller: String },

    #[serde(rename = "hidePhoneCallModal")]
    HidePhoneCallModal,

    /// Quest log for the info overlay
    #[serde(rename = "showQuestLog")]
    ShowQuestLog { entries: Vec<QuestLogEntry> },

    /// HUD distance to the objective; `None` is the "reached" sentinel
    #[serde(rename = "updateDistance")]
    UpdateDistance { distance: Option<f32> },

    /// HUD countdown for the active quest
    #[serde(rename = "updateTimer")]
    UpdateTimer { remaining_ms: u64 },
}

/// One row of the quest log overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestLogEntry {
    pub id: QuestId,
    pub title: String,
    pub status: &'static str,
}
