//! Quest Definition Structures
//!
//! Immutable riddle content, deserialized from campaign TOML files or supplied
//! by the built-in campaign.

use serde::{Deserialize, Serialize};

/// Stable quest identifier. Doubles as the fire-point lookup key in the world.
pub type QuestId = u32;

/// A campaign file: ordered `[[quest]]` tables. File order is progression order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCampaignFile {
    pub quest: Vec<RawQuest>,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: QuestId,
    pub title: String,
    pub riddle: String,
    pub success_message: String,
    /// How the riddle is introduced; plain modal when absent
    #[serde(default)]
    pub trigger: Trigger,
    /// Display name for the phone-call prompt
    #[serde(default)]
    pub caller: Option<String>,
}

/// Presentation mode preceding a quest's riddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Riddle modal shown immediately
    #[default]
    Direct,
    /// Ringing phone must be dealt with before the riddle appears
    Phonecall,
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct QuestDefinition {
    pub id: QuestId,
    pub title: String,
    pub riddle: String,
    pub success_message: String,
    pub trigger: Trigger,
    pub caller: Option<String>,
}

impl QuestDefinition {
    /// Create a definition from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, String> {
        if raw.id == 0 {
            return Err(format!("Quest '{}' has id 0; ids must be positive", raw.title));
        }
        if raw.riddle.trim().is_empty() {
            return Err(format!("Quest {} ('{}') has an empty riddle", raw.id, raw.title));
        }
        if raw.success_message.trim().is_empty() {
            return Err(format!("Quest {} ('{}') has no success message", raw.id, raw.title));
        }

        Ok(Self {
            id: raw.id,
            title: raw.title.clone(),
            riddle: raw.riddle.clone(),
            success_message: raw.success_message.clone(),
            trigger: raw.trigger,
            caller: raw.caller.clone(),
        })
    }

    /// Whether this quest's intro starts with a ringing phone
    pub fn requires_call(&self) -> bool {
        self.trigger == Trigger::Phonecall
    }

    /// Name shown as the modal speaker: the caller when known, dispatch otherwise
    pub fn speaker(&self) -> &str {
        self.caller.as_deref().unwrap_or(super::registry::DISPATCH_SPEAKER)
    }
}
