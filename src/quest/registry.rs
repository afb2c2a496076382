//! Quest Registry
//!
//! Loads and validates the ordered campaign content. The registry is immutable
//! for the lifetime of a session; per-session progression lives in the manager.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::definition::{QuestDefinition, QuestId, RawCampaignFile, Trigger};

/// Speaker name used for modals that have no caller attached
pub const DISPATCH_SPEAKER: &str = "Dispatch";

/// Ordered, validated quest content for one campaign
pub struct QuestRegistry {
    quests: Vec<Arc<QuestDefinition>>,
}

impl QuestRegistry {
    /// Build a registry from resolved definitions, enforcing unique ids
    pub fn new(quests: Vec<QuestDefinition>) -> Result<Self, String> {
        if quests.is_empty() {
            return Err("Campaign has no quests".to_string());
        }

        let mut seen: HashSet<QuestId> = HashSet::new();
        for quest in &quests {
            if !seen.insert(quest.id) {
                return Err(format!("Duplicate quest id {}", quest.id));
            }
            if quest.trigger == Trigger::Phonecall && quest.caller.is_none() {
                warn!("Quest {} ('{}') is phonecall-triggered but names no caller", quest.id, quest.title);
            }
        }

        Ok(Self {
            quests: quests.into_iter().map(Arc::new).collect(),
        })
    }

    /// Load a campaign from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let raw: RawCampaignFile = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        let quests = raw
            .quest
            .iter()
            .map(QuestDefinition::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Self::new(quests)?;
        info!("Loaded {} quests from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// The compiled-in campaign, used when no content file is supplied
    pub fn builtin() -> Self {
        let quests = vec![
            QuestDefinition {
                id: 1,
                title: "The Crown of Light".to_string(),
                riddle: "I wear a crown of light and warn the water's travelers, \
                         yet I have never moved an inch. Stand where I watch the waves."
                    .to_string(),
                success_message: "The old lighthouse. Its lamp went dark years ago, \
                                  but tonight something burns up there again."
                    .to_string(),
                trigger: Trigger::Direct,
                caller: None,
            },
            QuestDefinition {
                id: 2,
                title: "Twelve Iron Voices".to_string(),
                riddle: "Twelve iron voices count the day above the square, \
                         and none of them has ever told a lie. Meet me beneath them."
                    .to_string(),
                success_message: "Right on time. The clock tower keeps the city honest \
                                  -- and you keep your appointments."
                    .to_string(),
                trigger: Trigger::Phonecall,
                caller: Some("Mara Voss".to_string()),
            },
            QuestDefinition {
                id: 3,
                title: "Water That Climbs".to_string(),
                riddle: "In the market square, water climbs before it falls, \
                         and coins sleep at the bottom of its bed."
                    .to_string(),
                success_message: "The fountain. Throw a coin in for luck; \
                                  you will need it where you are going."
                    .to_string(),
                trigger: Trigger::Direct,
                caller: None,
            },
            QuestDefinition {
                id: 4,
                title: "A Thousand Silent Voices".to_string(),
                riddle: "A thousand voices live in my halls and not one of them speaks. \
                         Find the doors they sleep behind."
                    .to_string(),
                success_message: "The library. The Archivist left something for you \
                                  between the stacks."
                    .to_string(),
                trigger: Trigger::Phonecall,
                caller: Some("The Archivist".to_string()),
            },
            QuestDefinition {
                id: 5,
                title: "The Last Bell".to_string(),
                riddle: "Where the city ends and the ships begin, one bell rings \
                         for every soul that leaves. Ring it for yourself."
                    .to_string(),
                success_message: "The harbor bell. That is everything -- \
                                  the city has no more riddles for you tonight."
                    .to_string(),
                trigger: Trigger::Phonecall,
                caller: Some("Mara Voss".to_string()),
            },
        ];

        // Built-in content is validated at startup like any other campaign.
        Self::new(quests).expect("built-in campaign is valid")
    }

    /// Get a quest by id
    pub fn get(&self, quest_id: QuestId) -> Option<Arc<QuestDefinition>> {
        self.quests.iter().find(|q| q.id == quest_id).cloned()
    }

    /// Get a quest by registry position
    pub fn get_index(&self, index: usize) -> Option<Arc<QuestDefinition>> {
        self.quests.get(index).cloned()
    }

    /// All quests in progression order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<QuestDefinition>> {
        self.quests.iter()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}
