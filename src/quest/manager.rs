//! Quest Progression State
//!
//! Per-session progression bookkeeping over the immutable registry. Statuses
//! always form a completed prefix, at most one active quest, then a locked
//! suffix, in registry order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::definition::{QuestDefinition, QuestId};
use super::registry::QuestRegistry;

/// Status of a quest within the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    /// Not yet reachable in the progression
    Locked,
    /// The quest the player is currently pursuing
    Active,
    /// Objective reached
    Completed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Locked => "locked",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        }
    }
}

/// Mutable progression state for a single quest
#[derive(Debug, Clone, Serialize)]
pub struct QuestProgress {
    pub quest_id: QuestId,
    pub status: QuestStatus,
    /// When the quest became active
    pub started_at: Option<DateTime<Utc>>,
    /// When the objective was reached
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuestProgress {
    fn new(quest_id: QuestId) -> Self {
        Self {
            quest_id,
            status: QuestStatus::Locked,
            started_at: None,
            completed_at: None,
        }
    }

    /// Time spent on the quest so far, in seconds
    pub fn duration_secs(&self) -> Option<i64> {
        self.started_at.map(|start| {
            let end = self.completed_at.unwrap_or_else(Utc::now);
            (end - start).num_seconds()
        })
    }
}

/// Sequential quest progression over a shared registry.
///
/// All quests start locked; activation is driven by the orchestrator when the
/// player dismisses a quest's instructions. Lookup failures return `None` and
/// invalid transitions are ignored, never raised.
pub struct QuestManager {
    registry: Arc<QuestRegistry>,
    progress: Vec<QuestProgress>,
}

impl QuestManager {
    pub fn new(registry: Arc<QuestRegistry>) -> Self {
        let progress = registry.iter().map(|q| QuestProgress::new(q.id)).collect();
        Self { registry, progress }
    }

    /// Discard all progression and rebuild from the registry template
    pub fn reset(&mut self) {
        self.progress = self.registry.iter().map(|q| QuestProgress::new(q.id)).collect();
    }

    /// All quests with their progression, in registry order
    pub fn all(&self) -> impl Iterator<Item = (Arc<QuestDefinition>, &QuestProgress)> {
        self.registry.iter().cloned().zip(self.progress.iter())
    }

    /// Look up one quest and its progression by id
    pub fn get(&self, quest_id: QuestId) -> Option<(Arc<QuestDefinition>, &QuestProgress)> {
        let progress = self.progress.iter().find(|p| p.quest_id == quest_id)?;
        let definition = self.registry.get(quest_id)?;
        Some((definition, progress))
    }

    /// The quest the player is currently pursuing, if any
    pub fn current(&self) -> Option<Arc<QuestDefinition>> {
        let index = self.active_index()?;
        self.registry.get_index(index)
    }

    /// The first locked quest, when nothing is active -- the next one to introduce
    pub fn next_pending(&self) -> Option<Arc<QuestDefinition>> {
        if self.active_index().is_some() {
            return None;
        }
        let index = self
            .progress
            .iter()
            .position(|p| p.status == QuestStatus::Locked)?;
        self.registry.get_index(index)
    }

    /// Transition a quest from locked to active.
    ///
    /// A no-op when the quest is not locked (duplicate UI events) or when
    /// earlier quests are still open (out-of-order activation).
    pub fn activate(&mut self, quest_id: QuestId) {
        let Some(index) = self.progress.iter().position(|p| p.quest_id == quest_id) else {
            warn!("Cannot activate unknown quest {}", quest_id);
            return;
        };

        if self.progress[index].status != QuestStatus::Locked {
            debug!("Ignoring activation of quest {}: already {}", quest_id, self.progress[index].status.as_str());
            return;
        }
        if self.active_index().is_some() {
            warn!("Ignoring activation of quest {}: another quest is active", quest_id);
            return;
        }
        if self.progress[..index].iter().any(|p| p.status != QuestStatus::Completed) {
            warn!("Ignoring out-of-order activation of quest {}", quest_id);
            return;
        }

        let row = &mut self.progress[index];
        row.status = QuestStatus::Active;
        row.started_at = Some(Utc::now());
    }

    /// Complete the active quest and return the next definition in registry
    /// order, or `None` when the campaign is exhausted (or nothing was active).
    pub fn complete_current_and_next(&mut self) -> Option<Arc<QuestDefinition>> {
        let index = self.active_index()?;

        let row = &mut self.progress[index];
        row.status = QuestStatus::Completed;
        row.completed_at = Some(Utc::now());

        self.registry.get_index(index + 1)
    }

    /// Number of completed quests this session
    pub fn completed_count(&self) -> usize {
        self.progress
            .iter()
            .filter(|p| p.status == QuestStatus::Completed)
            .count()
    }

    /// Whether every quest in the campaign has been completed
    pub fn is_campaign_complete(&self) -> bool {
        self.progress.iter().all(|p| p.status == QuestStatus::Completed)
    }

    pub fn quest_count(&self) -> usize {
        self.progress.len()
    }

    fn active_index(&self) -> Option<usize> {
        self.progress.iter().position(|p| p.status == QuestStatus::Active)
    }
}
