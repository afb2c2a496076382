//! City world surface: fire-point targets and map-view affordances.
//!
//! The world owns fire-effect lifecycle only as bookkeeping -- which quest's
//! fire is lit, and whether the map view is currently swapping fires for
//! teleport pads. Rendering the effects is the engine's job, not ours.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;
use tracing::{info, warn};

use crate::quest::{QuestId, QuestRegistry};

/// City map as it appears in JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RawCityMap {
    pub fire_points: Vec<RawFirePoint>,
    #[serde(default)]
    pub teleport_pads: Vec<RawPosition>,
    #[serde(default)]
    pub spawn: Option<RawPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFirePoint {
    pub quest_id: QuestId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RawPosition {
    fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Fire-point registry and map-view state for one city
pub struct World {
    fire_points: HashMap<QuestId, Vec3>,
    teleport_pads: Vec<Vec3>,
    spawn: Vec3,
    /// The quest whose fire effect is currently lit
    active_fire: Option<QuestId>,
    /// Map view swaps fire effects for teleport affordances
    map_view: bool,
}

impl World {
    pub fn new(fire_points: HashMap<QuestId, Vec3>, teleport_pads: Vec<Vec3>, spawn: Vec3) -> Self {
        Self {
            fire_points,
            teleport_pads,
            spawn,
            active_fire: None,
            map_view: false,
        }
    }

    /// Load a city map from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let raw: RawCityMap = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        let mut fire_points = HashMap::new();
        for point in &raw.fire_points {
            let position = Vec3::new(point.x, point.y, point.z);
            if fire_points.insert(point.quest_id, position).is_some() {
                return Err(format!("Duplicate fire point for quest {} in {:?}", point.quest_id, path));
            }
        }

        let teleport_pads = raw.teleport_pads.iter().map(RawPosition::to_vec3).collect();
        let spawn = raw.spawn.as_ref().map(RawPosition::to_vec3).unwrap_or(Vec3::ZERO);

        info!("Loaded city map from {:?}: {} fire points", path, fire_points.len());
        Ok(Self::new(fire_points, teleport_pads, spawn))
    }

    /// The built-in city, matching the built-in campaign's quest ids
    pub fn builtin() -> Self {
        let fire_points = HashMap::from([
            (1, Vec3::new(42.0, 6.0, -18.0)),  // lighthouse gallery
            (2, Vec3::new(-35.0, 0.0, 64.0)),  // clock tower base
            (3, Vec3::new(8.0, 0.0, 22.0)),    // market fountain
            (4, Vec3::new(-72.0, 0.0, -40.0)), // library steps
            (5, Vec3::new(96.0, 0.0, 30.0)),   // harbor bell
        ]);
        let teleport_pads = vec![
            Vec3::new(0.0, 0.0, -12.0),
            Vec3::new(-40.0, 0.0, 20.0),
            Vec3::new(60.0, 0.0, 10.0),
        ];
        Self::new(fire_points, teleport_pads, Vec3::ZERO)
    }

    /// Warn about campaign quests that have no target location in this map.
    /// Such quests can never complete; content gaps are surfaced at startup
    /// rather than silently mid-session.
    pub fn validate_campaign(&self, registry: &QuestRegistry) {
        for quest in registry.iter() {
            if !self.fire_points.contains_key(&quest.id) {
                warn!("Quest {} ('{}') has no fire point in the map", quest.id, quest.title);
            }
        }
    }

    /// Target location for a quest, if the map knows it
    pub fn fire_point_position(&self, quest_id: QuestId) -> Option<Vec3> {
        self.fire_points.get(&quest_id).copied()
    }

    /// Light one quest's fire, implicitly dousing all others
    pub fn show_fire_at_point(&mut self, quest_id: QuestId) {
        if !self.fire_points.contains_key(&quest_id) {
            warn!("No fire point for quest {}, leaving fires unchanged", quest_id);
            return;
        }
        self.active_fire = Some(quest_id);
    }

    pub fn hide_all_fires(&mut self) {
        self.active_fire = None;
    }

    /// The lit fire, or `None` while the map view suppresses fire effects
    pub fn visible_fire(&self) -> Option<QuestId> {
        if self.map_view {
            None
        } else {
            self.active_fire
        }
    }

    /// Toggle between fire effects (follow view) and teleport pads (map view)
    pub fn set_map_view(&mut self, map_view: bool) {
        self.map_view = map_view;
    }

    pub fn teleports_visible(&self) -> bool {
        self.map_view
    }

    pub fn teleport_pads(&self) -> &[Vec3] {
        &self.teleport_pads
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn
    }
}
