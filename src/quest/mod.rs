//! Quest System Module
//!
//! Immutable campaign content (TOML or built-in) plus per-session sequential
//! progression. The orchestrator in `game` drives all transitions.

pub mod definition;
pub mod manager;
pub mod registry;

pub use definition::{QuestDefinition, QuestId, Trigger};
pub use manager::{QuestManager, QuestProgress, QuestStatus};
pub use registry::{QuestRegistry, DISPATCH_SPEAKER};
