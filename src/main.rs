use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info};

mod audio;
mod camera;
mod demo;
mod game;
mod player;
mod quest;
mod ui;
mod world;

use audio::{AudioCue, AudioState};
use demo::Autopilot;
use game::Game;
use quest::QuestRegistry;
use ui::UiCommand;
use world::World;

const TICK_MS: u64 = 50; // 20 Hz

#[derive(Parser, Debug)]
#[command(name = "cityquest", about = "Headless driver for the city riddle-quest game core")]
struct Args {
    /// Campaign TOML file; the built-in campaign when omitted
    #[arg(long)]
    campaign: Option<PathBuf>,

    /// City map JSON file; the built-in map when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Write modal and audio-cue transitions to this JSON file
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Advance a simulated clock instead of sleeping between ticks
    #[arg(long)]
    turbo: bool,

    /// Autopilot walking speed, units per second
    #[arg(long, default_value_t = 12.0)]
    speed: f32,

    /// Safety bound on session length, in ticks
    #[arg(long, default_value_t = 120_000)]
    max_ticks: u64,
}

#[derive(Serialize)]
struct EventLogEntry {
    tick: u64,
    channel: &'static str,
    event: serde_json::Value,
}

// Per-tick HUD traffic is dropped from the log; transitions are what matter.
fn is_logged_ui(command: &UiCommand) -> bool {
    !matches!(
        command,
        UiCommand::UpdateTimer { .. } | UiCommand::UpdateDistance { .. }
    )
}

fn is_logged_audio(cue: &AudioCue) -> bool {
    !matches!(cue, AudioCue::UpdateFireVolume { .. })
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cityquest=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let registry = match args.campaign.as_ref() {
        Some(path) => Arc::new(QuestRegistry::load_from_file(path).expect("Failed to load campaign")),
        None => Arc::new(QuestRegistry::builtin()),
    };
    let world = match args.map.as_ref() {
        Some(path) => World::load_from_file(path).expect("Failed to load city map"),
        None => World::builtin(),
    };
    world.validate_campaign(&registry);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let (audio_tx, mut audio_rx) = mpsc::unbounded_channel();

    let mut game = Game::new(registry, world, ui_tx, audio_tx);
    let mut pilot = Autopilot::new(args.speed * (TICK_MS as f32 / 1000.0));
    let mut mixer = AudioState::default();
    let mut log: Vec<EventLogEntry> = Vec::new();

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut now = now_ms();
    game.start(now);

    let mut ticks: u64 = 0;
    while ticks < args.max_ticks {
        if args.turbo {
            now += TICK_MS;
        } else {
            interval.tick().await;
            now = now_ms();
        }
        ticks += 1;

        // Drain outbound traffic first so this tick's dispatch sees the
        // player's reactions to everything already presented
        while let Ok(command) = ui_rx.try_recv() {
            if is_logged_ui(&command) {
                log.push(EventLogEntry {
                    tick: ticks,
                    channel: "ui",
                    event: serde_json::to_value(&command).unwrap_or_default(),
                });
            }
            pilot.observe(&command);
        }
        while let Ok(cue) = audio_rx.try_recv() {
            mixer.apply(&cue);
            if is_logged_audio(&cue) {
                log.push(EventLogEntry {
                    tick: ticks,
                    channel: "audio",
                    event: serde_json::to_value(&cue).unwrap_or_default(),
                });
            }
        }

        for event in pilot.poll() {
            game.handle_event(event, now);
        }
        pilot.steer(&mut game);
        game.tick(now);

        if game.is_session_complete() {
            break;
        }
    }

    // Catch anything emitted on the final tick (the campaign outro lands here)
    while let Ok(command) = ui_rx.try_recv() {
        if is_logged_ui(&command) {
            log.push(EventLogEntry {
                tick: ticks,
                channel: "ui",
                event: serde_json::to_value(&command).unwrap_or_default(),
            });
        }
    }
    while let Ok(cue) = audio_rx.try_recv() {
        mixer.apply(&cue);
        if is_logged_audio(&cue) {
            log.push(EventLogEntry {
                tick: ticks,
                channel: "audio",
                event: serde_json::to_value(&cue).unwrap_or_default(),
            });
        }
    }

    info!(
        "Session ended after {} ticks: {}/{} quests completed",
        ticks,
        game.quests().completed_count(),
        game.quests().quest_count()
    );
    let position = game.player().position();
    info!(
        "Final state {:?}, player at ({:.1}, {:.1}, {:.1}), lit fire {:?}, ringtone {}",
        game.state(),
        position.x,
        position.y,
        position.z,
        game.world().visible_fire(),
        if mixer.ringtone_playing() { "ringing" } else { "silent" }
    );

    if let Some(path) = args.event_log.as_ref() {
        match serde_json::to_string_pretty(&log) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    error!("Failed to write event log {:?}: {}", path, e);
                } else {
                    info!("Saved event log to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize event log: {}", e),
        }
    }
}
