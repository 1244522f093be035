//! Persistence — the save file, autosave, and the leaderboard.
//!
//! Everything is whole-file JSON. Writes go to a temp file first and rename
//! into place so a crash mid-write never leaves a truncated save.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SavePaths>()
            .init_resource::<AutosaveTimer>()
            .add_systems(
                Update,
                (handle_save_requests, handle_load_requests, autosave, record_story_heroes)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub const SAVE_VERSION: u32 = 1;

/// Where the save and leaderboard live; tests point this at a temp dir.
#[derive(Resource, Debug, Clone)]
pub struct SavePaths {
    pub save_file: PathBuf,
    pub leaderboard_file: PathBuf,
}

impl Default for SavePaths {
    fn default() -> Self {
        Self {
            save_file: PathBuf::from("savegame.json"),
            leaderboard_file: PathBuf::from("leaderboard.json"),
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct AutosaveTimer {
    pub elapsed_secs: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    player: PlayerState,
}

// ─────────────────────────────────────────────────────────────────────────────
// Save / load
// ─────────────────────────────────────────────────────────────────────────────

fn write_atomic(path: &Path, contents: &str) -> Result<(), String> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| format!("write {}: {}", tmp.display(), e))?;
    fs::rename(&tmp, path).map_err(|e| format!("rename to {}: {}", path.display(), e))
}

pub fn save_game(player: &PlayerState, path: &Path) -> Result<(), String> {
    let file = SaveFile {
        version: SAVE_VERSION,
        player: player.clone(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| e.to_string())?;
    write_atomic(path, &json)?;
    info!("[Save] Game saved to {}", path.display());
    Ok(())
}

/// Loads the save. `Ok(None)` means no save exists; a malformed file
/// surfaces the serde error.
pub fn load_game(path: &Path) -> Result<Option<PlayerState>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    let file: SaveFile = serde_json::from_str(&json).map_err(|e| e.to_string())?;
    let mut player = file.player;
    player.normalize();
    Ok(Some(player))
}

// ─────────────────────────────────────────────────────────────────────────────
// Leaderboard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub day: u32,
    pub money: i64,
}

pub fn load_leaderboard(path: &Path) -> Vec<LeaderboardEntry> {
    let Ok(json) = fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&json).unwrap_or_default()
}

/// Inserts an entry, keeping the board sorted by (day asc, money desc) and
/// capped at `LEADERBOARD_CAPACITY`.
pub fn record_leaderboard_entry(
    path: &Path,
    day: u32,
    money: f64,
) -> Result<Vec<LeaderboardEntry>, String> {
    let mut board = load_leaderboard(path);
    board.push(LeaderboardEntry {
        day,
        money: money as i64,
    });
    board.sort_by(|a, b| a.day.cmp(&b.day).then(b.money.cmp(&a.money)));
    board.truncate(LEADERBOARD_CAPACITY);
    let json = serde_json::to_string_pretty(&board).map_err(|e| e.to_string())?;
    write_atomic(path, &json)?;
    Ok(board)
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

fn handle_save_requests(
    mut requests: EventReader<SaveRequestEvent>,
    player: Res<PlayerState>,
    paths: Res<SavePaths>,
    mut timer: ResMut<AutosaveTimer>,
    mut done: EventWriter<SaveCompleteEvent>,
) {
    if requests.read().next().is_none() {
        return;
    }
    match save_game(&player, &paths.save_file) {
        Ok(()) => {
            timer.elapsed_secs = 0.0;
            done.send(SaveCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Err(err) => {
            warn!("[Save] Save failed: {}", err);
            done.send(SaveCompleteEvent {
                success: false,
                error_message: Some(err),
            });
        }
    }
}

fn handle_load_requests(
    mut requests: EventReader<LoadRequestEvent>,
    mut player: ResMut<PlayerState>,
    paths: Res<SavePaths>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if requests.read().next().is_none() {
        return;
    }
    match load_game(&paths.save_file) {
        Ok(Some(loaded)) => {
            *player = loaded;
            info!("[Save] Game loaded (day {})", player.day);
            toasts.send(ToastEvent::new("Game loaded."));
        }
        Ok(None) => {
            warn!("[Save] No save file found");
            toasts.send(ToastEvent::new("No save found."));
        }
        Err(err) => {
            warn!("[Save] Load failed: {}", err);
            toasts.send(ToastEvent::new(format!("Load failed: {}", err)));
        }
    }
}

/// Fires a save request once the real-time cooldown has elapsed.
fn autosave(
    time: Res<Time>,
    mut timer: ResMut<AutosaveTimer>,
    mut requests: EventWriter<SaveRequestEvent>,
) {
    timer.elapsed_secs += time.delta_secs();
    if timer.elapsed_secs >= AUTOSAVE_COOLDOWN_SECS {
        timer.elapsed_secs = 0.0;
        requests.send(SaveRequestEvent);
    }
}

fn record_story_heroes(
    mut heroes: EventReader<StoryHeroEvent>,
    paths: Res<SavePaths>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in heroes.read() {
        match record_leaderboard_entry(&paths.leaderboard_file, ev.day, ev.money) {
            Ok(_) => {
                info!("[Save] Leaderboard entry: day {}, ${:.0}", ev.day, ev.money);
                toasts.send(ToastEvent::new("Your deeds are recorded!"));
            }
            Err(err) => warn!("[Save] Leaderboard write failed: {}", err),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("emberton-test-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = temp_path("roundtrip.json");

        let mut player = PlayerState::default();
        player.name = "Rook".to_string();
        player.money = 1234.5;
        player.day = 17;
        player.businesses.insert("Store".to_string(), Business::new(80.0));
        player.add_resource("metal", 4);
        player.known_recipes.insert("Iron Sword".to_string());
        player.furniture[2] = Some(FurniturePlacement {
            item: Item::basic("Decor Chair"),
            x: 64.0,
            y: 32.0,
            rotation: 90.0,
        });
        player.equipment.insert(EquipSlot::Weapon, Item::basic("Stick"));
        player.reputation.add(Faction::Gang, -30);
        player.story_stage = 2;
        player.story_branch = StoryBranch::Gang;

        save_game(&player, &path).unwrap();
        let loaded = load_game(&path).unwrap().unwrap();
        assert_eq!(loaded, player);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_save_is_none() {
        let path = temp_path("never-written.json");
        assert_eq!(load_game(&path).unwrap(), None);
    }

    #[test]
    fn test_malformed_save_errors() {
        let path = temp_path("malformed.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_game(&path).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_save_takes_defaults() {
        let path = temp_path("partial.json");
        fs::write(
            &path,
            r#"{"version": 1, "player": {"money": 42.0, "day": 3, "unknown_field": true}}"#,
        )
        .unwrap();

        let loaded = load_game(&path).unwrap().unwrap();
        assert_eq!(loaded.money, 42.0);
        assert_eq!(loaded.day, 3);
        assert_eq!(loaded.energy, 100.0, "missing fields default");
        assert_eq!(loaded.name, "Ash");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_normalizes_slot_vectors() {
        let path = temp_path("short-slots.json");
        fs::write(
            &path,
            r#"{"version": 1, "player": {"furniture": [], "hotkeys": [], "home_level": 0}}"#,
        )
        .unwrap();

        let loaded = load_game(&path).unwrap().unwrap();
        assert_eq!(loaded.furniture.len(), FURNITURE_SLOTS);
        assert_eq!(loaded.hotkeys.len(), HOTKEY_SLOTS);
        assert_eq!(loaded.home_level, 1, "a save never has home level 0");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_leaderboard_sort_and_cap() {
        let path = temp_path("leaderboard.json");
        fs::remove_file(&path).ok();

        record_leaderboard_entry(&path, 30, 500.0).unwrap();
        record_leaderboard_entry(&path, 12, 900.0).unwrap();
        record_leaderboard_entry(&path, 12, 2000.0).unwrap();
        let board = record_leaderboard_entry(&path, 50, 100.0).unwrap();

        assert_eq!(board[0], LeaderboardEntry { day: 12, money: 2000 });
        assert_eq!(board[1], LeaderboardEntry { day: 12, money: 900 });
        assert_eq!(board[2], LeaderboardEntry { day: 30, money: 500 });
        assert_eq!(board[3], LeaderboardEntry { day: 50, money: 100 });

        for i in 0..20 {
            record_leaderboard_entry(&path, 100 + i, 10.0).unwrap();
        }
        let board = load_leaderboard(&path);
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);

        fs::remove_file(&path).ok();
    }
}
