//! World domain — buildings and their opening rules, NPC schedules and
//! movement, quest-objective resolution, and the TMX tile grid.

use bevy::prelude::*;
use rand::Rng;

use crate::pathfinding;
use crate::shared::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NpcRegistry>()
            .init_resource::<TileGrid>()
            .add_systems(
                Update,
                (npc_schedule, npc_movement, npc_bubbles)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening hours and gating
// ─────────────────────────────────────────────────────────────────────────────

/// Open-hour window by building kind. `start > end` wraps midnight.
/// Kinds not listed are always open.
fn open_hours(kind: &str) -> Option<(u32, u32)> {
    match kind {
        "shop" => Some((8, 20)),
        "bank" => Some((9, 16)),
        "town_hall" => Some((9, 17)),
        "gym" => Some((6, 22)),
        "park" => Some((6, 20)),
        "office" => Some((8, 18)),
        "clinic" => Some((7, 21)),
        "farm" => Some((6, 18)),
        "library" => Some((8, 18)),
        "workshop" => Some((8, 19)),
        "shelter" => Some((9, 17)),
        "market" => Some((8, 18)),
        // Nightlife wraps midnight
        "bar" => Some((16, 2)),
        "dealer" => Some((18, 4)),
        "arena" => Some((10, 22)),
        _ => None,
    }
}

fn hour_in_window(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        (start..=end).contains(&hour)
    } else {
        hour >= start || hour <= end
    }
}

/// Whether the whole main quest line has been cleared.
pub fn main_quests_done(player: &PlayerState, registry: &QuestRegistry) -> bool {
    !registry.main.is_empty()
        && player.quests_done.len() >= registry.main.len()
        && player.quests_done.iter().all(|&done| done)
}

/// Combines opening hours with weather, season, and story gating.
pub fn building_open(
    kind: &str,
    player: &PlayerState,
    quests: &QuestRegistry,
) -> bool {
    let bad_weather = matches!(player.weather, Weather::Rain | Weather::Snow);
    match kind {
        "park" if bad_weather || player.season == Season::Winter => return false,
        "dealer" if bad_weather => return false,
        "arena" if !main_quests_done(player, quests) => return false,
        _ => {}
    }
    match open_hours(kind) {
        Some((start, end)) => hour_in_window(player.hour(), start, end),
        None => true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quest objective resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Building kind that advances a main-quest goal, when one exists.
fn goal_target_kind(goal: &QuestGoal) -> Option<&'static str> {
    match goal {
        QuestGoal::MoneyAtLeast(_) => Some("bank"),
        QuestGoal::BrawlsWon(_) => Some("bar"),
        QuestGoal::EnemiesDefeated(_) => Some("forest"),
        QuestGoal::ShiftsWorked(career, _) => Some(match career {
            CareerKind::Office => "office",
            CareerKind::Dealer => "dealer",
            CareerKind::Clinic => "clinic",
        }),
        QuestGoal::OwnsBusiness => Some("market"),
        QuestGoal::HarvestTotal(_) => Some("farm"),
        QuestGoal::RecipesKnown(_) => Some("workshop"),
        QuestGoal::CompanionAdopted => Some("shelter"),
        QuestGoal::BossDefeated => Some("arena"),
        QuestGoal::StoryStageAtLeast(_) => Some("town_hall"),
        QuestGoal::StatAtLeast(..)
        | QuestGoal::CardsCollected(_)
        | QuestGoal::ReputationAtLeast(..) => None,
    }
}

/// Kind of the building the story currently points at, if any.
fn story_target_kind(player: &PlayerState) -> Option<&'static str> {
    match player.story_stage {
        0 | 1 | 3 => Some("town_hall"),
        2 => match player.story_branch {
            StoryBranch::Mayor => Some("forest"),
            // The gang's "dungeon" drop is really the dealer's back room
            StoryBranch::Gang => Some("dealer"),
            StoryBranch::None => None,
        },
        _ => None,
    }
}

/// The single building the quest marker should point at, by precedence:
/// active side quest, then story, then the current main quest.
pub fn quest_target_building<'a>(
    player: &PlayerState,
    quests: &QuestRegistry,
    buildings: &'a BuildingRegistry,
) -> Option<&'a Building> {
    if let Some(name) = &player.side_quest {
        if let Some(quest) = quests.side_quest(name) {
            if let Some(building) = buildings.by_kind(&quest.target) {
                return Some(building);
            }
        }
    }
    if player.story_stage < 4 {
        if let Some(kind) = story_target_kind(player) {
            if let Some(building) = buildings.by_kind(kind) {
                return Some(building);
            }
        }
    }
    let quest = quests.main.get(player.current_quest)?;
    let kind = goal_target_kind(&quest.goal)?;
    buildings.by_kind(kind)
}

// ─────────────────────────────────────────────────────────────────────────────
// NPCs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Npc {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Building kinds for the two halves of the daily routine.
    pub home: String,
    pub work: String,
    /// Work hours (start, end); outside them the NPC heads home.
    pub hours: (u32, u32),
    pub path: Vec<(f32, f32)>,
    pub destination: Option<(f32, f32)>,
    pub bubble: Option<String>,
    pub bubble_timer: f32,
    /// Side quest this NPC hands out, if any.
    pub side_quest: Option<String>,
}

impl Npc {
    pub fn new(name: impl Into<String>, home: &str, work: &str, hours: (u32, u32)) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            home: home.to_string(),
            work: work.to_string(),
            hours,
            path: Vec::new(),
            destination: None,
            bubble: None,
            bubble_timer: 0.0,
            side_quest: None,
        }
    }

    pub fn say(&mut self, line: impl Into<String>) {
        self.bubble = Some(line.into());
        self.bubble_timer = 3.0;
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct NpcRegistry {
    pub npcs: Vec<Npc>,
}

pub const NPC_SPEED: f32 = 1.5;

/// Where an NPC wants to be at this hour.
pub fn npc_destination_kind(npc: &Npc, hour: u32) -> &str {
    if hour_in_window(hour, npc.hours.0, npc.hours.1) {
        &npc.work
    } else {
        &npc.home
    }
}

fn npc_schedule(
    mut registry: ResMut<NpcRegistry>,
    buildings: Res<BuildingRegistry>,
    grid: Res<TileGrid>,
    player: Res<PlayerState>,
) {
    let hour = player.hour();
    for npc in registry.npcs.iter_mut() {
        let kind = npc_destination_kind(npc, hour).to_string();
        let Some(target) = buildings.by_kind(&kind).map(|b| b.center()) else {
            continue;
        };
        if npc.destination == Some(target) {
            continue;
        }
        npc.destination = Some(target);
        npc.path = pathfinding::find_path(
            (npc.x, npc.y),
            target,
            grid.width,
            grid.height,
            None,
        );
    }
}

fn npc_movement(mut registry: ResMut<NpcRegistry>) {
    for npc in registry.npcs.iter_mut() {
        let Some(&(wx, wy)) = npc.path.first() else {
            continue;
        };
        let dx = wx - npc.x;
        let dy = wy - npc.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= NPC_SPEED {
            npc.x = wx;
            npc.y = wy;
            npc.path.remove(0);
        } else {
            npc.x += dx / dist * NPC_SPEED;
            npc.y += dy / dist * NPC_SPEED;
        }
    }
}

fn npc_bubbles(mut registry: ResMut<NpcRegistry>, time: Res<Time>) {
    let mut rng = rand::thread_rng();
    for npc in registry.npcs.iter_mut() {
        if npc.bubble.is_some() {
            npc.bubble_timer -= time.delta_secs();
            if npc.bubble_timer <= 0.0 {
                npc.bubble = None;
            }
        } else if rng.gen_bool(1e-4) {
            npc.say("Lovely day in Emberton.");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TMX tile grid
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    pub first_gid: u32,
    pub gids: Vec<u32>,
}

impl Default for TileGrid {
    fn default() -> Self {
        // 40x30 of walkable ground when no map is loaded
        Self {
            width: 40,
            height: 30,
            first_gid: 1,
            gids: vec![1; 40 * 30],
        }
    }
}

impl TileGrid {
    pub fn gid_at(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.gids[(y * self.width + x) as usize]
    }
}

fn attr_value(tag: &str, attr: &str) -> Option<String> {
    let needle = format!("{}=\"", attr);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

/// Parses the fixed TMX subset the game ships: one `tileset` (for the
/// first gid) and one CSV-encoded `layer/data`. The format is stable
/// enough that plain string scanning beats pulling in an XML crate.
pub fn parse_tmx(text: &str) -> Result<TileGrid, String> {
    let layer_start = text.find("<layer").ok_or("no <layer> element")?;
    let layer_tag_end = text[layer_start..]
        .find('>')
        .ok_or("unterminated <layer> tag")?
        + layer_start;
    let layer_tag = &text[layer_start..layer_tag_end];

    let width: i32 = attr_value(layer_tag, "width")
        .ok_or("layer missing width")?
        .parse()
        .map_err(|e| format!("bad layer width: {}", e))?;
    let height: i32 = attr_value(layer_tag, "height")
        .ok_or("layer missing height")?
        .parse()
        .map_err(|e| format!("bad layer height: {}", e))?;
    if width <= 0 || height <= 0 {
        return Err("non-positive layer dimensions".to_string());
    }

    let first_gid = text
        .find("<tileset")
        .and_then(|i| {
            let end = text[i..].find('>')? + i;
            attr_value(&text[i..end], "firstgid")
        })
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let data_start = text.find("<data").ok_or("no <data> element")?;
    let csv_start = text[data_start..]
        .find('>')
        .ok_or("unterminated <data> tag")?
        + data_start
        + 1;
    let csv_end = text[csv_start..]
        .find("</data>")
        .ok_or("no </data> close")?
        + csv_start;

    let mut gids = Vec::with_capacity((width * height) as usize);
    for field in text[csv_start..csv_end].split(',') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let gid: u32 = field
            .parse()
            .map_err(|e| format!("bad gid {:?}: {}", field, e))?;
        gids.push(gid);
    }
    if gids.len() != (width * height) as usize {
        return Err(format!(
            "expected {} tiles, found {}",
            width * height,
            gids.len()
        ));
    }

    Ok(TileGrid {
        width,
        height,
        first_gid,
        gids,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
