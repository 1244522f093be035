//! Shared resources, events, and states for Emberton.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    MainMenu,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Season for an absolute day number (day 1 = first day of Spring).
    /// Each season lasts [`DAYS_PER_SEASON`] days and the cycle wraps.
    pub fn for_day(day: u32) -> Season {
        match ((day.saturating_sub(1)) / DAYS_PER_SEASON) % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS & EQUIPMENT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Chest,
    Arms,
    Legs,
    Weapon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponType {
    #[default]
    Melee,
    Ranged,
    Magic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// None = not equippable (quest items, trinkets, materials).
    pub slot: Option<EquipSlot>,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Strikes per combat turn when wielded. 1 for everything but weapons.
    pub combo: u32,
    pub weapon_type: WeaponType,
    pub durability: u32,
    pub max_durability: u32,
    pub level: u32,
}

impl Item {
    pub fn basic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: None,
            attack: 0,
            defense: 0,
            speed: 0,
            combo: 1,
            weapon_type: WeaponType::Melee,
            durability: 0,
            max_durability: 0,
            level: 1,
        }
    }
}

/// A furniture item placed in one of the six home slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurniturePlacement {
    pub item: Item,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// CAREERS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CareerKind {
    Office,
    Dealer,
    Clinic,
}

impl CareerKind {
    pub const ALL: [CareerKind; 3] = [CareerKind::Office, CareerKind::Dealer, CareerKind::Clinic];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerProgress {
    pub level: u32,
    pub shifts: u32,
    pub exp: u32,
}

impl Default for CareerProgress {
    fn default() -> Self {
        Self {
            level: 1,
            shifts: 0,
            exp: 0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BUSINESSES
// ═══════════════════════════════════════════════════════════════════════

/// One owned business. The original game kept five parallel maps keyed by
/// business name; a single record per entry removes the cross-map key
/// invariant entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Business {
    pub base_profit: f64,
    pub bonus: f64,
    pub staff: u32,
    pub reputation: i32,
    pub skill: u32,
}

impl Business {
    pub fn new(base_profit: f64) -> Self {
        Self {
            base_profit,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARMING
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantedCrop {
    pub kind: String,
    pub planted_day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropDef {
    pub name: String,
    pub growth_days: u32,
    pub sell_price: f64,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: BTreeMap<String, CropDef>,
}

impl CropRegistry {
    pub fn get(&self, kind: &str) -> Option<&CropDef> {
        self.crops.get(kind)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CRAFTING
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDef {
    pub name: String,
    /// Crafting skill exercised ("smithing", "tailoring", …).
    pub skill: String,
    /// Minimum level in that skill.
    pub level: u32,
    pub requires: BTreeMap<String, u32>,
    pub produces: Item,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RecipeRegistry {
    pub recipes: BTreeMap<String, RecipeDef>,
}

impl RecipeRegistry {
    pub fn get(&self, name: &str) -> Option<&RecipeDef> {
        self.recipes.get(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMPANION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanionSpecies {
    Dog,
    Cat,
    Parrot,
    Llama,
    Rhino,
    Peacock,
}

impl CompanionSpecies {
    pub fn display_name(self) -> &'static str {
        match self {
            CompanionSpecies::Dog => "Dog",
            CompanionSpecies::Cat => "Cat",
            CompanionSpecies::Parrot => "Parrot",
            CompanionSpecies::Llama => "Llama",
            CompanionSpecies::Rhino => "Rhino",
            CompanionSpecies::Peacock => "Peacock",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STATS & REPUTATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Strength,
    Intelligence,
    Charisma,
    Defense,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::Strength,
        StatKind::Intelligence,
        StatKind::Charisma,
        StatKind::Defense,
        StatKind::Speed,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            StatKind::Strength => "strength",
            StatKind::Intelligence => "intelligence",
            StatKind::Charisma => "charisma",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Mayor,
    Business,
    Gang,
}

/// Faction standing, clamped to [-100, 100] on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reputation {
    pub mayor: i32,
    pub business: i32,
    pub gang: i32,
}

impl Reputation {
    pub fn get(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Mayor => self.mayor,
            Faction::Business => self.business,
            Faction::Gang => self.gang,
        }
    }

    pub fn add(&mut self, faction: Faction, delta: i32) {
        let slot = match faction {
            Faction::Mayor => &mut self.mayor,
            Faction::Business => &mut self.business,
            Faction::Gang => &mut self.gang,
        };
        *slot = (*slot + delta).clamp(-100, 100);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORY & QUESTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StoryBranch {
    #[default]
    None,
    Mayor,
    Gang,
}

/// Quest completion predicate. Kept as data so the save file never has to
/// carry a callable — the quest system interprets these against PlayerState.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestGoal {
    MoneyAtLeast(f64),
    StatAtLeast(StatKind, u32),
    EnemiesDefeated(u32),
    BrawlsWon(u32),
    ShiftsWorked(CareerKind, u32),
    OwnsBusiness,
    HarvestTotal(u32),
    RecipesKnown(u32),
    CompanionAdopted,
    CardsCollected(u32),
    ReputationAtLeast(Faction, i32),
    StoryStageAtLeast(u8),
    BossDefeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestReward {
    Money(f64),
    Tokens(u32),
    StatBoost(StatKind, u32),
    /// Upgrade the companion ability at this index without cost.
    FreeCompanionAbility(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainQuest {
    pub description: String,
    pub goal: QuestGoal,
    pub reward: Option<QuestReward>,
    /// Index of the quest to jump to on completion; None = advance linearly.
    pub next_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideQuestDef {
    pub name: String,
    pub description: String,
    /// Building kind the player must visit.
    pub target: String,
    pub reward: f64,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct QuestRegistry {
    pub main: Vec<MainQuest>,
    pub side: Vec<SideQuestDef>,
}

impl QuestRegistry {
    pub fn side_quest(&self, name: &str) -> Option<&SideQuestDef> {
        self.side.iter().find(|q| q.name == name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub name: String,
    /// Type tag ("bar", "park", "town_hall", …) used for gating and quest
    /// target resolution.
    pub kind: String,
}

impl Building {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingRegistry {
    pub buildings: Vec<Building>,
}

impl BuildingRegistry {
    pub fn by_kind(&self, kind: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.kind == kind)
    }
}

/// Parsed `data/keybindings.json`. Codes >= 0 are keyboard scancodes;
/// negative codes encode gamepad buttons as -(button + 1). The actual input
/// mapping lives outside the simulation; this resource is only the parsed
/// boundary data.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBindings {
    pub actions: BTreeMap<String, Vec<i32>>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER STATE — the single authoritative aggregate
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    // Identity & appearance
    pub name: String,
    pub body_color: [u8; 3],
    pub head_color: [u8; 3],
    pub pants_color: [u8; 3],
    pub hat_color: [u8; 3],
    pub has_hat: bool,

    // Vitals
    pub money: f64,
    pub energy: f32,
    pub health: f32,
    pub day: u32,
    /// Minutes since midnight, wraps at 1440 without advancing `day`.
    pub time_minutes: f32,

    // Stats
    pub strength: u32,
    pub intelligence: u32,
    pub charisma: u32,
    pub defense: u32,
    pub speed: u32,

    // Careers
    pub careers: BTreeMap<CareerKind, CareerProgress>,

    // Inventory & equipment. Equipping moves the item out of `inventory`
    // into `equipment`; the save stores both collections as-is.
    pub inventory: Vec<Item>,
    pub equipment: BTreeMap<EquipSlot, Item>,
    pub hotkeys: Vec<Option<usize>>,

    // Home
    pub furniture: Vec<Option<FurniturePlacement>>,
    pub home_level: u32,
    pub home_upgrades: BTreeSet<String>,

    // Banking
    pub bank_balance: f64,
    pub tokens: u32,

    // Businesses
    pub businesses: BTreeMap<String, Business>,

    // Resources, crops, animals
    pub resources: BTreeMap<String, u32>,
    pub crops: Vec<PlantedCrop>,
    pub animals: BTreeMap<String, u32>,
    pub harvest_total: u32,

    // Crafting skills
    pub craft_levels: BTreeMap<String, u32>,
    pub craft_exp: BTreeMap<String, u32>,

    // Companion
    pub companion: Option<CompanionSpecies>,
    pub companion_level: u32,
    pub companion_morale: u32,
    pub companion_abilities: BTreeMap<String, u32>,
    pub active_ability: Option<String>,

    // Social
    pub reputation: Reputation,
    pub relationships: BTreeMap<String, i32>,
    pub romanced: BTreeSet<String>,
    pub married_to: Option<String>,

    // Quests & story
    pub current_quest: usize,
    pub quests_done: Vec<bool>,
    pub side_quest: Option<String>,
    pub story_stage: u8,
    pub story_branch: StoryBranch,
    pub gang_package_done: bool,

    // Perks
    pub perk_points: u32,
    pub perk_levels: BTreeMap<String, u32>,
    pub next_strength_perk: u32,
    pub next_intelligence_perk: u32,
    pub next_charisma_perk: u32,
    pub next_defense_perk: u32,
    pub next_speed_perk: u32,

    // Milestones
    pub achievements: BTreeSet<String>,
    pub epithet: String,
    pub known_cards: BTreeSet<String>,
    pub known_recipes: BTreeSet<String>,
    pub card_duels_won: u32,
    pub brawls_won: u32,
    pub enemies_defeated: u32,
    pub boss_defeated: bool,

    // World
    pub season: Season,
    pub weather: Weather,
    pub x: f32,
    pub y: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        let mut careers = BTreeMap::new();
        for kind in CareerKind::ALL {
            careers.insert(kind, CareerProgress::default());
        }

        Self {
            name: String::from("Ash"),
            body_color: [200, 160, 120],
            head_color: [200, 160, 120],
            pants_color: [60, 60, 120],
            hat_color: [120, 40, 40],
            has_hat: false,

            money: 100.0,
            energy: 100.0,
            health: 100.0,
            day: 1,
            time_minutes: WAKE_UP_MINUTES,

            strength: 1,
            intelligence: 1,
            charisma: 1,
            defense: 1,
            speed: 1,

            careers,

            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            hotkeys: vec![None; HOTKEY_SLOTS],

            furniture: vec![None; FURNITURE_SLOTS],
            home_level: 1,
            home_upgrades: BTreeSet::new(),

            bank_balance: 0.0,
            tokens: 0,

            businesses: BTreeMap::new(),

            resources: BTreeMap::new(),
            crops: Vec::new(),
            animals: BTreeMap::new(),
            harvest_total: 0,

            craft_levels: BTreeMap::new(),
            craft_exp: BTreeMap::new(),

            companion: None,
            companion_level: 0,
            companion_morale: 0,
            companion_abilities: BTreeMap::new(),
            active_ability: None,

            reputation: Reputation::default(),
            relationships: BTreeMap::new(),
            romanced: BTreeSet::new(),
            married_to: None,

            current_quest: 0,
            quests_done: Vec::new(),
            side_quest: None,
            story_stage: 0,
            story_branch: StoryBranch::None,
            gang_package_done: false,

            perk_points: 0,
            perk_levels: BTreeMap::new(),
            next_strength_perk: PERK_THRESHOLD_START,
            next_intelligence_perk: PERK_THRESHOLD_START,
            next_charisma_perk: PERK_THRESHOLD_START,
            next_defense_perk: PERK_THRESHOLD_START,
            next_speed_perk: PERK_THRESHOLD_START,

            achievements: BTreeSet::new(),
            epithet: String::new(),
            known_cards: BTreeSet::new(),
            known_recipes: BTreeSet::new(),
            card_duels_won: 0,
            brawls_won: 0,
            enemies_defeated: 0,
            boss_defeated: false,

            season: Season::Spring,
            weather: Weather::Clear,
            x: 400.0,
            y: 300.0,
        }
    }
}

impl PlayerState {
    pub fn perk_level(&self, name: &str) -> u32 {
        self.perk_levels.get(name).copied().unwrap_or(0)
    }

    /// Effective energy price of an action. Iron Will shaves 5% per level;
    /// Perk Master applies a flat ×0.9 on top (multiplicative, matching the
    /// original game's stacking).
    pub fn energy_cost(&self, base: f32) -> f32 {
        let iron_will = self.perk_level("Iron Will") as f32;
        let mut cost = base * (1.0 - 0.05 * iron_will).max(0.0);
        if self.perk_level("Perk Master") >= 1 {
            cost *= 0.9;
        }
        cost
    }

    pub fn hour(&self) -> u32 {
        (self.time_minutes / 60.0) as u32 % 24
    }

    pub fn stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Intelligence => self.intelligence,
            StatKind::Charisma => self.charisma,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
        }
    }

    /// Raise a stat and award perk points for every threshold crossed.
    /// Thresholds start at [`PERK_THRESHOLD_START`] and step by
    /// [`PERK_THRESHOLD_STEP`]. Returns the number of points granted.
    pub fn gain_stat(&mut self, kind: StatKind, amount: u32) -> u32 {
        let (stat, threshold): (&mut u32, &mut u32) = match kind {
            StatKind::Strength => (&mut self.strength, &mut self.next_strength_perk),
            StatKind::Intelligence => (&mut self.intelligence, &mut self.next_intelligence_perk),
            StatKind::Charisma => (&mut self.charisma, &mut self.next_charisma_perk),
            StatKind::Defense => (&mut self.defense, &mut self.next_defense_perk),
            StatKind::Speed => (&mut self.speed, &mut self.next_speed_perk),
        };
        *stat += amount;

        let mut granted = 0;
        while *stat >= *threshold {
            *threshold += PERK_THRESHOLD_STEP;
            granted += 1;
        }
        self.perk_points += granted;
        granted
    }

    pub fn resource(&self, name: &str) -> u32 {
        self.resources.get(name).copied().unwrap_or(0)
    }

    pub fn add_resource(&mut self, name: &str, amount: u32) {
        *self.resources.entry(name.to_string()).or_insert(0) += amount;
    }

    /// Remove `amount` of a resource; fails without mutating when short.
    pub fn take_resource(&mut self, name: &str, amount: u32) -> bool {
        match self.resources.get_mut(name) {
            Some(have) if *have >= amount => {
                *have -= amount;
                true
            }
            _ => false,
        }
    }

    /// Deduct money; fails without mutating when short.
    pub fn try_spend_money(&mut self, amount: f64) -> bool {
        if self.money >= amount {
            self.money -= amount;
            true
        } else {
            false
        }
    }

    pub fn spend_energy(&mut self, cost: f32) {
        self.energy = (self.energy - cost).max(0.0);
    }

    /// Restores canonical shapes after deserialization. `#[serde(default)]`
    /// fills missing fields but never re-lengthens vectors, so an older or
    /// hand-edited save can carry short slot arrays or a zero home level.
    pub fn normalize(&mut self) {
        if self.furniture.len() < FURNITURE_SLOTS {
            self.furniture.resize(FURNITURE_SLOTS, None);
        }
        if self.hotkeys.len() < HOTKEY_SLOTS {
            self.hotkeys.resize(HOTKEY_SLOTS, None);
        }
        self.home_level = self.home_level.max(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Emitted by the sleep cycle after the day has advanced.
#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub new_day: u32,
    pub season: Season,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
}

/// Player chose to sleep; the home domain runs the full transaction.
#[derive(Event, Debug, Clone)]
pub struct SleepRequestEvent;

/// User-visible message produced by any operation.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
}

impl ToastEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct AchievementUnlockedEvent {
    pub id: String,
    pub epithet: Option<String>,
}

/// A quest reward granted a free companion ability upgrade; the companion
/// domain applies it without charging money or energy.
#[derive(Event, Debug, Clone)]
pub struct FreeAbilityEvent {
    pub ability_index: usize,
}

/// The story line was completed; persistence appends a leaderboard entry.
#[derive(Event, Debug, Clone)]
pub struct StoryHeroEvent {
    pub day: u32,
    pub money: f64,
}

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 32.0;

pub const MINUTES_PER_FRAME: f32 = 0.1;
pub const MINUTES_PER_DAY: f32 = 1440.0;
pub const DAYS_PER_SEASON: u32 = 30;
pub const WAKE_UP_MINUTES: f32 = 8.0 * 60.0;

pub const EVENT_CHANCE: f64 = 4e-4;

pub const POWER_STRIKE_CHANCE: f64 = 0.15;
pub const DODGE_BASE: f64 = 0.05;
pub const BRAWLER_COUNT: u32 = 5;

pub const JOB_EXP_BASE: u32 = 100;
pub const JOB_EXP_PER_SHIFT: u32 = 10;
pub const JOB_ENERGY_COST: f32 = 20.0;

pub const CRAFT_EXP_BASE: u32 = 50;

pub const PERK_MAX_LEVEL: u32 = 5;
pub const PERK_THRESHOLD_START: u32 = 5;
pub const PERK_THRESHOLD_STEP: u32 = 5;

pub const COMPANION_ADOPT_COST: f64 = 100.0;
pub const COMPANION_TRAIN_COST: f64 = 50.0;
pub const COMPANION_MAX_LEVEL: u32 = 3;

pub const MARKETING_COST: f64 = 100.0;

pub const FURNITURE_SLOTS: usize = 6;
pub const HOTKEY_SLOTS: usize = 5;

pub const AUTOSAVE_COOLDOWN_SECS: f32 = 60.0;
pub const LEADERBOARD_CAPACITY: usize = 10;

// ─── Tests ────────────────────────────────────────────────────────────────────
