//! Static data loading — registries populated at startup from `data/*.json`,
//! falling back to built-in tables when a file is missing or malformed.
//! A bad data file is logged and skipped; it never aborts the game.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CropRegistry>()
            .init_resource::<RecipeRegistry>()
            .init_resource::<QuestRegistry>()
            .init_resource::<BuildingRegistry>()
            .init_resource::<KeyBindings>()
            .add_systems(OnEnter(GameState::Loading), load_static_data);
    }
}

pub const DATA_DIR: &str = "data";

fn load_static_data(
    mut crops: ResMut<CropRegistry>,
    mut recipes: ResMut<RecipeRegistry>,
    mut quests: ResMut<QuestRegistry>,
    mut buildings: ResMut<BuildingRegistry>,
    mut bindings: ResMut<KeyBindings>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let dir = Path::new(DATA_DIR);
    *crops = load_crops(dir);
    *recipes = load_recipes(dir);
    *quests = load_quests(dir);
    *buildings = load_buildings(dir);
    *bindings = load_keybindings(dir);

    info!(
        "[Data] Loaded {} crops, {} recipes, {} main quests, {} side quests, {} buildings",
        crops.crops.len(),
        recipes.recipes.len(),
        quests.main.len(),
        quests.side.len(),
        buildings.buildings.len()
    );
    next_state.set(GameState::MainMenu);
}

/// Reads and parses one JSON data file. `None` covers both "absent" (quiet)
/// and "malformed" (logged); the caller falls back to builtins either way.
fn read_json<T: for<'de> Deserialize<'de>>(dir: &Path, file: &str) -> Option<T> {
    let path = dir.join(file);
    let text = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("[Data] Skipping malformed {}: {}", path.display(), err);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Crops
// ─────────────────────────────────────────────────────────────────────────────

pub fn builtin_crops() -> CropRegistry {
    let mut crops = BTreeMap::new();
    for (key, name, growth_days, sell_price) in [
        ("wheat", "Wheat", 3, 12.0),
        ("corn", "Corn", 5, 25.0),
        ("pumpkin", "Pumpkin", 8, 60.0),
        ("herbs", "Herbs", 4, 18.0),
    ] {
        crops.insert(
            key.to_string(),
            CropDef {
                name: name.to_string(),
                growth_days,
                sell_price,
            },
        );
    }
    CropRegistry { crops }
}

fn load_crops(dir: &Path) -> CropRegistry {
    match read_json::<BTreeMap<String, CropDef>>(dir, "crops.json") {
        Some(crops) if !crops.is_empty() => CropRegistry { crops },
        _ => builtin_crops(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recipes
// ─────────────────────────────────────────────────────────────────────────────

pub fn builtin_recipes() -> RecipeRegistry {
    fn item(
        name: &str,
        slot: Option<EquipSlot>,
        weapon_type: WeaponType,
        attack: i32,
        defense: i32,
        combo: u32,
    ) -> Item {
        Item {
            name: name.to_string(),
            slot,
            attack,
            defense,
            speed: 0,
            combo,
            weapon_type,
            durability: 40,
            max_durability: 40,
            level: 1,
        }
    }

    let mut recipes = BTreeMap::new();
    let defs = [
        RecipeDef {
            name: "Iron Sword".to_string(),
            skill: "smithing".to_string(),
            level: 1,
            requires: BTreeMap::from([("metal".to_string(), 2)]),
            produces: item(
                "Iron Sword",
                Some(EquipSlot::Weapon),
                WeaponType::Melee,
                4,
                0,
                1,
            ),
        },
        RecipeDef {
            name: "Steel Blade".to_string(),
            skill: "smithing".to_string(),
            level: 3,
            requires: BTreeMap::from([("metal".to_string(), 4), ("stone".to_string(), 1)]),
            produces: item(
                "Steel Blade",
                Some(EquipSlot::Weapon),
                WeaponType::Melee,
                7,
                0,
                2,
            ),
        },
        RecipeDef {
            name: "Iron Helm".to_string(),
            skill: "smithing".to_string(),
            level: 2,
            requires: BTreeMap::from([("metal".to_string(), 3)]),
            produces: item(
                "Iron Helm",
                Some(EquipSlot::Head),
                WeaponType::Melee,
                0,
                2,
                1,
            ),
        },
        RecipeDef {
            name: "Cloth Tunic".to_string(),
            skill: "tailoring".to_string(),
            level: 1,
            requires: BTreeMap::from([("cloth".to_string(), 2)]),
            produces: item(
                "Cloth Tunic",
                Some(EquipSlot::Chest),
                WeaponType::Melee,
                0,
                1,
                1,
            ),
        },
        RecipeDef {
            name: "Padded Leggings".to_string(),
            skill: "tailoring".to_string(),
            level: 2,
            requires: BTreeMap::from([("cloth".to_string(), 3)]),
            produces: item(
                "Padded Leggings",
                Some(EquipSlot::Legs),
                WeaponType::Melee,
                0,
                2,
                1,
            ),
        },
    ];
    for def in defs {
        recipes.insert(def.name.clone(), def);
    }
    RecipeRegistry { recipes }
}

fn load_recipes(dir: &Path) -> RecipeRegistry {
    match read_json::<Vec<RecipeDef>>(dir, "recipes.json") {
        Some(list) if !list.is_empty() => {
            let mut recipes = BTreeMap::new();
            for def in list {
                recipes.insert(def.name.clone(), def);
            }
            RecipeRegistry { recipes }
        }
        _ => builtin_recipes(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quests
// ─────────────────────────────────────────────────────────────────────────────

pub fn builtin_quests() -> QuestRegistry {
    QuestRegistry {
        main: vec![
            MainQuest {
                description: "Work your first shift".to_string(),
                goal: QuestGoal::ShiftsWorked(CareerKind::Office, 1),
                reward: Some(QuestReward::Money(25.0)),
                next_index: None,
            },
            MainQuest {
                description: "Save up $500".to_string(),
                goal: QuestGoal::MoneyAtLeast(500.0),
                reward: Some(QuestReward::StatBoost(StatKind::Charisma, 1)),
                next_index: None,
            },
            MainQuest {
                description: "Open a business".to_string(),
                goal: QuestGoal::OwnsBusiness,
                reward: Some(QuestReward::Money(100.0)),
                next_index: None,
            },
            MainQuest {
                description: "Win three brawls at the bar".to_string(),
                goal: QuestGoal::BrawlsWon(3),
                reward: Some(QuestReward::Tokens(5)),
                next_index: None,
            },
            MainQuest {
                description: "See the story through".to_string(),
                goal: QuestGoal::StoryStageAtLeast(4),
                reward: Some(QuestReward::Money(250.0)),
                next_index: None,
            },
        ],
        side: vec![
            SideQuestDef {
                name: "Spring Planting".to_string(),
                description: "Help the farm with spring planting.".to_string(),
                target: "farm".to_string(),
                reward: 40.0,
            },
            SideQuestDef {
                name: "Summer Festival".to_string(),
                description: "Set up the festival in the park.".to_string(),
                target: "park".to_string(),
                reward: 40.0,
            },
            SideQuestDef {
                name: "Fall Harvest".to_string(),
                description: "Lend a hand with the harvest rush.".to_string(),
                target: "farm".to_string(),
                reward: 50.0,
            },
            SideQuestDef {
                name: "Winter Stockpile".to_string(),
                description: "Haul supplies to the shop before the snow.".to_string(),
                target: "shop".to_string(),
                reward: 50.0,
            },
            SideQuestDef {
                name: "Lost Ledger".to_string(),
                description: "Return the misplaced ledger to the bank.".to_string(),
                target: "bank".to_string(),
                reward: 30.0,
            },
        ],
    }
}

fn load_quests(dir: &Path) -> QuestRegistry {
    let builtin = builtin_quests();
    let main = match read_json::<Vec<MainQuest>>(dir, "quests.json") {
        Some(main) if !main.is_empty() => main,
        _ => builtin.main,
    };
    let side = match read_json::<Vec<SideQuestDef>>(dir, "sidequests.json") {
        Some(side) if !side.is_empty() => side,
        _ => builtin.side,
    };
    QuestRegistry { main, side }
}

// ─────────────────────────────────────────────────────────────────────────────
// Buildings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BuildingDto {
    rect: [f32; 4],
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

pub fn builtin_buildings() -> BuildingRegistry {
    let defs: [(&str, &str, [f32; 4]); 12] = [
        ("Town Hall", "town_hall", [320.0, 64.0, 96.0, 64.0]),
        ("General Store", "shop", [128.0, 64.0, 64.0, 48.0]),
        ("First Bank", "bank", [224.0, 64.0, 64.0, 48.0]),
        ("The Rusty Tap", "bar", [128.0, 192.0, 64.0, 48.0]),
        ("Emberton Park", "park", [448.0, 192.0, 128.0, 96.0]),
        ("Office Tower", "office", [224.0, 192.0, 64.0, 96.0]),
        ("Clinic", "clinic", [320.0, 192.0, 64.0, 48.0]),
        ("Card Den", "dealer", [32.0, 320.0, 64.0, 48.0]),
        ("Old Forest", "forest", [576.0, 320.0, 160.0, 128.0]),
        ("Riverside Farm", "farm", [32.0, 448.0, 128.0, 96.0]),
        ("Workshop", "workshop", [224.0, 320.0, 64.0, 48.0]),
        ("Grand Arena", "arena", [448.0, 448.0, 96.0, 96.0]),
    ];
    BuildingRegistry {
        buildings: defs
            .into_iter()
            .map(|(name, kind, [x, y, w, h])| Building {
                x,
                y,
                w,
                h,
                name: name.to_string(),
                kind: kind.to_string(),
            })
            .collect(),
    }
}

fn load_buildings(dir: &Path) -> BuildingRegistry {
    match read_json::<Vec<BuildingDto>>(dir, "buildings.json") {
        Some(list) if !list.is_empty() => BuildingRegistry {
            buildings: list
                .into_iter()
                .map(|dto| Building {
                    x: dto.rect[0],
                    y: dto.rect[1],
                    w: dto.rect[2],
                    h: dto.rect[3],
                    name: dto.name,
                    kind: dto.kind,
                })
                .collect(),
        },
        _ => builtin_buildings(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Key bindings
// ─────────────────────────────────────────────────────────────────────────────

pub fn builtin_keybindings() -> KeyBindings {
    let mut actions = BTreeMap::new();
    actions.insert("up".to_string(), vec![17, -13]);
    actions.insert("down".to_string(), vec![31, -14]);
    actions.insert("left".to_string(), vec![30, -15]);
    actions.insert("right".to_string(), vec![32, -16]);
    actions.insert("interact".to_string(), vec![18, -1]);
    actions.insert("menu".to_string(), vec![1, -10]);
    KeyBindings { actions }
}

fn load_keybindings(dir: &Path) -> KeyBindings {
    match read_json::<BTreeMap<String, Vec<i32>>>(dir, "keybindings.json") {
        Some(actions) if !actions.is_empty() => KeyBindings { actions },
        _ => builtin_keybindings(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
