//! Combat domain — turn-based fights against forest enemies, bar brawlers,
//! and the final boss.
//!
//! The resolver is a pure loop over a parameterized enemy so every venue
//! (forest, bar, boss arena) shares one set of rules.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FightRequestEvent>()
            .add_event::<EquipRequestEvent>()
            .add_systems(
                Update,
                (handle_fight_requests, handle_equip_requests)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub const FIGHT_ENERGY_COST: f32 = 10.0;

// ─────────────────────────────────────────────────────────────────────────────
// Enemies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EnemyDef {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub health: i32,
    pub reward: f64,
    /// Resource this enemy may drop on top of the cash reward.
    pub drop: Option<&'static str>,
}

pub fn forest_enemies() -> Vec<EnemyDef> {
    vec![
        EnemyDef {
            name: "Wild Boar".to_string(),
            attack: 3,
            defense: 1,
            speed: 2,
            health: 10,
            reward: 15.0,
            drop: Some("cloth"),
        },
        EnemyDef {
            name: "Timber Wolf".to_string(),
            attack: 5,
            defense: 2,
            speed: 5,
            health: 14,
            reward: 25.0,
            drop: Some("herbs"),
        },
        EnemyDef {
            name: "Cave Bear".to_string(),
            attack: 8,
            defense: 4,
            speed: 3,
            health: 24,
            reward: 50.0,
            drop: Some("metal"),
        },
    ]
}

/// Bar brawlers get tougher with every win, up to `BRAWLER_COUNT` names.
pub fn brawler(brawls_won: u32) -> Option<EnemyDef> {
    const NAMES: [&str; 5] = ["Sal", "Bruiser Moe", "Knuckles", "Big Rosa", "The Wall"];
    if brawls_won >= BRAWLER_COUNT {
        return None;
    }
    let n = brawls_won as i32;
    Some(EnemyDef {
        name: NAMES[brawls_won as usize].to_string(),
        attack: 3 + 2 * n,
        defense: 1 + n,
        speed: 2 + n,
        health: 12 + 6 * n,
        reward: 20.0 + 15.0 * n as f64,
        drop: None,
    })
}

pub fn final_boss() -> EnemyDef {
    EnemyDef {
        name: "The Ember King".to_string(),
        attack: 12,
        defense: 6,
        speed: 8,
        health: 60,
        reward: 500.0,
        drop: None,
    }
}

pub fn legendary_sword() -> Item {
    Item {
        name: "Legendary Sword".to_string(),
        slot: Some(EquipSlot::Weapon),
        attack: 10,
        defense: 0,
        speed: 2,
        combo: 3,
        weapon_type: WeaponType::Melee,
        durability: 100,
        max_durability: 100,
        level: 5,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Equipment
// ─────────────────────────────────────────────────────────────────────────────

/// Moves an inventory item into its equipment slot. Whatever occupied the
/// slot returns to the inventory, so items are never lost in the swap.
pub fn equip_item(player: &mut PlayerState, index: usize) -> String {
    let Some(item) = player.inventory.get(index) else {
        return "Invalid choice".to_string();
    };
    let Some(slot) = item.slot else {
        return format!("{} cannot be equipped.", item.name);
    };

    let item = player.inventory.remove(index);
    // Hotkeys point at inventory indexes; removing one shifts the tail.
    for hotkey in player.hotkeys.iter_mut() {
        match hotkey {
            Some(i) if *i == index => *hotkey = None,
            Some(i) if *i > index => *i -= 1,
            _ => {}
        }
    }
    let name = item.name.clone();
    if let Some(previous) = player.equipment.insert(slot, item) {
        player.inventory.push(previous);
    }
    format!("Equipped {}.", name)
}

/// Removes the item in `slot` and returns it to the inventory.
pub fn unequip_item(player: &mut PlayerState, slot: EquipSlot) -> String {
    let Some(item) = player.equipment.remove(&slot) else {
        return "Nothing equipped there.".to_string();
    };
    let name = item.name.clone();
    player.inventory.push(item);
    format!("Unequipped {}.", name)
}

/// Binds a hotkey to an inventory index, or clears it with `None`.
pub fn set_hotkey(player: &mut PlayerState, hotkey: usize, item: Option<usize>) -> String {
    if hotkey >= HOTKEY_SLOTS {
        return "Invalid choice".to_string();
    }
    if let Some(index) = item {
        if index >= player.inventory.len() {
            return "Invalid choice".to_string();
        }
    }
    player.hotkeys[hotkey] = item;
    match item {
        Some(index) => format!("Hotkey {} set to {}.", hotkey + 1, player.inventory[index].name),
        None => format!("Hotkey {} cleared.", hotkey + 1),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effective stats
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant {
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub combo: u32,
}

/// Folds stats, equipment, companion, and perks into the numbers the fight
/// loop uses. The weapon's type decides which stat backs the attack.
pub fn effective_stats(player: &PlayerState) -> Combatant {
    let weapon = player.equipment.get(&EquipSlot::Weapon);

    let base_stat = match weapon.map(|w| w.weapon_type) {
        Some(WeaponType::Ranged) => player.speed,
        Some(WeaponType::Magic) => player.intelligence,
        _ => player.strength,
    } as i32;

    let mut attack = base_stat + weapon.map(|w| w.attack).unwrap_or(0);
    let mut defense = player.defense as i32;
    let mut speed = player.speed as i32;
    let combo = weapon.map(|w| w.combo.max(1)).unwrap_or(1);

    for item in player.equipment.values() {
        defense += item.defense;
        if item.slot != Some(EquipSlot::Weapon) {
            speed += item.speed;
        }
    }
    if let Some(w) = weapon {
        speed += w.speed;
    }

    match player.companion {
        Some(CompanionSpecies::Dog) => defense += 1,
        Some(CompanionSpecies::Rhino) => attack += 1,
        _ => {}
    }
    if player.perk_level("Bar Champion") >= 1 {
        attack += 2;
    }

    Combatant {
        attack,
        defense,
        speed,
        combo,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The fight loop
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FightReport {
    pub victory: bool,
    pub log: Vec<String>,
    pub reward: f64,
    pub loot: Vec<String>,
}

/// Runs a whole fight to completion. The player's health is written back,
/// clamped at zero; the caller decides what the venue pays on top.
pub fn resolve_fight(player: &mut PlayerState, enemy: &EnemyDef, rng: &mut impl Rng) -> FightReport {
    let me = effective_stats(player);
    let mut my_hp = player.health as i32;
    let mut enemy_hp = enemy.health;
    let mut log = Vec::new();

    let player_first = me.speed >= enemy.speed;
    let mut power_strike_used = false;
    let mut bleed_turns = 0u32;

    log.push(format!("{} squares up!", enemy.name));

    while my_hp > 0 && enemy_hp > 0 {
        let order: [bool; 2] = if player_first {
            [true, false]
        } else {
            [false, true]
        };
        for is_player in order {
            if my_hp <= 0 || enemy_hp <= 0 {
                break;
            }
            if is_player {
                for _ in 0..me.combo {
                    if enemy_hp <= 0 {
                        break;
                    }
                    let mut dmg = (me.attack - enemy.defense).max(1);
                    if !power_strike_used && rng.gen_bool(POWER_STRIKE_CHANCE) {
                        power_strike_used = true;
                        dmg *= 2;
                        bleed_turns = 3;
                        log.push(format!("Power strike! {} damage and bleeding!", dmg));
                    }
                    enemy_hp -= dmg;
                }
                if bleed_turns > 0 && enemy_hp > 0 {
                    bleed_turns -= 1;
                    enemy_hp -= 1;
                    log.push(format!("{} bleeds.", enemy.name));
                }
            } else {
                let dodge = DODGE_BASE + 0.02 * me.speed.max(0) as f64;
                if rng.gen_bool(dodge.min(0.95)) {
                    log.push("You dodge!".to_string());
                } else {
                    let dmg = (enemy.attack - me.defense).max(1);
                    my_hp -= dmg;
                    log.push(format!("{} hits you for {}.", enemy.name, dmg));
                }
            }
        }
    }

    player.health = my_hp.max(0) as f32;

    // A fight wears the weapon down whatever the outcome.
    if let Some(weapon) = player.equipment.get_mut(&EquipSlot::Weapon) {
        weapon.durability = weapon.durability.saturating_sub(1);
    }

    let victory = enemy_hp <= 0;
    let mut loot = Vec::new();
    let mut reward = 0.0;

    if victory {
        reward = enemy.reward;
        player.money += reward;
        log.push(format!("You beat {}! +${:.0}", enemy.name, reward));

        if rng.gen_bool(0.2) {
            player.tokens += 1;
            loot.push("Found a token!".to_string());
        }
        if let Some(resource) = enemy.drop {
            if rng.gen_bool(0.3) {
                player.add_resource(resource, 1);
                loot.push(format!("Looted 1 {}.", resource));
            }
        }
        if player.companion == Some(CompanionSpecies::Parrot) {
            let chance = (0.25 * player.companion_level as f64).min(1.0);
            if chance > 0.0 && rng.gen_bool(chance) {
                player.tokens += 1;
                loot.push("Your parrot snatched a token!".to_string());
            }
        }
    } else {
        log.push("You lost the fight!".to_string());
        player.active_ability = None;
    }

    FightReport {
        victory,
        log,
        reward,
        loot,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Venues
// ─────────────────────────────────────────────────────────────────────────────

pub fn fight_forest_enemy(
    player: &mut PlayerState,
    enemy_index: usize,
    rng: &mut impl Rng,
) -> String {
    let enemies = forest_enemies();
    let Some(enemy) = enemies.get(enemy_index) else {
        return "Invalid choice".to_string();
    };
    if player.energy < FIGHT_ENERGY_COST {
        return "Too tired.".to_string();
    }
    let cost = player.energy_cost(FIGHT_ENERGY_COST);
    player.spend_energy(cost);

    let report = resolve_fight(player, enemy, rng);
    if report.victory {
        player.enemies_defeated += 1;
        format!("You beat {}! +${:.0}", enemy.name, report.reward)
    } else {
        "You lost the fight!".to_string()
    }
}

/// One brawl, one energy debit.
pub fn fight_brawler(player: &mut PlayerState, rng: &mut impl Rng) -> String {
    let Some(enemy) = brawler(player.brawls_won) else {
        return "No challengers remain.".to_string();
    };
    if player.energy < FIGHT_ENERGY_COST {
        return "Too tired.".to_string();
    }
    let cost = player.energy_cost(FIGHT_ENERGY_COST);
    player.spend_energy(cost);

    let report = resolve_fight(player, &enemy, rng);
    if report.victory {
        player.brawls_won += 1;
        format!("You beat {} in a brawl! +${:.0}", enemy.name, report.reward)
    } else {
        "You lost the fight!".to_string()
    }
}

pub fn fight_boss(player: &mut PlayerState, rng: &mut impl Rng) -> String {
    if player.boss_defeated {
        return "The arena stands silent.".to_string();
    }
    if player.energy < FIGHT_ENERGY_COST {
        return "Too tired.".to_string();
    }
    let cost = player.energy_cost(FIGHT_ENERGY_COST);
    player.spend_energy(cost);

    let enemy = final_boss();
    let report = resolve_fight(player, &enemy, rng);
    if report.victory {
        player.boss_defeated = true;
        player.inventory.push(legendary_sword());
        info!("[Combat] Boss defeated, Legendary Sword awarded");
        format!(
            "You defeated {}! The Legendary Sword is yours!",
            enemy.name
        )
    } else {
        "You lost the fight!".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request plumbing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub enum FightRequestEvent {
    Forest(usize),
    Brawl,
    Boss,
}

fn handle_fight_requests(
    mut requests: EventReader<FightRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let mut rng = rand::thread_rng();
    for ev in requests.read() {
        let message = match ev {
            FightRequestEvent::Forest(index) => fight_forest_enemy(&mut player, *index, &mut rng),
            FightRequestEvent::Brawl => fight_brawler(&mut player, &mut rng),
            FightRequestEvent::Boss => fight_boss(&mut player, &mut rng),
        };
        info!("[Combat] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

#[derive(Event, Debug, Clone)]
pub enum EquipRequestEvent {
    Equip(usize),
    Unequip(EquipSlot),
    SetHotkey(usize, Option<usize>),
}

fn handle_equip_requests(
    mut requests: EventReader<EquipRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        let message = match ev {
            EquipRequestEvent::Equip(index) => equip_item(&mut player, *index),
            EquipRequestEvent::Unequip(slot) => unequip_item(&mut player, *slot),
            EquipRequestEvent::SetHotkey(hotkey, item) => set_hotkey(&mut player, *hotkey, *item),
        };
        info!("[Combat] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
