//! Home domain — upgrades, furniture, and the sleep cycle.
//!
//! Sleeping is the one transaction that touches several domains at once:
//! it advances the day, credits bank interest, applies every morning bonus,
//! and collects business profits, in a fixed order with no failure path.

use bevy::prelude::*;
use rand::Rng;

use crate::business;
use crate::calendar;
use crate::economy;
use crate::shared::*;

pub struct HomePlugin;

impl Plugin for HomePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HomeRequestEvent>().add_systems(
            Update,
            (handle_sleep_requests, handle_home_requests)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upgrades and furniture
// ─────────────────────────────────────────────────────────────────────────────

pub struct HomeUpgradeDef {
    pub name: &'static str,
    pub cost: f64,
}

pub const HOME_UPGRADES: &[HomeUpgradeDef] = &[
    HomeUpgradeDef {
        name: "Comfy Bed",
        cost: 300.0,
    },
    HomeUpgradeDef {
        name: "Decorations",
        cost: 150.0,
    },
    HomeUpgradeDef {
        name: "Study Desk",
        cost: 200.0,
    },
    HomeUpgradeDef {
        name: "Home Gym",
        cost: 400.0,
    },
    HomeUpgradeDef {
        name: "Private Library",
        cost: 600.0,
    },
    HomeUpgradeDef {
        name: "Garden",
        cost: 250.0,
    },
    HomeUpgradeDef {
        name: "Arcade Room",
        cost: 500.0,
    },
];

pub const HOME_LEVEL_COSTS: &[f64] = &[1000.0, 3000.0];
pub const MAX_HOME_LEVEL: u32 = 3;

pub fn buy_home_upgrade(player: &mut PlayerState, name: &str) -> String {
    let Some(def) = HOME_UPGRADES.iter().find(|u| u.name == name) else {
        return "No such upgrade.".to_string();
    };
    if player.home_upgrades.contains(name) {
        return "Already owned".to_string();
    }
    if !player.try_spend_money(def.cost) {
        return "Not enough money!".to_string();
    }
    player.home_upgrades.insert(name.to_string());
    format!("Bought {}!", name)
}

pub fn upgrade_home(player: &mut PlayerState) -> String {
    if player.home_level >= MAX_HOME_LEVEL {
        return "Your home is fully upgraded.".to_string();
    }
    let cost = HOME_LEVEL_COSTS[(player.home_level - 1) as usize];
    if !player.try_spend_money(cost) {
        return "Not enough money!".to_string();
    }
    player.home_level += 1;
    format!("Home upgraded to level {}!", player.home_level)
}

pub fn place_furniture(
    player: &mut PlayerState,
    slot: usize,
    item: Item,
    x: f32,
    y: f32,
    rotation: f32,
) -> String {
    if slot >= FURNITURE_SLOTS {
        return "Invalid choice".to_string();
    }
    let name = item.name.clone();
    player.furniture[slot] = Some(FurniturePlacement {
        item,
        x,
        y,
        rotation,
    });
    format!("Placed {}.", name)
}

/// Morning stat bonus a piece of placed furniture grants, if any.
pub fn furniture_bonus(name: &str) -> Option<(StatKind, u32)> {
    match name {
        "Decor Chair" => Some((StatKind::Charisma, 1)),
        "Bookcase" => Some((StatKind::Intelligence, 1)),
        "Weight Bench" => Some((StatKind::Strength, 1)),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The sleep cycle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SleepReport {
    pub new_day: u32,
    pub season_changed: bool,
    pub messages: Vec<String>,
}

impl SleepReport {
    pub fn summary(&self) -> String {
        if self.messages.is_empty() {
            format!("Day {}. Slept well.", self.new_day)
        } else {
            format!("Day {}. {}", self.new_day, self.messages.join(" "))
        }
    }
}

/// The whole night in one pass. Order matters: the day advances before any
/// morning effect, so interest and profits land on the new day.
pub fn run_sleep_cycle(player: &mut PlayerState, rng: &mut impl Rng) -> SleepReport {
    let mut messages = Vec::new();

    // 1. Restore energy
    let mut energy = 100.0;
    if player.home_upgrades.contains("Comfy Bed") {
        energy += 20.0;
        messages.push("The comfy bed left you extra rested.".to_string());
    }
    let night_owl = player.perk_level("Night Owl");
    if night_owl > 0 {
        energy += 10.0 * night_owl as f32;
    }
    player.energy = energy;

    // 2. New day
    player.time_minutes = WAKE_UP_MINUTES;
    let season_changed = calendar::advance_day(player, rng);
    if season_changed {
        messages.push(format!("{:?} has arrived!", player.season));
    }

    let interest = economy::credit_interest(player);
    if interest > 0.0 {
        messages.push(format!("Bank interest: +${:.0}.", interest));
    }

    // 3. Home upgrade morning bumps
    if player.home_upgrades.contains("Decorations") {
        player.gain_stat(StatKind::Charisma, 1);
    }
    if player.home_upgrades.contains("Study Desk") {
        player.gain_stat(StatKind::Intelligence, 1);
    }
    if player.home_upgrades.contains("Home Gym") {
        player.gain_stat(StatKind::Strength, 1);
    }
    if player.home_upgrades.contains("Private Library") {
        player.gain_stat(StatKind::Intelligence, 2);
    }
    if player.perk_level("Home Owner") >= 1 {
        player.health = (player.health + 10.0).min(100.0);
    }

    // 4. Furniture bonuses
    for placement in player.furniture.clone().iter().flatten() {
        if let Some((kind, amount)) = furniture_bonus(&placement.item.name) {
            player.gain_stat(kind, amount);
        }
    }

    // 5. Dog brings things home
    if player.companion == Some(CompanionSpecies::Dog) && player.companion_level >= 1 {
        let chance = 0.2 + 0.2 * (player.companion_level - 1) as f64;
        if rng.gen_bool(chance.min(1.0)) {
            let payout = 5.0 * player.companion_level as f64;
            player.money += payout;
            messages.push(format!("Your dog dug up ${:.0}!", payout));
        }
    }

    // 6. Garden and arcade
    if player.home_upgrades.contains("Garden") && rng.gen_bool(0.3) {
        player.money += 10.0;
        messages.push("The garden yielded $10 of vegetables.".to_string());
    }
    if player.home_upgrades.contains("Arcade Room") && rng.gen_bool(0.3) {
        player.tokens += 1;
        messages.push("Found a token under the arcade cabinet.".to_string());
    }

    // 7. Business profits
    let profits = business::collect_profits(player, rng);
    for line in &profits.lines {
        if line.robbed {
            messages.push(format!("{} was robbed overnight!", line.business));
        }
    }
    if profits.total != 0.0 {
        messages.push(format!("Businesses earned ${:.0}.", profits.total));
    }

    info!("[Home] Slept into day {}", player.day);
    SleepReport {
        new_day: player.day,
        season_changed,
        messages,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

fn handle_sleep_requests(
    mut requests: EventReader<SleepRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut day_ends: EventWriter<DayEndEvent>,
    mut season_changes: EventWriter<SeasonChangeEvent>,
    mut saves: EventWriter<SaveRequestEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for _ in requests.read() {
        let mut rng = rand::thread_rng();
        let report = run_sleep_cycle(&mut player, &mut rng);

        day_ends.send(DayEndEvent {
            new_day: report.new_day,
            season: player.season,
        });
        if report.season_changed {
            season_changes.send(SeasonChangeEvent {
                new_season: player.season,
            });
        }
        saves.send(SaveRequestEvent);
        toasts.send(ToastEvent::new(report.summary()));
    }
}

#[derive(Event, Debug, Clone)]
pub enum HomeRequestEvent {
    BuyUpgrade(String),
    UpgradeHome,
    PlaceFurniture {
        slot: usize,
        item: Item,
        x: f32,
        y: f32,
        rotation: f32,
    },
}

fn handle_home_requests(
    mut requests: EventReader<HomeRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        let message = match ev {
            HomeRequestEvent::BuyUpgrade(name) => buy_home_upgrade(&mut player, name),
            HomeRequestEvent::UpgradeHome => upgrade_home(&mut player),
            HomeRequestEvent::PlaceFurniture {
                slot,
                item,
                x,
                y,
                rotation,
            } => place_furniture(&mut player, *slot, item.clone(), *x, *y, *rotation),
        };
        info!("[Home] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
