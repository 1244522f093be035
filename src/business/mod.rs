//! Business domain — buying, upgrading and running businesses.
//!
//! Three tiers form an upgrade chain (Stall → Store → Franchise). Daily
//! profits are collected by the sleep cycle; everything else is a direct
//! player operation that returns a user-visible message.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct BusinessPlugin;

impl Plugin for BusinessPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BusinessRequestEvent>().add_systems(
            Update,
            handle_business_requests.run_if(in_state(GameState::Playing)),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier data
// ─────────────────────────────────────────────────────────────────────────────

pub struct BusinessTier {
    pub name: &'static str,
    pub cost: f64,
    pub base_profit: f64,
    pub upgrade_to: Option<&'static str>,
    pub upgrade_cost: f64,
    /// Daily wage per staff member.
    pub staff_cost: f64,
}

pub const BUSINESS_TIERS: &[BusinessTier] = &[
    BusinessTier {
        name: "Stall",
        cost: 500.0,
        base_profit: 30.0,
        upgrade_to: Some("Store"),
        upgrade_cost: 1500.0,
        staff_cost: 10.0,
    },
    BusinessTier {
        name: "Store",
        cost: 2000.0,
        base_profit: 80.0,
        upgrade_to: Some("Franchise"),
        upgrade_cost: 5000.0,
        staff_cost: 30.0,
    },
    BusinessTier {
        name: "Franchise",
        cost: 7000.0,
        base_profit: 200.0,
        upgrade_to: None,
        upgrade_cost: 0.0,
        staff_cost: 60.0,
    },
];

pub fn tier(name: &str) -> Option<&'static BusinessTier> {
    BUSINESS_TIERS.iter().find(|t| t.name == name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

pub fn buy_business(player: &mut PlayerState, name: &str) -> String {
    let Some(tier) = tier(name) else {
        return "No such business.".to_string();
    };
    if player.businesses.contains_key(name) {
        return format!("You already own a {}.", name);
    }
    if !player.try_spend_money(tier.cost) {
        return "Not enough money!".to_string();
    }
    player
        .businesses
        .insert(name.to_string(), Business::new(tier.base_profit));
    info!("[Business] Bought {} for ${:.0}", name, tier.cost);
    format!("You bought a {}!", name)
}

/// Moves the business to the next tier, carrying its earned bonus, staff,
/// reputation and skill into the new record and deleting the old entry.
pub fn upgrade_business(player: &mut PlayerState, name: &str) -> String {
    let Some(current) = tier(name) else {
        return "No such business.".to_string();
    };
    if !player.businesses.contains_key(name) {
        return format!("You don't own a {}.", name);
    }
    let Some(next_name) = current.upgrade_to else {
        return format!("{} is already fully upgraded.", name);
    };
    if !player.try_spend_money(current.upgrade_cost) {
        return "Not enough money!".to_string();
    }

    let old = player.businesses.remove(name).unwrap_or_default();
    let next = tier(next_name).expect("upgrade chain names a defined tier");
    player.businesses.insert(
        next_name.to_string(),
        Business {
            base_profit: next.base_profit,
            bonus: old.bonus,
            staff: old.staff,
            reputation: old.reputation,
            skill: old.skill,
        },
    );
    info!(
        "[Business] Upgraded {} -> {} for ${:.0}",
        name, next_name, current.upgrade_cost
    );
    format!("Upgraded {} to {}!", name, next_name)
}

/// A hands-on management session. Success depends on charisma plus a roll;
/// the "Loyal Customers" quest reward adds a flat +5.
pub fn manage_business(player: &mut PlayerState, name: &str, rng: &mut impl Rng) -> String {
    if !player.businesses.contains_key(name) {
        return format!("You don't own a {}.", name);
    }
    if player.energy < 5.0 {
        return "Too tired.".to_string();
    }
    let cost = player.energy_cost(5.0);
    player.spend_energy(cost);

    let mut chance = player.charisma as i32 + rng.gen_range(0..=10);
    if player.perk_level("Loyal Customers") >= 1 {
        chance += 5;
    }

    if chance >= 8 {
        let mut gain = rng.gen_range(10.0..=30.0);
        if player.perk_level("Investor") >= 1 {
            gain *= 1.5;
        }
        if let Some(biz) = player.businesses.get_mut(name) {
            biz.bonus += gain;
        }
        format!("A productive day at the {}! (+${:.0} bonus)", name, gain)
    } else {
        format!("Nothing came of today's work at the {}.", name)
    }
}

pub fn run_marketing(player: &mut PlayerState, name: &str, rng: &mut impl Rng) -> String {
    if !player.businesses.contains_key(name) {
        return format!("You don't own a {}.", name);
    }
    if !player.try_spend_money(MARKETING_COST) {
        return "Not enough money!".to_string();
    }
    let gain = rng.gen_range(10..=30);
    if let Some(biz) = player.businesses.get_mut(name) {
        biz.reputation += gain;
    }
    format!("Marketing campaign boosted {} reputation by {}.", name, gain)
}

pub fn train_staff(player: &mut PlayerState, name: &str, rng: &mut impl Rng) -> String {
    if !player.businesses.contains_key(name) {
        return format!("You don't own a {}.", name);
    }
    if player.energy < 5.0 {
        return "Too tired.".to_string();
    }
    let cost = player.energy_cost(5.0);
    player.spend_energy(cost);
    let gain = rng.gen_range(1..=3);
    if let Some(biz) = player.businesses.get_mut(name) {
        biz.skill += gain;
    }
    format!("Staff training improved {} skill by {}.", name, gain)
}

pub fn hire_staff(player: &mut PlayerState, name: &str, count: u32) -> String {
    let Some(biz) = player.businesses.get_mut(name) else {
        return format!("You don't own a {}.", name);
    };
    biz.staff += count;
    format!("Hired {} staff for the {}.", count, name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily profits
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitLine {
    pub business: String,
    pub profit: f64,
    pub robbed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfitReport {
    pub lines: Vec<ProfitLine>,
    pub total: f64,
}

/// Raw daily profit before the robbery roll.
pub fn daily_profit(biz: &Business, tier: &BusinessTier, charisma: u32) -> f64 {
    biz.base_profit + 2.0 * charisma as f64 + biz.bonus + 10.0 * biz.staff as f64
        - tier.staff_cost * biz.staff as f64
        + biz.reputation as f64
}

/// Robbery risk shrinks with staff presence and staff skill; it never drops
/// below 2%.
pub fn robbery_chance(biz: &Business) -> f64 {
    (0.1 - 0.02 * biz.staff as f64 - 0.02 * biz.skill as f64).max(0.02)
}

/// End-of-day collection, called from the sleep cycle. Adds the aggregate
/// to money, and resets each business's daily bonus, reputation and skill.
/// Settlement is floored at zero per business: an overstaffed shop earns
/// nothing, it never drains cash.
pub fn collect_profits(player: &mut PlayerState, rng: &mut impl Rng) -> ProfitReport {
    let charisma = player.charisma;
    let mut report = ProfitReport::default();

    for (name, biz) in player.businesses.iter_mut() {
        let Some(tier) = tier(name) else {
            continue;
        };

        let robbed = rng.gen::<f64>() < robbery_chance(biz);
        let profit = if robbed {
            warn!("[Business] {} was robbed overnight!", name);
            0.0
        } else {
            daily_profit(biz, tier, charisma).max(0.0)
        };

        biz.bonus = 0.0;
        biz.reputation = 0;
        biz.skill = 0;

        report.total += profit;
        report.lines.push(ProfitLine {
            business: name.clone(),
            profit,
            robbed,
        });
    }

    player.money += report.total;
    if !report.lines.is_empty() {
        info!("[Business] Daily profits collected: ${:.0}", report.total);
    }
    report
}

// ─────────────────────────────────────────────────────────────────────────────
// Request plumbing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub enum BusinessRequestEvent {
    Buy(String),
    Upgrade(String),
    Manage(String),
    Marketing(String),
    TrainStaff(String),
    Hire(String, u32),
}

fn handle_business_requests(
    mut requests: EventReader<BusinessRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let mut rng = rand::thread_rng();
    for ev in requests.read() {
        let message = match ev {
            BusinessRequestEvent::Buy(name) => buy_business(&mut player, name),
            BusinessRequestEvent::Upgrade(name) => upgrade_business(&mut player, name),
            BusinessRequestEvent::Manage(name) => manage_business(&mut player, name, &mut rng),
            BusinessRequestEvent::Marketing(name) => run_marketing(&mut player, name, &mut rng),
            BusinessRequestEvent::TrainStaff(name) => train_staff(&mut player, name, &mut rng),
            BusinessRequestEvent::Hire(name, count) => hire_staff(&mut player, name, *count),
        };
        info!("[Business] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
