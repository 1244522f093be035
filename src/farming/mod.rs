//! Farming domain — crops by day count, and farm animals.
//!
//! Seeds and harvested produce live in the shared resource map under
//! `<crop>_seeds` / `<crop>` keys, plus a generic `produce` counter that
//! quest goals track.

use bevy::prelude::*;

use crate::shared::*;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FarmRequestEvent>().add_systems(
            Update,
            handle_farm_requests.run_if(in_state(GameState::Playing)),
        );
    }
}

pub const EGG_PRICE: f64 = 5.0;
pub const MILK_PRICE: f64 = 15.0;

pub struct AnimalDef {
    pub name: &'static str,
    pub cost: f64,
    /// Daily feed cost per head.
    pub feed_cost: f64,
    /// Resource each fed head yields.
    pub product: &'static str,
}

pub const ANIMALS: &[AnimalDef] = &[
    AnimalDef {
        name: "chicken",
        cost: 100.0,
        feed_cost: 2.0,
        product: "eggs",
    },
    AnimalDef {
        name: "cow",
        cost: 300.0,
        feed_cost: 5.0,
        product: "milk",
    },
];

pub fn animal_def(name: &str) -> Option<&'static AnimalDef> {
    ANIMALS.iter().find(|a| a.name == name)
}

pub fn seed_key(kind: &str) -> String {
    format!("{}_seeds", kind)
}

// ─────────────────────────────────────────────────────────────────────────────
// Crops
// ─────────────────────────────────────────────────────────────────────────────

pub fn plant_crop(player: &mut PlayerState, registry: &CropRegistry, kind: &str) -> String {
    if registry.get(kind).is_none() {
        return "Unknown crop.".to_string();
    }
    if !player.take_resource(&seed_key(kind), 1) {
        return format!("No {} seeds.", kind);
    }
    let day = player.day;
    player.crops.push(PlantedCrop {
        kind: kind.to_string(),
        planted_day: day,
    });
    format!("Planted {}.", kind)
}

/// Pulls every crop that has finished growing. Each harvested plant adds one
/// to its own resource count and one to the generic `produce` counter.
pub fn harvest_crops(player: &mut PlayerState, registry: &CropRegistry) -> String {
    let day = player.day;
    let mut ready = Vec::new();
    let mut keep = Vec::new();

    for crop in player.crops.drain(..) {
        let grown = registry
            .get(&crop.kind)
            .map(|def| day.saturating_sub(crop.planted_day) >= def.growth_days)
            .unwrap_or(false);
        if grown {
            ready.push(crop.kind);
        } else {
            keep.push(crop);
        }
    }
    player.crops = keep;

    if ready.is_empty() {
        return "Nothing is ready to harvest.".to_string();
    }

    let count = ready.len();
    for kind in ready {
        player.add_resource(&kind, 1);
        player.add_resource("produce", 1);
        player.harvest_total += 1;
    }
    info!("[Farming] Harvested {} crops", count);
    format!("Harvested {} crops!", count)
}

/// Sells every held crop at its list price. A Llama companion tops up each
/// crop type's payout by $5 per companion level.
pub fn sell_produce(player: &mut PlayerState, registry: &CropRegistry) -> String {
    let llama_bonus = if player.companion == Some(CompanionSpecies::Llama) {
        5.0 * player.companion_level as f64
    } else {
        0.0
    };

    let mut earned = 0.0;
    let mut produce_sold = 0;
    for (kind, def) in registry.crops.iter() {
        let count = player.resource(kind);
        if count == 0 {
            continue;
        }
        earned += count as f64 * def.sell_price + llama_bonus;
        produce_sold += count;
        player.resources.insert(kind.clone(), 0);
    }

    if produce_sold == 0 {
        return "No produce to sell.".to_string();
    }

    // The generic counter tracks held produce, so it empties with the sale.
    let remaining = player.resource("produce").saturating_sub(produce_sold);
    player.resources.insert("produce".to_string(), remaining);

    player.money += earned;
    info!("[Farming] Sold {} produce for ${:.0}", produce_sold, earned);
    format!("Sold produce for ${:.0}!", earned)
}

// ─────────────────────────────────────────────────────────────────────────────
// Animals
// ─────────────────────────────────────────────────────────────────────────────

pub fn buy_animal(player: &mut PlayerState, name: &str) -> String {
    let Some(def) = animal_def(name) else {
        return "No such animal.".to_string();
    };
    if !player.try_spend_money(def.cost) {
        return "Not enough money!".to_string();
    }
    *player.animals.entry(name.to_string()).or_insert(0) += 1;
    format!("Bought a {}!", name)
}

/// Feeds every animal of a kind. Feed is bought with cash in proportion to
/// the herd; each fed head produces one unit of its product.
pub fn feed_animals(player: &mut PlayerState, name: &str) -> String {
    let Some(def) = animal_def(name) else {
        return "No such animal.".to_string();
    };
    let count = player.animals.get(name).copied().unwrap_or(0);
    if count == 0 {
        return format!("You don't have any {}s.", name);
    }
    let cost = def.feed_cost * count as f64;
    if !player.try_spend_money(cost) {
        return "Not enough money!".to_string();
    }
    player.add_resource(def.product, count);
    format!("Fed {} {}s (+{} {}).", count, name, count, def.product)
}

pub fn sell_animal_products(player: &mut PlayerState) -> String {
    let eggs = player.resource("eggs");
    let milk = player.resource("milk");
    if eggs == 0 && milk == 0 {
        return "Nothing to sell.".to_string();
    }
    let earned = eggs as f64 * EGG_PRICE + milk as f64 * MILK_PRICE;
    player.resources.insert("eggs".to_string(), 0);
    player.resources.insert("milk".to_string(), 0);
    player.money += earned;
    format!("Sold animal products for ${:.0}!", earned)
}

// ─────────────────────────────────────────────────────────────────────────────
// Request plumbing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub enum FarmRequestEvent {
    Plant(String),
    Harvest,
    SellProduce,
    BuyAnimal(String),
    Feed(String),
    SellAnimalProducts,
}

fn handle_farm_requests(
    mut requests: EventReader<FarmRequestEvent>,
    mut player: ResMut<PlayerState>,
    registry: Res<CropRegistry>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        let message = match ev {
            FarmRequestEvent::Plant(kind) => plant_crop(&mut player, &registry, kind),
            FarmRequestEvent::Harvest => harvest_crops(&mut player, &registry),
            FarmRequestEvent::SellProduce => sell_produce(&mut player, &registry),
            FarmRequestEvent::BuyAnimal(name) => buy_animal(&mut player, name),
            FarmRequestEvent::Feed(name) => feed_animals(&mut player, name),
            FarmRequestEvent::SellAnimalProducts => sell_animal_products(&mut player),
        };
        info!("[Farming] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
