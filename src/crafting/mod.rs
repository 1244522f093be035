//! Crafting domain — data-driven recipes, per-skill experience, and repair.

use bevy::prelude::*;

use crate::shared::*;

pub struct CraftingPlugin;

impl Plugin for CraftingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CraftRequestEvent>().add_systems(
            Update,
            handle_craft_requests.run_if(in_state(GameState::Playing)),
        );
    }
}

pub const CRAFT_EXP_PER_ITEM: u32 = 25;
pub const REPAIR_EXP: u32 = 10;

/// XP to clear the given skill level.
pub fn craft_exp_needed(level: u32) -> u32 {
    CRAFT_EXP_BASE * level
}

/// Grants XP to a crafting skill, levelling up as many times as the total
/// allows.
pub fn grant_craft_exp(player: &mut PlayerState, skill: &str, amount: u32) -> u32 {
    let exp = player.craft_exp.entry(skill.to_string()).or_insert(0);
    *exp += amount;
    let mut exp_left = *exp;

    let level = player.craft_levels.entry(skill.to_string()).or_insert(1);
    let mut gained = 0;
    while exp_left >= craft_exp_needed(*level) {
        exp_left -= craft_exp_needed(*level);
        *level += 1;
        gained += 1;
    }
    player.craft_exp.insert(skill.to_string(), exp_left);
    if gained > 0 {
        info!("[Crafting] {} skill up (+{})", skill, gained);
    }
    gained
}

pub fn craft_item(player: &mut PlayerState, registry: &RecipeRegistry, name: &str) -> String {
    let Some(recipe) = registry.get(name) else {
        return "Unknown recipe".to_string();
    };
    if !player.known_recipes.contains(name) {
        return "Recipe not known".to_string();
    }
    let skill_level = player.craft_levels.get(&recipe.skill).copied().unwrap_or(1);
    if skill_level < recipe.level {
        return format!(
            "Requires {} level {}.",
            recipe.skill, recipe.level
        );
    }
    for (resource, amount) in &recipe.requires {
        if player.resource(resource) < *amount {
            return format!("Need {} {}", amount, resource);
        }
    }
    // All checks passed; consumption cannot fail now
    for (resource, amount) in &recipe.requires {
        player.take_resource(resource, *amount);
    }
    player.inventory.push(recipe.produces.clone());
    let skill = recipe.skill.clone();
    let produced = recipe.produces.name.clone();
    grant_craft_exp(player, &skill, CRAFT_EXP_PER_ITEM);
    format!("Crafted {}!", produced)
}

/// One metal buys a full workshop pass over everything equipped.
pub fn repair_equipment(player: &mut PlayerState) -> String {
    if player.equipment.is_empty() {
        return "Nothing equipped.".to_string();
    }
    if !player.take_resource("metal", 1) {
        return "Need 1 metal".to_string();
    }
    for item in player.equipment.values_mut() {
        item.durability = item.max_durability;
    }
    grant_craft_exp(player, "smithing", REPAIR_EXP);
    "All equipment repaired!".to_string()
}

#[derive(Event, Debug, Clone)]
pub enum CraftRequestEvent {
    Craft(String),
    Repair,
}

fn handle_craft_requests(
    mut requests: EventReader<CraftRequestEvent>,
    mut player: ResMut<PlayerState>,
    registry: Res<RecipeRegistry>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        let message = match ev {
            CraftRequestEvent::Craft(name) => craft_item(&mut player, &registry, name),
            CraftRequestEvent::Repair => repair_equipment(&mut player),
        };
        info!("[Crafting] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn registry() -> RecipeRegistry {
        let mut requires = BTreeMap::new();
        requires.insert("metal".to_string(), 2);

        let mut sword = Item::basic("Iron Sword");
        sword.slot = Some(EquipSlot::Weapon);
        sword.attack = 4;

        let mut reg = RecipeRegistry::default();
        reg.recipes.insert(
            "Iron Sword".to_string(),
            RecipeDef {
                name: "Iron Sword".to_string(),
                skill: "smithing".to_string(),
                level: 1,
                requires,
                produces: sword,
            },
        );

        let mut requires = BTreeMap::new();
        requires.insert("cloth".to_string(), 3);
        let mut tunic = Item::basic("Fine Tunic");
        tunic.slot = Some(EquipSlot::Chest);
        tunic.defense = 2;
        reg.recipes.insert(
            "Fine Tunic".to_string(),
            RecipeDef {
                name: "Fine Tunic".to_string(),
                skill: "tailoring".to_string(),
                level: 3,
                requires,
                produces: tunic,
            },
        );
        reg
    }

    #[test]
    fn test_craft_success_consumes_and_awards() {
        let reg = registry();
        let mut player = PlayerState::default();
        player.known_recipes.insert("Iron Sword".to_string());
        player.add_resource("metal", 3);

        let msg = craft_item(&mut player, &reg, "Iron Sword");
        assert_eq!(msg, "Crafted Iron Sword!");
        assert_eq!(player.resource("metal"), 1);
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.craft_exp["smithing"], 25);
    }

    #[test]
    fn test_craft_refusals_are_noops() {
        let reg = registry();
        let mut player = PlayerState::default();

        assert_eq!(craft_item(&mut player, &reg, "Mithril Axe"), "Unknown recipe");
        assert_eq!(craft_item(&mut player, &reg, "Iron Sword"), "Recipe not known");

        player.known_recipes.insert("Iron Sword".to_string());
        assert_eq!(craft_item(&mut player, &reg, "Iron Sword"), "Need 2 metal");
        assert!(player.inventory.is_empty());

        player.known_recipes.insert("Fine Tunic".to_string());
        player.add_resource("cloth", 5);
        let msg = craft_item(&mut player, &reg, "Fine Tunic");
        assert_eq!(msg, "Requires tailoring level 3.");
        assert_eq!(player.resource("cloth"), 5, "refusal must not consume");
    }

    #[test]
    fn test_multi_level_exp_grant() {
        let mut player = PlayerState::default();
        // 50 to clear level 1, 100 to clear level 2
        let gained = grant_craft_exp(&mut player, "smithing", 160);
        assert_eq!(gained, 2);
        assert_eq!(player.craft_levels["smithing"], 3);
        assert_eq!(player.craft_exp["smithing"], 10);
    }

    #[test]
    fn test_repair_restores_all_equipped() {
        let mut player = PlayerState::default();
        let mut sword = Item::basic("Iron Sword");
        sword.durability = 3;
        sword.max_durability = 40;
        player.equipment.insert(EquipSlot::Weapon, sword);
        let mut helm = Item::basic("Cap");
        helm.durability = 1;
        helm.max_durability = 20;
        player.equipment.insert(EquipSlot::Head, helm);

        assert_eq!(repair_equipment(&mut player), "Need 1 metal");

        player.add_resource("metal", 1);
        assert_eq!(repair_equipment(&mut player), "All equipment repaired!");
        assert_eq!(player.resource("metal"), 0);
        assert!(player
            .equipment
            .values()
            .all(|i| i.durability == i.max_durability));
        assert_eq!(player.craft_exp["smithing"], 10);
    }
}
