//! Companion domain — adoption, training, and per-species abilities.

use bevy::prelude::*;

use crate::shared::*;

pub struct CompanionPlugin;

impl Plugin for CompanionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CompanionRequestEvent>().add_systems(
            Update,
            (handle_companion_requests, handle_free_abilities)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

pub const ABILITY_ENERGY_COST: f32 = 5.0;

/// What an ability (or adoption/training) improves. `Token` and `Cash` are
/// the special payouts some abilities grant instead of a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityBoost {
    Stat(StatKind),
    Token,
    Cash,
}

pub struct AbilityDef {
    pub name: &'static str,
    pub description: &'static str,
    pub boost: AbilityBoost,
}

/// The stat a species sharpens on adoption and on every training session.
pub fn species_stat(species: CompanionSpecies) -> StatKind {
    match species {
        CompanionSpecies::Dog => StatKind::Defense,
        CompanionSpecies::Cat | CompanionSpecies::Peacock => StatKind::Charisma,
        CompanionSpecies::Parrot => StatKind::Intelligence,
        CompanionSpecies::Llama => StatKind::Speed,
        CompanionSpecies::Rhino => StatKind::Strength,
    }
}

pub fn species_abilities(species: CompanionSpecies) -> &'static [AbilityDef] {
    match species {
        CompanionSpecies::Dog => &[
            AbilityDef {
                name: "Guard",
                description: "Stands watch while you rest.",
                boost: AbilityBoost::Stat(StatKind::Defense),
            },
            AbilityDef {
                name: "Fetch",
                description: "Brings back small valuables.",
                boost: AbilityBoost::Cash,
            },
        ],
        CompanionSpecies::Cat => &[
            AbilityDef {
                name: "Charm",
                description: "Everyone loves a cat person.",
                boost: AbilityBoost::Stat(StatKind::Charisma),
            },
            AbilityDef {
                name: "Pounce",
                description: "Quick reflexes rub off on you.",
                boost: AbilityBoost::Stat(StatKind::Speed),
            },
        ],
        CompanionSpecies::Parrot => &[
            AbilityDef {
                name: "Mimic",
                description: "Repeats everything it hears. Educational.",
                boost: AbilityBoost::Stat(StatKind::Intelligence),
            },
            AbilityDef {
                name: "Scavenge",
                description: "Spots shiny arcade tokens.",
                boost: AbilityBoost::Token,
            },
        ],
        CompanionSpecies::Llama => &[
            AbilityDef {
                name: "Pack Mule",
                description: "Carries your produce to market.",
                boost: AbilityBoost::Stat(StatKind::Strength),
            },
            AbilityDef {
                name: "Trot",
                description: "Sets a brisk walking pace.",
                boost: AbilityBoost::Stat(StatKind::Speed),
            },
        ],
        CompanionSpecies::Rhino => &[
            AbilityDef {
                name: "Charge",
                description: "Leads by unstoppable example.",
                boost: AbilityBoost::Stat(StatKind::Strength),
            },
            AbilityDef {
                name: "Thick Hide",
                description: "You learn to shrug things off.",
                boost: AbilityBoost::Stat(StatKind::Defense),
            },
        ],
        CompanionSpecies::Peacock => &[
            AbilityDef {
                name: "Display",
                description: "Impossible to ignore.",
                boost: AbilityBoost::Stat(StatKind::Charisma),
            },
            AbilityDef {
                name: "Strut",
                description: "Confidence is contagious.",
                boost: AbilityBoost::Cash,
            },
        ],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

pub fn adopt_companion(player: &mut PlayerState, species: CompanionSpecies) -> String {
    if player.companion.is_some() {
        return "You already have a companion.".to_string();
    }
    if !player.try_spend_money(COMPANION_ADOPT_COST) {
        return "Not enough money!".to_string();
    }
    player.companion = Some(species);
    player.companion_level = 1;
    player.companion_morale = 100;
    player.companion_abilities.clear();
    for ability in species_abilities(species) {
        player
            .companion_abilities
            .insert(ability.name.to_string(), 0);
    }
    player.gain_stat(species_stat(species), 1);
    info!("[Companion] Adopted a {}", species.display_name());
    format!("You adopted a {}!", species.display_name())
}

pub fn train_companion(player: &mut PlayerState) -> String {
    let Some(species) = player.companion else {
        return "You don't have a companion.".to_string();
    };
    if player.companion_level >= COMPANION_MAX_LEVEL {
        return "Your companion is fully trained.".to_string();
    }
    if player.energy < 10.0 {
        return "Too tired.".to_string();
    }
    if !player.try_spend_money(COMPANION_TRAIN_COST) {
        return "Not enough money!".to_string();
    }
    let cost = player.energy_cost(10.0);
    player.spend_energy(cost);
    player.companion_level += 1;
    player.companion_morale = player.companion_morale.saturating_sub(10);
    player.gain_stat(species_stat(species), 1);
    format!(
        "{} is now level {}!",
        species.display_name(),
        player.companion_level
    )
}

/// Raises one ability a level. Quest rewards call this with `free = true`,
/// which waives both the fee and the energy.
pub fn upgrade_ability(player: &mut PlayerState, index: usize, free: bool) -> String {
    let Some(species) = player.companion else {
        return "You don't have a companion.".to_string();
    };
    let abilities = species_abilities(species);
    let Some(ability) = abilities.get(index) else {
        return "Invalid choice".to_string();
    };

    let level = player
        .companion_abilities
        .get(ability.name)
        .copied()
        .unwrap_or(0);
    if level >= PERK_MAX_LEVEL {
        return format!("{} is already mastered.", ability.name);
    }

    if !free {
        let fee = COMPANION_TRAIN_COST * (level + 1) as f64;
        if player.energy < ABILITY_ENERGY_COST {
            return "Too tired.".to_string();
        }
        if !player.try_spend_money(fee) {
            return "Not enough money!".to_string();
        }
        let cost = player.energy_cost(ABILITY_ENERGY_COST);
        player.spend_energy(cost);
    }

    player
        .companion_abilities
        .insert(ability.name.to_string(), level + 1);

    let bonus = match ability.boost {
        AbilityBoost::Stat(kind) => {
            player.gain_stat(kind, 1);
            format!("+1 {}", kind.display_name())
        }
        AbilityBoost::Token => {
            player.tokens += 1;
            "+1 token".to_string()
        }
        AbilityBoost::Cash => {
            player.money += 5.0;
            "+$5".to_string()
        }
    };
    format!("{} improved to level {} ({}).", ability.name, level + 1, bonus)
}

// ─────────────────────────────────────────────────────────────────────────────
// Request plumbing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub enum CompanionRequestEvent {
    Adopt(CompanionSpecies),
    Train,
    UpgradeAbility(usize),
}

fn handle_companion_requests(
    mut requests: EventReader<CompanionRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        let message = match ev {
            CompanionRequestEvent::Adopt(species) => adopt_companion(&mut player, *species),
            CompanionRequestEvent::Train => train_companion(&mut player),
            CompanionRequestEvent::UpgradeAbility(index) => {
                upgrade_ability(&mut player, *index, false)
            }
        };
        info!("[Companion] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

/// Quest rewards hand out free ability upgrades via the shared event.
fn handle_free_abilities(
    mut rewards: EventReader<FreeAbilityEvent>,
    mut player: ResMut<PlayerState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in rewards.read() {
        let message = upgrade_ability(&mut player, ev.ability_index, true);
        info!("[Companion] {}", message);
        toasts.send(ToastEvent::new(message));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
