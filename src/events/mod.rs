//! Random flavor events — small surprises rolled once per simulation tick.
//!
//! The pool an event is drawn from depends on where the player is standing,
//! the season, the weather, and the hour, so a rainy winter night at the bar
//! feels different from a clear spring morning in the park.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            roll_flavor_events.run_if(in_state(GameState::Playing)),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event data
// ─────────────────────────────────────────────────────────────────────────────

/// What a flavor event does to the player. Money and energy may be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventEffect {
    Money(f64),
    Energy(f32),
    Stat(StatKind, u32),
    Resource(&'static str, u32),
    Token(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlavorEvent {
    pub text: &'static str,
    pub effect: EventEffect,
}

/// Timed events fire only inside an hour window; the window may wrap
/// midnight (start > end means "overnight").
#[derive(Debug, Clone, Copy)]
pub struct TimedEvent {
    pub start_hour: u32,
    pub end_hour: u32,
    pub event: FlavorEvent,
}

impl TimedEvent {
    pub fn active_at(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

pub const BASE_EVENTS: &[FlavorEvent] = &[
    FlavorEvent {
        text: "You found a $5 bill on the sidewalk!",
        effect: EventEffect::Money(5.0),
    },
    FlavorEvent {
        text: "A stranger compliments your outfit.",
        effect: EventEffect::Stat(StatKind::Charisma, 1),
    },
    FlavorEvent {
        text: "You tripped over a loose brick. Ouch.",
        effect: EventEffect::Energy(-5.0),
    },
    FlavorEvent {
        text: "A pickpocket brushed past you. -$10.",
        effect: EventEffect::Money(-10.0),
    },
    FlavorEvent {
        text: "You helped carry groceries and got a tip.",
        effect: EventEffect::Money(8.0),
    },
];

pub fn season_events(season: Season) -> &'static [FlavorEvent] {
    match season {
        Season::Spring => &[FlavorEvent {
            text: "Wildflower seeds blew into your pocket.",
            effect: EventEffect::Resource("herb_seeds", 1),
        }],
        Season::Summer => &[FlavorEvent {
            text: "The heat is draining today.",
            effect: EventEffect::Energy(-3.0),
        }],
        Season::Fall => &[FlavorEvent {
            text: "You gathered a handful of fallen herbs.",
            effect: EventEffect::Resource("herbs", 1),
        }],
        Season::Winter => &[FlavorEvent {
            text: "You shoveled a neighbor's walk for $15.",
            effect: EventEffect::Money(15.0),
        }],
    }
}

pub fn weather_events(weather: Weather) -> &'static [FlavorEvent] {
    match weather {
        Weather::Clear => &[],
        Weather::Rain => &[FlavorEvent {
            text: "Caught in the rain without an umbrella.",
            effect: EventEffect::Energy(-4.0),
        }],
        Weather::Snow => &[FlavorEvent {
            text: "A snowball fight broke out. You won!",
            effect: EventEffect::Stat(StatKind::Speed, 1),
        }],
    }
}

/// Extra events keyed by the building the player is inside, if any.
pub fn location_events(kind: &str) -> &'static [FlavorEvent] {
    match kind {
        "park" => &[FlavorEvent {
            text: "A jogger shares training tips.",
            effect: EventEffect::Stat(StatKind::Strength, 1),
        }],
        "bar" => &[FlavorEvent {
            text: "You won a casual card game. +1 token.",
            effect: EventEffect::Token(1),
        }],
        "library" => &[FlavorEvent {
            text: "You got lost in a good book.",
            effect: EventEffect::Stat(StatKind::Intelligence, 1),
        }],
        _ => &[],
    }
}

pub const TIMED_EVENTS: &[TimedEvent] = &[
    TimedEvent {
        start_hour: 6,
        end_hour: 9,
        event: FlavorEvent {
            text: "The bakery hands out fresh samples.",
            effect: EventEffect::Energy(5.0),
        },
    },
    TimedEvent {
        // wraps midnight
        start_hour: 22,
        end_hour: 2,
        event: FlavorEvent {
            text: "A night owl busker earns you a cut. +$6.",
            effect: EventEffect::Money(6.0),
        },
    },
];

/// The full pool for the player's current situation.
pub fn build_pool(
    season: Season,
    weather: Weather,
    location: Option<&str>,
    hour: u32,
) -> Vec<FlavorEvent> {
    let mut pool: Vec<FlavorEvent> = BASE_EVENTS.to_vec();
    pool.extend_from_slice(season_events(season));
    pool.extend_from_slice(weather_events(weather));
    if let Some(kind) = location {
        pool.extend_from_slice(location_events(kind));
    }
    for timed in TIMED_EVENTS {
        if timed.active_at(hour) {
            pool.push(timed.event);
        }
    }
    pool
}

// ─────────────────────────────────────────────────────────────────────────────
// Applying an event
// ─────────────────────────────────────────────────────────────────────────────

/// Applies the event's effect and returns its narration. The Lucky perk
/// scales money gains by +10% per level and, at level 2+, halves money
/// losses.
pub fn apply_event(player: &mut PlayerState, event: &FlavorEvent) -> String {
    let lucky = player.perk_level("Lucky");
    match event.effect {
        EventEffect::Money(amount) => {
            let amount = if amount > 0.0 {
                amount * (1.0 + 0.1 * lucky as f64)
            } else if lucky >= 2 {
                amount / 2.0
            } else {
                amount
            };
            player.money = (player.money + amount).max(0.0);
        }
        EventEffect::Energy(delta) => {
            player.energy = (player.energy + delta).max(0.0);
        }
        EventEffect::Stat(kind, amount) => {
            player.gain_stat(kind, amount);
        }
        EventEffect::Resource(name, amount) => {
            player.add_resource(name, amount);
        }
        EventEffect::Token(amount) => {
            player.tokens += amount;
        }
    }
    event.text.to_string()
}

fn roll_flavor_events(
    mut player: ResMut<PlayerState>,
    buildings: Res<BuildingRegistry>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let mut rng = rand::thread_rng();
    // EVENT_CHANCE is calibrated for a tick of MINUTES_PER_FRAME game
    // minutes, so the expected event rate is independent of frame rate.
    if !rng.gen_bool(EVENT_CHANCE) {
        return;
    }

    let location = buildings
        .buildings
        .iter()
        .find(|b| b.contains(player.x, player.y))
        .map(|b| b.kind.clone());

    let pool = build_pool(player.season, player.weather, location.as_deref(), player.hour());
    if pool.is_empty() {
        return;
    }
    let event = pool[rng.gen_range(0..pool.len())];
    let message = apply_event(&mut player, &event);
    info!("[Events] {}", message);
    toasts.send(ToastEvent::new(message));
}

// ─── Tests ────────────────────────────────────────────────────────────────────
