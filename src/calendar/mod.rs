//! Calendar domain — the heartbeat of Emberton.
//!
//! Responsible for:
//! - Advancing the time-of-day clock by MINUTES_PER_FRAME per tick
//! - Wrapping the clock at midnight WITHOUT advancing the day — the day
//!   counter only moves through `advance_day`, which the sleep cycle calls
//! - Computing the season from the absolute day number
//! - Rolling daily weather from the season's discrete distribution

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, tick_time.run_if(in_state(GameState::Playing)));
    }
}

/// Advances the time-of-day clock by one simulation tick. The clock wraps
/// modulo 1440; being awake past midnight does not start a new day.
fn tick_time(mut player: ResMut<PlayerState>) {
    player.time_minutes = (player.time_minutes + MINUTES_PER_FRAME) % MINUTES_PER_DAY;
}

/// Rolls a weather result for the given season.
///
/// Each season draws uniformly from a small table, so the probabilities are
/// exact fractions:
///   Spring: 1/3 Rain, 2/3 Clear
///   Summer: 2/3 Clear, 1/3 Rain
///   Fall:   1/3 Clear, 1/3 Rain, 1/3 Snow
///   Winter: 2/4 Snow, 1/4 Clear, 1/4 Rain
pub fn roll_weather(season: Season, rng: &mut impl Rng) -> Weather {
    let table: &[Weather] = match season {
        Season::Spring => &[Weather::Rain, Weather::Clear, Weather::Clear],
        Season::Summer => &[Weather::Clear, Weather::Clear, Weather::Rain],
        Season::Fall => &[Weather::Clear, Weather::Rain, Weather::Snow],
        Season::Winter => &[Weather::Snow, Weather::Snow, Weather::Clear, Weather::Rain],
    };
    table[rng.gen_range(0..table.len())]
}

/// The only place the day counter moves. Recomputes the season, rolls the
/// new day's weather, and reports whether the season flipped so the caller
/// can notify observers (seasonal side quests key off that).
pub fn advance_day(player: &mut PlayerState, rng: &mut impl Rng) -> bool {
    player.day += 1;

    let old_season = player.season;
    player.season = Season::for_day(player.day);
    player.weather = roll_weather(player.season, rng);

    let changed = player.season != old_season;
    if changed {
        info!(
            "[Calendar] Season changed: {:?} -> {:?} (day {})",
            old_season, player.season, player.day
        );
    }
    info!(
        "[Calendar] Day {} begins — {:?}, {:?}",
        player.day, player.season, player.weather
    );
    changed
}

// ─── Tests ────────────────────────────────────────────────────────────────────
