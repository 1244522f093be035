mod shared;
mod calendar;
mod events;
mod combat;
mod jobs;
mod business;
mod economy;
mod farming;
mod crafting;
mod companion;
mod quests;
mod save;
mod pathfinding;
mod world;
mod home;
mod data;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shared::*;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<PlayerState>()
        // Events
        .add_event::<DayEndEvent>()
        .add_event::<SeasonChangeEvent>()
        .add_event::<SleepRequestEvent>()
        .add_event::<ToastEvent>()
        .add_event::<AchievementUnlockedEvent>()
        .add_event::<FreeAbilityEvent>()
        .add_event::<StoryHeroEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        // Domain plugins
        .add_plugins(calendar::CalendarPlugin)
        .add_plugins(events::EventsPlugin)
        .add_plugins(combat::CombatPlugin)
        .add_plugins(jobs::JobsPlugin)
        .add_plugins(business::BusinessPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(crafting::CraftingPlugin)
        .add_plugins(companion::CompanionPlugin)
        .add_plugins(quests::QuestsPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(home::HomePlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .run();
}
