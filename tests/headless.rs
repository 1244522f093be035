//! Headless integration tests for Emberton.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register the
//! simulation plugins, and drive whole scenarios end to end.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use emberton::business::{
    buy_business, collect_profits, upgrade_business, BusinessRequestEvent,
};
use emberton::economy::{daily_multiplier, shop_price};
use emberton::home::run_sleep_cycle;
use emberton::jobs::WorkShiftEvent;
use emberton::quests::SideQuestRequestEvent;
use emberton::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources, events, and domain
/// plugins registered but NO rendering, windowing, or asset loading.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<GameState>();

    app.init_resource::<PlayerState>()
        .init_resource::<CropRegistry>()
        .init_resource::<RecipeRegistry>()
        .init_resource::<QuestRegistry>()
        .init_resource::<BuildingRegistry>()
        .init_resource::<KeyBindings>();

    app.add_event::<DayEndEvent>()
        .add_event::<SeasonChangeEvent>()
        .add_event::<SleepRequestEvent>()
        .add_event::<ToastEvent>()
        .add_event::<AchievementUnlockedEvent>()
        .add_event::<FreeAbilityEvent>()
        .add_event::<StoryHeroEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>();

    app.add_plugins(emberton::calendar::CalendarPlugin)
        .add_plugins(emberton::combat::CombatPlugin)
        .add_plugins(emberton::jobs::JobsPlugin)
        .add_plugins(emberton::business::BusinessPlugin)
        .add_plugins(emberton::economy::EconomyPlugin)
        .add_plugins(emberton::farming::FarmingPlugin)
        .add_plugins(emberton::crafting::CraftingPlugin)
        .add_plugins(emberton::companion::CompanionPlugin)
        .add_plugins(emberton::quests::QuestsPlugin);

    app
}

/// Transitions the test app to Playing state and ticks once to process it.
fn enter_playing_state(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
}

fn player(app: &App) -> &PlayerState {
    app.world().resource::<PlayerState>()
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 1: buy and upgrade a Stall
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_buy_and_upgrade_stall() {
    let mut player = PlayerState::default();
    player.money = 10_000.0;

    buy_business(&mut player, "Stall");
    upgrade_business(&mut player, "Stall");

    assert_eq!(player.money, 8_000.0, "10000 - 500 - 1500");
    assert_eq!(player.businesses.len(), 1);
    let store = player.businesses.get("Store").expect("Store exists");
    assert_eq!(store.base_profit, 80.0);
    assert_eq!(store.bonus, 0.0);
    assert_eq!(store.staff, 0);
    assert_eq!(store.reputation, 0);
    assert_eq!(store.skill, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 2: store profit formula
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_store_profit_with_staff() {
    let mut player = PlayerState::default();
    player.charisma = 5;
    player.money = 0.0;
    let mut store = Business::new(80.0);
    store.staff = 2;
    player.businesses.insert("Store".to_string(), store);

    let report = collect_profits(&mut player, &mut MaxRoll);

    assert_eq!(report.lines.len(), 1);
    assert!(!report.lines[0].robbed);
    // 80 + 2*5 + 10*2 - 30*2 + 0
    assert_eq!(report.total, 50.0);
    assert_eq!(player.money, 50.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 3: forced robbery
// ─────────────────────────────────────────────────────────────────────────────

/// Rng that always rolls the minimum, forcing any probability check to hit.
struct AlwaysLow;

impl rand::RngCore for AlwaysLow {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Rng that always rolls the maximum, so no probability check ever hits.
struct MaxRoll;

impl rand::RngCore for MaxRoll {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }
    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0xff);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn scenario_forced_robbery() {
    let mut player = PlayerState::default();
    player.money = 0.0;
    let mut store = Business::new(80.0);
    store.bonus = 25.0;
    store.reputation = 10;
    store.skill = 2;
    player.businesses.insert("Store".to_string(), store);

    let report = collect_profits(&mut player, &mut AlwaysLow);

    assert!(report.lines[0].robbed);
    assert_eq!(report.total, 0.0);
    assert_eq!(player.money, 0.0);
    let store = &player.businesses["Store"];
    assert_eq!(store.bonus, 0.0, "dailies reset even when robbed");
    assert_eq!(store.reputation, 0);
    assert_eq!(store.skill, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 4: office promotion through the event pipeline
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_office_promotion() {
    let mut app = build_test_app();
    enter_playing_state(&mut app);

    {
        let mut p = app.world_mut().resource_mut::<PlayerState>();
        p.money = 0.0;
        p.energy = 100.0;
        p.intelligence = 5;
        p.charisma = 5;
        p.careers.insert(
            CareerKind::Office,
            CareerProgress {
                level: 1,
                shifts: 9,
                exp: 90,
            },
        );
    }

    app.world_mut().send_event(WorkShiftEvent {
        career: CareerKind::Office,
    });
    app.update();

    let p = player(&app);
    let office = p.careers[&CareerKind::Office];
    assert_eq!(office.level, 2);
    assert_eq!(office.shifts, 0);
    assert_eq!(office.exp, 0);
    assert_eq!(p.intelligence, 6);
    assert_eq!(p.money, 20.0);
    assert_eq!(p.energy, 80.0);

    let toasts: Vec<String> = app
        .world()
        .resource::<Events<ToastEvent>>()
        .iter_current_update_events()
        .map(|t| t.message.clone())
        .collect();
    assert!(toasts.iter().any(|m| m == "Promoted to Clerk!"), "{:?}", toasts);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 5: day-2 winter shop price determinism
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_winter_price_determinism() {
    let mut a = PlayerState::default();
    a.day = 2;
    a.season = Season::Winter;

    let mut b = PlayerState::default();
    b.day = 2;
    b.season = Season::Winter;
    b.name = "Someone Else".to_string();

    let price_a = shop_price(100.0, &a);
    let price_b = shop_price(100.0, &b);
    assert_eq!(price_a, price_b, "same day, same price");
    assert_eq!(price_a, (100.0 * 1.2 * daily_multiplier(2)).round());

    let mult = daily_multiplier(2);
    assert!((0.8..=1.2).contains(&mult));
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario 6: the full sleep cycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scenario_full_sleep_cycle() {
    let mut player = PlayerState::default();
    player.energy = 7.0;
    player.money = 0.0;
    player.bank_balance = 2500.0;
    player.home_upgrades.insert("Comfy Bed".to_string());
    player.furniture[3] = Some(FurniturePlacement {
        item: Item::basic("Decor Chair"),
        x: 96.0,
        y: 64.0,
        rotation: 0.0,
    });
    let mut stall = Business::new(30.0);
    stall.bonus = 12.0;
    player.businesses.insert("Stall".to_string(), stall);
    let cha_before = player.charisma;

    let report = run_sleep_cycle(&mut player, &mut MaxRoll);

    assert_eq!(player.day, 2);
    assert_eq!(report.new_day, 2);
    assert_eq!(player.time_minutes, WAKE_UP_MINUTES);
    assert_eq!(player.energy, 120.0, "Comfy Bed pushes past 100");
    assert_eq!(player.bank_balance, 2525.0, "1% floored interest");
    assert_eq!(player.charisma, cha_before + 1, "Decor Chair bonus");
    // 30 base + 2*charisma(2) + 12 bonus, robbery roll never fires
    assert_eq!(player.money, 46.0);
    let stall = &player.businesses["Stall"];
    assert_eq!(stall.bonus, 0.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-domain: sleeping through the app fires day-end plumbing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sleep_request_advances_day_and_emits_events() {
    let mut app = build_test_app();
    app.add_plugins(emberton::home::HomePlugin);
    enter_playing_state(&mut app);

    app.world_mut().send_event(SleepRequestEvent);
    app.update();

    assert_eq!(player(&app).day, 2);
    let day_ends: Vec<u32> = app
        .world()
        .resource::<Events<DayEndEvent>>()
        .iter_current_update_events()
        .map(|e| e.new_day)
        .collect();
    assert_eq!(day_ends, vec![2]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-domain: business requests through the event pipeline
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn business_request_events_round_trip() {
    let mut app = build_test_app();
    enter_playing_state(&mut app);

    app.world_mut().resource_mut::<PlayerState>().money = 600.0;
    app.world_mut()
        .send_event(BusinessRequestEvent::Buy("Stall".to_string()));
    app.update();

    let p = player(&app);
    assert!(p.businesses.contains_key("Stall"));
    assert_eq!(p.money, 100.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cross-domain: achievements and the quest pipeline
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn wealth_achievement_unlocks_through_systems() {
    let mut app = build_test_app();
    enter_playing_state(&mut app);

    app.world_mut().resource_mut::<PlayerState>().money = 1500.0;
    app.update();

    let p = player(&app);
    assert!(p.achievements.contains("Wealthy"));
    assert_eq!(p.epithet, "the Wealthy");
}

#[test]
fn side_quest_turn_in_pays_at_target_building() {
    let mut app = build_test_app();
    {
        let mut quests = app.world_mut().resource_mut::<QuestRegistry>();
        quests.side.push(SideQuestDef {
            name: "Spring Planting".to_string(),
            description: "Help the farm with spring planting.".to_string(),
            target: "farm".to_string(),
            reward: 40.0,
        });
    }
    {
        let mut buildings = app.world_mut().resource_mut::<BuildingRegistry>();
        buildings.buildings.push(Building {
            x: 200.0,
            y: 200.0,
            w: 64.0,
            h: 64.0,
            name: "Greenfield Farm".to_string(),
            kind: "farm".to_string(),
        });
    }
    enter_playing_state(&mut app);

    app.world_mut().resource_mut::<PlayerState>().money = 0.0;
    app.world_mut()
        .send_event(SideQuestRequestEvent::Accept("Spring Planting".to_string()));
    app.update();
    assert_eq!(player(&app).side_quest.as_deref(), Some("Spring Planting"));

    // Turning in away from the farm does nothing
    app.world_mut().send_event(SideQuestRequestEvent::TurnIn);
    app.update();
    assert_eq!(player(&app).money, 0.0);
    assert!(player(&app).side_quest.is_some());

    {
        let mut p = app.world_mut().resource_mut::<PlayerState>();
        p.x = 232.0;
        p.y = 232.0;
    }
    app.world_mut().send_event(SideQuestRequestEvent::TurnIn);
    app.update();

    let p = player(&app);
    assert_eq!(p.money, 40.0);
    assert_eq!(p.side_quest, None);
}

#[test]
fn main_quest_completes_through_systems() {
    let mut app = build_test_app();
    {
        let mut quests = app.world_mut().resource_mut::<QuestRegistry>();
        quests.main.push(MainQuest {
            description: "Hold $120".to_string(),
            goal: QuestGoal::MoneyAtLeast(120.0),
            reward: Some(QuestReward::Tokens(2)),
            next_index: None,
        });
    }
    enter_playing_state(&mut app);

    app.world_mut().resource_mut::<PlayerState>().money = 150.0;
    app.update();

    let p = player(&app);
    assert_eq!(p.tokens, 2);
    assert_eq!(p.current_quest, 1);
    assert_eq!(p.quests_done, vec![true]);
}
