//! End-to-end play through the public API

use pocket_arcade::consts::ms_to_ticks;
use pocket_arcade::settings::{BalloonSettings, StackingSettings};
use pocket_arcade::sim::{
    BalloonEngine, DropOutcome, GameEvent, GameKind, MiniGame, StackingEngine, Viewport,
};
use pocket_arcade::{Arcade, ConfigError, Settings};

#[test]
fn balloon_round_with_eight_slots() {
    let mut arcade = Arcade::new(&Settings::default(), 7).expect("valid settings");
    arcade.open(GameKind::Balloon);
    arcade.drain_events();

    for _ in 0..8 {
        arcade.press();
    }
    let cleared = arcade
        .drain_events()
        .iter()
        .filter(|(_, e)| *e == GameEvent::RoundCleared)
        .count();
    assert_eq!(cleared, 1);

    // Ninth press does nothing
    arcade.press();
    assert!(arcade.drain_events().is_empty());

    // Win message, then a fresh round
    for _ in 0..ms_to_ticks(1000) + ms_to_ticks(1500) {
        arcade.tick();
    }
    let events: Vec<GameEvent> = arcade.drain_events().into_iter().map(|(_, e)| e).collect();
    assert!(events.contains(&GameEvent::WinShown));
    assert!(events.contains(&GameEvent::RoundReset));
    assert!(arcade.balloon().slots().iter().all(|s| s.is_intact()));
}

#[test]
fn too_many_balloons_is_a_config_error() {
    let settings = BalloonSettings {
        count: 10,
        ..Default::default()
    };
    let result = BalloonEngine::new(Viewport::default(), &settings, 1);
    assert!(matches!(result, Err(ConfigError::TooManySlots { count: 10, cells: 8 })));

    let mut all = Settings::default();
    all.balloon.count = 10;
    assert!(Arcade::new(&all, 1).is_err());
}

#[test]
fn stacking_first_drop_and_tower() {
    let mut engine =
        StackingEngine::new(Viewport::new(390.0, 700.0), &StackingSettings::default()).expect("valid");
    assert_eq!(engine.drop_block(), DropOutcome::Stacked { level: 1 });
    for _ in 0..4 {
        engine.tick();
        engine.drop_block();
    }
    assert!(engine.is_game_over());
    assert_eq!(engine.level(), 5);
    assert_eq!(engine.drop_block(), DropOutcome::Ignored);
}

#[test]
fn matching_always_ends_in_a_match() {
    let mut arcade = Arcade::new(&Settings::default(), 11).expect("valid settings");
    arcade.open(GameKind::Matching);
    let target = arcade.matching().target();

    // Keep picking whatever is highlighted until the target is matched
    let mut selections = 0;
    for _ in 0..2000 {
        if !arcade.matching().is_animating() && !arcade.matching().is_matched() {
            arcade.press();
        }
        arcade.tick();
        if arcade.matching().is_matched() {
            break;
        }
        selections += 1;
    }
    assert!(arcade.matching().is_matched());
    assert_eq!(arcade.matching().target(), target);
    assert!(selections < 2000);
}

#[test]
fn leaving_a_game_cancels_its_timers() {
    let mut arcade = Arcade::new(&Settings::default(), 3).expect("valid settings");
    arcade.open(GameKind::Balloon);
    for _ in 0..8 {
        arcade.press();
    }
    arcade.open(GameKind::Matching);
    arcade.drain_events();
    arcade.close();
    arcade.open(GameKind::Balloon);
    // Re-entering starts over, and the old win message never shows
    assert!(arcade.balloon().slots().iter().all(|s| s.is_intact()));
    for _ in 0..ms_to_ticks(3000) {
        arcade.tick();
    }
    assert!(
        !arcade
            .drain_events()
            .iter()
            .any(|(_, e)| *e == GameEvent::WinShown)
    );
    assert!(!arcade.balloon().show_win_message());
}

#[test]
fn very_long_durations_load_and_play() {
    let settings = Settings::from_json(r#"{ "stacking": { "celebration_ms": 80000000 } }"#)
        .expect("valid json");
    let mut arcade = Arcade::new(&settings, 5).expect("long durations are valid");
    arcade.open(GameKind::Stacking);
    for _ in 0..5 {
        arcade.press();
    }
    assert!(arcade.stacking().is_game_over());
    // Still celebrating long after the default 3 s
    for _ in 0..ms_to_ticks(10_000) {
        arcade.tick();
    }
    assert!(arcade.stacking().is_game_over());
}

#[test]
fn stalled_block_steps_are_config_errors() {
    let settings = Settings::from_json(r#"{ "stacking": { "fall_step": 0.0 } }"#).expect("valid json");
    assert!(matches!(
        Arcade::new(&settings, 1),
        Err(ConfigError::InvalidStep { name: "fall_step", .. })
    ));

    let settings = Settings::from_json(r#"{ "stacking": { "pan_step": -2.0 } }"#).expect("valid json");
    assert!(matches!(
        Arcade::new(&settings, 1),
        Err(ConfigError::InvalidStep { name: "pan_step", .. })
    ));
}
