use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use type_war::{
    app::{viewport_for, App, Screen},
    campaign::CampaignSession,
    config::Config,
    history::History,
    language::{load_catalog, EmbeddedWords},
    level::LevelStatus,
    runtime::{FixedTicker, GameEvent, Runner, TestEventSource},
    spawner::WaveSpawner,
};

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn new_app() -> App {
    let catalog = load_catalog(&EmbeddedWords).unwrap();
    let campaign =
        CampaignSession::new(catalog, Config::default(), 5, WaveSpawner::seeded(21)).unwrap();
    App::new(campaign, viewport_for(100, 40))
}

// Headless integration using the internal runtime + App without a TTY.
// Simulated time is fed explicitly so the test does not depend on wall clock.
#[test]
fn headless_typing_flow_scores_hits() {
    let mut app = new_app();
    app.advance(Duration::from_secs(3));
    assert_eq!(app.screen(), &Screen::Playing);

    // pick a word that no other word in play is a proper prefix of
    let slots = app.level().unwrap().slots().to_vec();
    let target = slots
        .iter()
        .find(|s| {
            !slots
                .iter()
                .any(|o| o.index != s.index && s.text.starts_with(o.text.as_str()))
        })
        .unwrap()
        .text
        .clone();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    for c in target.chars() {
        tx.send(key(c)).unwrap();
    }

    for _ in 0..target.chars().count() {
        let ev = runner.step();
        assert_ne!(ev, GameEvent::Tick);
        app.handle(ev);
    }

    let level = app.level().unwrap();
    assert_eq!(level.hit_names(), &[target]);
    assert!(level.points() > 0);
    assert_eq!(level.input(), "");

    // with nothing queued, the runner ticks
    assert_eq!(runner.step(), GameEvent::Tick);
}

#[test]
fn headless_focus_events_pause_and_resume() {
    let mut app = new_app();
    app.advance(Duration::from_secs(3));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(GameEvent::FocusLost).unwrap();
    tx.send(key('a')).unwrap();
    tx.send(GameEvent::FocusGained).unwrap();

    app.handle(runner.step());
    assert_eq!(app.level().unwrap().status(), LevelStatus::Paused);
    app.handle(runner.step());
    assert_eq!(app.level().unwrap().input(), "");
    app.handle(runner.step());
    assert_eq!(app.level().unwrap().status(), LevelStatus::Running);
}

#[test]
fn finished_levels_are_written_to_history() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.csv");
    let mut app = new_app().with_history(History::new(&history_path));
    app.advance(Duration::from_secs(3));

    // nobody types: the level is lost once enough words fall
    for _ in 0..120 {
        app.advance(Duration::from_secs(1));
    }
    assert_eq!(app.screen(), &Screen::Defeat);

    let records = History::new(&history_path).load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, 1);
    assert_eq!(records[0].outcome, "Defeat");
    assert_eq!(records[0].hits, 0);
    assert_eq!(app.best_points(), Some(0));

    // a later session picks the record up again
    let reopened = new_app().with_history(History::new(&history_path));
    assert_eq!(reopened.best_points(), Some(0));
}

#[test]
fn growing_the_terminal_mid_level_still_ends_it() {
    let catalog = load_catalog(&EmbeddedWords).unwrap();
    let campaign =
        CampaignSession::new(catalog, Config::default(), 5, WaveSpawner::seeded(21)).unwrap();
    let mut app = App::new(campaign, viewport_for(100, 24));
    app.advance(Duration::from_secs(3));
    assert_eq!(app.screen(), &Screen::Playing);

    app.handle(GameEvent::Resize(100, 60));
    for _ in 0..120 {
        app.advance(Duration::from_secs(1));
    }

    assert_eq!(app.screen(), &Screen::Defeat);
    let summary = app.last_summary().unwrap();
    assert!(summary.hit_names.is_empty());
    assert!(!summary.missed_names.is_empty());
    assert!(summary.health <= 0);
}
