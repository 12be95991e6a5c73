use assert_matches::assert_matches;
use type_war::{
    campaign::{CampaignSession, CampaignStatus},
    config::Config,
    error::GameError,
    language::{load_catalog, EmbeddedWords},
    level::{LevelOutcome, LevelSession},
    motion::{LinearMotion, MotionDriver, Viewport},
    spawner::WaveSpawner,
};

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

fn campaign(max_level: u32) -> CampaignSession {
    let catalog = load_catalog(&EmbeddedWords).unwrap();
    CampaignSession::new(catalog, Config::default(), max_level, WaveSpawner::seeded(42)).unwrap()
}

/// Replace the input buffer with each word in turn.
fn type_all(level: &mut LevelSession) {
    level.begin();
    let words: Vec<String> = level.slots().iter().map(|s| s.text.clone()).collect();
    for word in words {
        level.on_input_change(&word);
    }
}

fn let_everything_fall(level: &mut LevelSession) {
    let mut motion = LinearMotion::new();
    motion.apply_all(&level.take_signals());
    level.begin();
    motion.apply_all(&level.take_signals());
    while !level.is_done() {
        let settled = motion.advance(std::time::Duration::from_secs(1));
        for s in settled {
            level.on_motion_settled(s);
        }
        motion.apply_all(&level.take_signals());
        if motion.active_tracks() == 0 {
            break;
        }
    }
}

#[test]
fn clearing_every_level_completes_the_run() {
    let mut c = campaign(3);
    for expected in 1..=3 {
        assert_eq!(c.level(), expected);
        let mut level = c.start_level(viewport()).unwrap();
        type_all(&mut level);
        let summary = level.summary().unwrap().clone();
        assert_eq!(summary.outcome, LevelOutcome::Victory);
        assert_eq!(summary.hit_names.len(), level.total_words());
        c.finish_level(summary);
    }

    assert_eq!(c.status(), CampaignStatus::Complete);
    assert_eq!(c.level(), 3);
    assert_eq!(c.totals().levels_cleared, 3);
    assert_eq!(c.levels().len(), 3);
    let sum: u64 = c.levels().iter().map(|l| l.points).sum();
    assert_eq!(c.totals().points, sum);
    assert_matches!(c.start_level(viewport()), Err(GameError::CampaignComplete));
}

#[test]
fn defeat_does_not_advance() {
    let mut c = campaign(5).starting_at(2).unwrap();
    let mut level = c.start_level(viewport()).unwrap();
    let_everything_fall(&mut level);

    let summary = level.summary().unwrap().clone();
    assert_eq!(summary.outcome, LevelOutcome::Defeat);
    assert!(summary.health <= 0);

    assert_eq!(c.finish_level(summary), CampaignStatus::Defeated);
    assert_eq!(c.level(), 2);

    // the retry is the same level with a fresh draw
    let retry = c.start_level(viewport()).unwrap();
    assert_eq!(retry.level(), 2);
    assert_eq!(retry.health(), retry.max_health());
}

#[test]
fn relaxed_accents_accept_plain_typing() {
    let catalog = load_catalog(&EmbeddedWords).unwrap();
    let config = Config {
        accent_sensitive: false,
        ..Config::default()
    };
    let mut c = CampaignSession::new(catalog, config, 5, WaveSpawner::seeded(9)).unwrap();
    let mut level = c.start_level(viewport()).unwrap();
    level.begin();

    let plain: Vec<String> = level
        .slots()
        .iter()
        .map(|s| type_war::matcher::normalize(&s.text).to_uppercase())
        .collect();
    for word in &plain {
        level.on_input_change(word);
    }
    assert!(level.is_done());
    assert_eq!(level.hit_names().len(), level.total_words());

    // without accent sensitivity no word earns the accent bonus
    let expected: u64 = level
        .slots()
        .iter()
        .map(|s| {
            type_war::rules::points_for_hit(1, s.text.chars().count(), s.is_diagonal(), false)
        })
        .sum();
    assert_eq!(level.points(), expected);
}
