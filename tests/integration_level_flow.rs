use std::time::Duration;

use assert_matches::assert_matches;
use type_war::{
    language::WordCatalog,
    level::{LevelOutcome, LevelSession, LevelStatus, Resolution},
    motion::{LinearMotion, MotionDriver, Viewport},
    rules::level_config,
    spawner::WaveSpawner,
};

fn two_word_level(seed: u64) -> (LevelSession, LinearMotion) {
    let catalog = WordCatalog::new(["casa", "carro", "dedo", "ator"]).unwrap();
    let mut cfg = level_config(1);
    cfg.words_per_wave = 2;
    cfg.total_waves = 1;

    let mut spawner = WaveSpawner::seeded(seed);
    let mut level =
        LevelSession::new(cfg, &catalog, true, Viewport::new(1280.0, 720.0), &mut spawner).unwrap();
    let mut motion = LinearMotion::new();
    motion.apply_all(&level.take_signals());
    (level, motion)
}

fn invariant_holds(level: &LevelSession) -> bool {
    level.words_left() == level.total_words() - level.hit_names().len() - level.missed_names().len()
        && level
            .hit_names()
            .iter()
            .all(|w| !level.missed_names().contains(w))
}

// Level 1, four-word catalog, one wave of two: hit one, let the other fall.
#[test]
fn hit_one_word_and_miss_the_other() {
    for seed in 0..20 {
        let (mut level, mut motion) = two_word_level(seed);
        assert_eq!(level.total_words(), 2);
        assert_ne!(level.slots()[0].text, level.slots()[1].text);
        assert_eq!(motion.active_tracks(), 2);

        level.begin();
        motion.apply_all(&level.take_signals());
        let start_health = level.health();

        // no catalog word is a prefix of another, so either one can be typed
        let (typed, other) = ((seed % 2) as usize, 1 - (seed % 2) as usize);
        let word = level.slots()[typed].text.clone();
        let mut last = None;
        for c in word.chars() {
            last = level.push_char(c);
        }
        assert_matches!(last, Some(Resolution::Hit { points, .. }) if points > 0);
        motion.apply_all(&level.take_signals());

        assert_eq!(level.words_left(), 1);
        assert_eq!(level.hit_names(), &[word]);
        assert!(level.points() > 0);
        assert!(invariant_holds(&level));
        assert_eq!(motion.active_tracks(), 1);

        // run the clock until the remaining word leaves the screen
        let mut resolved = None;
        for _ in 0..400 {
            for settled in motion.advance(Duration::from_millis(50)) {
                resolved = level.on_motion_settled(settled).or(resolved);
            }
            motion.apply_all(&level.take_signals());
            if level.is_done() {
                break;
            }
        }

        assert_matches!(resolved, Some(Resolution::Miss { slot, .. }) if slot == other);
        assert_eq!(level.status(), LevelStatus::LevelDone);
        assert_eq!(level.words_left(), 0);
        assert_eq!(level.health(), start_health - level.config().miss_damage);
        assert!(invariant_holds(&level));

        let summary = level.summary().unwrap();
        assert_eq!(summary.outcome, LevelOutcome::Victory);
        assert_eq!(summary.hit_names.len() + summary.missed_names.len(), 2);
        assert_eq!(motion.active_tracks(), 0);
    }
}

#[test]
fn pausing_freezes_misses() {
    let (mut level, mut motion) = two_word_level(3);
    level.begin();
    motion.apply_all(&level.take_signals());

    level.on_window_blur();
    motion.apply_all(&level.take_signals());
    for _ in 0..100 {
        for settled in motion.advance(Duration::from_secs(1)) {
            level.on_motion_settled(settled);
        }
    }
    assert_eq!(level.words_left(), 2);
    assert_eq!(level.status(), LevelStatus::Paused);

    level.on_window_focus();
    motion.apply_all(&level.take_signals());
    for settled in motion.advance(Duration::from_secs(60)) {
        level.on_motion_settled(settled);
    }
    assert!(level.is_done());
    assert_eq!(level.missed_names().len(), 2);
}

#[test]
fn hit_words_do_not_settle_as_misses() {
    let (mut level, mut motion) = two_word_level(5);
    level.begin();
    motion.apply_all(&level.take_signals());

    let first = level.slots()[0].text.clone();
    let second = level.slots()[1].text.clone();
    level.on_input_change(&first);
    level.on_input_change(&second);
    motion.apply_all(&level.take_signals());

    assert!(level.is_done());
    assert_eq!(level.health(), level.max_health());
    assert!(motion.advance(Duration::from_secs(60)).is_empty());
}
