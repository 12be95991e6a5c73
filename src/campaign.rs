use rand::{rngs::StdRng, Rng};
use serde::Serialize;
use strum_macros::Display;

use crate::config::Config;
use crate::error::{GameError, GameResult};
use crate::language::WordCatalog;
use crate::level::{LevelSession, LevelSummary};
use crate::motion::Viewport;
use crate::rules::{LevelConfig, RuleTable};
use crate::spawner::WaveSpawner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CampaignStatus {
    /// Next level is about to start.
    Ready,
    Playing,
    /// Last level was lost; starting again replays it.
    Defeated,
    Complete,
}

/// Running totals for a whole run. Names are concatenated, not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignTotals {
    pub points: u64,
    pub hit_names: Vec<String>,
    pub missed_names: Vec<String>,
    pub levels_cleared: u32,
}

#[derive(Debug)]
pub struct CampaignSession<R: Rng = StdRng> {
    catalog: WordCatalog,
    config: Config,
    rules: RuleTable,
    max_level: u32,
    level: u32,
    status: CampaignStatus,
    totals: CampaignTotals,
    levels: Vec<LevelSummary>,
    spawner: WaveSpawner<R>,
}

impl<R: Rng> CampaignSession<R> {
    pub fn new(
        catalog: WordCatalog,
        config: Config,
        max_level: u32,
        spawner: WaveSpawner<R>,
    ) -> GameResult<Self> {
        if max_level == 0 {
            return Err(GameError::InvalidLevel {
                level: 0,
                max_level,
            });
        }
        Ok(Self {
            catalog,
            config,
            rules: RuleTable::default(),
            max_level,
            level: 1,
            status: CampaignStatus::Ready,
            totals: CampaignTotals::default(),
            levels: Vec::new(),
            spawner,
        })
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Jump to a level before the run begins.
    pub fn starting_at(mut self, level: u32) -> GameResult<Self> {
        self.validate(level)?;
        self.level = level;
        Ok(self)
    }

    fn validate(&self, level: u32) -> GameResult<u32> {
        if level == 0 || level > self.max_level {
            return Err(GameError::InvalidLevel {
                level,
                max_level: self.max_level,
            });
        }
        Ok(level)
    }

    /// Rules for the current level, with the player's preferences applied.
    pub fn level_config(&self) -> GameResult<LevelConfig> {
        let level = self.validate(self.level)?;
        let cfg = self.rules.level_config(level);
        Ok(if self.config.diagonal_words {
            cfg
        } else {
            cfg.without_diagonals()
        })
    }

    /// Build the session for the current level. From `Defeated` this is the
    /// retry of the lost level.
    pub fn start_level(&mut self, viewport: Viewport) -> GameResult<LevelSession> {
        if self.status == CampaignStatus::Complete {
            return Err(GameError::CampaignComplete);
        }
        let cfg = self.level_config()?;
        let pool = self
            .catalog
            .within_lengths(cfg.min_word_length, cfg.max_word_length)?;
        let session = LevelSession::new(
            cfg,
            &pool,
            self.config.accent_sensitive,
            viewport,
            &mut self.spawner,
        )?
        .with_rules(self.rules.clone());

        self.status = CampaignStatus::Playing;
        log::info!(
            "campaign starting level {}/{} ({} words in pool)",
            self.level,
            self.max_level,
            pool.len()
        );
        Ok(session)
    }

    /// Fold a finished level into the run and decide what comes next.
    pub fn finish_level(&mut self, summary: LevelSummary) -> CampaignStatus {
        if self.status != CampaignStatus::Playing {
            log::warn!(
                "ignoring level {} summary while campaign is {}",
                summary.level,
                self.status
            );
            return self.status;
        }

        self.totals.points += summary.points;
        self.totals
            .hit_names
            .extend(summary.hit_names.iter().cloned());
        self.totals
            .missed_names
            .extend(summary.missed_names.iter().cloned());

        self.status = if !summary.is_victory() {
            CampaignStatus::Defeated
        } else if self.level >= self.max_level {
            self.totals.levels_cleared += 1;
            CampaignStatus::Complete
        } else {
            self.totals.levels_cleared += 1;
            self.level += 1;
            CampaignStatus::Ready
        };
        self.levels.push(summary);

        log::info!(
            "campaign now {} at level {} with {} points",
            self.status,
            self.level,
            self.totals.points
        );
        self.status
    }

    /// Back to level 1 with empty totals.
    pub fn new_run(&mut self) {
        self.level = 1;
        self.status = CampaignStatus::Ready;
        self.totals = CampaignTotals::default();
        self.levels.clear();
        log::info!("campaign reset");
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn totals(&self) -> &CampaignTotals {
        &self.totals
    }

    pub fn levels(&self) -> &[LevelSummary] {
        &self.levels
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelOutcome;
    use assert_matches::assert_matches;

    fn catalog() -> WordCatalog {
        crate::language::load_catalog(&crate::language::EmbeddedWords).unwrap()
    }

    fn campaign(max_level: u32) -> CampaignSession {
        CampaignSession::new(catalog(), Config::default(), max_level, WaveSpawner::seeded(1))
            .unwrap()
    }

    fn summary(level: u32, outcome: LevelOutcome, points: u64) -> LevelSummary {
        LevelSummary {
            level,
            outcome,
            points,
            hit_names: vec!["casa".into()],
            missed_names: vec!["dedo".into()],
            health: if outcome == LevelOutcome::Victory { 10 } else { 0 },
            max_health: 20,
            total_words: 2,
        }
    }

    #[test]
    fn victory_advances_level() {
        let mut c = campaign(3);
        c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(c.status(), CampaignStatus::Playing);

        let status = c.finish_level(summary(1, LevelOutcome::Victory, 40));
        assert_eq!(status, CampaignStatus::Ready);
        assert_eq!(c.level(), 2);
        assert_eq!(c.totals().points, 40);
        assert_eq!(c.totals().levels_cleared, 1);
    }

    #[test]
    fn defeat_keeps_level_and_allows_retry() {
        let mut c = campaign(3);
        c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(
            c.finish_level(summary(1, LevelOutcome::Defeat, 5)),
            CampaignStatus::Defeated
        );
        assert_eq!(c.level(), 1);

        let retry = c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(retry.level(), 1);
        assert_eq!(c.status(), CampaignStatus::Playing);
        // defeated levels still count toward the totals
        assert_eq!(c.totals().points, 5);
    }

    #[test]
    fn victory_on_final_level_completes() {
        let mut c = campaign(1);
        c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(
            c.finish_level(summary(1, LevelOutcome::Victory, 10)),
            CampaignStatus::Complete
        );
        assert_eq!(c.level(), 1);
        assert_matches!(
            c.start_level(Viewport::new(800.0, 600.0)),
            Err(GameError::CampaignComplete)
        );
    }

    #[test]
    fn totals_concatenate_without_dedup() {
        let mut c = campaign(5);
        for level in 1..=2 {
            c.start_level(Viewport::new(800.0, 600.0)).unwrap();
            c.finish_level(summary(level, LevelOutcome::Victory, 10));
        }
        assert_eq!(c.totals().hit_names, vec!["casa", "casa"]);
        assert_eq!(c.levels().len(), 2);
    }

    #[test]
    fn summaries_outside_play_are_ignored() {
        let mut c = campaign(5);
        assert_eq!(
            c.finish_level(summary(1, LevelOutcome::Victory, 10)),
            CampaignStatus::Ready
        );
        assert_eq!(c.totals().points, 0);
        assert_eq!(c.level(), 1);
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        assert_matches!(
            campaign(5).starting_at(0),
            Err(GameError::InvalidLevel { level: 0, .. })
        );
        assert_matches!(
            campaign(5).starting_at(6),
            Err(GameError::InvalidLevel {
                level: 6,
                max_level: 5
            })
        );
        assert_matches!(
            CampaignSession::new(catalog(), Config::default(), 0, WaveSpawner::seeded(1)),
            Err(GameError::InvalidLevel { .. })
        );
        assert_eq!(campaign(5).starting_at(3).unwrap().level(), 3);
    }

    #[test]
    fn diagonal_preference_overrides_rules() {
        let config = Config {
            diagonal_words: false,
            ..Config::default()
        };
        let c = CampaignSession::new(catalog(), config, 5, WaveSpawner::seeded(1))
            .unwrap()
            .starting_at(5)
            .unwrap();
        assert_eq!(c.level_config().unwrap().diagonal_chance, 0);
        assert!(campaign(5).level_config().unwrap().diagonal_chance > 0);
    }

    #[test]
    fn level_words_respect_length_window() {
        let mut c = campaign(5).starting_at(3).unwrap();
        let cfg = c.level_config().unwrap();
        let session = c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        assert_eq!(session.total_words(), cfg.total_words());
        for slot in session.slots() {
            let len = slot.text.chars().count();
            assert!((cfg.min_word_length..=cfg.max_word_length).contains(&len));
        }
    }

    #[test]
    fn new_run_resets_everything() {
        let mut c = campaign(5).starting_at(4).unwrap();
        c.start_level(Viewport::new(800.0, 600.0)).unwrap();
        c.finish_level(summary(4, LevelOutcome::Victory, 99));
        c.new_run();
        assert_eq!(c.level(), 1);
        assert_eq!(c.status(), CampaignStatus::Ready);
        assert_eq!(c.totals(), &CampaignTotals::default());
        assert!(c.levels().is_empty());
    }
}
