use std::time::Duration;

use serde::Serialize;

pub const MAX_LEVEL: u32 = 5;
pub const DELAY_TO_START_LEVEL_MS: u64 = 3000;
pub const FIRST_WAVE_DELAY_MS: u64 = 750;
pub const AXLE_GAP: f32 = 175.0;
pub const POINTS_FOR_DIAGONAL: u64 = 2;
pub const POINTS_FOR_ACCENTED: u64 = 3;

/// Difficulty parameters for one level. Fixed for the level's duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelConfig {
    pub level: u32,
    pub max_health: i32,
    pub miss_damage: i32,
    pub min_word_length: usize,
    pub max_word_length: usize,
    /// Percentage, 0..=100.
    pub diagonal_chance: u8,
    pub total_waves: usize,
    pub words_per_wave: usize,
    pub wave_delay: Duration,
    pub first_wave_delay: Duration,
    /// Time a word takes to cross the screen; smaller is faster.
    pub word_travel: Duration,
    pub start_countdown: Duration,
}

impl LevelConfig {
    pub fn total_words(&self) -> usize {
        self.total_waves.saturating_mul(self.words_per_wave)
    }

    /// Applies the player's "no diagonal words" preference.
    pub fn without_diagonals(mut self) -> Self {
        self.diagonal_chance = 0;
        self
    }
}

/// The level rule table. Every field is the value at level 1 or the
/// amount it moves per level; floors keep durations and health positive.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    pub version: u32,
    pub base_health: i32,
    pub min_health: i32,
    pub base_miss_damage: i32,
    pub base_min_word_length: usize,
    pub base_max_word_length: usize,
    pub base_diagonal_chance: u8,
    pub diagonal_chance_step: u8,
    pub base_total_waves: usize,
    pub total_waves_step: usize,
    pub base_words_per_wave: usize,
    pub base_wave_delay_ms: u64,
    pub wave_delay_step_ms: u64,
    pub min_wave_delay_ms: u64,
    pub base_word_travel_ms: u64,
    pub word_travel_step_ms: u64,
    pub min_word_travel_ms: u64,
    pub first_wave_delay_ms: u64,
    pub start_countdown_ms: u64,
    pub diagonal_factor: u64,
    pub accented_factor: u64,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            version: 3,
            base_health: 20,
            min_health: 1,
            base_miss_damage: 2,
            base_min_word_length: 2,
            base_max_word_length: 4,
            base_diagonal_chance: 15,
            diagonal_chance_step: 10,
            base_total_waves: 3,
            total_waves_step: 2,
            base_words_per_wave: 4,
            base_wave_delay_ms: 10_000,
            wave_delay_step_ms: 1_000,
            min_wave_delay_ms: 2_000,
            base_word_travel_ms: 15_000,
            word_travel_step_ms: 1_500,
            min_word_travel_ms: 4_000,
            first_wave_delay_ms: FIRST_WAVE_DELAY_MS,
            start_countdown_ms: DELAY_TO_START_LEVEL_MS,
            diagonal_factor: POINTS_FOR_DIAGONAL,
            accented_factor: POINTS_FOR_ACCENTED,
        }
    }
}

impl RuleTable {
    /// Level 0 is read as level 1; range checks belong to the campaign.
    pub fn level_config(&self, level: u32) -> LevelConfig {
        let level = level.max(1);
        let steps = (level - 1) as usize;
        let steps_i = i32::try_from(steps).unwrap_or(i32::MAX);

        let min_word_length = self.base_min_word_length.saturating_add(steps);
        let max_word_length = self
            .base_max_word_length
            .saturating_add(steps)
            .max(min_word_length);
        let diagonal_chance = (self.base_diagonal_chance as usize)
            .saturating_add((self.diagonal_chance_step as usize).saturating_mul(steps))
            .min(100) as u8;
        // ceil(1.5 * steps)
        let words_per_wave = self
            .base_words_per_wave
            .saturating_add(steps.saturating_mul(3).div_ceil(2));

        let wave_delay_ms = self
            .base_wave_delay_ms
            .saturating_sub(self.wave_delay_step_ms.saturating_mul(steps as u64))
            .max(self.min_wave_delay_ms);
        let word_travel_ms = self
            .base_word_travel_ms
            .saturating_sub(self.word_travel_step_ms.saturating_mul(steps as u64))
            .max(self.min_word_travel_ms);

        LevelConfig {
            level,
            max_health: self.base_health.saturating_sub(steps_i).max(self.min_health),
            miss_damage: self.base_miss_damage.saturating_add(steps_i).max(1),
            min_word_length,
            max_word_length,
            diagonal_chance,
            total_waves: self
                .base_total_waves
                .saturating_add(self.total_waves_step.saturating_mul(steps)),
            words_per_wave,
            wave_delay: Duration::from_millis(wave_delay_ms),
            first_wave_delay: Duration::from_millis(self.first_wave_delay_ms),
            word_travel: Duration::from_millis(word_travel_ms),
            start_countdown: Duration::from_millis(self.start_countdown_ms),
        }
    }

    pub fn points_for_hit(
        &self,
        level: u32,
        word_length: usize,
        is_diagonal: bool,
        is_accented: bool,
    ) -> u64 {
        let mut points = (level.max(1) as u64).saturating_mul(word_length as u64);
        if is_diagonal {
            points = points.saturating_mul(self.diagonal_factor);
        }
        if is_accented {
            points = points.saturating_mul(self.accented_factor);
        }
        points
    }
}

pub fn level_config(level: u32) -> LevelConfig {
    RuleTable::default().level_config(level)
}

pub fn points_for_hit(level: u32, word_length: usize, is_diagonal: bool, is_accented: bool) -> u64 {
    RuleTable::default().points_for_hit(level, word_length, is_diagonal, is_accented)
}
