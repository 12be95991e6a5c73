use std::collections::HashSet;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use strum_macros::Display;

use crate::error::{GameError, GameResult};
use crate::language::WordCatalog;
use crate::motion::{Point, Viewport};
use crate::rules::LevelConfig;

/// Diagonal end points must land at least this many edge gaps away from
/// the start column.
const DIAGONAL_MIN_GAP_FACTOR: f32 = 1.5;
/// Words finish this far below the bottom edge.
const EXIT_OVERSHOOT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TrajectoryKind {
    Straight,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub kind: TrajectoryKind,
    pub from: Point,
    pub to: Point,
}

/// One word in play. Immutable once planned; its position belongs to the
/// motion driver.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSlot {
    pub index: usize,
    pub text: String,
    pub kind: TrajectoryKind,
    pub spawn_delay: Duration,
    pub wave: usize,
}

impl WordSlot {
    pub fn is_diagonal(&self) -> bool {
        self.kind == TrajectoryKind::Diagonal
    }
}

pub fn wave_of(index: usize, words_per_wave: usize) -> usize {
    index / words_per_wave.max(1)
}

pub fn spawn_delay(index: usize, config: &LevelConfig) -> Duration {
    let wave = wave_of(index, config.words_per_wave) as u32;
    config.first_wave_delay + config.wave_delay * wave
}

/// A word is missed if it leaves through the bottom, or through a side
/// once it is below the top band.
pub fn is_out_of_bounds(at: Point, viewport: &Viewport) -> bool {
    at.y > viewport.height
        || ((at.x < 0.0 || at.x > viewport.width) && at.y > viewport.edge_gap)
}

/// Draws words and trajectories for a level.
#[derive(Debug, Clone)]
pub struct WaveSpawner<R: Rng = StdRng> {
    rng: R,
}

impl WaveSpawner<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WaveSpawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `count` distinct words not in `already_seen`, by uniform draws with
    /// rejection. Errors instead of looping when the pool is too small.
    pub fn spawn(
        &mut self,
        catalog: &WordCatalog,
        already_seen: &HashSet<String>,
        count: usize,
    ) -> GameResult<Vec<String>> {
        let available = catalog
            .words()
            .iter()
            .filter(|w| !already_seen.contains(*w))
            .count();
        if available < count {
            return Err(GameError::CatalogExhausted {
                requested: count,
                available,
            });
        }

        let mut drawn: Vec<String> = Vec::with_capacity(count);
        while drawn.len() < count {
            let Some(word) = catalog.choose(&mut self.rng) else {
                break;
            };
            if already_seen.contains(word) || drawn.iter().any(|w| w == word) {
                continue;
            }
            drawn.push(word.to_string());
        }
        Ok(drawn)
    }

    /// Bernoulli draw per slot, decided up front.
    pub fn assign_kinds(&mut self, count: usize, diagonal_chance: u8) -> Vec<TrajectoryKind> {
        let p = f64::from(diagonal_chance.min(100)) / 100.0;
        (0..count)
            .map(|_| {
                if self.rng.gen_bool(p) {
                    TrajectoryKind::Diagonal
                } else {
                    TrajectoryKind::Straight
                }
            })
            .collect()
    }

    /// Every slot for a level: words, kinds and staggered wave delays.
    pub fn plan_level(
        &mut self,
        catalog: &WordCatalog,
        config: &LevelConfig,
    ) -> GameResult<Vec<WordSlot>> {
        let count = config.total_words();
        let words = self.spawn(catalog, &HashSet::new(), count)?;
        let kinds = self.assign_kinds(count, config.diagonal_chance);

        Ok(words
            .into_iter()
            .zip(kinds)
            .enumerate()
            .map(|(index, (text, kind))| WordSlot {
                index,
                text,
                kind,
                spawn_delay: spawn_delay(index, config),
                wave: wave_of(index, config.words_per_wave),
            })
            .collect())
    }

    /// Start above the screen, end just below it. Diagonal paths end a
    /// clear distance away from the start column.
    pub fn trajectory(&mut self, kind: TrajectoryKind, viewport: &Viewport) -> Trajectory {
        let gap = viewport.edge_gap.max(0.0);
        let from_x = self.uniform(gap, viewport.width - gap, viewport.width / 2.0);
        let from_y = self.uniform(-2.0 * gap, -gap, -gap);
        let to_x = match kind {
            TrajectoryKind::Straight => from_x,
            TrajectoryKind::Diagonal => self.diagonal_end(from_x, viewport),
        };

        Trajectory {
            kind,
            from: Point::new(from_x, from_y),
            to: Point::new(to_x, viewport.height + EXIT_OVERSHOOT),
        }
    }

    fn diagonal_end(&mut self, from_x: f32, viewport: &Viewport) -> f32 {
        let min_gap = DIAGONAL_MIN_GAP_FACTOR * viewport.edge_gap.max(1.0);
        let left = (0.0, from_x - min_gap);
        let right = (from_x + min_gap, viewport.width);
        let left_len = (left.1 - left.0).max(0.0);
        let right_len = (right.1 - right.0).max(0.0);

        if left_len + right_len <= 0.0 {
            // Too narrow for the full gap: take the farther edge.
            return if from_x > viewport.width / 2.0 {
                0.0
            } else {
                viewport.width
            };
        }

        let pick = self.rng.gen_range(0.0..left_len + right_len);
        if pick < left_len {
            left.0 + pick
        } else {
            right.0 + (pick - left_len)
        }
    }

    fn uniform(&mut self, lo: f32, hi: f32, fallback: f32) -> f32 {
        if hi > lo {
            self.rng.gen_range(lo..hi)
        } else {
            fallback
        }
    }
}
