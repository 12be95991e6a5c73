use itertools::Itertools;
use rand::Rng;
use serde::Serialize;
use strum_macros::Display;

use crate::error::GameResult;
use crate::language::WordCatalog;
use crate::matcher::{has_diacritics, MatchOutcome, Matcher};
use crate::motion::{MotionSettled, Point, Signal, Viewport};
use crate::rules::{LevelConfig, RuleTable};
use crate::spawner::{is_out_of_bounds, WaveSpawner, WordSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LevelStatus {
    Spawning,
    Running,
    Paused,
    LevelDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum LevelOutcome {
    Victory,
    Defeat,
}

/// Everything that can happen to a level from the outside.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelEvent {
    /// Countdown finished.
    Begin,
    InputChanged(String),
    CancelKey,
    WindowFocus,
    WindowBlur,
    MotionSettled(MotionSettled),
    Resize(Viewport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Hit {
        slot: usize,
        word: String,
        points: u64,
    },
    Miss {
        slot: usize,
        word: String,
        damage: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub outcome: LevelOutcome,
    pub points: u64,
    pub hit_names: Vec<String>,
    pub missed_names: Vec<String>,
    pub health: i32,
    pub max_health: i32,
    pub total_words: usize,
}

impl LevelSummary {
    pub fn is_victory(&self) -> bool {
        self.outcome == LevelOutcome::Victory
    }

    /// Hits over resolved words, in percent. 0 when nothing resolved.
    pub fn accuracy(&self) -> f64 {
        let resolved = self.hit_names.len() + self.missed_names.len();
        if resolved == 0 {
            return 0.0;
        }
        (self.hit_names.len() as f64 / resolved as f64 * 100.0).round()
    }
}

/// One level being played.
///
/// All mutation goes through the event handlers below. Outbound requests
/// to the motion driver are queued and collected with [`take_signals`].
///
/// [`take_signals`]: LevelSession::take_signals
#[derive(Debug)]
pub struct LevelSession {
    config: LevelConfig,
    rules: RuleTable,
    accent_sensitive: bool,
    viewport: Viewport,
    /// Viewport the words in flight were launched in.
    launch_viewport: Viewport,
    slots: Vec<WordSlot>,
    matcher: Matcher,
    resolved: Vec<bool>,
    display: MatchOutcome,
    health: i32,
    words_left: usize,
    hit_names: Vec<String>,
    missed_names: Vec<String>,
    points: u64,
    input: String,
    status: LevelStatus,
    summary: Option<LevelSummary>,
    signals: Vec<Signal>,
}

impl LevelSession {
    /// Draws the level's words and enters `Spawning`. Fails if the catalog
    /// cannot fill the level.
    pub fn new<R: Rng>(
        config: LevelConfig,
        catalog: &WordCatalog,
        accent_sensitive: bool,
        viewport: Viewport,
        spawner: &mut WaveSpawner<R>,
    ) -> GameResult<Self> {
        let slots = spawner.plan_level(catalog, &config)?;
        let mut session = Self {
            health: config.max_health,
            config,
            rules: RuleTable::default(),
            accent_sensitive,
            viewport,
            launch_viewport: viewport,
            slots: Vec::new(),
            matcher: Matcher::new(Vec::new(), !accent_sensitive),
            resolved: Vec::new(),
            display: MatchOutcome::default(),
            words_left: 0,
            hit_names: Vec::new(),
            missed_names: Vec::new(),
            points: 0,
            input: String::new(),
            status: LevelStatus::Spawning,
            summary: None,
            signals: Vec::new(),
        };
        session.enter_spawning(slots, spawner);
        Ok(session)
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Fresh draw for the same level. On error the session is untouched.
    pub fn restart<R: Rng>(
        &mut self,
        catalog: &WordCatalog,
        spawner: &mut WaveSpawner<R>,
    ) -> GameResult<()> {
        let slots = spawner.plan_level(catalog, &self.config)?;
        self.enter_spawning(slots, spawner);
        Ok(())
    }

    fn enter_spawning<R: Rng>(&mut self, slots: Vec<WordSlot>, spawner: &mut WaveSpawner<R>) {
        self.matcher = Matcher::new(
            slots.iter().map(|s| s.text.clone()).collect(),
            !self.accent_sensitive,
        );
        self.resolved = vec![false; slots.len()];
        self.words_left = slots.len();
        self.health = self.config.max_health;
        self.hit_names.clear();
        self.missed_names.clear();
        self.points = 0;
        self.input.clear();
        self.summary = None;
        self.status = LevelStatus::Spawning;
        self.launch_viewport = self.viewport;

        self.signals.push(Signal::StopAll);
        for slot in &slots {
            let path = spawner.trajectory(slot.kind, &self.viewport);
            self.signals.push(Signal::SpawnTrajectory {
                slot: slot.index,
                from: path.from,
                to: path.to,
                delay: slot.spawn_delay,
                duration: self.config.word_travel,
            });
        }
        self.signals.push(Signal::PauseAll);
        self.slots = slots;
        self.refresh_display();

        log::info!(
            "level {} spawning {} words ({} waves of {})",
            self.config.level,
            self.slots.len(),
            self.config.total_waves,
            self.config.words_per_wave
        );
    }

    pub fn handle(&mut self, event: LevelEvent) -> Option<Resolution> {
        match event {
            LevelEvent::Begin => {
                self.begin();
                None
            }
            LevelEvent::InputChanged(text) => self.on_input_change(&text),
            LevelEvent::CancelKey => {
                self.on_cancel_key();
                None
            }
            LevelEvent::WindowFocus => {
                self.on_window_focus();
                None
            }
            LevelEvent::WindowBlur => {
                self.on_window_blur();
                None
            }
            LevelEvent::MotionSettled(settled) => self.on_motion_settled(settled),
            LevelEvent::Resize(viewport) => {
                self.viewport = viewport;
                None
            }
        }
    }

    /// `Spawning -> Running`. Returns false from any other state.
    pub fn begin(&mut self) -> bool {
        if self.status != LevelStatus::Spawning {
            return false;
        }
        self.enter_running();
        self.check_done();
        true
    }

    fn enter_running(&mut self) {
        self.status = LevelStatus::Running;
        self.signals.push(Signal::ResumeAll);
        self.signals.push(Signal::FocusInput);
        log::info!("level {} running", self.config.level);
    }

    pub fn on_window_blur(&mut self) -> bool {
        if self.status != LevelStatus::Running {
            return false;
        }
        self.status = LevelStatus::Paused;
        self.signals.push(Signal::PauseAll);
        log::info!("level {} paused", self.config.level);
        true
    }

    pub fn on_window_focus(&mut self) -> bool {
        if self.status != LevelStatus::Paused {
            return false;
        }
        self.enter_running();
        true
    }

    /// Replace the input buffer. A buffer equal to an unresolved word is a hit.
    pub fn on_input_change(&mut self, text: &str) -> Option<Resolution> {
        if self.status != LevelStatus::Running {
            return None;
        }
        self.input.clear();
        self.input.push_str(text);
        self.refresh_display();

        let slot = self.display.exact_match?;
        self.resolve_hit(slot)
    }

    pub fn push_char(&mut self, c: char) -> Option<Resolution> {
        let mut text = self.input.clone();
        text.push(c);
        self.on_input_change(&text)
    }

    pub fn backspace(&mut self) {
        let mut text = self.input.clone();
        if text.pop().is_some() {
            self.on_input_change(&text);
        }
    }

    pub fn on_cancel_key(&mut self) {
        if self.status == LevelStatus::Running && !self.input.is_empty() {
            self.input.clear();
            self.refresh_display();
        }
    }

    /// Motion ended for a slot. Only counts while running, and only when
    /// the slot stopped out of the bounds it was launched in.
    pub fn on_motion_settled(&mut self, settled: MotionSettled) -> Option<Resolution> {
        if self.status != LevelStatus::Running {
            return None;
        }
        if !is_out_of_bounds(Point::new(settled.x, settled.y), &self.launch_viewport) {
            log::debug!(
                "slot {} settled in bounds at ({:.1}, {:.1})",
                settled.slot,
                settled.x,
                settled.y
            );
            return None;
        }
        self.resolve_miss(settled.slot)
    }

    fn is_resolvable(&self, slot: usize) -> Option<&str> {
        if self.words_left == 0 || slot >= self.slots.len() || self.resolved[slot] {
            return None;
        }
        let word = self.slots[slot].text.as_str();
        if self.hit_names.iter().any(|w| w == word) || self.missed_names.iter().any(|w| w == word) {
            return None;
        }
        Some(word)
    }

    fn resolve_hit(&mut self, slot: usize) -> Option<Resolution> {
        let word = self.is_resolvable(slot)?.to_string();
        let is_diagonal = self.slots[slot].is_diagonal();
        let is_accented = self.accent_sensitive && has_diacritics(&word);
        let points = self.rules.points_for_hit(
            self.config.level,
            word.chars().count(),
            is_diagonal,
            is_accented,
        );

        self.resolved[slot] = true;
        self.hit_names.push(word.clone());
        self.words_left -= 1;
        self.points += points;
        self.input.clear();
        self.refresh_display();
        self.signals.push(Signal::Retire { slot });
        log::debug!("hit slot {slot} {word:?} for {points} points");

        self.check_done();
        Some(Resolution::Hit { slot, word, points })
    }

    fn resolve_miss(&mut self, slot: usize) -> Option<Resolution> {
        let word = self.is_resolvable(slot)?.to_string();
        let damage = self.config.miss_damage;

        self.resolved[slot] = true;
        self.missed_names.push(word.clone());
        self.words_left -= 1;
        self.health -= damage;
        self.refresh_display();
        log::debug!("missed slot {slot} {word:?}, health now {}", self.health);

        self.check_done();
        Some(Resolution::Miss { slot, word, damage })
    }

    fn check_done(&mut self) {
        let live = matches!(self.status, LevelStatus::Running | LevelStatus::Paused);
        if live && (self.health <= 0 || self.words_left == 0) {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.status = LevelStatus::LevelDone;
        self.signals.push(Signal::StopAll);
        let outcome = if self.health > 0 {
            LevelOutcome::Victory
        } else {
            LevelOutcome::Defeat
        };
        self.summary = Some(LevelSummary {
            level: self.config.level,
            outcome,
            points: self.points,
            hit_names: self.hit_names.iter().unique().cloned().collect(),
            missed_names: self.missed_names.iter().unique().cloned().collect(),
            health: self.health,
            max_health: self.config.max_health,
            total_words: self.slots.len(),
        });
        log::info!(
            "level {} done: {outcome} with {} points",
            self.config.level,
            self.points
        );
    }

    fn refresh_display(&mut self) {
        let resolved = &self.resolved;
        self.display = self
            .matcher
            .match_where(&self.input, |idx| !resolved[idx]);
    }

    /// Drain queued motion-driver requests, oldest first.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status == LevelStatus::LevelDone
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.config.level
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn slots(&self) -> &[WordSlot] {
        &self.slots
    }

    pub fn total_words(&self) -> usize {
        self.slots.len()
    }

    pub fn words_left(&self) -> usize {
        self.words_left
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.config.max_health
    }

    pub fn health_percent(&self) -> f64 {
        (100.0 * self.health.max(0) as f64 / self.config.max_health.max(1) as f64).min(100.0)
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn hit_names(&self) -> &[String] {
        &self.hit_names
    }

    pub fn missed_names(&self) -> &[String] {
        &self.missed_names
    }

    pub fn is_resolved(&self, slot: usize) -> bool {
        self.resolved.get(slot).copied().unwrap_or(false)
    }

    /// Matched prefix and remaining suffix for a slot, for drawing.
    pub fn display_parts(&self, slot: usize) -> Option<(&str, &str)> {
        Some((
            self.display.prefixes.get(slot)?.as_str(),
            self.display.suffixes.get(slot)?.as_str(),
        ))
    }

    pub fn summary(&self) -> Option<&LevelSummary> {
        self.summary.as_ref()
    }
}
