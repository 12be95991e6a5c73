use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, Rng};

use crate::campaign::{CampaignSession, CampaignStatus};
use crate::history::History;
use crate::level::{LevelSession, LevelStatus, LevelSummary, Resolution};
use crate::motion::{LinearMotion, MotionDriver, Viewport};
use crate::runtime::GameEvent;

pub const TICK_RATE_MS: u64 = 50;
/// Rows taken by the header and the input line.
pub const HEADER_ROWS: u16 = 3;
pub const INPUT_ROWS: u16 = 3;

/// Play area for a terminal of `cols` x `rows` cells, in cells.
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    let width = f32::from(cols);
    let height = f32::from(rows.saturating_sub(HEADER_ROWS + INPUT_ROWS));
    Viewport::new(width, height).with_edge_gap((width / 8.0).max(2.0))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Countdown { remaining: Duration },
    Playing,
    /// Won a level that was not the last one.
    LevelResult,
    Defeat,
    Complete,
    Error(String),
}

pub struct App<R: Rng = StdRng> {
    campaign: CampaignSession<R>,
    level: Option<LevelSession>,
    motion: LinearMotion,
    screen: Screen,
    viewport: Viewport,
    history: Option<History>,
    best_points: Option<u64>,
    last_summary: Option<LevelSummary>,
    last_resolution: Option<Resolution>,
    should_quit: bool,
}

impl<R: Rng> App<R> {
    /// Builds the app and starts the campaign's current level.
    pub fn new(campaign: CampaignSession<R>, viewport: Viewport) -> Self {
        let mut app = Self {
            campaign,
            level: None,
            motion: LinearMotion::new(),
            screen: Screen::Playing,
            viewport,
            history: None,
            best_points: None,
            last_summary: None,
            last_resolution: None,
            should_quit: false,
        };
        app.start_level();
        app
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self.refresh_best();
        self
    }

    /// Best single-level score on record, if history is kept.
    pub fn best_points(&self) -> Option<u64> {
        self.best_points
    }

    fn refresh_best(&mut self) {
        let Some(history) = &self.history else {
            return;
        };
        match history.best_points() {
            Ok(best) => self.best_points = best,
            Err(err) => log::warn!("could not read history {}: {err}", history.path().display()),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn level(&self) -> Option<&LevelSession> {
        self.level.as_ref()
    }

    pub fn campaign(&self) -> &CampaignSession<R> {
        &self.campaign
    }

    pub fn motion(&self) -> &LinearMotion {
        &self.motion
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn last_summary(&self) -> Option<&LevelSummary> {
        self.last_summary.as_ref()
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_paused(&self) -> bool {
        self.level
            .as_ref()
            .is_some_and(|l| l.status() == LevelStatus::Paused)
    }

    fn start_level(&mut self) {
        self.last_resolution = None;
        match self.campaign.start_level(self.viewport) {
            Ok(level) => {
                let countdown = level.config().start_countdown;
                self.level = Some(level);
                self.pump();
                self.screen = Screen::Countdown {
                    remaining: countdown,
                };
            }
            Err(err) => {
                log::error!("cannot start level {}: {err}", self.campaign.level());
                self.level = None;
                self.screen = Screen::Error(err.to_string());
            }
        }
    }

    fn new_run(&mut self) {
        self.campaign.new_run();
        self.last_summary = None;
        self.start_level();
    }

    /// Forward queued level signals to the motion driver.
    fn pump(&mut self) {
        if let Some(level) = self.level.as_mut() {
            let signals = level.take_signals();
            self.motion.apply_all(&signals);
        }
    }

    fn record(&mut self, resolution: Option<Resolution>) {
        if resolution.is_some() {
            self.last_resolution = resolution;
        }
        self.pump();
        self.settle_if_done();
    }

    fn settle_if_done(&mut self) {
        let Some(summary) = self
            .level
            .as_ref()
            .filter(|l| l.is_done())
            .and_then(|l| l.summary().cloned())
        else {
            return;
        };

        if let Some(history) = &self.history {
            if let Err(err) = history.record(&summary) {
                log::warn!("could not write history {}: {err}", history.path().display());
            }
        }
        self.refresh_best();

        self.screen = match self.campaign.finish_level(summary.clone()) {
            CampaignStatus::Defeated => Screen::Defeat,
            CampaignStatus::Complete => Screen::Complete,
            CampaignStatus::Ready | CampaignStatus::Playing => Screen::LevelResult,
        };
        self.last_summary = Some(summary);
        self.level = None;
    }

    /// Move the game clock forward.
    pub fn advance(&mut self, dt: Duration) {
        match &mut self.screen {
            Screen::Countdown { remaining } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.screen = Screen::Playing;
                    if let Some(level) = self.level.as_mut() {
                        level.begin();
                    }
                    self.record(None);
                }
            }
            Screen::Playing => {
                let settled = self.motion.advance(dt);
                for s in settled {
                    let resolution = self.level.as_mut().and_then(|l| l.on_motion_settled(s));
                    self.record(resolution);
                    if self.level.is_none() {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::Tick => {}
            GameEvent::Resize(cols, rows) => self.resize(viewport_for(cols, rows)),
            GameEvent::FocusLost => {
                if let Some(level) = self.level.as_mut() {
                    level.on_window_blur();
                }
                self.pump();
            }
            GameEvent::FocusGained => {
                if let Some(level) = self.level.as_mut() {
                    level.on_window_focus();
                }
                self.pump();
            }
            GameEvent::Key(key) => self.on_key(key),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(level) = self.level.as_mut() {
            level.handle(crate::level::LevelEvent::Resize(viewport));
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Countdown { .. } => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
            Screen::Playing => self.on_playing_key(key),
            Screen::LevelResult | Screen::Defeat => match key.code {
                KeyCode::Enter => self.start_level(),
                KeyCode::Char('n') => self.new_run(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Screen::Complete | Screen::Error(_) => match key.code {
                KeyCode::Enter | KeyCode::Char('n') => self.new_run(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let resolution = match key.code {
            KeyCode::Char(c) => level.push_char(c),
            KeyCode::Backspace => {
                level.backspace();
                None
            }
            KeyCode::Esc if level.input().is_empty() => {
                self.should_quit = true;
                return;
            }
            KeyCode::Enter | KeyCode::Esc => {
                level.on_cancel_key();
                None
            }
            _ => None,
        };
        self.record(resolution);
    }
}
