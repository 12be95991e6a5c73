use std::collections::BTreeMap;
use std::time::Duration;

use crate::rules::AXLE_GAP;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Play area in whatever units the front-end draws with (pixels, cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Margin kept between spawn columns and the screen edges; also the
    /// vertical band below which side exits count as misses.
    pub edge_gap: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            edge_gap: AXLE_GAP,
        }
    }

    pub fn with_edge_gap(mut self, edge_gap: f32) -> Self {
        self.edge_gap = edge_gap;
        self
    }
}

/// Commands the level engine sends to whoever animates the words.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    SpawnTrajectory {
        slot: usize,
        from: Point,
        to: Point,
        delay: Duration,
        duration: Duration,
    },
    PauseAll,
    ResumeAll,
    StopAll,
    /// The slot was hit; its motion can stop.
    Retire { slot: usize },
    /// Give keyboard focus back to the text input.
    FocusInput,
}

/// Reported by the motion driver when a slot stops moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettled {
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub interrupted: bool,
}

/// The animation collaborator.
pub trait MotionDriver {
    fn spawn_trajectory(
        &mut self,
        slot: usize,
        from: Point,
        to: Point,
        delay: Duration,
        duration: Duration,
    );
    fn pause_all(&mut self);
    fn resume_all(&mut self);
    fn stop_all(&mut self);

    fn retire(&mut self, _slot: usize) {}

    fn apply(&mut self, signal: &Signal) {
        match *signal {
            Signal::SpawnTrajectory {
                slot,
                from,
                to,
                delay,
                duration,
            } => self.spawn_trajectory(slot, from, to, delay, duration),
            Signal::PauseAll => self.pause_all(),
            Signal::ResumeAll => self.resume_all(),
            Signal::StopAll => self.stop_all(),
            Signal::Retire { slot } => self.retire(slot),
            Signal::FocusInput => {}
        }
    }

    fn apply_all(&mut self, signals: &[Signal]) {
        for signal in signals {
            self.apply(signal);
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    from: Point,
    to: Point,
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
}

impl Track {
    fn progress(&self) -> Option<f32> {
        let moving = self.elapsed.checked_sub(self.delay)?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        Some((moving.as_secs_f32() / self.duration.as_secs_f32()).min(1.0))
    }

    fn position(&self) -> Option<Point> {
        self.progress().map(|t| {
            Point::new(
                self.from.x + (self.to.x - self.from.x) * t,
                self.from.y + (self.to.y - self.from.y) * t,
            )
        })
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }
}

/// Straight-line motion driven by an explicit clock.
///
/// Tracks start paused; nothing moves until `resume_all`. `stop_all` drops
/// every track without reporting it as settled.
#[derive(Debug, Clone)]
pub struct LinearMotion {
    tracks: BTreeMap<usize, Track>,
    paused: bool,
}

impl LinearMotion {
    pub fn new() -> Self {
        Self {
            tracks: BTreeMap::new(),
            paused: true,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Current position of a slot, `None` before its delay elapses or
    /// once it has settled.
    pub fn position(&self, slot: usize) -> Option<Point> {
        self.tracks.get(&slot).and_then(Track::position)
    }

    /// Move the clock forward and collect every track that completed.
    pub fn advance(&mut self, dt: Duration) -> Vec<MotionSettled> {
        if self.paused {
            return Vec::new();
        }

        let mut settled = Vec::new();
        for (&slot, track) in self.tracks.iter_mut() {
            track.elapsed += dt;
            if track.finished() {
                settled.push(MotionSettled {
                    slot,
                    x: track.to.x,
                    y: track.to.y,
                    interrupted: false,
                });
            }
        }
        for s in &settled {
            self.tracks.remove(&s.slot);
        }
        settled
    }
}

impl Default for LinearMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionDriver for LinearMotion {
    fn spawn_trajectory(
        &mut self,
        slot: usize,
        from: Point,
        to: Point,
        delay: Duration,
        duration: Duration,
    ) {
        self.tracks.insert(
            slot,
            Track {
                from,
                to,
                delay,
                duration,
                elapsed: Duration::ZERO,
            },
        );
    }

    fn pause_all(&mut self) {
        self.paused = true;
    }

    fn resume_all(&mut self) {
        self.paused = false;
    }

    fn stop_all(&mut self) {
        self.tracks.clear();
    }

    fn retire(&mut self, slot: usize) {
        self.tracks.remove(&slot);
    }
}
