use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// What the game loop reacts to. `Tick` means a frame went by without input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    FocusGained,
    FocusLost,
    Tick,
}

/// Where the loop reads game events from.
pub trait GameEventSource: Send + 'static {
    /// Waits at most `timeout`. A timeout becomes a frame tick in [`Runner::step`].
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

fn translate(ev: CtEvent) -> Option<GameEvent> {
    match ev {
        // a release would type every letter twice
        CtEvent::Key(key) if key.kind == KeyEventKind::Press => Some(GameEvent::Key(key)),
        CtEvent::Resize(w, h) => Some(GameEvent::Resize(w, h)),
        CtEvent::FocusGained => Some(GameEvent::FocusGained),
        CtEvent::FocusLost => Some(GameEvent::FocusLost),
        _ => None,
    }
}

/// Reads the terminal on its own thread so the game clock keeps running
/// while no key is pressed.
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = translate(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(err) => {
                    log::warn!("terminal event stream closed: {err}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Frame pacing for the loop.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed events for driving the game without a terminal.
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Hands the loop one event per frame.
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Next event, or `Tick` once the frame interval passes without one.
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn idle_frames_tick() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert_eq!(runner.step(), GameEvent::Tick);
    }

    #[test]
    fn window_events_reach_the_loop_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize(80, 24)).unwrap();
        tx.send(GameEvent::FocusLost).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        assert_eq!(runner.step(), GameEvent::Resize(80, 24));
        assert_eq!(runner.step(), GameEvent::FocusLost);
    }

    #[test]
    fn key_releases_are_dropped() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(translate(CtEvent::Key(press)), Some(GameEvent::Key(press)));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert_eq!(translate(CtEvent::Key(release)), None);
        assert_eq!(translate(CtEvent::FocusGained), Some(GameEvent::FocusGained));
    }
}
