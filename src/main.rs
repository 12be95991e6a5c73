use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use type_war::{
    app::{viewport_for, App, TICK_RATE_MS},
    app_dirs::AppDirs,
    campaign::CampaignSession,
    config::{Config, ConfigStore, FileConfigStore},
    error::GameResult,
    history::History,
    language::{load_catalog, DirectoryWords, EmbeddedWords, WordCatalog},
    logging,
    rules::MAX_LEVEL,
    runtime::{CrosstermEventSource, FixedTicker, GameEventSource, Runner, Ticker},
    spawner::WaveSpawner,
};

/// falling-word typing battle: type the words before they hit the ground
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words rain down in waves; type each one before it leaves the screen. Diagonal and accented words score extra, every level is faster and longer than the last."
)]
pub struct Cli {
    /// level to start the run from
    #[clap(short = 'l', long, default_value_t = 1)]
    level: u32,

    /// number of levels in a run
    #[clap(short = 'm', long, default_value_t = MAX_LEVEL)]
    max_level: u32,

    /// directory of *.txt word lists to play with instead of the built-in ones
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// only straight-falling words
    #[clap(long)]
    no_diagonal: bool,

    /// accept unaccented typing for accented words (forfeits the accent bonus)
    #[clap(long)]
    ignore_accents: bool,

    /// seed for a reproducible run
    #[clap(long)]
    seed: Option<u64>,

    /// remember --no-diagonal / --ignore-accents as the new defaults
    #[clap(long)]
    save: bool,
}

impl Cli {
    /// Overlay command line switches on the stored preferences.
    fn apply(&self, mut config: Config) -> Config {
        if self.no_diagonal {
            config.diagonal_words = false;
        }
        if self.ignore_accents {
            config.accent_sensitive = false;
        }
        config
    }

    fn catalog(&self) -> GameResult<WordCatalog> {
        match &self.words {
            Some(dir) => load_catalog(&DirectoryWords::new(dir)),
            None => load_catalog(&EmbeddedWords),
        }
    }

    fn spawner(&self) -> WaveSpawner {
        match self.seed {
            Some(seed) => WaveSpawner::seeded(seed),
            None => WaveSpawner::from_entropy(),
        }
    }

    fn campaign(&self, config: Config) -> GameResult<CampaignSession> {
        CampaignSession::new(self.catalog()?, config, self.max_level, self.spawner())?
            .starting_at(self.level)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        logging::init(path);
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save {
        store.save(&config)?;
        log::info!("saved preferences to {}", store.path().display());
    }

    let campaign = match cli.campaign(config) {
        Ok(campaign) => campaign,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(campaign, viewport_for(size.width, size.height));
    if let Some(path) = AppDirs::history_path() {
        app = app.with_history(History::new(path));
    }

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = run_loop(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B, R, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    R: Rng,
    E: GameEventSource,
    T: Ticker,
{
    let mut last = Instant::now();
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        let now = Instant::now();
        app.advance(now - last);
        last = now;

        app.handle(event);
        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
