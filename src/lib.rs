// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod campaign;
pub mod config;
pub mod error;
pub mod history;
pub mod language;
pub mod level;
pub mod logging;
pub mod matcher;
pub mod motion;
pub mod rules;
pub mod runtime;
pub mod spawner;
pub mod ui;

pub use campaign::{CampaignSession, CampaignStatus};
pub use error::{GameError, GameResult};
pub use level::{LevelEvent, LevelOutcome, LevelSession, LevelStatus, LevelSummary, Resolution};
pub use matcher::{match_input, MatchOutcome, Matcher};
pub use rules::{level_config, points_for_hit, LevelConfig, RuleTable};
pub use spawner::WaveSpawner;
