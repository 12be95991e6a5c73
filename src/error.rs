use thiserror::Error;

/// Everything that can stop a level or a campaign from starting.
///
/// None of these are fatal: the worst case is "this level cannot start",
/// and the caller simply stays out of the running state.
#[derive(Debug, Error)]
pub enum GameError {
    /// No usable words survived loading and filtering.
    #[error("word catalog is empty")]
    EmptyCatalog,

    /// Not enough distinct, unused words to fill the level.
    #[error("word catalog exhausted: requested {requested} words, only {available} available")]
    CatalogExhausted { requested: usize, available: usize },

    #[error("level {level} is out of range (1..={max_level})")]
    InvalidLevel { level: u32, max_level: u32 },

    #[error("campaign already complete")]
    CampaignComplete,

    #[error("unknown word list: {0}")]
    UnknownWordList(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history log error: {0}")]
    Csv(#[from] csv::Error),
}

pub type GameResult<T> = Result<T, GameError>;
