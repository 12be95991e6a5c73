use include_dir::{include_dir, Dir};
use std::fs;
use std::path::{Path, PathBuf};

use super::catalog::WordCatalog;
use crate::error::{GameError, GameResult};

static LANG_DIR: Dir = include_dir!("src/lang");

/// Anything that can hand out named word lists.
pub trait WordSource {
    fn list_names(&self) -> Vec<String>;
    fn load_word_list(&self, name: &str) -> GameResult<Vec<String>>;
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Word lists compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedWords;

impl WordSource for EmbeddedWords {
    fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = LANG_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|e| e == "txt"))
            .filter_map(|f| f.path().file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn load_word_list(&self, name: &str) -> GameResult<Vec<String>> {
        let text = LANG_DIR
            .get_file(name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| GameError::UnknownWordList(name.to_string()))?;
        Ok(split_lines(text))
    }
}

/// Every `*.txt` file in a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryWords {
    root: PathBuf,
}

impl DirectoryWords {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl WordSource for DirectoryWords {
    fn list_names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "txt"))
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn load_word_list(&self, name: &str) -> GameResult<Vec<String>> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(GameError::UnknownWordList(name.to_string()));
        }
        Ok(split_lines(&fs::read_to_string(path)?))
    }
}

/// Union of every list the source offers, as a filtered catalog.
pub fn load_catalog(source: &dyn WordSource) -> GameResult<WordCatalog> {
    let mut all = Vec::new();
    for name in source.list_names() {
        let words = source.load_word_list(&name)?;
        log::debug!("loaded word list {name}: {} entries", words.len());
        all.extend(words);
    }
    let catalog = WordCatalog::new(all)?;
    log::info!("word catalog ready: {} words", catalog.len());
    Ok(catalog)
}
