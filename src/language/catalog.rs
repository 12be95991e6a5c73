use itertools::Itertools;
use rand::Rng;

use super::filter;
use crate::error::{GameError, GameResult};

/// Deduplicated, filtered pool of candidate words.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCatalog {
    words: Vec<String>,
}

impl WordCatalog {
    /// Build from raw tokens: trims, drops degenerate entries and
    /// duplicates (first occurrence wins).
    pub fn new<I, S>(raw: I) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = raw
            .into_iter()
            .filter_map(|w| filter::screen(w.as_ref()).ok().map(str::to_string))
            .unique()
            .collect();

        if words.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    /// Uniform draw, no exclusions.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.words.len()))
    }

    /// Words whose character count is within `min..=max`.
    pub fn within_lengths(&self, min: usize, max: usize) -> GameResult<Self> {
        let words: Vec<String> = self
            .words
            .iter()
            .filter(|w| (min..=max).contains(&w.chars().count()))
            .cloned()
            .collect();

        if words.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        Ok(Self { words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn dedupes_and_filters() {
        let catalog = WordCatalog::new(["casa", "casa\r", "brrr", "", "dedo", "casa"]).unwrap();
        assert_eq!(catalog.words(), &["casa".to_string(), "dedo".to_string()]);
    }

    #[test]
    fn empty_after_filtering_is_an_error() {
        assert_matches!(WordCatalog::new(["", "tsk", "123"]), Err(GameError::EmptyCatalog));
        assert_matches!(
            WordCatalog::new(Vec::<String>::new()),
            Err(GameError::EmptyCatalog)
        );
    }

    #[test]
    fn length_window_counts_chars_not_bytes() {
        let catalog = WordCatalog::new(["pão", "casa", "carro", "ar"]).unwrap();
        let three_to_four = catalog.within_lengths(3, 4).unwrap();
        assert_eq!(three_to_four.words(), &["pão".to_string(), "casa".to_string()]);
        assert_matches!(catalog.within_lengths(9, 12), Err(GameError::EmptyCatalog));
    }

    #[test]
    fn choose_stays_in_catalog() {
        use rand::{rngs::StdRng, SeedableRng};
        let catalog = WordCatalog::new(["casa", "dedo", "ator"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let w = catalog.choose(&mut rng).unwrap();
            assert!(catalog.contains(w));
        }
    }
}
