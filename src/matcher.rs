use std::borrow::Cow;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Case-fold and strip diacritics: "Café" -> "cafe".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// True if the word carries any accent / combining mark.
pub fn has_diacritics(word: &str) -> bool {
    word.nfd().any(is_combining_mark)
}

/// Result of matching the input buffer against every word in play.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    pub exact_match: Option<usize>,
}

/// Matches keystrokes against a fixed, slot-ordered set of words.
///
/// Comparison keys are computed once at construction so that each keystroke
/// only normalizes the input buffer.
#[derive(Debug, Clone)]
pub struct Matcher {
    words: Vec<String>,
    keys: Option<Vec<String>>,
}

impl Matcher {
    pub fn new(words: Vec<String>, normalize_words: bool) -> Self {
        let keys = normalize_words.then(|| words.iter().map(|w| normalize(w)).collect());
        Self { words, keys }
    }

    pub fn normalizes(&self) -> bool {
        self.keys.is_some()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn key(&self, idx: usize) -> &str {
        match &self.keys {
            Some(keys) => &keys[idx],
            None => &self.words[idx],
        }
    }

    fn input_key<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if self.normalizes() {
            Cow::Owned(normalize(input))
        } else {
            Cow::Borrowed(input)
        }
    }

    /// Match against every slot.
    pub fn match_input(&self, input: &str) -> MatchOutcome {
        self.match_where(input, |_| true)
    }

    /// Match against every slot, but only slots for which `is_active`
    /// holds are eligible as the exact match.
    pub fn match_where(&self, input: &str, is_active: impl Fn(usize) -> bool) -> MatchOutcome {
        let needle = self.input_key(input);
        let mut outcome = MatchOutcome {
            prefixes: Vec::with_capacity(self.words.len()),
            suffixes: Vec::with_capacity(self.words.len()),
            exact_match: None,
        };

        for idx in 0..self.words.len() {
            let key = self.key(idx);
            match key.strip_prefix(needle.as_ref()) {
                Some(rest) => {
                    outcome.prefixes.push(input.to_string());
                    outcome.suffixes.push(rest.to_string());
                    if rest.is_empty()
                        && !needle.is_empty()
                        && outcome.exact_match.is_none()
                        && is_active(idx)
                    {
                        outcome.exact_match = Some(idx);
                    }
                }
                None => {
                    outcome.prefixes.push(String::new());
                    outcome.suffixes.push(key.to_string());
                }
            }
        }

        outcome
    }
}

/// One-shot matching for callers that do not keep a [`Matcher`] around.
pub fn match_input<S: AsRef<str>>(input: &str, words: &[S], normalize_words: bool) -> MatchOutcome {
    let words = words.iter().map(|w| w.as_ref().to_string()).collect();
    Matcher::new(words, normalize_words).match_input(input)
}
