use crate::matcher::normalize;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Why a raw token was rejected from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    NonAlphabetic,
    NoVowel,
    RepeatedChar,
    RepeatedPattern,
}

/// Screen one raw token. Returns the cleaned word or the reason it is junk.
pub fn screen(raw: &str) -> Result<&str, Rejection> {
    let word = raw.trim();
    if word.is_empty() {
        return Err(Rejection::Empty);
    }
    if !word.chars().all(char::is_alphabetic) {
        return Err(Rejection::NonAlphabetic);
    }
    if !normalize(word).chars().any(|c| VOWELS.contains(&c)) {
        return Err(Rejection::NoVowel);
    }
    if has_char_run(word, 3) {
        return Err(Rejection::RepeatedChar);
    }
    if is_repeated_unit(word) {
        return Err(Rejection::RepeatedPattern);
    }
    Ok(word)
}

pub fn is_degenerate(raw: &str) -> bool {
    screen(raw).is_err()
}

fn has_char_run(word: &str, run: usize) -> bool {
    let mut count = 0;
    let mut last = None;
    for c in word.chars() {
        if Some(c) == last {
            count += 1;
        } else {
            count = 1;
            last = Some(c);
        }
        if count >= run {
            return true;
        }
    }
    false
}

/// "lalala", "abcabcabc": a 1..=3 char unit repeated at least three times.
fn is_repeated_unit(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    (1..=3).any(|unit| {
        len >= unit * 3 && len % unit == 0 && chars.chunks(unit).all(|c| c == &chars[..unit])
    })
}
