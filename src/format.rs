//! Deterministic repair pass turning a raw token sequence into display text.
//!
//! Generated sequences treat punctuation and contraction fragments as independent tokens,
//! so the joined text needs fixing up: spaces before punctuation go away, split
//! contractions are reattached, the first letter is capitalized and a terminal stop is
//! enforced. Pure function, safe on empty input.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::token::{Token, END_PUNCTUATION};

/// Marks that must not be preceded by a space in display text.
const TIGHT_PUNCTUATION: [char; 7] = ['.', '!', '?', ',', ';', ':', '…'];

/// Contraction fragments the tokenizer split off, reattached in this fixed order. The
/// `t` fragment only binds to a closed list of stems; the rest match any word.
static CONTRACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(
                r"\b(ain|aren|can|couldn|didn|doesn|don|hasn|haven|isn|mustn|shouldn|wasn|weren|won|wouldn) t\b",
            )
            .unwrap(),
            "${1}'t",
        ),
        (Regex::new(r"\b(\w+) s\b").unwrap(), "${1}'s"),
        (Regex::new(r"\b(\w+) ve\b").unwrap(), "${1}'ve"),
        (Regex::new(r"\b(\w+) re\b").unwrap(), "${1}'re"),
        (Regex::new(r"\b(\w+) ll\b").unwrap(), "${1}'ll"),
        (Regex::new(r"\b(\w+) d\b").unwrap(), "${1}'d"),
        (Regex::new(r"\b[Ii] m\b").unwrap(), "I'm"),
    ]
});

/// Joins `tokens` into repaired display text. Empty input gives an empty string; any
/// other input comes back capitalized and closed off with a sentence-final mark.
pub fn format_sentence(tokens: &[Token]) -> String {
    let mut text = capitalize_first(&tokens.iter().join(" "));

    for mark in TIGHT_PUNCTUATION {
        text = text.replace(&format!(" {mark}"), &mark.to_string());
    }

    for (pattern, replacement) in CONTRACTIONS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    if !text.is_empty() && !text.ends_with(END_PUNCTUATION) {
        text.push('.');
    }

    text
}

/// Uppercases the first grapheme cluster, leaving the rest untouched.
fn capitalize_first(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    match graphemes.next() {
        Some(first) => first.to_uppercase() + graphemes.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_input_formats_to_empty_string() {
        assert_eq!(format_sentence(&[]), "");
    }

    #[test]
    fn capitalizes_and_terminates() {
        assert_eq!(format_sentence(&tokens(&["hello", "world"])), "Hello world.");
    }

    #[test]
    fn capitalizes_non_ascii_first_letters() {
        assert_eq!(format_sentence(&tokens(&["éclair", "time"])), "Éclair time.");
    }

    #[test]
    fn removes_spaces_before_punctuation() {
        assert_eq!(
            format_sentence(&tokens(&["hello", ",", "world", "!"])),
            "Hello, world!"
        );
        assert_eq!(
            format_sentence(&tokens(&["wait", ";", "no", ":", "really", "…"])),
            "Wait; no: really…"
        );
    }

    #[test]
    fn keeps_existing_terminal_punctuation() {
        assert_eq!(format_sentence(&tokens(&["done", "!"])), "Done!");
        assert_eq!(format_sentence(&tokens(&["what", "?"])), "What?");
    }

    #[test]
    fn reattaches_split_not_contractions() {
        assert_eq!(
            format_sentence(&tokens(&["i", "don", "t", "know"])),
            "I don't know."
        );
        assert_eq!(
            format_sentence(&tokens(&["you", "can", "t", "win"])),
            "You can't win."
        );
    }

    #[test]
    fn only_listed_stems_bind_a_t_fragment() {
        // "mustard" is not in the stem list, so its "t" stays a separate word.
        assert_eq!(
            format_sentence(&tokens(&["mustard", "t", "rex"])),
            "Mustard t rex."
        );
    }

    #[test]
    fn reattaches_generic_suffix_fragments() {
        assert_eq!(
            format_sentence(&tokens(&["the", "dog", "s", "bone"])),
            "The dog's bone."
        );
        assert_eq!(format_sentence(&tokens(&["they", "ve", "won"])), "They've won.");
        assert_eq!(format_sentence(&tokens(&["we", "re", "done"])), "We're done.");
        assert_eq!(format_sentence(&tokens(&["she", "ll", "go"])), "She'll go.");
        assert_eq!(format_sentence(&tokens(&["he", "d", "rather"])), "He'd rather.");
    }

    #[test]
    fn reattaches_first_person_contraction() {
        assert_eq!(format_sentence(&tokens(&["i", "m", "here"])), "I'm here.");
    }

    #[test]
    fn punctuation_only_input_is_harmless() {
        assert_eq!(format_sentence(&tokens(&["…"])), "…");
        assert_eq!(format_sentence(&tokens(&[","])), ",.");
    }
}
