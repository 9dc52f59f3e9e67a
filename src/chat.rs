//! Shallow chat heuristics: classify what the user typed, then answer with nonsense seeded
//! from their own words. No understanding happens here, just punctuation checks and a
//! stop-word filter.

use itertools::Itertools;
use log::trace;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::generator::{Generator, DEFAULT_TEMPERATURE};
use crate::style::CHARACTER_NAMES;

/// Function words stripped from user input before looking for seed words.
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "you", "your", "we", "our", "they", "them", "their",
    "he", "she", "it", "his", "her", "its", "a", "an", "the", "is", "are",
    "was", "were", "be", "been", "am", "do", "does", "did", "have", "has",
    "had", "will", "would", "could", "should", "can", "may", "might",
    "shall", "to", "of", "in", "for", "on", "with", "at", "by", "from",
    "as", "into", "about", "that", "this", "what", "which", "who", "whom",
    "how", "when", "where", "why", "if", "then", "than", "so", "but",
    "and", "or", "not", "no", "yes", "just", "also", "very", "too",
    "really", "much", "more", "most", "some", "any", "all", "each",
    "every", "both", "few", "many", "up", "out", "there", "here",
    "tell", "think", "know", "like", "want", "need", "get", "got",
    "make", "going", "go", "come", "say", "said", "thing", "things",
    "don", "doesn", "didn", "won", "wouldn", "couldn", "shouldn",
];

/// Greeting openers, matched case-insensitively at the start of the message.
static GREETING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(hi|hello|hey|yo|sup|greetings|howdy)\b").unwrap());

/// Imperative verbs that mark a message as a command.
static IMPERATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(tell|show|give|make|describe|explain|help|do|say)\b").unwrap());

/// What kind of utterance the user typed. Drives the shape of the response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Greeting,
    Question,
    /// Commands and exclamations share one response shape.
    Command,
    Statement,
}

/// Classifies a message. Precedence is fixed: greeting, then question, then
/// command/exclamation, then statement.
pub fn classify(message: &str) -> MessageKind {
    let trimmed = message.trim();
    if GREETING.is_match(trimmed) {
        MessageKind::Greeting
    } else if trimmed.ends_with('?') {
        MessageKind::Question
    } else if trimmed.ends_with('!') || IMPERATIVE.is_match(trimmed) {
        MessageKind::Command
    } else {
        MessageKind::Statement
    }
}

/// Lowercases, strips everything except letters, whitespace, apostrophes and hyphens, and
/// keeps the words longer than two characters that are not stop words.
pub fn content_words(message: &str) -> Vec<String> {
    let cleaned: String = message
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || matches!(c, '\'' | '-'))
        .collect();
    cleaned
        .split_whitespace()
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_owned)
        .collect()
}

impl Generator {
    /// Responds to a user message with nonsense anchored on its content words.
    ///
    /// Content words that exist in the order-1 table become seeds; the classification
    /// picks how many sentences come back and how wild they are. Seeds are shuffled so
    /// the same message gets a different response every time.
    pub fn chat_response(&self, rng: &mut impl Rng, user_message: &str) -> String {
        let kind = classify(user_message);
        let mut seedable: Vec<String> = content_words(user_message)
            .into_iter()
            .filter(|word| self.model().is_seedable(word))
            .collect();
        seedable.shuffle(rng);
        trace!(
            "chat message classified as {kind:?} with {} seed words",
            seedable.len()
        );

        let mut sentences = Vec::new();
        match kind {
            MessageKind::Greeting => {
                let name = CHARACTER_NAMES[rng.gen_range(0..CHARACTER_NAMES.len())];
                let opener = match seedable.first() {
                    Some(seed) => self.generate_seeded(rng, seed, 15, DEFAULT_TEMPERATURE),
                    None => self.generate_sentence(rng, 15, DEFAULT_TEMPERATURE),
                };
                let follow = self.generate_sentence(rng, 12, DEFAULT_TEMPERATURE);
                sentences.push(format!("{name} says: {opener} {follow}"));
            }
            MessageKind::Question => {
                let count = rng.gen_range(3..=5);
                for i in 0..count {
                    sentences.push(self.round_robin_seeded(rng, &seedable, i, 20, 0.9));
                }
            }
            MessageKind::Command => {
                let count = rng.gen_range(4..=6);
                for i in 0..count {
                    sentences.push(self.round_robin_seeded(rng, &seedable, i, 8, 0.8));
                }
            }
            MessageKind::Statement => {
                let count = rng.gen_range(3..=6);
                for i in 0..count {
                    if i < seedable.len() {
                        sentences.push(self.generate_seeded(
                            rng,
                            &seedable[i],
                            25,
                            DEFAULT_TEMPERATURE,
                        ));
                    } else {
                        sentences.push(self.generate_sentence(rng, 25, DEFAULT_TEMPERATURE));
                    }
                }
            }
        }

        sentences.iter().join(" ")
    }

    /// Seeds sentence `index` from the list, wrapping around; free-running when there are
    /// no seeds at all.
    fn round_robin_seeded(
        &self,
        rng: &mut impl Rng,
        seedable: &[String],
        index: usize,
        max_words: usize,
        temperature: f64,
    ) -> String {
        if seedable.is_empty() {
            self.generate_sentence(rng, max_words, temperature)
        } else {
            self.generate_seeded(rng, &seedable[index % seedable.len()], max_words, temperature)
        }
    }
}
