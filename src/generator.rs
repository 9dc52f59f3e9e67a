//! See the top level crate documentation for information about the [`Generator`] type.

use itertools::Itertools;
use rand::Rng;

use crate::format::format_sentence;
use crate::model::{Model, ModelError, ModelPayload};
use crate::style::{Style, CHARACTER_NAMES, REFRAINS};
use crate::token::{is_end_punctuation, Token};

/// Word cap used when the caller has no particular budget in mind.
pub const DEFAULT_MAX_WORDS: usize = 30;
/// Unmodified frequency-weighted sampling.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Sentence generator over a pretrained [`Model`].
///
/// Every generating method takes `rng: &mut impl Rng`, so callers decide between ambient
/// randomness (`thread_rng()`) and a seeded or mock generator for reproducible output.
/// Concurrent callers pass independent generators; nothing here is shared or mutated.
///
/// ```
/// # use nonsensish::Generator;
/// # use rand::thread_rng;
/// let generator = Generator::from_json(
///     r#"{
///         "c1": {"is": [["good", 1]], "good": [[".", 1]]},
///         "c2": {"the|milk": [["is", 1]]},
///         "s": [["the", "milk"]],
///         "sw": [1],
///         "l": [6]
///     }"#,
/// )
/// .unwrap();
///
/// // This tiny model has one path, so the output is always the same.
/// assert_eq!(
///     generator.generate_sentence(&mut thread_rng(), 10, 1.0),
///     "The milk is good."
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Generator {
    model: Model,
}

impl Generator {
    /// Wraps an already validated model.
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    /// Validates a raw payload and builds a generator from it.
    pub fn from_payload(payload: ModelPayload) -> Result<Self, ModelError> {
        Ok(Self::new(Model::try_from(payload)?))
    }

    /// Parses a JSON payload, validates it, and builds a generator.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(Self::new(Model::from_json(json)?))
    }

    /// The underlying model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Generates one sentence from a weighted random starter.
    ///
    /// The sentence grows until it reaches `max_words` or a target length sampled from
    /// the model's observed lengths, whichever is smaller; it stops early when a
    /// sentence-final punctuation token lands or the model has no successor for the
    /// current context. The token sequence then goes through the repair pass in
    /// [`format_sentence`](crate::format::format_sentence).
    pub fn generate_sentence(
        &self,
        rng: &mut impl Rng,
        max_words: usize,
        temperature: f64,
    ) -> String {
        let starter = self.model.pick_starter(rng);
        let mut tokens = vec![starter.0, starter.1];
        self.extend_sentence(rng, &mut tokens, max_words, temperature);
        format_sentence(&tokens)
    }

    /// Generates one sentence anchored on `seed_word` wherever the vocabulary allows.
    ///
    /// The seed is lowercased, then resolved in order: a starter pair containing the
    /// seed in either position; an order-1 entry for the seed (which then opens the
    /// sentence); otherwise a plain [`generate_sentence`](Self::generate_sentence) call,
    /// silently ignoring the seed.
    pub fn generate_seeded(
        &self,
        rng: &mut impl Rng,
        seed_word: &str,
        max_words: usize,
        temperature: f64,
    ) -> String {
        let word = seed_word.to_lowercase();

        if let Some(starter) = self.model.starter_containing(&word) {
            let mut tokens = vec![starter.0.clone(), starter.1.clone()];
            self.extend_sentence(rng, &mut tokens, max_words, temperature);
            return format_sentence(&tokens);
        }

        if let Some(dist) = self.model.unigram(&word) {
            let successor = dist.sample(rng, temperature).clone();
            let mut tokens = vec![word, successor];
            self.extend_sentence(rng, &mut tokens, max_words, temperature);
            return format_sentence(&tokens);
        }

        self.generate_sentence(rng, max_words, temperature)
    }

    /// Produces `count` independent outputs shaped by `style`. Unknown style identifiers
    /// have already been folded into [`Style::Mixed`] by [`Style::from_id`].
    pub fn generate_styled(&self, rng: &mut impl Rng, style: Style, count: usize) -> Vec<String> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(match style {
                Style::ListRant => self.list_rant(rng),
                Style::QuestionBarrage => self.question_barrage(rng),
                Style::CharacterScene => self.character_scene(rng),
                Style::Refrain => self.refrain(rng),
                Style::Mixed => self.mixed(rng),
            });
        }
        results
    }

    /// Grows `tokens` until the per-sentence budget runs out, an end-punctuation token
    /// lands, or the model has no successor for the current context.
    fn extend_sentence(
        &self,
        rng: &mut impl Rng,
        tokens: &mut Vec<Token>,
        max_words: usize,
        temperature: f64,
    ) {
        let limit = max_words.min(self.model.target_length(rng));
        for _ in 0..limit {
            let next = match self.next_token(rng, tokens, temperature) {
                Some(token) => token,
                None => break,
            };
            let terminal = is_end_punctuation(&next);
            tokens.push(next);
            if terminal {
                break;
            }
        }
    }

    /// Order-2 context first, order-1 backoff second; `None` when neither table knows
    /// the current context.
    fn next_token(
        &self,
        rng: &mut impl Rng,
        tokens: &[Token],
        temperature: f64,
    ) -> Option<Token> {
        if let [.., left, right] = tokens {
            if let Some(dist) = self.model.bigram(&(left.as_str(), right.as_str())) {
                return Some(dist.sample(rng, temperature).clone());
            }
        }
        let last = tokens.last()?;
        let dist = self.model.unigram(last)?;
        Some(dist.sample(rng, temperature).clone())
    }

    fn list_rant(&self, rng: &mut impl Rng) -> String {
        let mut sentences = Vec::with_capacity(5);
        for _ in 0..5 {
            sentences.push(self.generate_sentence(rng, 8, 0.8));
        }
        sentences.iter().join(" ")
    }

    fn question_barrage(&self, rng: &mut impl Rng) -> String {
        let mut sentences = Vec::with_capacity(3);
        for _ in 0..3 {
            sentences.push(force_question(self.generate_sentence(rng, 15, 1.2)));
        }
        sentences.iter().join(" ")
    }

    fn character_scene(&self, rng: &mut impl Rng) -> String {
        let name = CHARACTER_NAMES[rng.gen_range(0..CHARACTER_NAMES.len())];
        let mut sentences = Vec::with_capacity(3);
        for _ in 0..3 {
            sentences.push(self.generate_sentence(rng, 20, DEFAULT_TEMPERATURE));
        }
        replace_lead_word(&sentences.iter().join(" "), name)
    }

    fn refrain(&self, rng: &mut impl Rng) -> String {
        let refrain = REFRAINS[rng.gen_range(0..REFRAINS.len())];
        let lines = [
            self.generate_sentence(rng, 12, DEFAULT_TEMPERATURE),
            self.generate_sentence(rng, 12, DEFAULT_TEMPERATURE),
            refrain.to_owned(),
            self.generate_sentence(rng, 8, DEFAULT_TEMPERATURE),
            refrain.to_owned(),
        ];
        lines.iter().join(" ")
    }

    fn mixed(&self, rng: &mut impl Rng) -> String {
        let count = rng.gen_range(3..=7);
        let mut sentences = Vec::with_capacity(count);
        for _ in 0..count {
            sentences.push(self.generate_sentence(rng, DEFAULT_MAX_WORDS, DEFAULT_TEMPERATURE));
        }
        sentences.iter().join(" ")
    }
}

/// Swaps a trailing `.`/`!` run for a question mark.
fn force_question(mut sentence: String) -> String {
    if !sentence.ends_with('?') {
        let kept = sentence.trim_end_matches(['.', '!']).len();
        sentence.truncate(kept);
        sentence.push('?');
    }
    sentence
}

/// Replaces the first textual occurrence of the paragraph's leading word with `name`.
fn replace_lead_word(paragraph: &str, name: &str) -> String {
    match paragraph.split(' ').next() {
        Some(first) if !first.is_empty() => paragraph.replacen(first, name, 1),
        _ => paragraph.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::style::{CHARACTER_NAMES, REFRAINS};

    /// Single-candidate tables make every draw deterministic regardless of the rng. The
    /// "." successor exists only to prove generation stops at terminal punctuation.
    const CONTRACTION_MODEL: &str = r#"{
        "c1": {"t": [["know", 1]], "know": [[".", 1]], ".": [["never", 1]]},
        "c2": {"i|don": [["t", 1]]},
        "s": [["i", "don"]],
        "sw": [1],
        "l": [10]
    }"#;

    const SEED_MODEL: &str = r#"{
        "c1": {"cheese": [["melts", 1]], "melts": [["slowly", 1]]},
        "c2": {},
        "s": [["the", "rain"]],
        "sw": [1],
        "l": [4]
    }"#;

    /// Branching transitions with punctuation tokens in the middle of sentences.
    const BRANCHY_MODEL: &str = r#"{
        "c1": {
            "milk": [["is", 3], [",", 1]],
            "is": [["good", 2], ["bad", 1]],
            "good": [[".", 2], ["!", 1]],
            "bad": [["…", 1]],
            ",": [["mostly", 1]],
            "mostly": [["good", 1]]
        },
        "c2": {"the|milk": [["is", 2], [",", 1]]},
        "s": [["the", "milk"], ["milk", "is"]],
        "sw": [3, 1],
        "l": [4, 7, 9]
    }"#;

    fn contraction_generator() -> Generator {
        Generator::from_json(CONTRACTION_MODEL).unwrap()
    }

    #[test]
    fn synthesis_walks_the_chain_and_repairs_contractions() {
        let generator = contraction_generator();
        let sentence = generator.generate_sentence(&mut thread_rng(), 10, 1.0);
        assert_eq!(sentence, "I don't know.");
    }

    #[test]
    fn terminal_punctuation_stops_generation_early() {
        let generator = contraction_generator();
        // Target length 10 allows more steps, but the "." token must end the walk before
        // its "never" successor is ever reachable.
        let sentence = generator.generate_sentence(&mut thread_rng(), 100, 1.0);
        assert_eq!(sentence, "I don't know.");
    }

    #[test]
    fn zero_word_budget_yields_terminated_starter() {
        let generator = contraction_generator();
        let sentence = generator.generate_sentence(&mut thread_rng(), 0, 1.0);
        assert_eq!(sentence, "I don.");
    }

    #[test]
    fn seeded_sentence_anchors_on_unigram_key() {
        let generator = Generator::from_json(SEED_MODEL).unwrap();
        let sentence = generator.generate_seeded(&mut thread_rng(), "Cheese", 10, 1.0);
        assert_eq!(sentence, "Cheese melts slowly.");
    }

    #[test]
    fn seed_matching_second_starter_token_uses_that_starter() {
        let generator = Generator::from_json(SEED_MODEL).unwrap();
        // "rain" is the second token of the only starter; the pair still opens the
        // sentence, so the seed lands in second position.
        let sentence = generator.generate_seeded(&mut thread_rng(), "RAIN", 10, 1.0);
        assert_eq!(sentence, "The rain.");
    }

    #[test]
    fn unresolvable_seed_falls_back_to_free_running() {
        let generator = Generator::from_json(SEED_MODEL).unwrap();
        let sentence = generator.generate_seeded(&mut thread_rng(), "xylophone", 10, 1.0);
        assert_eq!(sentence, "The rain.");
    }

    #[test]
    fn generated_text_never_spaces_before_punctuation() {
        let generator = Generator::from_json(BRANCHY_MODEL).unwrap();
        let mut rng = thread_rng();
        for temperature in [0.8, 1.0, 1.2] {
            for _ in 0..100 {
                let sentence = generator.generate_sentence(&mut rng, 12, temperature);
                for mark in ['.', '!', '?', ',', ';', ':', '…'] {
                    assert!(!sentence.contains(&format!(" {mark}")), "{sentence:?}");
                }
                assert!(sentence.ends_with(['.', '!', '?', '…']), "{sentence:?}");
            }
        }
    }

    #[test]
    fn styled_batches_return_exactly_count_outputs() {
        let generator = contraction_generator();
        let mut rng = thread_rng();
        for id in [
            "mixed",
            "list_rant",
            "question_barrage",
            "character_scene",
            "refrain",
            "no_such_style",
        ] {
            let outputs = generator.generate_styled(&mut rng, Style::from_id(id), 4);
            assert_eq!(outputs.len(), 4, "style {id}");
        }
    }

    #[test]
    fn question_barrage_sentences_all_end_in_question_marks() {
        let generator = contraction_generator();
        let outputs = generator.generate_styled(&mut thread_rng(), Style::QuestionBarrage, 3);
        for output in outputs {
            assert!(output.ends_with('?'), "{output:?}");
            assert_eq!(output.matches('?').count(), 3, "{output:?}");
            assert!(!output.contains('.'), "{output:?}");
        }
    }

    #[test]
    fn character_scene_opens_with_a_character_name() {
        let generator = contraction_generator();
        let outputs = generator.generate_styled(&mut thread_rng(), Style::CharacterScene, 2);
        for output in outputs {
            assert!(
                CHARACTER_NAMES.iter().any(|name| output.starts_with(name)),
                "{output:?}"
            );
        }
    }

    #[test]
    fn refrain_repeats_its_anchor_line() {
        let generator = contraction_generator();
        let outputs = generator.generate_styled(&mut thread_rng(), Style::Refrain, 2);
        for output in outputs {
            assert!(
                REFRAINS.iter().any(|line| output.matches(line).count() == 2),
                "{output:?}"
            );
        }
    }

    #[test]
    fn force_question_strips_terminal_runs() {
        assert_eq!(force_question("So it goes.".to_string()), "So it goes?");
        assert_eq!(force_question("Stop!!".to_string()), "Stop?");
        assert_eq!(force_question("Already?".to_string()), "Already?");
    }

    #[test]
    fn lead_word_replacement_touches_only_the_first_occurrence() {
        assert_eq!(
            replace_lead_word("milk and milk again", "Magpie"),
            "Magpie and milk again"
        );
    }
}
