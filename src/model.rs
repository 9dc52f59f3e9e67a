//! Model ingestion: the payload data contract, load-time validation, and the read-only
//! tables a [`Generator`](crate::Generator) samples from.
//!
//! The model is trained offline and supplied whole; nothing here mutates it after
//! construction.

use hashbrown::HashMap;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::distribution::{DistributionError, TokenDistribution};
use crate::token::{Token, TokenPair, TokenPairRef};

/// Separator between the two tokens of an order-2 context key in the payload. Never occurs
/// inside a natural token.
pub const CONTEXT_SEPARATOR: char = '|';

/// Target length used when the sampled observation is zero.
const FALLBACK_TARGET_LENGTH: usize = 12;

/// Raw model payload as produced by the offline training step.
///
/// Field names mirror the wire format: `c1`/`c2` are the order-1 and order-2 transition
/// tables mapping a context to `[candidate, weight]` lists, `s`/`sw` are the starter pairs
/// with their parallel weights, and `l` is the list of observed sentence lengths.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelPayload {
    /// Order-1 transitions: one token to its weighted successor candidates.
    #[serde(rename = "c1")]
    pub unigram_transitions: HashMap<String, Vec<(String, f64)>>,
    /// Order-2 transitions, keyed by two tokens joined with [`CONTEXT_SEPARATOR`].
    #[serde(rename = "c2")]
    pub bigram_transitions: HashMap<String, Vec<(String, f64)>>,
    /// Two-token sentence openings.
    #[serde(rename = "s")]
    pub starters: Vec<TokenPair>,
    /// Relative likelihood of each starter, parallel to `starters`.
    #[serde(rename = "sw")]
    pub starter_weights: Vec<f64>,
    /// Observed sentence lengths, sampled as the empirical target-length distribution.
    #[serde(rename = "l")]
    pub sentence_lengths: Vec<usize>,
}

/// Why a payload was rejected at load time. A generator is never half-constructed: the
/// first invalid table fails the whole load.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse model payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model has no sentence starters")]
    NoStarters,
    #[error("{starters} starters but {weights} starter weights")]
    StarterWeightMismatch { starters: usize, weights: usize },
    #[error("starter weight {weight} is negative")]
    NegativeStarterWeight { weight: f64 },
    #[error("no starter has a positive weight")]
    NoPositiveStarterWeight,
    #[error("model has no sentence lengths")]
    NoSentenceLengths,
    #[error("order-2 context key {key:?} is missing the '|' separator")]
    MalformedContextKey { key: String },
    #[error("bad candidate list for context {key:?}: {source}")]
    BadCandidateList {
        key: String,
        source: DistributionError,
    },
}

/// Validated, immutable transition tables. See the top level crate documentation for how
/// the [`Generator`](crate::Generator) walks them.
#[derive(Clone, Debug)]
pub struct Model {
    /// Single token to weighted successors; the backoff table.
    unigram: HashMap<Token, TokenDistribution>,
    /// Two preceding tokens to weighted successors; tried first.
    bigram: HashMap<TokenPair, TokenDistribution>,
    starters: Vec<TokenPair>,
    starter_weights: Vec<f64>,
    /// Sum of `starter_weights`, computed once at load.
    total_starter_weight: f64,
    sentence_lengths: Vec<usize>,
}

impl TryFrom<ModelPayload> for Model {
    type Error = ModelError;

    fn try_from(payload: ModelPayload) -> Result<Self, ModelError> {
        if payload.starters.is_empty() {
            return Err(ModelError::NoStarters);
        }
        if payload.starters.len() != payload.starter_weights.len() {
            return Err(ModelError::StarterWeightMismatch {
                starters: payload.starters.len(),
                weights: payload.starter_weights.len(),
            });
        }
        if let Some(&weight) = payload.starter_weights.iter().find(|weight| **weight < 0.0) {
            return Err(ModelError::NegativeStarterWeight { weight });
        }
        let total_starter_weight: f64 = payload.starter_weights.iter().sum();
        if total_starter_weight <= 0.0 {
            return Err(ModelError::NoPositiveStarterWeight);
        }
        if payload.sentence_lengths.is_empty() {
            return Err(ModelError::NoSentenceLengths);
        }

        let mut unigram = HashMap::with_capacity(payload.unigram_transitions.len());
        for (token, candidates) in payload.unigram_transitions {
            let dist = TokenDistribution::new(candidates).map_err(|source| {
                ModelError::BadCandidateList {
                    key: token.clone(),
                    source,
                }
            })?;
            unigram.insert(token, dist);
        }

        let mut bigram = HashMap::with_capacity(payload.bigram_transitions.len());
        for (key, candidates) in payload.bigram_transitions {
            let (left, right) = key
                .split_once(CONTEXT_SEPARATOR)
                .ok_or_else(|| ModelError::MalformedContextKey { key: key.clone() })?;
            let pair = TokenPair::from(&(left, right));
            let dist = TokenDistribution::new(candidates)
                .map_err(|source| ModelError::BadCandidateList { key, source })?;
            bigram.insert(pair, dist);
        }

        debug!(
            "loaded model: {} order-1 contexts, {} order-2 contexts, {} starters",
            unigram.len(),
            bigram.len(),
            payload.starters.len()
        );

        Ok(Self {
            unigram,
            bigram,
            starters: payload.starters,
            starter_weights: payload.starter_weights,
            total_starter_weight,
            sentence_lengths: payload.sentence_lengths,
        })
    }
}

impl Model {
    /// Parses a JSON payload and validates it into a model.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let payload: ModelPayload = serde_json::from_str(json)?;
        Self::try_from(payload)
    }

    /// Whether `word` is usable as a generation anchor, i.e. an order-1 key.
    pub fn is_seedable(&self, word: &str) -> bool {
        self.unigram.contains_key(word)
    }

    pub(crate) fn unigram(&self, token: &str) -> Option<&TokenDistribution> {
        self.unigram.get(token)
    }

    pub(crate) fn bigram(&self, context: &TokenPairRef<'_>) -> Option<&TokenDistribution> {
        self.bigram.get(context)
    }

    /// Picks one starter pair, weighted. The caller gets a fresh copy; the stored pair is
    /// never aliased into a sentence under construction.
    pub(crate) fn pick_starter(&self, rng: &mut impl Rng) -> TokenPair {
        let mut remaining = rng.gen::<f64>() * self.total_starter_weight;
        for (starter, weight) in self.starters.iter().zip(&self.starter_weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                return starter.clone();
            }
        }

        // Floating-point drift fallback, same as TokenDistribution::pick.
        self.starters[self.starters.len() - 1].clone()
    }

    /// First starter pair whose first or second token equals `word`, if any.
    pub(crate) fn starter_containing(&self, word: &str) -> Option<&TokenPair> {
        self.starters
            .iter()
            .find(|pair| pair.0 == word || pair.1 == word)
    }

    /// Samples a target sentence length from the observed distribution.
    pub(crate) fn target_length(&self, rng: &mut impl Rng) -> usize {
        match self.sentence_lengths.choose(rng) {
            Some(&length) if length > 0 => length,
            _ => FALLBACK_TARGET_LENGTH,
        }
    }
}
