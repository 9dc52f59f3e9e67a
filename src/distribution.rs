//! [`TokenDistribution`]s are representations of how common [`Token`]s are, and are paired up
//! with a single token or a [`TokenPair`](crate::token::TokenPair) in a
//! [`Model`](crate::model::Model).

use rand::Rng;
use thiserror::Error;

use crate::token::Token;

/// Why a weighted candidate list cannot be turned into a [`TokenDistribution`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistributionError {
    /// The candidate list had no entries at all.
    #[error("candidate list is empty")]
    Empty,
    /// A candidate carried a weight below zero.
    #[error("candidate {token:?} has negative weight {weight}")]
    NegativeWeight { token: String, weight: f64 },
    /// Every weight was zero, so a draw would be undefined.
    #[error("no candidate has a positive weight")]
    NoPositiveWeight,
}

/// A distribution of choices and their likelyhood.
///
/// Construction validates the weights once; sampling can then never fail.
#[derive(Clone, Debug)]
pub struct TokenDistribution {
    /// The actual choices, in payload order.
    choices: Vec<Token>,
    /// Observed frequency of each choice, parallel to `choices`.
    weights: Vec<f64>,
    /// Sum of `weights`, precomputed for the common temperature 1.0 path.
    total_weight: f64,
}

impl TokenDistribution {
    /// Builds a distribution from `(token, weight)` pairs as they appear in the model
    /// payload.
    pub fn new(candidates: Vec<(Token, f64)>) -> Result<Self, DistributionError> {
        if candidates.is_empty() {
            return Err(DistributionError::Empty);
        }

        let mut choices = Vec::with_capacity(candidates.len());
        let mut weights = Vec::with_capacity(candidates.len());
        for (token, weight) in candidates {
            if weight < 0.0 {
                return Err(DistributionError::NegativeWeight { token, weight });
            }
            choices.push(token);
            weights.push(weight);
        }

        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 {
            return Err(DistributionError::NoPositiveWeight);
        }

        Ok(Self {
            choices,
            weights,
            total_weight,
        })
    }

    /// Draws one token.
    ///
    /// At temperature 1.0 the draw follows the stored weights directly. Any other
    /// temperature reshapes each weight to `w^(1/t)` before drawing, so values below 1.0
    /// favour the frequent candidates and values above flatten the distribution towards
    /// uniform. `temperature` must be positive.
    pub fn sample(&self, rng: &mut impl Rng, temperature: f64) -> &Token {
        if temperature == 1.0 {
            return self.pick(rng, &self.weights, self.total_weight);
        }

        let reshaped: Vec<f64> = self
            .weights
            .iter()
            .map(|weight| weight.powf(1.0 / temperature))
            .collect();
        let total: f64 = reshaped.iter().sum();
        self.pick(rng, &reshaped, total)
    }

    /// One uniform draw in `[0, total)`, resolved by cumulative subtraction.
    fn pick(&self, rng: &mut impl Rng, weights: &[f64], total: f64) -> &Token {
        let mut remaining = rng.gen::<f64>() * total;
        for (token, weight) in self.choices.iter().zip(weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                return token;
            }
        }

        // Floating-point drift can leave a sliver of weight unclaimed; the draw then
        // resolves to the final candidate.
        &self.choices[self.choices.len() - 1]
    }
}
