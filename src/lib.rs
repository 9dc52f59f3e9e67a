//! Nonsense sentence generation from a pretrained weighted word-adjacency model.
//!
//! A [`Generator`] owns an immutable [`Model`]: two levels of weighted transitions
//! (order-2 context with an order-1 backoff), a weighted list of two-token sentence
//! starters, and an empirical distribution of sentence lengths. The model is trained
//! offline and supplied whole as a JSON payload; this crate only samples from it, it
//! never trains or mutates anything.
//!
//! On top of plain sentence synthesis sit a seeded variant that anchors output on a
//! caller-supplied word, a set of canned presentation [`Style`]s for batch generation,
//! and a toy chat mode that classifies a typed message and seeds its response from the
//! message's own words.
//!
//! Randomness is always injected: every generating method takes `rng: &mut impl Rng`, so
//! callers pick between ambient randomness (`thread_rng()`) and a seeded or mock
//! generator for reproducible output, and concurrent callers simply use one rng each.
//!
//! ```
//! use nonsensish::Generator;
//! use rand::thread_rng;
//!
//! let generator = Generator::from_json(
//!     r#"{
//!         "c1": {"is": [["good", 1]], "good": [[".", 1]]},
//!         "c2": {"the|milk": [["is", 1]]},
//!         "s": [["the", "milk"]],
//!         "sw": [1],
//!         "l": [6]
//!     }"#,
//! )
//! .unwrap();
//!
//! let sentence = generator.generate_sentence(&mut thread_rng(), 10, 1.0);
//! assert_eq!(sentence, "The milk is good.");
//! ```
//!
//! # Features
//!
//! - `inline-more` - Passes `hashbrown`'s feature of the same name through for more
//!   aggressive inlining in the transition tables. Enabled by default.

pub mod chat;
pub mod distribution;
pub mod format;
pub mod generator;
pub mod model;
pub mod style;
pub mod token;

pub use chat::MessageKind;
pub use generator::{Generator, DEFAULT_MAX_WORDS, DEFAULT_TEMPERATURE};
pub use model::{Model, ModelError, ModelPayload};
pub use style::Style;
