//! At the heart of a [`Generator`](crate::Generator) is a [`Token`]. In fact, this is just a
//! String. But we make a distinction here: a Token is a word or a punctuation mark treated as
//! one atomic unit of a generated sequence. Tokens come out of the pretrained model payload;
//! this crate never tokenizes raw text itself.

use hashbrown::Equivalent;

use serde::Deserialize;

/// Representation of a single word or punctuation mark.
pub type Token = String;

/// An owned pair of [`Token`]s: a sentence starter, or the key of an order-2 transition.
///
/// Starters arrive in the payload as two-element arrays, which is why this deserializes
/// directly.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct TokenPair(pub Token, pub Token);

/// A borrowed version of [`Token`]; if [`Token`] is [`String`], then [`TokenRef`] is `&str`.
pub type TokenRef<'a> = &'a str;

/// A borrowed version of [`TokenPair`] that does not own its pair. Like [`TokenRef`] to [`Token`].
pub type TokenPairRef<'a> = (TokenRef<'a>, TokenRef<'a>);

impl<'a> From<&TokenPairRef<'a>> for TokenPair {
    fn from(value: &TokenPairRef) -> Self {
        Self(value.0.to_string(), value.1.to_string())
    }
}

impl TokenPair {
    pub fn as_ref(&self) -> TokenPairRef<'_> {
        (&self.0, &self.1)
    }
}

impl PartialEq<(&str, &str)> for TokenPair {
    fn eq(&self, other: &(&str, &str)) -> bool {
        self.0 == *other.0 && self.1 == *other.1
    }
}

impl Equivalent<TokenPair> for (&str, &str) {
    fn equivalent(&self, key: &TokenPair) -> bool {
        key.eq(self)
    }
}

/// Sentence-final punctuation. A sampled token equal to one of these ends the sentence
/// early, and formatted text always finishes with one of them.
pub const END_PUNCTUATION: [char; 4] = ['.', '!', '?', '…'];

/// Whether `token` is a single sentence-final punctuation mark.
pub fn is_end_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if END_PUNCTUATION.contains(&c)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_pair_matches_owned_pair() {
        let owned = TokenPair("brown".to_string(), "mustard".to_string());
        assert_eq!(owned, ("brown", "mustard"));
        assert_ne!(owned, ("mustard", "brown"));
        assert_eq!(TokenPair::from(&owned.as_ref()), owned);
    }

    #[test]
    fn end_punctuation_is_single_marks_only() {
        assert!(is_end_punctuation("."));
        assert!(is_end_punctuation("!"));
        assert!(is_end_punctuation("?"));
        assert!(is_end_punctuation("…"));
        assert!(!is_end_punctuation(","));
        assert!(!is_end_punctuation("!!"));
        assert!(!is_end_punctuation("word"));
        assert!(!is_end_punctuation(""));
    }
}
