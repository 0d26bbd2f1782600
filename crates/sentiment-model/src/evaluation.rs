//! Immutable per-phrase scoring result.

/// Confidence scores for the three sentiments a scorer actually produces.
///
/// `Evaluation` is a total, immutable mapping: once built it cannot be
/// mutated (there is no setter — the Python original's `__setitem__` silently
/// no-oped on the backing map, so the honest Rust translation is simply to
/// not expose one). Scores are not required to sum to one; callers read each
/// field independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    positive: f32,
    negative: f32,
    neutral: f32,
}

impl Evaluation {
    /// Builds an evaluation from its three confidence scores.
    #[must_use]
    pub const fn new(positive: f32, negative: f32, neutral: f32) -> Self {
        Self { positive, negative, neutral }
    }

    /// Confidence that the phrase is positive.
    #[must_use]
    pub const fn positive(&self) -> f32 {
        self.positive
    }

    /// Confidence that the phrase is negative.
    #[must_use]
    pub const fn negative(&self) -> f32 {
        self.negative
    }

    /// Confidence that the phrase is neutral.
    #[must_use]
    pub const fn neutral(&self) -> f32 {
        self.neutral
    }
}

/// A phrase to be scored, paired with its evaluation once one exists.
///
/// Used only at the [`Evaluator`](crate::Evaluator) boundary; the RPC surface
/// transports bare strings and score triples, never this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    /// The text content of the phrase.
    pub content: String,
    /// The evaluation, if this phrase has already been scored.
    pub evaluation: Option<Evaluation>,
}

impl Phrase {
    /// Creates an unscored phrase from its content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), evaluation: None }
    }
}
