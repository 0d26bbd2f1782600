//! The closed set of sentiment dimensions scored by an [`Evaluator`](crate::Evaluator).

use std::fmt;

/// One of the four reserved sentiment dimensions.
///
/// `Unknown` is a sentinel: it is never produced by a scorer and exists only
/// so that callers have a value to fall back on before a phrase has been
/// scored. The discriminants are part of the wire contract (they mirror the
/// ordinals used on the RPC boundary) and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Sentiment {
    /// Reserved sentinel, never produced by scoring.
    Unknown = -1,
    /// Positive sentiment.
    Positive = 0,
    /// Negative sentiment.
    Negative = 1,
    /// Neutral sentiment.
    Neutral = 2,
}

/// Error returned by the fallible [`Sentiment`] constructors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SentimentParseError {
    /// No sentiment has the given ordinal.
    #[error("no sentiment has ordinal {0}")]
    UnknownOrdinal(i32),
    /// No sentiment has the given name.
    #[error("no sentiment named '{0}'")]
    UnknownName(String),
}

impl Sentiment {
    /// Resolves a sentiment from its stable integer ordinal.
    ///
    /// This is the only way to go from an untyped integer (e.g. an index into
    /// a scorer's output vector) to a [`Sentiment`]; there is deliberately no
    /// implicit `From<i32>`.
    pub fn from_ordinal(ordinal: i32) -> Result<Self, SentimentParseError> {
        match ordinal {
            -1 => Ok(Self::Unknown),
            0 => Ok(Self::Positive),
            1 => Ok(Self::Negative),
            2 => Ok(Self::Neutral),
            other => Err(SentimentParseError::UnknownOrdinal(other)),
        }
    }

    /// Resolves a sentiment from its name, case-sensitively (`"POSITIVE"`, ...).
    pub fn from_name(name: &str) -> Result<Self, SentimentParseError> {
        match name {
            "UNKNOWN" => Ok(Self::Unknown),
            "POSITIVE" => Ok(Self::Positive),
            "NEGATIVE" => Ok(Self::Negative),
            "NEUTRAL" => Ok(Self::Neutral),
            other => Err(SentimentParseError::UnknownName(other.to_string())),
        }
    }

    /// Returns the stable integer ordinal for this sentiment.
    #[must_use]
    pub const fn ordinal(self) -> i32 {
        self as i32
    }

    /// Returns the name of this sentiment, matching [`Sentiment::from_name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ordinal_round_trips() {
        for s in [Sentiment::Unknown, Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
            assert_eq!(Sentiment::from_ordinal(s.ordinal()), Ok(s));
        }
    }

    #[test]
    fn name_round_trips() {
        for s in [Sentiment::Unknown, Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
            assert_eq!(Sentiment::from_name(s.name()), Ok(s));
        }
    }

    #[test]
    fn rejects_unknown_ordinal() {
        assert_eq!(Sentiment::from_ordinal(7), Err(SentimentParseError::UnknownOrdinal(7)));
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            Sentiment::from_name("MEH"),
            Err(SentimentParseError::UnknownName("MEH".to_string()))
        );
    }
}
