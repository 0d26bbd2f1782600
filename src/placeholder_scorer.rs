//! A lexical-heuristic stand-in for the real scorer.
//!
//! The actual embedding/sentiment model is explicitly out of scope for this
//! repository; this gives the binary something real to run and exercise the
//! RPC surface against without a GPU or a model checkpoint on disk.

use async_trait::async_trait;
use sentiment_model::{Evaluation, Evaluator, EvaluatorError};

const POSITIVE_WORDS: &[&str] = &["good", "great", "love", "excellent", "happy", "wonderful"];
const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "hate", "awful", "sad", "worst"];

/// Scores phrases by counting hits against small positive/negative word
/// lists.
pub struct LexicalHeuristicScorer;

#[async_trait]
impl Evaluator for LexicalHeuristicScorer {
    async fn evaluate(&self, phrases: &[String]) -> Result<Vec<Evaluation>, EvaluatorError> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let phrases = phrases.to_vec();
        tokio::task::spawn_blocking(move || phrases.iter().map(|phrase| score(phrase)).collect())
            .await
            .map_err(EvaluatorError::new)
    }
}

fn score(phrase: &str) -> Evaluation {
    let lowercase = phrase.to_lowercase();
    let positive_hits = POSITIVE_WORDS.iter().filter(|word| lowercase.contains(*word)).count();
    let negative_hits = NEGATIVE_WORDS.iter().filter(|word| lowercase.contains(*word)).count();

    let total = (positive_hits + negative_hits).max(1) as f32;
    let positive = positive_hits as f32 / total;
    let negative = negative_hits as f32 / total;
    let neutral = if positive_hits == 0 && negative_hits == 0 { 1.0 } else { 0.0 };

    Evaluation::new(positive, negative, neutral)
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn neutral_phrases_score_as_neutral() {
        let scorer = LexicalHeuristicScorer;
        let scores = scorer.evaluate(&["the table is brown".to_string()]).await.unwrap();
        assert_eq!(scores[0].neutral(), 1.0);
    }

    #[tokio::test]
    async fn positive_words_push_the_positive_score_up() {
        let scorer = LexicalHeuristicScorer;
        let scores = scorer.evaluate(&["this is great and wonderful".to_string()]).await.unwrap();
        assert!(scores[0].positive() > scores[0].negative());
    }
}
