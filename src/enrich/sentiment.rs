//! Sentiment scoring boundary. The aggregation core treats polarity and
//! subjectivity as opaque bounded floats; this module provides the seam plus
//! a small lexicon-based default scorer so the pipeline runs self-contained.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Polarity in [-1, 1].
    pub polarity: f64,
    /// Subjectivity in [0, 1].
    pub subjectivity: f64,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }
}

pub trait SentimentScorer {
    fn score(&self, text: &str) -> SentimentScore;
}

const POSITIVE: &[&str] = &[
    "good", "great", "love", "happy", "hope", "best", "thanks", "thank", "nice", "safe", "better",
    "support", "care", "strong", "free", "well", "glad", "wonderful", "help", "positive",
];

const NEGATIVE: &[&str] = &[
    "bad", "crisis", "death", "sick", "fear", "worst", "hate", "angry", "sad", "die", "worse",
    "panic", "awful", "terrible", "wrong", "problem", "afraid", "lost", "alone", "negative",
];

// Opinion markers that raise subjectivity without carrying valence.
const SUBJECTIVE: &[&str] = &[
    "think", "feel", "believe", "maybe", "probably", "definitely", "really", "very", "totally",
    "should", "must", "never", "always", "opinion", "seems",
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nicht", "kein", "keine"];

/// How many preceding tokens a negation flips.
const NEGATION_WINDOW: usize = 2;

/// Word-list scorer with a short negation window. Coarse by design; anything
/// subtler belongs behind the [`SentimentScorer`] seam.
pub struct LexiconScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    subjective: HashSet<&'static str>,
    negations: HashSet<&'static str>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE.iter().copied().collect(),
            negative: NEGATIVE.iter().copied().collect(),
            subjective: SUBJECTIVE.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();
        if tokens.is_empty() {
            return SentimentScore::neutral();
        }

        let mut valence_sum = 0.0;
        let mut valence_hits = 0u32;
        let mut subjective_hits = 0u32;

        for (i, token) in tokens.iter().enumerate() {
            let valence = if self.positive.contains(token.as_str()) {
                1.0
            } else if self.negative.contains(token.as_str()) {
                -1.0
            } else {
                if self.subjective.contains(token.as_str()) {
                    subjective_hits += 1;
                }
                continue;
            };

            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| self.negations.contains(t.as_str()));

            valence_sum += if negated { -valence } else { valence };
            valence_hits += 1;
        }

        let polarity = if valence_hits == 0 {
            0.0
        } else {
            (valence_sum / valence_hits as f64).clamp(-1.0, 1.0)
        };
        let subjectivity =
            ((valence_hits + subjective_hits) as f64 * 2.5 / tokens.len() as f64).clamp(0.0, 1.0);

        SentimentScore {
            polarity,
            subjectivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive() {
        let score = LexiconScorer::new().score("such a great day, I love it");
        assert!(score.polarity > 0.0);
        assert!(score.subjectivity > 0.0);
    }

    #[test]
    fn negation_flips_valence() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("this is good");
        let negated = scorer.score("this is not good");
        assert!(plain.polarity > 0.0);
        assert!(negated.polarity < 0.0);
    }

    #[test]
    fn unscored_text_is_neutral() {
        let score = LexiconScorer::new().score("the train leaves at noon");
        assert_eq!(score.polarity, 0.0);
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(LexiconScorer::new().score(""), SentimentScore::neutral());
    }

    #[test]
    fn scores_stay_bounded() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("love love love great best happy good nice");
        assert!((-1.0..=1.0).contains(&score.polarity));
        assert!((0.0..=1.0).contains(&score.subjectivity));
    }
}
