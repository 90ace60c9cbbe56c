//! Polarity scoring for message text.
//!
//! The content analyzer only needs a compound polarity in `[-1, 1]`, so any
//! scorer implementing [`PolarityScorer`] can be plugged in. [`LexiconScorer`]
//! is the built-in one: a small valence lexicon with negation and
//! exclamation handling, normalized the same way VADER normalizes its sums.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

pub trait PolarityScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> SentimentScores;

    /// Compound polarity in `[-1, 1]`.
    fn score(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }
}

pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
    negators: Vec<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        let entries: &[(&str, f64)] = &[
            // negative
            ("afraid", -2.2),
            ("alarm", -1.4),
            ("angry", -2.3),
            ("arrest", -2.4),
            ("arrested", -2.1),
            ("attack", -2.1),
            ("awful", -2.0),
            ("bad", -2.5),
            ("blocked", -1.4),
            ("breach", -1.8),
            ("cancel", -1.0),
            ("cancelled", -1.0),
            ("compromised", -1.9),
            ("crime", -2.5),
            ("danger", -2.4),
            ("dangerous", -2.1),
            ("dead", -3.3),
            ("denied", -1.7),
            ("deny", -1.4),
            ("die", -2.9),
            ("error", -1.7),
            ("fail", -2.3),
            ("failed", -2.3),
            ("failure", -2.3),
            ("fear", -2.2),
            ("fraud", -2.8),
            ("fraudulent", -2.8),
            ("hack", -1.5),
            ("hacked", -1.7),
            ("hate", -2.7),
            ("horrible", -2.5),
            ("illegal", -2.6),
            ("kill", -3.7),
            ("lose", -1.9),
            ("loss", -1.3),
            ("lost", -1.3),
            ("panic", -2.3),
            ("penalty", -2.0),
            ("problem", -1.7),
            ("problems", -1.7),
            ("risk", -1.1),
            ("scam", -2.6),
            ("sorry", -0.3),
            ("steal", -2.2),
            ("stolen", -2.2),
            ("suspend", -1.3),
            ("suspended", -2.1),
            ("suspicious", -1.5),
            ("terrible", -2.5),
            ("threat", -2.4),
            ("unauthorized", -1.6),
            ("unfortunately", -1.5),
            ("victim", -2.4),
            ("violation", -2.2),
            ("warning", -1.4),
            ("worry", -1.9),
            ("worst", -3.1),
            // positive
            ("best", 3.2),
            ("congratulations", 2.9),
            ("enjoy", 2.2),
            ("excellent", 2.7),
            ("free", 2.3),
            ("gift", 1.9),
            ("glad", 2.0),
            ("good", 1.9),
            ("great", 3.1),
            ("happy", 2.7),
            ("kind", 2.4),
            ("love", 3.2),
            ("lucky", 2.2),
            ("nice", 1.8),
            ("pleased", 1.9),
            ("prize", 2.3),
            ("reward", 2.1),
            ("safe", 1.9),
            ("secure", 1.4),
            ("thank", 1.5),
            ("thanks", 1.9),
            ("welcome", 2.0),
            ("win", 2.8),
            ("winner", 2.8),
            ("won", 2.7),
        ];

        Self {
            lexicon: entries.iter().copied().collect(),
            negators: vec![
                "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot",
                "can't", "don't", "doesn't", "didn't", "isn't", "wasn't", "won't", "wouldn't",
                "shouldn't", "couldn't", "without",
            ],
        }
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect()
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.iter().any(|negator| *negator == token) || token.ends_with("n't")
    }

    fn valences(&self, tokens: &[String]) -> Vec<f64> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let Some(&valence) = self.lexicon.get(token.as_str()) else {
                    return 0.0;
                };
                let start = i.saturating_sub(NEGATION_WINDOW);
                let negated = tokens[start..i].iter().any(|t| self.is_negator(t));
                if negated {
                    valence * NEGATION_SCALAR
                } else {
                    valence
                }
            })
            .collect()
    }
}

fn normalize(sum: f64) -> f64 {
    let score = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
    score.clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl PolarityScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens = Self::tokens(text);
        if tokens.is_empty() {
            return SentimentScores::default();
        }

        let valences = self.valences(&tokens);
        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
        let emphasis = exclamations as f64 * EXCLAMATION_BOOST;

        let mut sum: f64 = valences.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = if sum == 0.0 { 0.0 } else { normalize(sum) };

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neutral = 0.0;
        for valence in &valences {
            if *valence > 0.0 {
                pos_sum += valence + 1.0;
            } else if *valence < 0.0 {
                neg_sum += valence - 1.0;
            } else {
                neutral += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neutral;
        SentimentScores {
            neg: round_to((neg_sum / total).abs(), 3),
            neu: round_to((neutral / total).abs(), 3),
            pos: round_to((pos_sum / total).abs(), 3),
            compound: round_to(compound, 4),
        }
    }
}
