use super::{FeatureExtractor, FeatureScore};
use crate::config::DetectorConfig;
use crate::email::EmailInput;
use crate::sentiment::{LexiconScorer, PolarityScorer, SentimentScores};
use regex::Regex;
use serde::{Deserialize, Serialize};

const MULTI_KEYWORD_THRESHOLD: usize = 3;
const MULTI_KEYWORD_WEIGHT: f64 = 1.5;
const MAX_LISTED_KEYWORDS: usize = 5;
const NEGATIVE_SENTIMENT_THRESHOLD: f64 = -0.5;
const MAX_EXCLAMATIONS: usize = 5;
const MAX_CAPS_RATIO: f64 = 0.3;
const MAX_WORD_RUNS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub score: f64,
    pub indicators: Vec<String>,
    pub keyword_count: usize,
    pub sentiment: SentimentScores,
    pub found_keywords: Vec<String>,
}

impl ContentAnalysis {
    /// True when the multi-keyword weight was applied, which is the only
    /// rule that adds a non-integral amount.
    pub fn keyword_weight_applied(&self) -> bool {
        self.keyword_count >= MULTI_KEYWORD_THRESHOLD
    }
}

impl FeatureScore for ContentAnalysis {
    fn score(&self) -> f64 {
        self.score
    }

    fn indicators(&self) -> &[String] {
        &self.indicators
    }
}

pub struct ContentAnalyzer {
    phishing_keywords: Vec<String>,
    word_run_regex: Regex,
    scorer: Box<dyn PolarityScorer>,
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new(&DetectorConfig::default(), Box::new(LexiconScorer::new()))
    }
}

impl ContentAnalyzer {
    pub fn new(config: &DetectorConfig, scorer: Box<dyn PolarityScorer>) -> Self {
        Self {
            phishing_keywords: config
                .phishing_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            // Three whitespace-separated words; a rough proxy for run-on text
            word_run_regex: Regex::new(r"\b\w+\b\s+\b\w+\b\s+\b\w+\b").unwrap(),
            scorer,
        }
    }

    /// Configured keywords present in `text`, each listed once, in list order.
    pub fn find_keywords(&self, text: &str) -> Vec<String> {
        self.phishing_keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .cloned()
            .collect()
    }

    pub fn analyze(&self, body: &str, subject: &str) -> ContentAnalysis {
        let mut score = 0.0;
        let mut indicators = Vec::new();

        let full_text = format!("{} {}", subject, body).to_lowercase();

        let found_keywords = self.find_keywords(&full_text);
        let keyword_count = found_keywords.len();
        if keyword_count >= MULTI_KEYWORD_THRESHOLD {
            score += keyword_count as f64 * MULTI_KEYWORD_WEIGHT;
            let listed: Vec<&str> = found_keywords
                .iter()
                .take(MAX_LISTED_KEYWORDS)
                .map(|k| k.as_str())
                .collect();
            indicators.push(format!(
                "Multiple suspicious keywords: {}",
                listed.join(", ")
            ));
        } else if keyword_count > 0 {
            score += keyword_count as f64;
            indicators.push(format!(
                "Suspicious keywords found: {}",
                found_keywords.join(", ")
            ));
        }

        let sentiment = self.scorer.polarity_scores(&full_text);
        if sentiment.compound < NEGATIVE_SENTIMENT_THRESHOLD {
            score += 2.0;
            indicators.push("Highly negative sentiment (fear/urgency)".to_string());
        }

        if body.matches('!').count() > MAX_EXCLAMATIONS {
            score += 2.0;
            indicators.push("Excessive exclamation marks".to_string());
        }

        if caps_ratio(body) > MAX_CAPS_RATIO {
            score += 2.0;
            indicators.push("Excessive capital letters".to_string());
        }

        if self.word_run_regex.find_iter(body).count() > MAX_WORD_RUNS {
            score += 1.0;
            indicators.push("Potential grammar/spelling issues".to_string());
        }

        ContentAnalysis {
            score,
            indicators,
            keyword_count,
            sentiment,
            found_keywords,
        }
    }
}

/// Share of ASCII capitals among all characters of `text`.
fn caps_ratio(text: &str) -> f64 {
    let capitals = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    let length = text.chars().count().max(1);
    capitals as f64 / length as f64
}

impl FeatureExtractor for ContentAnalyzer {
    type Output = ContentAnalysis;

    fn extract(&self, email: &EmailInput) -> ContentAnalysis {
        self.analyze(&email.body, &email.subject)
    }

    fn name(&self) -> &str {
        "content_analyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(f64);

    impl PolarityScorer for FixedScorer {
        fn polarity_scores(&self, _text: &str) -> SentimentScores {
            SentimentScores {
                compound: self.0,
                ..Default::default()
            }
        }
    }

    fn analyzer_with_compound(compound: f64) -> ContentAnalyzer {
        ContentAnalyzer::new(&DetectorConfig::default(), Box::new(FixedScorer(compound)))
    }

    #[test]
    fn test_clean_content() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("See you at lunch.", "Lunch");
        assert_eq!(analysis.score, 0.0);
        assert!(analysis.indicators.is_empty());
        assert_eq!(analysis.keyword_count, 0);
    }

    #[test]
    fn test_few_keywords_score_one_each() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("Please verify your details.", "Urgent");
        assert_eq!(analysis.keyword_count, 2);
        assert_eq!(analysis.score, 2.0);
        assert!(!analysis.keyword_weight_applied());
        assert_eq!(
            analysis.indicators,
            vec!["Suspicious keywords found: urgent, verify"]
        );
    }

    #[test]
    fn test_keyword_counted_once_and_in_subject() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("verify verify verify", "");
        assert_eq!(analysis.keyword_count, 1);
        assert_eq!(analysis.found_keywords, vec!["verify"]);
        assert_eq!(analysis.score, 1.0);
    }

    #[test]
    fn test_many_keywords_list_first_five() {
        let analyzer = analyzer_with_compound(0.0);
        let body = "urgent: verify now, account suspended. confirm and update. click here";
        let analysis = analyzer.analyze(body, "");
        assert_eq!(analysis.keyword_count, 6);
        assert_eq!(analysis.score, 9.0);
        assert!(analysis.keyword_weight_applied());
        assert_eq!(
            analysis.indicators,
            vec!["Multiple suspicious keywords: urgent, verify, suspended, confirm, update"]
        );
    }

    #[test]
    fn test_overlapping_keywords_both_count() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("Your tax refund is ready", "");
        assert_eq!(analysis.found_keywords, vec!["refund", "tax refund"]);
        assert_eq!(analysis.score, 2.0);
    }

    #[test]
    fn test_negative_sentiment() {
        let analyzer = analyzer_with_compound(-0.51);
        let analysis = analyzer.analyze("hello", "hi");
        assert_eq!(analysis.score, 2.0);
        assert_eq!(
            analysis.indicators,
            vec!["Highly negative sentiment (fear/urgency)"]
        );
        assert_eq!(analysis.sentiment.compound, -0.51);

        let analyzer = analyzer_with_compound(-0.5);
        assert_eq!(analyzer.analyze("hello", "hi").score, 0.0);
    }

    #[test]
    fn test_exclamation_marks() {
        let analyzer = analyzer_with_compound(0.0);
        assert_eq!(analyzer.analyze("wow!!!!!", "").score, 0.0);

        let analysis = analyzer.analyze("wow!!!!!!", "");
        assert_eq!(analysis.indicators, vec!["Excessive exclamation marks"]);
    }

    #[test]
    fn test_exclamations_in_subject_ignored() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("fine", "!!!!!!!!");
        assert_eq!(analysis.score, 0.0);
    }

    #[test]
    fn test_capital_letters() {
        let analyzer = analyzer_with_compound(0.0);
        let analysis = analyzer.analyze("READ THIS NOW", "");
        assert_eq!(analysis.indicators, vec!["Excessive capital letters"]);
        assert_eq!(analysis.score, 2.0);

        // 3 of 10 characters is not above the threshold
        assert_eq!(analyzer.analyze("ABCdefghij", "").score, 0.0);
    }

    #[test]
    fn test_word_runs() {
        let analyzer = analyzer_with_compound(0.0);
        let ten_runs = "one two three ".repeat(10);
        assert_eq!(analyzer.analyze(&ten_runs, "").score, 0.0);

        let eleven_runs = "one two three ".repeat(11);
        let analysis = analyzer.analyze(&eleven_runs, "");
        assert_eq!(analysis.indicators, vec!["Potential grammar/spelling issues"]);
        assert_eq!(analysis.score, 1.0);
    }

    #[test]
    fn test_lexicon_scorer_flags_fear() {
        let analyzer = ContentAnalyzer::default();
        let analysis = analyzer.analyze(
            "fraud alert: stolen card, criminal threat, your account is in danger",
            "terrible problem",
        );
        assert!(analysis.sentiment.compound < -0.5);
        assert!(analysis
            .indicators
            .contains(&"Highly negative sentiment (fear/urgency)".to_string()));
    }
}
