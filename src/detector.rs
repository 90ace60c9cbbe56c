use crate::config::DetectorConfig;
use crate::email::{EmailInput, RawEmail};
use crate::features::{
    run_extractor, AttachmentAnalysis, AttachmentAnalyzer, ContentAnalysis, ContentAnalyzer,
    SenderAnalysis, SenderAnalyzer, UrlAnalysis, UrlAnalyzer,
};
use crate::report;
use crate::sentiment::{LexiconScorer, PolarityScorer};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 10.0 => RiskLevel::High,
            s if s >= 6.0 => RiskLevel::Medium,
            s if s >= 3.0 => RiskLevel::Low,
            _ => RiskLevel::Safe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis. Field names are the JSON field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhishingScore {
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub indicators: Vec<String>,
    pub url_analysis: UrlAnalysis,
    pub sender_analysis: SenderAnalysis,
    pub content_analysis: ContentAnalysis,
    pub attachment_analysis: AttachmentAnalysis,
    pub timestamp: String,
}

impl PhishingScore {
    pub fn should_quarantine(&self) -> bool {
        matches!(self.risk_level, RiskLevel::High | RiskLevel::Medium)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs the four analyzers over an email and aggregates their scores.
pub struct PhishingDetector {
    url_analyzer: UrlAnalyzer,
    sender_analyzer: SenderAnalyzer,
    content_analyzer: ContentAnalyzer,
    attachment_analyzer: AttachmentAnalyzer,
}

impl Default for PhishingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PhishingDetector {
    pub fn new() -> Self {
        Self::from_config(&DetectorConfig::default())
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::with_scorer(config, Box::new(LexiconScorer::new()))
    }

    pub fn with_scorer(config: &DetectorConfig, scorer: Box<dyn PolarityScorer>) -> Self {
        Self {
            url_analyzer: UrlAnalyzer::new(config),
            sender_analyzer: SenderAnalyzer::new(config),
            content_analyzer: ContentAnalyzer::new(config, scorer),
            attachment_analyzer: AttachmentAnalyzer::new(config),
        }
    }

    pub fn analyze(
        &self,
        body: &str,
        sender: &str,
        subject: &str,
        attachments: &[String],
    ) -> PhishingScore {
        self.analyze_input(&EmailInput::new(sender, subject, body, attachments.to_vec()))
    }

    pub fn analyze_input(&self, email: &EmailInput) -> PhishingScore {
        log::info!(
            "Analyzing email from {} with subject: {}...",
            email.sender,
            email.subject.chars().take(50).collect::<String>()
        );

        // Order here fixes the order of the combined indicator list
        let url_analysis = run_extractor(&self.url_analyzer, email);
        let sender_analysis = run_extractor(&self.sender_analyzer, email);
        let content_analysis = run_extractor(&self.content_analyzer, email);
        let attachment_analysis = run_extractor(&self.attachment_analyzer, email);

        let raw_total = url_analysis.score
            + sender_analysis.score
            + content_analysis.score
            + attachment_analysis.score;

        let mut indicators = Vec::new();
        indicators.extend(url_analysis.indicators.iter().cloned());
        indicators.extend(sender_analysis.indicators.iter().cloned());
        indicators.extend(content_analysis.indicators.iter().cloned());
        indicators.extend(attachment_analysis.indicators.iter().cloned());

        // Tiers are assigned from the rounded total, so 5.996 lands in MEDIUM
        let total_score = round2(raw_total);
        let risk_level = RiskLevel::from_score(total_score);

        log::info!(
            "Analysis complete. Risk level: {}, Score: {}",
            risk_level,
            total_score
        );

        PhishingScore {
            total_score,
            risk_level,
            indicators,
            url_analysis,
            sender_analysis,
            content_analysis,
            attachment_analysis,
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        }
    }

    /// Like [`analyze`](Self::analyze), but a missing or empty sender or
    /// subject is taken from the headers of `content`. The whole of
    /// `content` is still analyzed as the body.
    pub fn analyze_email(
        &self,
        content: &str,
        sender: Option<&str>,
        subject: Option<&str>,
        attachments: &[String],
    ) -> PhishingScore {
        let mut sender = sender.unwrap_or("").to_string();
        let mut subject = subject.unwrap_or("").to_string();

        if sender.is_empty() || subject.is_empty() {
            let raw = RawEmail::parse(content);
            if sender.is_empty() {
                sender = raw.from_header();
            }
            if subject.is_empty() {
                subject = raw.subject();
            }
        }

        self.analyze(content, &sender, &subject, attachments)
    }

    pub fn should_quarantine(&self, score: &PhishingScore) -> bool {
        score.should_quarantine()
    }

    pub fn generate_report(&self, score: &PhishingScore) -> String {
        report::generate_report(score)
    }
}
