use super::{FeatureExtractor, FeatureScore};
use crate::config::DetectorConfig;
use crate::domain_utils::DomainUtils;
use crate::email::EmailInput;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SHORT_DOMAIN_LENGTH: usize = 4;
const MAX_DOTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderAnalysis {
    pub score: f64,
    pub indicators: Vec<String>,
    pub domain: Option<String>,
}

impl FeatureScore for SenderAnalysis {
    fn score(&self) -> f64 {
        self.score
    }

    fn indicators(&self) -> &[String] {
        &self.indicators
    }
}

pub struct SenderAnalyzer {
    domain_regex: Regex,
    trusted_domains: Vec<String>,
    spoofed_brands: Vec<String>,
}

impl Default for SenderAnalyzer {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl SenderAnalyzer {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            domain_regex: Regex::new(r"@([a-zA-Z0-9.-]+)").unwrap(),
            trusted_domains: config
                .trusted_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            spoofed_brands: config
                .spoofed_brands
                .iter()
                .map(|b| b.to_lowercase())
                .collect(),
        }
    }

    /// Domain of the first `@host` in the sender, lowercased.
    pub fn extract_domain(&self, sender: &str) -> Option<String> {
        self.domain_regex
            .captures(sender)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_lowercase())
    }

    fn is_trusted(&self, domain: &str) -> bool {
        self.trusted_domains.iter().any(|t| t == domain)
    }

    pub fn analyze(&self, sender: &str) -> SenderAnalysis {
        if sender.is_empty() {
            return SenderAnalysis {
                score: 2.0,
                indicators: vec!["No sender information".to_string()],
                domain: None,
            };
        }

        let Some(domain) = self.extract_domain(sender) else {
            return SenderAnalysis {
                score: 3.0,
                indicators: vec!["Invalid sender format".to_string()],
                domain: None,
            };
        };

        let mut score = 0.0;
        let mut indicators = Vec::new();
        let trusted = self.is_trusted(&domain);

        if trusted {
            score -= 1.0;
        } else {
            if domain.chars().count() < SHORT_DOMAIN_LENGTH {
                score += 2.0;
                indicators.push("Very short domain name".to_string());
            }

            if domain.matches('.').count() > MAX_DOTS {
                score += 1.0;
                indicators.push("Multiple subdomains".to_string());
            }

            if domain.chars().any(|c| c.is_ascii_digit()) {
                score += 1.0;
                indicators.push("Numbers in domain name".to_string());
            }
        }

        if let Some(display_name) = DomainUtils::display_name(sender) {
            let display_lower = display_name.to_lowercase();
            let claims_brand = self
                .spoofed_brands
                .iter()
                .any(|brand| display_lower.contains(brand.as_str()));
            if claims_brand && !trusted {
                score += 4.0;
                indicators.push("Display name spoofing detected".to_string());
            }
        }

        SenderAnalysis {
            score,
            indicators,
            domain: Some(domain),
        }
    }
}

impl FeatureExtractor for SenderAnalyzer {
    type Output = SenderAnalysis;

    fn extract(&self, email: &EmailInput) -> SenderAnalysis {
        self.analyze(&email.sender)
    }

    fn name(&self) -> &str {
        "sender_analyzer"
    }
}
