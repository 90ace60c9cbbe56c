use super::{FeatureExtractor, FeatureScore};
use crate::config::DetectorConfig;
use crate::domain_utils::DomainUtils;
use crate::email::EmailInput;
use regex::Regex;
use serde::{Deserialize, Serialize};

const URL_PATTERN: &str =
    r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(\\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+";
const LONG_DOMAIN_LENGTH: usize = 30;
const MAX_HYPHENS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlDetail {
    pub url: String,
    pub score: f64,
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlAnalysis {
    pub score: f64,
    pub indicators: Vec<String>,
    pub urls_found: usize,
    pub url_details: Vec<UrlDetail>,
}

impl FeatureScore for UrlAnalysis {
    fn score(&self) -> f64 {
        self.score
    }

    fn indicators(&self) -> &[String] {
        &self.indicators
    }
}

pub struct UrlAnalyzer {
    url_regex: Regex,
    ip_regex: Regex,
    shortener_domains: Vec<String>,
    homograph_chars: Vec<char>,
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl UrlAnalyzer {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            url_regex: Regex::new(URL_PATTERN).unwrap(),
            ip_regex: Regex::new(r"\d+\.\d+\.\d+\.\d+").unwrap(),
            shortener_domains: config
                .shortener_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            homograph_chars: config.homograph_chars.clone(),
        }
    }

    /// Every URL occurrence in `content`, duplicates included, in order.
    pub fn extract_urls<'a>(&self, content: &'a str) -> Vec<&'a str> {
        self.url_regex
            .find_iter(content)
            .map(|m| m.as_str())
            .collect()
    }

    pub fn analyze(&self, content: &str) -> UrlAnalysis {
        let found = self.extract_urls(content);
        let mut analysis = UrlAnalysis {
            urls_found: found.len(),
            ..Default::default()
        };

        for url in found {
            let detail = self.analyze_single_url(url);
            analysis.score += detail.score;
            analysis.indicators.extend(detail.indicators.iter().cloned());
            analysis.url_details.push(detail);
        }

        analysis
    }

    pub fn analyze_single_url(&self, url: &str) -> UrlDetail {
        let mut detail = UrlDetail {
            url: url.to_string(),
            ..Default::default()
        };

        let domain = match DomainUtils::network_location(url) {
            Ok(netloc) => netloc.to_lowercase(),
            Err(e) => {
                log::debug!("Malformed URL {}: {}", url, e);
                detail.score += 1.0;
                detail.indicators.push("Malformed URL".to_string());
                return detail;
            }
        };

        if DomainUtils::find_substring_match(&domain, &self.shortener_domains).is_some() {
            detail.score += 3.0;
            detail
                .indicators
                .push(format!("URL shortener detected: {}", domain));
        }

        if domain.chars().count() > LONG_DOMAIN_LENGTH {
            detail.score += 2.0;
            detail
                .indicators
                .push("Unusually long domain name".to_string());
        }

        if domain.matches('-').count() > MAX_HYPHENS {
            detail.score += 2.0;
            detail
                .indicators
                .push("Multiple hyphens in domain".to_string());
        }

        if self.ip_regex.is_match(&domain) {
            detail.score += 4.0;
            detail
                .indicators
                .push("IP address instead of domain name".to_string());
        }

        if domain.chars().any(|c| self.homograph_chars.contains(&c)) {
            detail.score += 5.0;
            detail
                .indicators
                .push("Potential homograph attack".to_string());
        }

        detail
    }
}

impl FeatureExtractor for UrlAnalyzer {
    type Output = UrlAnalysis;

    fn extract(&self, email: &EmailInput) -> UrlAnalysis {
        self.analyze(&email.body)
    }

    fn name(&self) -> &str {
        "url_analyzer"
    }
}
