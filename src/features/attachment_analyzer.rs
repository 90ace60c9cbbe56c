use super::{FeatureExtractor, FeatureScore};
use crate::config::DetectorConfig;
use crate::email::EmailInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentAnalysis {
    pub score: f64,
    pub indicators: Vec<String>,
    pub total_attachments: usize,
    /// A filename appears twice when both rules fired for it.
    pub suspicious_attachments: Vec<String>,
}

impl FeatureScore for AttachmentAnalysis {
    fn score(&self) -> f64 {
        self.score
    }

    fn indicators(&self) -> &[String] {
        &self.indicators
    }
}

pub struct AttachmentAnalyzer {
    suspicious_extensions: Vec<String>,
    double_extension_decoys: Vec<String>,
}

impl Default for AttachmentAnalyzer {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl AttachmentAnalyzer {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            suspicious_extensions: config
                .suspicious_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            double_extension_decoys: config
                .double_extension_decoys
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    pub fn has_suspicious_extension(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.suspicious_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }

    /// `invoice.pdf.exe`: a decoy extension directly before the real one.
    pub fn has_double_extension(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        let parts: Vec<&str> = lower.split('.').collect();
        parts.len() > 2
            && self
                .double_extension_decoys
                .iter()
                .any(|decoy| decoy == parts[parts.len() - 2])
    }

    pub fn analyze(&self, attachments: &[String]) -> AttachmentAnalysis {
        let mut analysis = AttachmentAnalysis {
            total_attachments: attachments.len(),
            ..Default::default()
        };

        for attachment in attachments {
            if self.has_suspicious_extension(attachment) {
                analysis.score += 4.0;
                analysis
                    .indicators
                    .push(format!("Suspicious file type: {}", attachment));
                analysis.suspicious_attachments.push(attachment.clone());
            }

            if self.has_double_extension(attachment) {
                analysis.score += 3.0;
                analysis
                    .indicators
                    .push(format!("Double extension detected: {}", attachment));
                analysis.suspicious_attachments.push(attachment.clone());
            }
        }

        analysis
    }
}

impl FeatureExtractor for AttachmentAnalyzer {
    type Output = AttachmentAnalysis;

    fn extract(&self, email: &EmailInput) -> AttachmentAnalysis {
        self.analyze(&email.attachments)
    }

    fn name(&self) -> &str {
        "attachment_analyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_attachments() {
        let analyzer = AttachmentAnalyzer::default();
        let analysis = analyzer.analyze(&[]);
        assert_eq!(analysis.score, 0.0);
        assert!(analysis.indicators.is_empty());
        assert_eq!(analysis.total_attachments, 0);
        assert!(analysis.suspicious_attachments.is_empty());
    }

    #[test]
    fn test_suspicious_extension() {
        let analyzer = AttachmentAnalyzer::default();
        let analysis = analyzer.analyze(&names(&["Verification.EXE", "report.pdf"]));
        assert_eq!(analysis.score, 4.0);
        assert_eq!(
            analysis.indicators,
            vec!["Suspicious file type: Verification.EXE"]
        );
        assert_eq!(analysis.total_attachments, 2);
        assert_eq!(analysis.suspicious_attachments, vec!["Verification.EXE"]);
    }

    #[test]
    fn test_double_extension_fires_with_suspicious_extension() {
        let analyzer = AttachmentAnalyzer::default();
        let analysis = analyzer.analyze(&names(&["invoice.pdf.exe"]));
        assert_eq!(analysis.score, 7.0);
        assert_eq!(
            analysis.indicators,
            vec![
                "Suspicious file type: invoice.pdf.exe",
                "Double extension detected: invoice.pdf.exe"
            ]
        );
        assert_eq!(
            analysis.suspicious_attachments,
            vec!["invoice.pdf.exe", "invoice.pdf.exe"]
        );
    }

    #[test]
    fn test_double_extension_alone() {
        let analyzer = AttachmentAnalyzer::default();
        let analysis = analyzer.analyze(&names(&["photo.jpg.html"]));
        assert_eq!(analysis.score, 3.0);
        assert_eq!(
            analysis.indicators,
            vec!["Double extension detected: photo.jpg.html"]
        );
    }

    #[test]
    fn test_harmless_multi_dot_names() {
        let analyzer = AttachmentAnalyzer::default();
        let analysis = analyzer.analyze(&names(&["q3.report.xlsx", "archive.tar.gz"]));
        assert_eq!(analysis.score, 0.0);
    }

    #[test]
    fn test_dot_com_suffix_is_suspicious() {
        let analyzer = AttachmentAnalyzer::default();
        assert!(analyzer.has_suspicious_extension("readme.com"));
        assert!(analyzer.has_suspicious_extension("payload.7z"));
        assert!(!analyzer.has_suspicious_extension("notes.txt"));
    }
}
