use crate::detector::{PhishingDetector, PhishingScore};
use crate::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};

const SERVICE_NAME: &str = "Phishing Email Detection Agent";

/// One analysis request as submitted by a caller. Absent fields
/// deserialize as empty and are caught by [`AnalyzeRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub sender: String,
    pub subject: String,
    pub content: String,
    pub attachments: Vec<String>,
}

impl AnalyzeRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sender.is_empty() || self.subject.is_empty() || self.content.is_empty() {
            return Err(DetectorError::Validation(
                "Sender, subject, and content are required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn analyze(&self, detector: &PhishingDetector) -> Result<PhishingScore> {
        self.validate()?;
        Ok(detector.analyze_email(
            &self.content,
            Some(&self.sender),
            Some(&self.subject),
            &self.attachments,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&DetectorError> for ErrorResponse {
    fn from(err: &DetectorError) -> Self {
        let error = match err {
            DetectorError::Validation(message) => message.clone(),
            other => format!("Analysis failed: {}", other),
        };
        Self { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_attachments() {
        let request = AnalyzeRequest::from_json(
            r#"{"sender": "a@b.com", "subject": "Hi", "content": "Hello"}"#,
        )
        .unwrap();
        assert!(request.attachments.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_field_fails_validation() {
        let request =
            AnalyzeRequest::from_json(r#"{"sender": "a@b.com", "content": "Hello"}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, DetectorError::Validation(_)));
        assert_eq!(
            ErrorResponse::from(&err).error,
            "Sender, subject, and content are required"
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = AnalyzeRequest::from_json("not json").unwrap_err();
        assert!(matches!(err, DetectorError::Json(_)));
        assert!(ErrorResponse::from(&err).error.starts_with("Analysis failed: "));
    }

    #[test]
    fn test_analyze_validates_first() {
        let detector = PhishingDetector::new();
        let request = AnalyzeRequest {
            sender: "a@b.com".to_string(),
            ..Default::default()
        };
        assert!(request.analyze(&detector).is_err());
    }

    #[test]
    fn test_service_info() {
        let info = ServiceInfo::current();
        assert_eq!(info.status, "healthy");
        assert_eq!(info.service, "Phishing Email Detection Agent");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
