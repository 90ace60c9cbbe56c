pub mod config;
pub mod detector;
pub mod domain_utils;
pub mod email;
pub mod error;
pub mod features;
pub mod report;
pub mod samples;
pub mod sentiment;
pub mod service;

pub use config::DetectorConfig;
pub use detector::{PhishingDetector, PhishingScore, RiskLevel};
pub use email::{EmailInput, RawEmail};
pub use error::{DetectorError, Result};
pub use sentiment::{LexiconScorer, PolarityScorer, SentimentScores};
pub use service::{AnalyzeRequest, ErrorResponse, ServiceInfo};
