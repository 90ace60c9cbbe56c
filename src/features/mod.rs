pub mod attachment_analyzer;
pub mod content_analyzer;
pub mod sender_analyzer;
pub mod url_analyzer;

use crate::email::EmailInput;

pub use attachment_analyzer::{AttachmentAnalysis, AttachmentAnalyzer};
pub use content_analyzer::{ContentAnalysis, ContentAnalyzer};
pub use sender_analyzer::{SenderAnalysis, SenderAnalyzer};
pub use url_analyzer::{UrlAnalysis, UrlAnalyzer, UrlDetail};

/// Common view over the per-facet analysis records.
pub trait FeatureScore {
    fn score(&self) -> f64;
    fn indicators(&self) -> &[String];
}

/// One independent facet of the email. Extractors hold only immutable state,
/// so a single instance can serve concurrent analyses.
pub trait FeatureExtractor: Send + Sync {
    type Output: FeatureScore;

    fn extract(&self, email: &EmailInput) -> Self::Output;
    fn name(&self) -> &str;
}

/// Runs one extractor and logs what it contributed.
pub fn run_extractor<E: FeatureExtractor>(extractor: &E, email: &EmailInput) -> E::Output {
    let output = extractor.extract(email);
    log::debug!(
        "{}: {} points, {} indicators",
        extractor.name(),
        output.score(),
        output.indicators().len()
    );
    output
}
