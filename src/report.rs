use crate::detector::{PhishingScore, RiskLevel};
use std::fmt::Write;

/// Formats a score for the report. Counted scores print as integers
/// ("-1"). Weighted scores print as floats, keeping one decimal place when
/// whole ("9.0") and the shortest representation otherwise ("10.5").
pub fn format_points(value: f64, weighted: bool) -> String {
    if !weighted {
        format!("{}", value.round() as i64)
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "⚠️  RECOMMENDATION: QUARANTINE EMAIL IMMEDIATELY",
        RiskLevel::Medium => "⚡ RECOMMENDATION: FLAG FOR REVIEW",
        RiskLevel::Low => "💡 RECOMMENDATION: MONITOR",
        RiskLevel::Safe => "✅ RECOMMENDATION: SAFE TO DELIVER",
    }
}

/// Human-readable report for one analysis result.
pub fn generate_report(score: &PhishingScore) -> String {
    let mut report = String::new();
    // The total is weighted whenever the content score is
    let weighted = score.content_analysis.keyword_weight_applied();

    // Writing to a String cannot fail
    let _ = write!(
        report,
        "\nPHISHING DETECTION REPORT\n\
         ========================\n\
         Timestamp: {}\n\
         Total Score: {}\n\
         Risk Level: {}\n\
         \n\
         ANALYSIS SUMMARY:\n\
         - URLs: {} points ({} URLs found)\n\
         - Sender: {} points\n\
         - Content: {} points\n\
         - Attachments: {} points\n\
         \n\
         INDICATORS FOUND:\n",
        score.timestamp,
        format_points(score.total_score, weighted),
        score.risk_level,
        format_points(score.url_analysis.score, false),
        score.url_analysis.urls_found,
        format_points(score.sender_analysis.score, false),
        format_points(score.content_analysis.score, weighted),
        format_points(score.attachment_analysis.score, false),
    );

    for (i, indicator) in score.indicators.iter().enumerate() {
        let _ = writeln!(report, "{}. {}", i + 1, indicator);
    }

    report.push('\n');
    report.push_str(recommendation(score.risk_level));
    report
}
