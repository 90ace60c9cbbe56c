//! Canned emails for demos and smoke tests.

use crate::service::AnalyzeRequest;

pub const SAMPLE_NAMES: [&str; 3] = ["phishing", "legitimate", "suspicious"];

const PHISHING_CONTENT: &str = "Dear Customer,

Your PayPal account has been SUSPENDED due to suspicious activity!

Click here immediately to verify your account: http://bit.ly/paypal-verify-urgent

You have 24 hours to confirm your identity or your account will be permanently closed.

Thank you,
PayPal Security Team";

const LEGITIMATE_CONTENT: &str = "Thank you for your recent purchase. Your order #123456 will be shipped within 2-3 business days.

Track your order: https://amazon.com/track/123456

Best regards,
Amazon Customer Service";

const SUSPICIOUS_CONTENT: &str = "CONGRATULATIONS!!!

You have been selected as the WINNER of our International Lottery!

Prize Amount: $1,000,000 USD

To claim your prize, click here: http://tiny.cc/lottery-claim

You must respond within 48 hours!

International Lottery Commission";

fn request(sender: &str, subject: &str, content: &str, attachments: &[&str]) -> AnalyzeRequest {
    AnalyzeRequest {
        sender: sender.to_string(),
        subject: subject.to_string(),
        content: content.to_string(),
        attachments: attachments.iter().map(|a| a.to_string()).collect(),
    }
}

/// Looks up a sample by name.
pub fn sample(name: &str) -> Option<AnalyzeRequest> {
    match name {
        "phishing" => Some(request(
            "security@paypaI.com",
            "URGENT: Account Suspended - Act Now!",
            PHISHING_CONTENT,
            &["account_verification.exe"],
        )),
        "legitimate" => Some(request(
            "notifications@amazon.com",
            "Your Order Confirmation",
            LEGITIMATE_CONTENT,
            &[],
        )),
        "suspicious" => Some(request(
            "winner@lottery-international.biz",
            "Congratulations! You have won $1,000,000!!!",
            SUSPICIOUS_CONTENT,
            &["claim_form.zip"],
        )),
        _ => None,
    }
}

/// All samples, in [`SAMPLE_NAMES`] order.
pub fn test_samples() -> Vec<(&'static str, AnalyzeRequest)> {
    SAMPLE_NAMES
        .iter()
        .filter_map(|name| sample(name).map(|req| (*name, req)))
        .collect()
}
