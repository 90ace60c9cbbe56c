use base64::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref ENCODED_WORD: Regex =
        Regex::new(r"=\?([^?\s]+)\?([bBqQ])\?([^?\s]*)\?=").unwrap();
}

/// The fields of one email as handed to the detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailInput {
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<String>,
}

impl EmailInput {
    pub fn new(
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        attachments: Vec<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            subject: subject.into(),
            body: body.into(),
            attachments,
        }
    }
}

/// Header block and body of an RFC 822 style message.
#[derive(Debug, Clone, Default)]
pub struct RawEmail {
    headers: HashMap<String, String>,
    pub body: String,
}

impl RawEmail {
    pub fn parse(content: &str) -> Self {
        let mut headers: HashMap<String, String> = HashMap::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_headers = true;
        // None while inside a header whose value is not kept
        let mut last_header_key: Option<String> = None;

        for (lineno, line) in content.lines().enumerate() {
            if !in_headers {
                body_lines.push(line);
                continue;
            }

            if line.is_empty() {
                in_headers = false;
                continue;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                // Folded continuation, kept raw like the first line's value
                if let Some(ref key) = last_header_key {
                    if let Some(existing_value) = headers.get_mut(key) {
                        existing_value.push('\n');
                        existing_value.push_str(line);
                    }
                }
                continue;
            }

            if lineno == 0 && line.starts_with("From ") {
                // mbox envelope line
                continue;
            }

            match line.split_once(':') {
                Some((key, value)) if is_header_name(key) => {
                    last_header_key = None;
                    if key.is_empty() {
                        continue;
                    }
                    let key = key.to_lowercase();
                    // Later duplicates of a header are ignored, the first one wins
                    if !headers.contains_key(&key) {
                        let value = value.trim_start_matches([' ', '\t']);
                        headers.insert(key.clone(), value.to_string());
                        last_header_key = Some(key);
                    }
                }
                _ => {
                    // Not a header line: the message has no (more) headers
                    in_headers = false;
                    body_lines.push(line);
                }
            }
        }

        Self {
            headers,
            body: body_lines.join("\n"),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn from_header(&self) -> String {
        self.header("from").map(decode_mime_header).unwrap_or_default()
    }

    pub fn subject(&self) -> String {
        self.header("subject")
            .map(decode_mime_header)
            .unwrap_or_default()
    }
}

fn is_header_name(key: &str) -> bool {
    key.chars().all(|c| ('!'..='~').contains(&c) && c != ':')
}

/// Decodes RFC 2047 encoded words (`=?charset?B?...?=` and `=?charset?Q?...?=`).
/// Words that fail to decode are left as they were.
pub fn decode_mime_header(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut last_end = 0;
    let mut previous_was_encoded = false;

    for cap in ENCODED_WORD.captures_iter(value) {
        let whole = cap.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        let between = &value[last_end..whole.0];
        // Whitespace separating two adjacent encoded words is dropped
        if !(previous_was_encoded && between.trim().is_empty()) {
            result.push_str(between);
        }

        let charset = &cap[1];
        let decoded_bytes = match &cap[2] {
            "B" | "b" => BASE64_STANDARD.decode(&cap[3]).ok(),
            _ => Some(decode_q_encoding(&cap[3])),
        };

        match decoded_bytes {
            Some(bytes) => {
                result.push_str(&bytes_to_string(&bytes, charset));
                previous_was_encoded = true;
            }
            None => {
                result.push_str(&value[whole.0..whole.1]);
                previous_was_encoded = false;
            }
        }
        last_end = whole.1;
    }

    result.push_str(&value[last_end..]);
    result
}

fn decode_q_encoding(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
                match u8::from_str_radix(hex, 16) {
                    Ok(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    Err(_) => out.push(b'='),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    out
}

fn bytes_to_string(bytes: &[u8], charset: &str) -> String {
    let charset = charset.to_ascii_lowercase();
    if charset == "iso-8859-1" || charset == "latin1" || charset == "us-ascii" {
        bytes.iter().map(|&b| b as char).collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_body() {
        let raw = "From: PayPal <service@paypa1.com>\r\nSubject: Verify now\r\n\r\nHello there\r\nSecond line";
        let email = RawEmail::parse(raw);
        assert_eq!(email.from_header(), "PayPal <service@paypa1.com>");
        assert_eq!(email.subject(), "Verify now");
        assert_eq!(email.body, "Hello there\nSecond line");
        assert_eq!(email.header("FROM"), Some("PayPal <service@paypa1.com>"));
    }

    #[test]
    fn test_folded_header() {
        let raw = "Subject: Your account\n has been locked\nFrom: a@b.com\n\nbody";
        let email = RawEmail::parse(raw);
        assert_eq!(email.subject(), "Your account\n has been locked");
        assert_eq!(email.from_header(), "a@b.com");
    }

    #[test]
    fn test_first_duplicate_header_wins() {
        let raw = "From: first@a.com\nFrom: second@b.com\n\nbody";
        let email = RawEmail::parse(raw);
        assert_eq!(email.from_header(), "first@a.com");
    }

    #[test]
    fn test_fold_under_ignored_duplicate_keeps_reading() {
        let raw = "From: a@x.com\nFrom: b@y.com\n folded\nSubject: Prize\n\nbody";
        let email = RawEmail::parse(raw);
        assert_eq!(email.from_header(), "a@x.com");
        assert_eq!(email.subject(), "Prize");
        assert_eq!(email.body, "body");
    }

    #[test]
    fn test_whitespace_only_line_is_a_continuation() {
        let raw = "Subject: Hello\n \nFrom: a@x.com\n\nbody";
        let email = RawEmail::parse(raw);
        assert_eq!(email.subject(), "Hello\n ");
        assert_eq!(email.from_header(), "a@x.com");
    }

    #[test]
    fn test_stray_lines_in_header_block_are_skipped() {
        let raw = "From someone Mon Jan  1 00:00:00 2024\n\tleading fold\n: no name\nSubject: Hi\n\nbody";
        let email = RawEmail::parse(raw);
        assert_eq!(email.subject(), "Hi");
        assert_eq!(email.header("from"), None);
        assert_eq!(email.body, "body");
    }

    #[test]
    fn test_content_without_headers() {
        let raw = "Dear Customer,\nTrack your order: https://amazon.com/track/1";
        let email = RawEmail::parse(raw);
        assert_eq!(email.from_header(), "");
        assert_eq!(email.subject(), "");
        assert_eq!(email.body, raw);
    }

    #[test]
    fn test_leading_blank_line_ends_headers() {
        let raw = "\nFrom: not-a-header@example.com";
        let email = RawEmail::parse(raw);
        assert_eq!(email.header("from"), None);
    }

    #[test]
    fn test_decode_base64_word() {
        assert_eq!(
            decode_mime_header("=?UTF-8?B?VVJHRU5UOiBWZXJpZnk=?= now"),
            "URGENT: Verify now"
        );
    }

    #[test]
    fn test_decode_q_word() {
        assert_eq!(
            decode_mime_header("=?iso-8859-1?Q?Caf=E9_order?="),
            "Café order"
        );
    }

    #[test]
    fn test_adjacent_encoded_words_join() {
        assert_eq!(
            decode_mime_header("=?utf-8?Q?Account?= =?utf-8?Q?_locked?="),
            "Account locked"
        );
    }

    #[test]
    fn test_plain_header_untouched() {
        assert_eq!(decode_mime_header("Plain subject"), "Plain subject");
        assert_eq!(decode_mime_header("=?bad"), "=?bad");
    }
}
