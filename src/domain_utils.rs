use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlParseError {
    #[error("unbalanced brackets in network location: {0}")]
    UnbalancedBrackets(String),
    #[error("invalid IPv6 literal: {0}")]
    InvalidIpv6(String),
}

/// Lexical helpers for hosts and sender addresses. Nothing here resolves names.
pub struct DomainUtils;

impl DomainUtils {
    /// Network location of a URL: everything between `//` and the first
    /// `/`, `?` or `#`, including any userinfo and port.
    pub fn network_location(url: &str) -> Result<&str, UrlParseError> {
        let rest = match url.find("://") {
            Some(pos) => &url[pos + 3..],
            None => return Ok(""),
        };
        let end = rest
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(rest.len());
        let netloc = &rest[..end];

        let has_open = netloc.contains('[');
        let has_close = netloc.contains(']');
        if has_open != has_close {
            return Err(UrlParseError::UnbalancedBrackets(netloc.to_string()));
        }

        if has_open {
            // The first bracketed span of the whole netloc, userinfo included
            let bracketed = netloc
                .split_once('[')
                .map(|(_, after)| after.split(']').next().unwrap_or(after))
                .unwrap_or("");
            Self::check_bracketed_host(bracketed)?;
        }

        Ok(netloc)
    }

    /// Accepts an IPv6 literal with an optional `%zone` suffix, or an
    /// IPvFuture literal (`v1.anything`). IPv4 inside brackets is rejected.
    fn check_bracketed_host(host: &str) -> Result<(), UrlParseError> {
        let invalid = || UrlParseError::InvalidIpv6(host.to_string());

        if let Some(future) = host.strip_prefix('v') {
            let (version, rest) = future.split_once('.').ok_or_else(invalid)?;
            let valid = !version.is_empty()
                && version.chars().all(|c| c.is_ascii_hexdigit())
                && !rest.is_empty()
                && !rest.contains('\n');
            return if valid { Ok(()) } else { Err(invalid()) };
        }

        let address = match host.split_once('%') {
            Some((address, zone)) if !zone.is_empty() && !zone.contains('%') => address,
            Some(_) => return Err(invalid()),
            None => host,
        };
        match url::Host::parse(&format!("[{}]", address)) {
            Ok(url::Host::Ipv6(_)) => Ok(()),
            _ => Err(invalid()),
        }
    }

    /// Display name of a `Name <addr@domain>` sender, if it has one.
    pub fn display_name(sender: &str) -> Option<&str> {
        if !(sender.contains('<') && sender.contains('>')) {
            return None;
        }
        let name = sender.split('<').next().unwrap_or("").trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// First list entry contained anywhere in `host`.
    pub fn find_substring_match<'a>(host: &str, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .find(|candidate| host.contains(candidate.as_str()))
            .map(|s| s.as_str())
    }
}
