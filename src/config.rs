use crate::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lists driving every analyzer. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Matched as substrings of the URL host, not as exact labels.
    pub shortener_domains: Vec<String>,
    pub trusted_domains: Vec<String>,
    pub phishing_keywords: Vec<String>,
    pub suspicious_extensions: Vec<String>,
    /// Brand names that must not appear in the display name of an untrusted sender.
    pub spoofed_brands: Vec<String>,
    /// Cyrillic look-alikes of Latin letters.
    pub homograph_chars: Vec<char>,
    /// Extensions used as the visible half of a double extension.
    pub double_extension_decoys: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            shortener_domains: to_strings(&[
                "bit.ly",
                "tinyurl.com",
                "t.co",
                "goo.gl",
                "ow.ly",
                "short.link",
                "tiny.cc",
                "rb.gy",
                "is.gd",
            ]),
            trusted_domains: to_strings(&[
                "gmail.com",
                "outlook.com",
                "yahoo.com",
                "apple.com",
                "microsoft.com",
                "google.com",
                "amazon.com",
            ]),
            phishing_keywords: to_strings(&[
                "urgent",
                "verify",
                "suspended",
                "confirm",
                "update",
                "click here",
                "act now",
                "limited time",
                "expire",
                "unauthorized",
                "security alert",
                "account locked",
                "winner",
                "congratulations",
                "claim",
                "prize",
                "refund",
                "tax refund",
                "inheritance",
                "lottery",
            ]),
            suspicious_extensions: to_strings(&[
                ".exe", ".scr", ".bat", ".com", ".pif", ".vbs", ".js", ".jar", ".zip", ".rar",
                ".7z",
            ]),
            spoofed_brands: to_strings(&["paypal", "amazon", "microsoft", "apple"]),
            homograph_chars: vec!['а', 'о', 'е', 'р', 'с', 'х'],
            double_extension_decoys: to_strings(&["pdf", "doc", "jpg"]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(DetectorError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl DetectorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Missing files fall back to the built-in lists; unreadable or invalid
    /// files are still reported as errors.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let config = Self::from_file(path)?;
            log::info!("Loaded detector configuration from: {}", path.display());
            Ok(config)
        } else {
            log::warn!(
                "Configuration file '{}' not found, using default configuration",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists() {
        let config = DetectorConfig::default();
        assert_eq!(config.phishing_keywords.len(), 20);
        assert_eq!(config.suspicious_extensions.len(), 11);
        assert!(config.shortener_domains.contains(&"bit.ly".to_string()));
        assert_eq!(config.homograph_chars.len(), 6);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.yaml");

        let mut config = DetectorConfig::default();
        config.trusted_domains.push("example.org".to_string());
        config.to_file(&path).unwrap();

        let loaded = DetectorConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.toml");
        std::fs::write(&path, "trusted_domains = [\"corp.example\"]\n").unwrap();

        let loaded = DetectorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.trusted_domains, vec!["corp.example".to_string()]);
        assert_eq!(
            loaded.phishing_keywords,
            DetectorConfig::default().phishing_keywords
        );
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = DetectorConfig::from_file("detector.ini");
        assert!(matches!(result, Err(DetectorError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DetectorConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, DetectorConfig::default());
    }
}
