use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
