use crate::model::BucketMetadata;
use crate::parser::ParserOptions;
use eyre::{Error, WrapErr};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "projingest.toml";
pub const DEFAULT_SUBMISSION_URL: &str = "http://localhost:5000/api/projects/bulk";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bucket: BucketMetadata,
    pub parser: ParserOptions,
    pub submission: Submission,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Http,
    Database,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Submission {
    pub sink: SinkKind,
    pub url: String,
    pub token: Option<String>,
    pub database_url: Option<String>,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            sink: SinkKind::Http,
            url: DEFAULT_SUBMISSION_URL.to_owned(),
            token: None,
            database_url: None,
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config, Error> {
        let content = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot read configuration file {}", file_name.display()))?;
        Self::parse(&content)
            .wrap_err_with(|| format!("cannot parse configuration file {}", file_name.display()))
    }

    /// Load the given file, or the default file if it exists, or fall back
    /// to the default configuration.
    pub fn load_or_default(file_name: Option<&Path>) -> Result<Config, Error> {
        match file_name {
            Some(file_name) => Self::load(file_name),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Config::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }
}
