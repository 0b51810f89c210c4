// Configuration: where the server lives and which group to start in.
// Command-line flags (and their environment variables) win over the
// optional config file, which wins over built-in defaults.

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::session::DEFAULT_GROUP;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of `<config dir>/arty/config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<String>,
    pub url: Option<String>,
    pub group: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Read the file at `path`; a missing file is an empty config.
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arty").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub group: String,
}

impl Config {
    /// Resolve from the command line and the default config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match default_path() {
            Some(path) => {
                debug!(path = %path.display(), "reading config file");
                FileConfig::read(&path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let url = non_empty(cli.url.clone()).or_else(|| non_empty(file.url));
        let server = non_empty(cli.server.clone()).or_else(|| non_empty(file.server));
        let base_url = match (url, server) {
            (Some(url), _) => url,
            (None, Some(server)) => base_url_for(&server)?,
            (None, None) => {
                return Err(Error::Config(
                    "no server configured; pass --server or set ARTIFACTORY_SERVER".into(),
                ))
            }
        };
        let group = non_empty(cli.group.clone())
            .or_else(|| non_empty(file.group))
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());
        Ok(Config { base_url, group })
    }
}

/// `acme.jfrog.io` -> `https://acme.jfrog.io/artifactory/api/`
///
/// A host given with a scheme is rejected; full URLs belong in `--url`.
pub fn base_url_for(server: &str) -> Result<String> {
    let host = server.trim().trim_end_matches('/');
    if host.contains("://") {
        return Err(Error::Config(format!(
            "--server takes a host name, not a URL ('{}'); use --url for a full API base URL",
            host
        )));
    }
    Ok(format!("https://{}/artifactory/api/", host))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
