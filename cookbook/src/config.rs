use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use galley::error;
use galley::error::{Chainable, Error, Result};
use galley::fstree::FsTree;
use galley::url::UrlBuf;

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    /// Deployment path prefix: `PATH_PREFIX`, else `root`, else the default.
    pub prefix: UrlBuf,
}

#[derive(Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub content: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub drafts: bool,
    #[serde(default)]
    pub validate: bool,
}

impl Settings {
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).chain_with(|| error! {
            "failed to read settings",
            "path" => path.display(),
        })?;

        toml::from_str(&source).map_err(Error::from_std).chain_with(|| error! {
            "invalid settings file",
            "path" => path.display(),
        })
    }
}

impl Config {
    pub fn discover(tree: &FsTree) -> Result<Self> {
        let settings = match tree.get(None, crate::CONFIG_FILE) {
            Some(entry) => Settings::read(&entry.path)?,
            None => Settings::default(),
        };

        let env_prefix = std::env::var(crate::PATH_PREFIX_VAR).ok();
        Ok(Config::new(settings, env_prefix.as_deref()))
    }

    pub fn new(settings: Settings, env_prefix: Option<&str>) -> Self {
        let prefix = UrlBuf::path_prefix(env_prefix.or(settings.root.as_deref()));
        Config { settings, prefix }
    }
}
