//! Layered configuration for homecache.
//!
//! Values are merged from, in increasing order of precedence:
//!
//! 1. Built-in defaults.
//! 2. `config.toml` or `config.yaml` in the platform configuration directory,
//!    or the single file passed explicitly.
//! 3. `HOMECACHE_*` environment variables (`HOMECACHE_ARCHIVE_DIR`,
//!    `HOMECACHE_SORT_DUPES`, ...).
//!
//! Command-line arguments are applied by the binary on top of the result.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "HOMECACHE_";
const FILE_STEM: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the archive directory under the archive root.
    pub archive_dir: String,
    /// Upper bound for a single media probe invocation. Unset waits forever.
    pub probe_timeout_secs: Option<u64>,
    /// Rename legacy regional root folders before every copy run.
    pub normalize_roots: bool,
    /// Sort the dupes log once a copy run completes.
    pub sort_dupes: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            archive_dir: "ARCHIVE".to_string(),
            probe_timeout_secs: None,
            normalize_roots: true,
            sort_dupes: true,
        }
    }
}

impl Config {
    /// Platform configuration directory, e.g. `~/.config/homecache` on Linux.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "homecache").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// The merged sources, before extraction.
    ///
    /// With an `explicit` file only that file is read (YAML for `.yaml` and
    /// `.yml`, TOML otherwise); without one, both candidate files in `dir` are
    /// read if present, YAML taking precedence.
    pub fn figment(dir: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match (explicit, dir) {
            (Some(file), _) => {
                let is_yaml = file.extension().is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
                figment = match is_yaml {
                    true => figment.merge(Yaml::file_exact(file)),
                    false => figment.merge(Toml::file_exact(file)),
                };
            },
            (None, Some(dir)) => {
                let toml = dir.join(format!("{FILE_STEM}.toml"));
                let yaml = dir.join(format!("{FILE_STEM}.yaml"));
                if toml.is_file() {
                    figment = figment.merge(Toml::file_exact(toml));
                }
                if yaml.is_file() {
                    figment = figment.merge(Yaml::file_exact(yaml));
                }
            },
            (None, None) => {},
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads the configuration from the platform directory, or from `explicit`
    /// when given, and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(Self::default_dir().as_deref(), explicit)
    }

    pub fn load_from(dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        if let Some(file) = explicit
            && !file.is_file()
        {
            exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
        }
        let config: Config = Self::figment(dir, explicit).extract().map_err(ErrorKind::Extract)?;
        config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.archive_dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {},
            _ => exn::bail!(ErrorKind::Invalid {
                key: "archive_dir",
                reason: format!("`{}` is not a single directory name", self.archive_dir),
            }),
        }
        if self.probe_timeout_secs == Some(0) {
            exn::bail!(ErrorKind::Invalid { key: "probe_timeout_secs", reason: "must be at least 1".to_string() });
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_secs.map(Duration::from_secs)
    }
}
