//! Configuration loading and discovery.
//!
//! Configuration is layered with figment. Later sources win:
//!
//! 1. Built-in defaults
//! 2. `~/.config/docref/config.<ext>` (user config)
//! 3. `.docref.<ext>` or `docref.<ext>` in the current directory or any
//!    parent, stopping at a `.git` boundary
//! 4. Files passed explicitly (`--config`)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use docref_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! assert_eq!(config.branch.default, "main");
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Hosting-platform variable holding the git ref of the deployment.
pub const DEFAULT_BRANCH_ENV_VAR: &str = "VERCEL_GIT_COMMIT_REF";

/// Branch used when neither the environment nor git can name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Variable the resolved branch is exported under for the site build.
pub const DEFAULT_BRANCH_EXPORT_VAR: &str = "VITE_GIT_REF";

/// Variable the version range is exported under for the site build.
pub const DEFAULT_VERSION_EXPORT_VAR: &str = "VITE_DOCS_VERSION_RANGE";

/// Base URL for "open in online editor" links.
pub const DEFAULT_EDITOR_BASE: &str = "https://stackblitz.com/github";

/// Site path of the migration guide page.
pub const DEFAULT_MIGRATION_GUIDE: &str = "/guides/migration-guide";

/// The configuration for docref.
///
/// Deserialized from config files found during discovery (TOML, YAML, or JSON).
/// Every section has working defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Branch resolution settings.
    pub branch: BranchConfig,
    /// Where the documented package's version comes from.
    pub package: PackageConfig,
    /// Settings for generated links.
    pub links: LinksConfig,
}

/// Branch resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BranchConfig {
    /// Environment variable consulted first (set by the hosting platform).
    pub env_var: String,
    /// Branch used when every other source comes up empty.
    pub default: String,
    /// Variable name the branch is exported under.
    pub export_var: String,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_BRANCH_ENV_VAR.to_string(),
            default: DEFAULT_BRANCH.to_string(),
            export_var: DEFAULT_BRANCH_EXPORT_VAR.to_string(),
        }
    }
}

/// Package version settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackageConfig {
    /// Path to a `package.json`-style manifest, relative to the project root.
    pub manifest: Utf8PathBuf,
    /// Explicit version; skips reading the manifest when set.
    pub version: Option<String>,
    /// Variable name the version range is exported under.
    pub export_var: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            manifest: Utf8PathBuf::from("package.json"),
            version: None,
            export_var: DEFAULT_VERSION_EXPORT_VAR.to_string(),
        }
    }
}

/// Settings for generated links.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinksConfig {
    /// Base URL of the online editor (`{base}/{owner}/{repo}/tree/{branch}/...`).
    pub editor_base: String,
    /// Site path of the migration guide.
    pub migration_guide: String,
    /// Repository owner. Parsed from the git remote when unset.
    pub owner: Option<String>,
    /// Repository name. Parsed from the git remote when unset.
    pub repo: Option<String>,
    /// Remote consulted when `owner`/`repo` are unset.
    pub remote: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            editor_base: DEFAULT_EDITOR_BASE.to_string(),
            migration_guide: DEFAULT_MIGRATION_GUIDE.to_string(),
            owner: None,
            repo: None,
            remote: "origin".to_string(),
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Config {
    /// Reject values that deserialize but would break exports.
    pub fn validate(&self) -> ConfigResult<()> {
        check_var_name("branch.env_var", &self.branch.env_var)?;
        check_var_name("branch.export_var", &self.branch.export_var)?;
        check_var_name("package.export_var", &self.package.export_var)?;
        if self.branch.export_var == self.package.export_var {
            return Err(ConfigError::Invalid {
                field: "package.export_var",
                reason: format!("collides with branch.export_var `{}`", self.branch.export_var),
            });
        }
        Ok(())
    }
}

fn check_var_name(field: &'static str, name: &str) -> ConfigResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains('=') {
        "must not contain `=`"
    } else if name.contains('\0') {
        "must not contain NUL"
    } else {
        return Ok(());
    };
    Err(ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    })
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "docref";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/docref/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`.
    ///
    /// Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    pub fn load(self) -> ConfigResult<Config> {
        self.load_with_sources().map(|(config, _)| config)
    }

    /// Load configuration and report the files that were merged.
    ///
    /// Files are listed lowest precedence first: user config, then the
    /// project file, then explicit files that exist.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load_with_sources(self) -> ConfigResult<(Config, Vec<Utf8PathBuf>)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = Vec::new();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.push(user_config);
        }

        if let Some(ref root) = self.project_search_root
            && let Some(project_config) = self.find_project_config(root)
        {
            figment = Self::merge_file(figment, &project_config);
            sources.push(project_config);
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
            if file.is_file() {
                sources.push(file.clone());
            }
        }

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        config.validate()?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            branch_env_var = %config.branch.env_var,
            sources = sources.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<Config> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .and_then(|root| self.find_project_config(root))
            .is_some();
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config by walking up from the given directory.
    fn find_project_config(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    return Some(dotfile);
                }

                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    return Some(regular);
                }
            }

            // The directory holding the marker is the last one searched.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        None
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/docref/` on Linux, `~/Library/Application Support/docref/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// Get the user cache directory path.
pub fn user_cache_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.cache_dir().to_path_buf()).ok()
}

/// Get the local data directory path (machine-specific, not synced).
///
/// Log files land under `<this>/logs` when no log directory is configured.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}
