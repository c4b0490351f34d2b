//! Configuration file management for studyplan.
//!
//! Provides a TOML-based config file at `~/.config/studyplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use studyplan_core::generator::CommandGenerator;
use studyplan_store::StoreConfig;

/// Env var naming the generator program and its arguments, space separated.
pub const GENERATOR_ENV: &str = "STUDYPLAN_GENERATOR_CMD";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorSection>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Path of the credential file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Program that reads a prompt on stdin and prints the answer.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the studyplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/studyplan` or
/// `~/.config/studyplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("studyplan")
}

/// Return the path to the studyplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Credential file used when nothing else is configured.
pub fn default_users_file() -> PathBuf {
    config_dir().join("users.txt")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Split a `program arg arg` string on whitespace.
fn parse_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct StudyplanConfig {
    pub store_config: StoreConfig,
    pub generator: Option<CommandGenerator>,
}

impl StudyplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Users file: `cli_users_file` > `STUDYPLAN_USERS_FILE` env >
    ///   `store.users_file` > `<config dir>/users.txt`
    /// - Generator: `cli_generator` > `STUDYPLAN_GENERATOR_CMD` env >
    ///   `[generator]` section > none
    pub fn resolve(cli_users_file: Option<&str>, cli_generator: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let users_file = if let Some(path) = cli_users_file {
            PathBuf::from(path)
        } else if let Ok(path) = std::env::var(StoreConfig::ENV_VAR) {
            PathBuf::from(path)
        } else if let Some(path) = file_config.as_ref().and_then(|c| c.store.users_file.as_ref()) {
            PathBuf::from(path)
        } else {
            default_users_file()
        };

        let generator = if let Some(line) = cli_generator {
            let (program, args) =
                parse_command_line(line).context("--generator-cmd must not be empty")?;
            Some(CommandGenerator::new(program, args))
        } else if let Ok(line) = std::env::var(GENERATOR_ENV) {
            match parse_command_line(&line) {
                Some((program, args)) => Some(CommandGenerator::new(program, args)),
                None => bail!("{GENERATOR_ENV} is set but empty"),
            }
        } else {
            file_config
                .as_ref()
                .and_then(|c| c.generator.as_ref())
                .map(|g| CommandGenerator::new(g.command.clone(), g.args.clone()))
        };

        tracing::debug!(
            users_file = %users_file.display(),
            generator = generator.as_ref().map(CommandGenerator::program),
            "resolved configuration"
        );

        Ok(Self {
            store_config: StoreConfig::new(users_file),
            generator,
        })
    }

    /// The generator, or an error explaining how to configure one.
    pub fn require_generator(&self) -> Result<&CommandGenerator> {
        self.generator.as_ref().with_context(|| {
            format!(
                "no text generator configured; pass --generator-cmd, set {GENERATOR_ENV}, \
                 or run `studyplan init --generator-cmd <program>`"
            )
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
