use std::path::PathBuf;

/// Credential store configuration.
///
/// The path is resolved by the caller (flag, `STUDYPLAN_USERS_FILE`, config
/// file, default) and handed over through [`StoreConfig::new`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the line-oriented `username:hash` file.
    pub users_file: PathBuf,
}

impl StoreConfig {
    /// Env var naming the credential file.
    pub const ENV_VAR: &str = "STUDYPLAN_USERS_FILE";

    /// Build a config from an explicit path.
    pub fn new(users_file: impl Into<PathBuf>) -> Self {
        Self {
            users_file: users_file.into(),
        }
    }
}
