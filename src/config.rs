use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// On-disk configuration (`expense-tracker.toml`).
///
/// Every field is optional; anything left unset falls back to the
/// built-in defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrackerConfig {
    pub database: Option<String>,
    pub categories: Option<String>,
}

impl TrackerConfig {
    /// Database path, or `<temp_dir>/expenses.db` when unset
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    /// Categories file path, or `categories.json` beside the binary when unset
    pub fn categories_path(&self) -> PathBuf {
        self.categories
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_categories_path)
    }

    /// Overlay explicit overrides (e.g. CLI flags) on top of this config
    pub fn with_overrides(mut self, database: Option<&Path>, categories: Option<&Path>) -> Self {
        if let Some(db) = database {
            self.database = Some(db.to_string_lossy().to_string());
        }
        if let Some(cat) = categories {
            self.categories = Some(cat.to_string_lossy().to_string());
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("expense-tracker.toml")
}

pub fn default_database_path() -> PathBuf {
    std::env::temp_dir().join("expenses.db")
}

/// `categories.json` next to the running executable.
///
/// Falls back to the working directory if the executable path is unknown.
pub fn default_categories_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("categories.json")))
        .unwrap_or_else(|| PathBuf::from("categories.json"))
}

/// Read the TOML config. A missing file is `Ok(None)`, not an error.
pub fn load_config(path: Option<&Path>) -> crate::Result<Option<TrackerConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))
}

/// Serialize `config` to `path`. Without `force` an existing file is left alone.
pub fn write_config(path: &Path, config: &TrackerConfig, force: bool) -> crate::Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::Error::Config(e.to_string()))?;

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => crate::Error::Config(format!(
            "{} already exists, pass --force to replace it",
            path.display()
        )),
        _ => e.into(),
    })?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// Create the directory that will hold `file`, if it has one
pub fn ensure_parent_dir(file: &Path) -> crate::Result<()> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}
