use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const KEY_THEME: &str = "theme";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preference file {path} is not a JSON string map: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value string storage for user preferences.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a single JSON object on disk. Every save rewrites the file.
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    /// A store that ignores whatever is currently at `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        // A BTreeMap<String, String> always serializes.
        let text = serde_json::to_string_pretty(&self.values).unwrap_or_default();
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown theme {0:?}")]
pub struct ParseThemeError(String);

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Dark when saved as dark, or when nothing is saved and the system prefers dark.
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved {
            Some("dark") => Theme::Dark,
            None if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct PreferenceStorage<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> PreferenceStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load_theme(&self, prefers_dark: bool) -> Theme {
        Theme::resolve(self.store.load(KEY_THEME).as_deref(), prefers_dark)
    }

    pub fn save_theme(&mut self, theme: Theme) {
        match self.store.save(KEY_THEME, theme.as_str()) {
            Ok(()) => log::debug!("saved theme {}", theme),
            Err(e) => log::error!("Failed to save theme: {}", e),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stopwatch-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_theme_resolution() {
        assert_eq!(Theme::resolve(Some("dark"), false), Theme::Dark);
        assert_eq!(Theme::resolve(Some("light"), true), Theme::Light);
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
        assert_eq!(Theme::resolve(Some("sepia"), true), Theme::Light);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut storage = PreferenceStorage::new(MemoryStore::default());
        let theme = storage.load_theme(false);
        assert_eq!(theme, Theme::Light);

        storage.save_theme(theme.toggled());
        assert_eq!(storage.store().load("theme").as_deref(), Some("dark"));
        assert_eq!(storage.load_theme(false), Theme::Dark);

        storage.save_theme(Theme::Light);
        assert_eq!(storage.load_theme(true), Theme::Light);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_path("prefs");
        let path = dir.join("prefs.json");
        let _ = fs::remove_dir_all(&dir);

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.load("theme"), None);
        store.save("theme", "dark").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.load("theme").as_deref(), Some("dark"));
        assert_eq!(reopened.path(), path.as_path());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = temp_path("garbage.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StorageError::Parse { .. })));

        let mut store = FileStore::empty(&path);
        store.save("theme", "light").unwrap();
        assert_eq!(FileStore::open(&path).unwrap().load("theme").as_deref(), Some("light"));

        fs::remove_file(&path).unwrap();
    }
}
