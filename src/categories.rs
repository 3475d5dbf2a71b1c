//! Categories resource
//!
//! Advisory list of category names. Served from a JSON file when one is
//! present and well-formed, otherwise from a built-in list. Nothing checks
//! inserted expenses against it.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Resource address used by the MCP surface
pub const CATEGORIES_URI: &str = "expense:///categories";

/// MIME type of the resource body
pub const CATEGORIES_MIME: &str = "application/json";

/// Used when no categories file is available
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "food",
    "transport",
    "housing",
    "utilities",
    "health",
    "education",
    "shopping",
    "entertainment",
    "travel",
    "business",
    "misc",
];

/// Shape of the categories file and of the fallback document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

impl Default for CategoryList {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Read-only handle on the categories document
#[derive(Debug, Clone)]
pub struct CategoriesResource {
    path: PathBuf,
}

impl CategoriesResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the list, falling back to the built-in one if the file is
    /// absent or does not parse. Only an I/O failure on an existing file
    /// is an error.
    pub fn load(&self) -> crate::Result<(CategoryList, Option<String>)> {
        if !self.path.exists() {
            tracing::debug!("No categories file at {}, using defaults", self.path.display());
            return Ok((CategoryList::default(), None));
        }

        let raw = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<CategoryList>(&raw) {
            Ok(list) => Ok((list, Some(raw))),
            Err(e) => {
                tracing::warn!("Ignoring malformed categories file {}: {}", self.path.display(), e);
                Ok((CategoryList::default(), None))
            }
        }
    }

    /// Category names, for callers that want the typed list
    pub fn categories(&self) -> crate::Result<Vec<String>> {
        self.load().map(|(list, _)| list.categories)
    }

    /// Resource body: the file verbatim, the indented fallback document,
    /// or `{"error": ...}` if the file exists but cannot be read.
    pub fn read(&self) -> String {
        match self.load() {
            Ok((_, Some(raw))) => raw,
            Ok((list, None)) => serde_json::to_string_pretty(&list)
                .unwrap_or_else(|e| error_document(&e.to_string())),
            Err(e) => {
                tracing::error!("Failed to read categories: {}", e);
                error_document(&e.to_string())
            }
        }
    }
}

fn error_document(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resource = CategoriesResource::new(dir.path().join("categories.json"));

        let body = resource.read();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let names: Vec<&str> = parsed["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(names, DEFAULT_CATEGORIES.to_vec());
        // Indented with two spaces
        assert!(body.contains("\n  \"categories\""));
    }

    #[test]
    fn test_file_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let raw = "{\"categories\": [\"rent\", \"pets\"]}";
        std::fs::write(&path, raw).unwrap();

        let resource = CategoriesResource::new(&path);
        assert_eq!(resource.read(), raw);
        assert_eq!(resource.categories().unwrap(), vec!["rent", "pets"]);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, "{\"names\": 3").unwrap();

        let resource = CategoriesResource::new(&path);
        assert_eq!(resource.categories().unwrap().len(), 11);
    }

    #[test]
    fn test_unreadable_file_yields_error_document() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists at the path but cannot be read as a file
        let path = dir.path().join("categories.json");
        std::fs::create_dir(&path).unwrap();

        let resource = CategoriesResource::new(&path);
        let parsed: serde_json::Value = serde_json::from_str(&resource.read()).unwrap();
        assert!(!parsed["error"].as_str().unwrap().is_empty());
    }
}
