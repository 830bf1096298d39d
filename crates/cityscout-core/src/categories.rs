use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::places::Category;
use crate::ConfigError;

/// One `categories.yaml` entry: a user-facing category and the provider
/// place type it searches for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: Category,
    pub provider_type: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryEntry>,
}

/// Category to provider place-type mapping.
///
/// Categories without an entry fall back to
/// [`Category::default_provider_type`].
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    overrides: HashMap<Category, String>,
}

impl CategoryMap {
    #[must_use]
    pub fn from_entries(entries: Vec<CategoryEntry>) -> Self {
        Self {
            overrides: entries
                .into_iter()
                .map(|e| (e.name, e.provider_type))
                .collect(),
        }
    }

    #[must_use]
    pub fn provider_type<'a>(&'a self, category: &'a Category) -> &'a str {
        self.overrides
            .get(category)
            .map_or_else(|| category.default_provider_type(), String::as_str)
    }
}

/// Load and validate the category mapping from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoryMap, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile = serde_yaml::from_str(&content)?;
    validate_categories(&file)?;

    Ok(CategoryMap::from_entries(file.categories))
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &file.categories {
        let provider_type = entry.provider_type.trim();
        if provider_type.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty provider_type",
                entry.name
            )));
        }

        if !provider_type
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "category '{}' has invalid provider_type '{provider_type}'",
                entry.name
            )));
        }

        if !seen.insert(entry.name.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}
