use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".finance_tracker";
const HOME_ENV: &str = "FINANCE_TRACKER_HOME";
const BOOKS_DIR: &str = "books";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Resolves on-disk locations relative to an application home directory.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory: `FINANCE_TRACKER_HOME` or `~/.finance_tracker`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn books_dir_in(base: &Path) -> PathBuf {
        base.join(BOOKS_DIR)
    }

    pub fn book_file_in(base: &Path, name: &str) -> PathBuf {
        Self::books_dir_in(base).join(format!("{}.json", canonical_name(name)))
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}

/// Lowercase, dash-separated file stem for a book name.
pub fn canonical_name(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !slug.is_empty() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "default".into()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_and_falls_back() {
        assert_eq!(canonical_name("Household 2024"), "household-2024");
        assert_eq!(canonical_name("  My  Book!! "), "my-book");
        assert_eq!(canonical_name("???"), "default");
    }

    #[test]
    fn book_file_lives_under_books_dir() {
        let base = PathBuf::from("/tmp/ft");
        assert_eq!(
            PathResolver::book_file_in(&base, "Family"),
            PathBuf::from("/tmp/ft/books/family.json")
        );
    }
}
